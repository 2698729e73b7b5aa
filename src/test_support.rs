//! In-memory subtitle source for router and handler tests.
//!
//! URLs containing `removed` are unresolvable, `nosubs` videos carry no
//! tracks, and `broken` videos list a track whose download fails. Every other
//! URL resolves to a video with one English manual WebVTT track.

use std::sync::Arc;

use subtext_lib::{
    Extractor, SourceError, SubtitleSource, SubtitleTrack, TrackFormat, TrackKind, VideoMetadata,
};

use crate::config::ServerConfig;
use crate::state::AppState;

const VTT: &str = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n\n\
00:00:02.000 --> 00:00:03.000\n<c>world</c>\n";

pub struct StubSource;

impl SubtitleSource for StubSource {
    fn id(&self) -> &'static str {
        "stub"
    }

    fn resolve(&self, url: &str) -> Result<VideoMetadata, SourceError> {
        if url.contains("removed") {
            return Err(SourceError::Unresolvable(
                "ERROR: [youtube] removed: Video unavailable".into(),
            ));
        }

        let tracks = if url.contains("nosubs") {
            Vec::new()
        } else {
            let content_url = if url.contains("broken") {
                "https://captions.test/broken.vtt"
            } else {
                "https://captions.test/en.vtt"
            };
            vec![SubtitleTrack {
                language: "en".into(),
                kind: TrackKind::Manual,
                formats: vec![TrackFormat {
                    ext: "vtt".into(),
                    url: content_url.into(),
                    name: Some("English".into()),
                }],
            }]
        };

        Ok(VideoMetadata {
            id: "stub".into(),
            title: "Stub video".into(),
            tracks,
        })
    }

    fn fetch(&self, format: &TrackFormat) -> Result<String, SourceError> {
        if format.url.contains("broken") {
            return Err(SourceError::Fetch("HTTP 503 Service Unavailable".into()));
        }
        Ok(VTT.to_string())
    }
}

pub fn test_state(config: ServerConfig) -> Arc<AppState> {
    Arc::new(AppState::new(config, Extractor::new(Arc::new(StubSource))))
}
