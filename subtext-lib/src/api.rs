use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, SourceError, SubtitleError};
use crate::select::select_track;
use crate::source::{SubtitleSource, YtDlpSource};
use crate::subtitle::{normalize_cues, parse_with_sniff};
use crate::types::{ExtractionRequest, ExtractionResult, FallbackPolicy};

/// Extract plain-text subtitles for `url` with yt-dlp and the strict
/// fallback policy.
///
/// This blocks on a child process and network I/O.
pub fn extract_subtitles(url: &str, language: &str) -> Result<ExtractionResult> {
    let request = ExtractionRequest::new(url, Some(language))?;
    let source = YtDlpSource::new().map_err(SubtitleError::from)?;
    Extractor::new(Arc::new(source)).extract(&request)
}

/// Subtitle extraction over an injectable source
#[derive(Clone)]
pub struct Extractor {
    source: Arc<dyn SubtitleSource>,
    policy: FallbackPolicy,
}

impl std::fmt::Debug for Extractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extractor")
            .field("source", &self.source.id())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Extractor {
    pub fn new(source: Arc<dyn SubtitleSource>) -> Self {
        Self {
            source,
            policy: FallbackPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Resolve, select, fetch and normalize. Blocking.
    pub fn extract(&self, request: &ExtractionRequest) -> Result<ExtractionResult> {
        // Nothing reaches the source unvalidated
        let request = &ExtractionRequest::new(&request.url, Some(request.language.as_str()))?;
        info!(
            "Extracting subtitles from URL: {}, language: {}",
            request.url, request.language
        );

        let metadata = self.source.resolve(&request.url)?;

        let track = select_track(&metadata, &request.language, self.policy).ok_or_else(|| {
            info!(
                "No {} subtitles for {} ({} track(s) listed)",
                request.language,
                request.url,
                metadata.tracks.len()
            );
            SubtitleError::NoSubtitlesAvailable {
                language: request.language.clone(),
            }
        })?;
        debug!(
            "Selected {} track '{}' for video {}",
            track.kind.as_str(),
            track.language,
            metadata.id
        );

        let mut last_error: Option<SourceError> = None;
        for (format, rendition) in track.preferred_formats() {
            let parsed = self
                .source
                .fetch(rendition)
                .and_then(|content| parse_with_sniff(&content, format));

            let (format, cues) = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Failed to use {} rendition: {}", format.ext(), e);
                    last_error = Some(e);
                    continue;
                }
            };

            let text = normalize_cues(&cues);
            if text.is_empty() {
                return Err(SubtitleError::NoSubtitlesAvailable {
                    language: request.language.clone(),
                });
            }

            info!(
                "Successfully extracted {} characters of '{}' subtitles",
                text.len(),
                track.language
            );
            return Ok(ExtractionResult {
                text,
                language: track.language.clone(),
                kind: track.kind,
                format,
            });
        }

        Err(match last_error {
            Some(e) => SubtitleError::ExtractionFailed(e.to_string()),
            None => SubtitleError::ExtractionFailed(format!(
                "Track '{}' has no parseable rendition",
                track.language
            )),
        })
    }
}
