//! Subtitle sources
//!
//! A source resolves a video URL into its subtitle catalog and downloads
//! individual track renditions. Both calls block and may be slow; callers
//! on an async runtime must run them on a blocking thread.

pub mod ytdlp;

use crate::error::SourceError;
use crate::types::{TrackFormat, VideoMetadata};

pub use ytdlp::YtDlpSource;

/// Collaborator interface for video metadata and subtitle retrieval
pub trait SubtitleSource: Send + Sync {
    /// Short identifier used in logs (e.g. "yt-dlp")
    fn id(&self) -> &'static str;

    /// Resolve a video URL and list its subtitle tracks, without downloading media
    fn resolve(&self, url: &str) -> Result<VideoMetadata, SourceError>;

    /// Download one rendition of a track
    fn fetch(&self, format: &TrackFormat) -> Result<String, SourceError>;
}
