use thiserror::Error;

/// Main error type for subtitle extraction
///
/// Every failure a caller can observe is one of these kinds. Errors raised by
/// the subtitle source are mapped into them at the [`crate::Extractor`]
/// boundary and never leak out in raw form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubtitleError {
    /// The request itself is unusable (empty or malformed URL, bad language code)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The source could not resolve the video (removed, private, geo-blocked, offline)
    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    /// The video resolved but no track satisfies the selection policy
    #[error("No subtitles available for language '{language}'")]
    NoSubtitlesAvailable { language: String },

    /// A track was selected but its content could not be fetched or parsed
    #[error("Subtitle extraction failed: {0}")]
    ExtractionFailed(String),

    /// Anything unexpected: the source could not be run, a worker died
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Stable, machine-readable error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    VideoUnavailable,
    NoSubtitlesAvailable,
    ExtractionFailed,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::VideoUnavailable => "video_unavailable",
            ErrorKind::NoSubtitlesAvailable => "no_subtitles_available",
            ErrorKind::ExtractionFailed => "extraction_failed",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SubtitleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubtitleError::InvalidInput(_) => ErrorKind::InvalidInput,
            SubtitleError::VideoUnavailable(_) => ErrorKind::VideoUnavailable,
            SubtitleError::NoSubtitlesAvailable { .. } => ErrorKind::NoSubtitlesAvailable,
            SubtitleError::ExtractionFailed(_) => ErrorKind::ExtractionFailed,
            SubtitleError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Errors reported by a [`crate::SubtitleSource`]
#[derive(Error, Debug)]
pub enum SourceError {
    /// yt-dlp could not be located
    #[error("yt-dlp not found. Please install yt-dlp")]
    BinaryNotFound,

    /// The source program could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The source refused or failed to resolve the URL
    #[error("{0}")]
    Unresolvable(String),

    /// The metadata returned by the source could not be decoded
    #[error("Malformed video metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Downloading a track rendition failed
    #[error("Failed to download subtitle track: {0}")]
    Fetch(String),

    /// The downloaded rendition could not be parsed
    #[error("Failed to parse {format} subtitles: {message}")]
    Parse { format: String, message: String },
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Fetch(err.to_string())
    }
}

impl From<SourceError> for SubtitleError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::BinaryNotFound | SourceError::Spawn { .. } => {
                SubtitleError::Internal(err.to_string())
            }
            SourceError::Unresolvable(msg) => SubtitleError::VideoUnavailable(msg),
            SourceError::Metadata(_) | SourceError::Fetch(_) | SourceError::Parse { .. } => {
                SubtitleError::ExtractionFailed(err.to_string())
            }
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SubtitleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(
            SubtitleError::InvalidInput("x".into()).kind().as_str(),
            "invalid_input"
        );
        assert_eq!(
            SubtitleError::NoSubtitlesAvailable {
                language: "de".into()
            }
            .kind()
            .to_string(),
            "no_subtitles_available"
        );
    }

    #[test]
    fn test_source_error_mapping() {
        let err: SubtitleError = SourceError::Unresolvable("ERROR: Private video".into()).into();
        assert_eq!(err, SubtitleError::VideoUnavailable("ERROR: Private video".into()));

        let err: SubtitleError = SourceError::Fetch("HTTP 403".into()).into();
        assert_eq!(err.kind(), ErrorKind::ExtractionFailed);

        let err: SubtitleError = SourceError::BinaryNotFound.into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_no_subtitles_message() {
        let err = SubtitleError::NoSubtitlesAvailable {
            language: "fr".into(),
        };
        assert_eq!(err.to_string(), "No subtitles available for language 'fr'");
    }
}
