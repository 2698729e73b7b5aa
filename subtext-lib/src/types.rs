use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SubtitleError};

/// Language requested when the caller does not name one
pub const DEFAULT_LANGUAGE: &str = "en";

const MIN_LANGUAGE_LEN: usize = 2;
const MAX_LANGUAGE_LEN: usize = 12;

/// A validated extraction request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    pub(crate) url: String,
    pub(crate) language: String,
}

impl ExtractionRequest {
    /// Validate and normalize a raw URL and optional language code.
    ///
    /// The URL is trimmed and must be an absolute `http`/`https` URL with a
    /// host. An empty or missing language falls back to [`DEFAULT_LANGUAGE`].
    pub fn new(url: &str, language: Option<&str>) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(SubtitleError::InvalidInput("URL cannot be empty".to_string()));
        }

        let parsed = Url::parse(url)
            .map_err(|e| SubtitleError::InvalidInput(format!("Invalid URL format: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SubtitleError::InvalidInput(format!(
                "Unsupported URL scheme: {}",
                parsed.scheme()
            )));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(SubtitleError::InvalidInput(format!(
                "URL has no host: {}",
                url
            )));
        }

        let language = match language.map(str::trim) {
            None | Some("") => DEFAULT_LANGUAGE.to_string(),
            Some(code) => validate_language(code)?,
        };

        Ok(Self {
            url: url.to_string(),
            language,
        })
    }

    /// The trimmed video URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The requested language code
    pub fn language(&self) -> &str {
        &self.language
    }
}

fn validate_language(code: &str) -> Result<String> {
    let valid_chars = code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    let len = code.len();
    if !valid_chars || !(MIN_LANGUAGE_LEN..=MAX_LANGUAGE_LEN).contains(&len) {
        return Err(SubtitleError::InvalidInput(format!(
            "Invalid language code: '{}'",
            code
        )));
    }
    Ok(code.to_string())
}

/// Who produced a subtitle track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    /// Uploaded by the creator or a contributor
    Manual,
    /// Produced by the platform's speech recognition
    Automatic,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Manual => "manual",
            TrackKind::Automatic => "automatic",
        }
    }
}

/// One downloadable rendition of a track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackFormat {
    pub ext: String,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl TrackFormat {
    /// Caption format of this rendition, if it is one we can parse
    pub fn caption_format(&self) -> Option<CaptionFormat> {
        CaptionFormat::from_ext(&self.ext)
    }
}

/// A subtitle track as reported by the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub language: String,
    pub kind: TrackKind,
    pub formats: Vec<TrackFormat>,
}

impl SubtitleTrack {
    /// Whether at least one rendition can be parsed
    pub fn is_parseable(&self) -> bool {
        self.formats.iter().any(|f| f.caption_format().is_some())
    }

    /// Parseable renditions in preference order
    pub fn preferred_formats(&self) -> Vec<(CaptionFormat, &TrackFormat)> {
        let mut formats: Vec<_> = self
            .formats
            .iter()
            .filter_map(|f| f.caption_format().map(|cf| (cf, f)))
            .collect();
        formats.sort_by_key(|(cf, _)| cf.preference());
        formats
    }
}

/// Video metadata: manual tracks first, then automatic ones, each in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoMetadata {
    pub id: String,
    pub title: String,
    pub tracks: Vec<SubtitleTrack>,
}

impl VideoMetadata {
    pub fn tracks_of(&self, kind: TrackKind) -> impl Iterator<Item = &SubtitleTrack> {
        self.tracks.iter().filter(move |t| t.kind == kind)
    }
}

/// Structured caption formats understood by the parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionFormat {
    Json3,
    WebVtt,
    Srt,
}

impl CaptionFormat {
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.trim().to_ascii_lowercase().as_str() {
            "json3" => Some(CaptionFormat::Json3),
            "vtt" | "webvtt" => Some(CaptionFormat::WebVtt),
            "srt" => Some(CaptionFormat::Srt),
            _ => None,
        }
    }

    /// Guess the format from the payload when the extension says nothing
    pub fn sniff(content: &str) -> Self {
        let head = content.trim_start_matches('\u{FEFF}').trim_start();
        if head.starts_with('{') {
            CaptionFormat::Json3
        } else if head.starts_with("WEBVTT") {
            CaptionFormat::WebVtt
        } else {
            CaptionFormat::Srt
        }
    }

    pub fn ext(&self) -> &'static str {
        match self {
            CaptionFormat::Json3 => "json3",
            CaptionFormat::WebVtt => "vtt",
            CaptionFormat::Srt => "srt",
        }
    }

    /// Lower is tried first
    fn preference(&self) -> u8 {
        match self {
            CaptionFormat::Json3 => 0,
            CaptionFormat::WebVtt => 1,
            CaptionFormat::Srt => 2,
        }
    }
}

/// How far track selection may stray from the requested language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Only the requested language (or a regional variant of it)
    #[default]
    Strict,
    /// Fall back to the first manual track, then the first automatic track
    BestEffort,
}

/// Successful extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Plain text, one line per caption line, joined with `\n`
    pub text: String,
    /// Language code of the track actually used
    pub language: String,
    pub kind: TrackKind,
    pub format: CaptionFormat,
}
