//! yt-dlp backed subtitle source
//!
//! Metadata comes from `yt-dlp --dump-single-json --skip-download`; the
//! `subtitles` and `automatic_captions` maps of that document list every
//! track with one URL per rendition. Renditions are then downloaded with a
//! blocking HTTP client.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::SubtitleSource;
use crate::error::SourceError;
use crate::types::{SubtitleTrack, TrackFormat, TrackKind, VideoMetadata};

const USER_AGENT: &str = concat!("subtext/", env!("CARGO_PKG_VERSION"));

/// Subtitle source that shells out to yt-dlp
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    ytdlp_path: PathBuf,
}

impl YtDlpSource {
    /// Locate yt-dlp on this machine
    pub fn new() -> Result<Self, SourceError> {
        let ytdlp_path = find_ytdlp().ok_or(SourceError::BinaryNotFound)?;
        info!("Found yt-dlp at: {}", ytdlp_path.display());
        Ok(Self { ytdlp_path })
    }

    /// Use a specific yt-dlp binary
    pub fn with_binary(path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let ytdlp_path = path.into();
        if !is_executable(&ytdlp_path) {
            warn!("Configured yt-dlp is not executable: {}", ytdlp_path.display());
            return Err(SourceError::BinaryNotFound);
        }
        Ok(Self { ytdlp_path })
    }

    /// Use the configured binary if any, otherwise search for one
    pub fn from_config(path: Option<&Path>) -> Result<Self, SourceError> {
        match path {
            Some(path) => Self::with_binary(path),
            None => Self::new(),
        }
    }

    pub fn ytdlp_path(&self) -> &Path {
        &self.ytdlp_path
    }
}

impl SubtitleSource for YtDlpSource {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    fn resolve(&self, url: &str) -> Result<VideoMetadata, SourceError> {
        debug!("Resolving subtitle catalog for URL: {}", url);

        let output = Command::new(&self.ytdlp_path)
            .arg("--dump-single-json")
            .arg("--skip-download")
            .arg("--no-warnings")
            .arg("--no-playlist")
            .arg("--")
            .arg(url)
            .output()
            .map_err(|source| SourceError::Spawn {
                program: self.ytdlp_path.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = error_line(&stderr)
                .unwrap_or_else(|| format!("yt-dlp exited with {}", output.status));
            warn!("yt-dlp could not resolve {}: {}", url, message);
            return Err(SourceError::Unresolvable(message));
        }

        let json = String::from_utf8_lossy(&output.stdout);
        parse_metadata(&json)
    }

    fn fetch(&self, format: &TrackFormat) -> Result<String, SourceError> {
        debug!("Downloading {} subtitles from {}", format.ext, format.url);

        // Built per call so the client never outlives the blocking thread it runs on
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let response = client.get(&format.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Fetch(format!(
                "HTTP {} for {} rendition",
                status, format.ext
            )));
        }

        Ok(response.text()?)
    }
}

/// The most useful line of yt-dlp's stderr: the last `ERROR:` line, or the last non-empty one
fn error_line(stderr: &str) -> Option<String> {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| lines.last())
        .map(|l| l.to_string())
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    subtitles: Option<Map<String, Value>>,
    #[serde(default)]
    automatic_captions: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Decode yt-dlp's info JSON into [`VideoMetadata`]
pub fn parse_metadata(json: &str) -> Result<VideoMetadata, SourceError> {
    let raw: RawInfo = serde_json::from_str(json)?;

    let mut tracks = collect_tracks(raw.subtitles, TrackKind::Manual);
    tracks.extend(collect_tracks(raw.automatic_captions, TrackKind::Automatic));

    debug!(
        "Video {} lists {} subtitle track(s)",
        raw.id,
        tracks.len()
    );

    Ok(VideoMetadata {
        id: raw.id,
        title: raw.title,
        tracks,
    })
}

fn collect_tracks(catalog: Option<Map<String, Value>>, kind: TrackKind) -> Vec<SubtitleTrack> {
    let Some(catalog) = catalog else {
        return Vec::new();
    };

    catalog
        .into_iter()
        .filter_map(|(language, value)| {
            let raw: Vec<RawFormat> = match serde_json::from_value(value) {
                Ok(raw) => raw,
                Err(e) => {
                    debug!("Skipping {} track '{}': {}", kind.as_str(), language, e);
                    return None;
                }
            };
            let formats: Vec<TrackFormat> = raw
                .into_iter()
                .filter_map(|f| {
                    Some(TrackFormat {
                        ext: f.ext?,
                        url: f.url?,
                        name: f.name,
                    })
                })
                .collect();
            if formats.is_empty() {
                return None;
            }
            Some(SubtitleTrack {
                language,
                kind,
                formats,
            })
        })
        .collect()
}

// ============================================================
// yt-dlp Detection Functions
// ============================================================

/// Find yt-dlp: first in PATH, then in common installation paths
pub fn find_ytdlp() -> Option<PathBuf> {
    if let Ok(path) = which::which("yt-dlp") {
        return Some(path);
    }

    let common_paths = [
        "/usr/local/bin/yt-dlp",
        "/usr/bin/yt-dlp",
        "/opt/homebrew/bin/yt-dlp",
        "/snap/bin/yt-dlp",
    ];
    if let Some(found) = common_paths
        .iter()
        .map(PathBuf::from)
        .find(|p| is_executable(p))
    {
        return Some(found);
    }

    let user_local = std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".local/bin/yt-dlp"))
        .filter(|p| is_executable(p));
    if user_local.is_none() {
        warn!("yt-dlp not found in PATH or common locations");
    }
    user_local
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
