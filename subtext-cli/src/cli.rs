//! Argument parsing and the command's run loop.

use clap::{CommandFactory, Parser};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use subtext_lib::{
    ErrorKind, ExtractionRequest, Extractor, FallbackPolicy, SubtitleError, YtDlpSource,
};

/// Subtitles written successfully
pub const EXIT_OK: u8 = 0;
/// Extraction failed
pub const EXIT_FAILURE: u8 = 1;
/// Bad arguments or unusable input
pub const EXIT_USAGE: u8 = 2;

const EXAMPLES: &str = "\
Examples:
  subtext \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\"
  subtext \"https://example.com/video\" --language es
  subtext \"https://example.com/video\" > subtitles.txt";

/// Extract subtitles from video URLs as plain text.
#[derive(Parser, Debug, Clone)]
#[command(name = "subtext")]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// Video URL to extract subtitles from
    pub url: String,

    /// Language code for subtitles
    #[arg(short, long, default_value = "en")]
    pub language: String,

    /// Enable verbose output on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Fall back to any available track when the language is missing
    #[arg(long)]
    pub best_effort: bool,

    /// Path to the yt-dlp binary (searched in PATH by default)
    #[arg(long = "yt-dlp", value_name = "PATH")]
    pub yt_dlp: Option<PathBuf>,
}

impl Cli {
    pub fn policy(&self) -> FallbackPolicy {
        if self.best_effort {
            FallbackPolicy::BestEffort
        } else {
            FallbackPolicy::Strict
        }
    }
}

/// Exit code for a failure kind
pub fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::InvalidInput => EXIT_USAGE,
        _ => EXIT_FAILURE,
    }
}

/// Build the yt-dlp backed extractor described by the arguments
pub fn build_extractor(cli: &Cli) -> Result<Extractor, SubtitleError> {
    let source = YtDlpSource::from_config(cli.yt_dlp.as_deref())?;
    Ok(Extractor::new(Arc::new(source)).with_policy(cli.policy()))
}

/// Run one extraction. Subtitle text goes to `out`, diagnostics to `err`.
pub fn run<B>(cli: &Cli, build: B, out: &mut dyn Write, err: &mut dyn Write) -> u8
where
    B: FnOnce(&Cli) -> Result<Extractor, SubtitleError>,
{
    let request = match ExtractionRequest::new(&cli.url, Some(cli.language.as_str())) {
        Ok(request) => request,
        Err(e) => {
            let usage = Cli::command().render_usage();
            let _ = writeln!(err, "Error: {}\n\n{}", e, usage);
            return EXIT_USAGE;
        }
    };

    tracing::info!("Extracting subtitles from: {}", request.url());
    tracing::info!("Language: {}", request.language());

    let result = build(cli).and_then(|extractor| extractor.extract(&request));
    match result {
        Ok(result) => {
            if let Err(e) = writeln!(out, "{}", result.text).and_then(|_| out.flush()) {
                let _ = writeln!(err, "Error: failed to write subtitles: {}", e);
                return EXIT_FAILURE;
            }
            tracing::info!(
                "Successfully extracted {} characters ({} track '{}')",
                result.text.len(),
                result.kind.as_str(),
                result.language
            );
            EXIT_OK
        }
        Err(e) => report(cli, &e, err),
    }
}

fn report(cli: &Cli, e: &SubtitleError, err: &mut dyn Write) -> u8 {
    let _ = writeln!(err, "Error: {}", e);
    if cli.verbose {
        let _ = writeln!(err, "kind: {}", e.kind());
    }
    exit_code(e.kind())
}

#[cfg(test)]
mod tests {
    use super::*;
    use subtext_lib::{SourceError, SubtitleSource, SubtitleTrack, TrackFormat, TrackKind, VideoMetadata};

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    const VTT: &str = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHello\n\n00:00:02.000 --> 00:00:03.000\nworld\n";

    /// Serves one English manual track, or nothing
    struct OneTrack {
        tracks: bool,
    }

    impl SubtitleSource for OneTrack {
        fn id(&self) -> &'static str {
            "one-track"
        }

        fn resolve(&self, url: &str) -> Result<VideoMetadata, SourceError> {
            if url.contains("removed") {
                return Err(SourceError::Unresolvable("ERROR: Video unavailable".into()));
            }
            let tracks = if self.tracks {
                vec![SubtitleTrack {
                    language: "en".into(),
                    kind: TrackKind::Manual,
                    formats: vec![TrackFormat {
                        ext: "vtt".into(),
                        url: "https://captions.test/en.vtt".into(),
                        name: None,
                    }],
                }]
            } else {
                Vec::new()
            };
            Ok(VideoMetadata {
                id: "x".into(),
                title: "x".into(),
                tracks,
            })
        }

        fn fetch(&self, _format: &TrackFormat) -> Result<String, SourceError> {
            Ok(VTT.to_string())
        }
    }

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("subtext").chain(args.iter().copied())).unwrap()
    }

    fn exec(cli: &Cli, tracks: bool) -> (u8, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(
            cli,
            |c| Ok(Extractor::new(Arc::new(OneTrack { tracks })).with_policy(c.policy())),
            &mut out,
            &mut err,
        );
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_parse_defaults() {
        let cli = cli(&[URL]);
        assert_eq!(cli.language, "en");
        assert!(!cli.verbose);
        assert_eq!(cli.policy(), FallbackPolicy::Strict);
    }

    #[test]
    fn test_parse_flags() {
        let cli = cli(&[URL, "-l", "es", "-v", "--best-effort", "--yt-dlp", "/opt/yt-dlp"]);
        assert_eq!(cli.language, "es");
        assert!(cli.verbose);
        assert_eq!(cli.policy(), FallbackPolicy::BestEffort);
        assert_eq!(cli.yt_dlp, Some(PathBuf::from("/opt/yt-dlp")));
    }

    #[test]
    fn test_missing_url_is_usage_error() {
        let err = Cli::try_parse_from(["subtext"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let err = Cli::try_parse_from(["subtext", URL, "--bogus"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_success_writes_only_text() {
        let (code, out, err) = exec(&cli(&[URL]), true);
        assert_eq!(code, EXIT_OK);
        assert_eq!(out, "Hello\nworld\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_blank_url_exits_two() {
        for url in ["", "   "] {
            let (code, out, err) = exec(&cli(&[url]), true);
            assert_eq!(code, EXIT_USAGE);
            assert!(out.is_empty());
            assert!(err.starts_with("Error: Invalid input"), "{}", err);
            assert!(err.contains("Usage:"), "{}", err);
        }
    }

    #[test]
    fn test_malformed_url_exits_two() {
        let (code, _, err) = exec(&cli(&["invalid_url"]), true);
        assert_eq!(code, EXIT_USAGE);
        assert!(err.contains("Invalid URL format"), "{}", err);
    }

    #[test]
    fn test_no_subtitles_exits_one() {
        let (code, out, err) = exec(&cli(&[URL]), false);
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.is_empty());
        assert_eq!(err, "Error: No subtitles available for language 'en'\n");
    }

    #[test]
    fn test_verbose_reports_kind() {
        let (code, _, err) = exec(&cli(&[URL, "--verbose"]), false);
        assert_eq!(code, EXIT_FAILURE);
        assert!(err.ends_with("kind: no_subtitles_available\n"), "{}", err);
    }

    #[test]
    fn test_unavailable_video_exits_one() {
        let (code, out, err) = exec(&cli(&["https://www.youtube.com/watch?v=removed"]), true);
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.is_empty());
        assert_eq!(err, "Error: Video unavailable: ERROR: Video unavailable\n");
    }

    #[test]
    fn test_missing_ytdlp_exits_one() {
        let cli = cli(&[URL]);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(
            &cli,
            |_| Err(SubtitleError::from(SourceError::BinaryNotFound)),
            &mut out,
            &mut err,
        );
        assert_eq!(code, EXIT_FAILURE);
        assert!(String::from_utf8(err).unwrap().contains("yt-dlp not found"));
    }
}
