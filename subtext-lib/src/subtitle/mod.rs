//! Caption parsing and normalization
//!
//! This module turns downloaded caption payloads into plain text:
//! - Cue parsing for YouTube json3, WebVTT and SubRip
//! - Markup, entity and timing removal
//! - Collapsing of rolling auto-caption duplicates

pub mod json3;
pub mod normalize;
pub mod srt;
pub mod webvtt;

use crate::error::SourceError;
use crate::types::CaptionFormat;

pub use normalize::normalize_cues;

/// A single subtitle cue with timing and text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds
    pub end_ms: u64,
    /// Raw text content (may contain markup and several lines)
    pub text: String,
}

impl Cue {
    pub fn new(start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            end_ms,
            text: text.into(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Parse a payload in the given format into cues
pub fn parse_captions(content: &str, format: CaptionFormat) -> Result<Vec<Cue>, SourceError> {
    let parsed = match format {
        CaptionFormat::Json3 => json3::parse(content),
        CaptionFormat::WebVtt => webvtt::parse(content),
        CaptionFormat::Srt => srt::parse(content),
    };
    parsed.map_err(|message| SourceError::Parse {
        format: format.ext().to_string(),
        message,
    })
}

/// Parse with the declared format, retrying once with the sniffed format.
///
/// Servers occasionally hand out a different rendition than the one asked
/// for (a WebVTT body behind a `json3` URL, say).
pub fn parse_with_sniff(
    content: &str,
    declared: CaptionFormat,
) -> Result<(CaptionFormat, Vec<Cue>), SourceError> {
    match parse_captions(content, declared) {
        Ok(cues) => Ok((declared, cues)),
        Err(err) => {
            let sniffed = CaptionFormat::sniff(content);
            if sniffed == declared {
                return Err(err);
            }
            tracing::debug!(
                "Declared {} payload failed to parse, retrying as {}",
                declared.ext(),
                sniffed.ext()
            );
            parse_captions(content, sniffed).map(|cues| (sniffed, cues))
        }
    }
}

/// Parse a cue timestamp: `HH:MM:SS.mmm`, `MM:SS.mmm`, with `.` or `,` before the millis
pub(crate) fn parse_timestamp(s: &str) -> Option<u64> {
    let s = s.trim();
    let (clock, millis) = s.rsplit_once(['.', ','])?;
    if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let millis: u64 = millis.parse().ok()?;

    let parts: Vec<&str> = clock.split(':').collect();
    let (h, m, sec) = match parts.as_slice() {
        [h, m, s] => (h.parse::<u64>().ok()?, m.parse::<u64>().ok()?, s.parse::<u64>().ok()?),
        [m, s] => (0, m.parse::<u64>().ok()?, s.parse::<u64>().ok()?),
        _ => return None,
    };
    if m >= 60 || sec >= 60 {
        return None;
    }

    h.checked_mul(60)?
        .checked_add(m)?
        .checked_mul(60)?
        .checked_add(sec)?
        .checked_mul(1000)?
        .checked_add(millis)
}

/// Parse a timing line `start --> end [settings]`
pub(crate) fn parse_timing_line(line: &str) -> Option<(u64, u64)> {
    let (start, rest) = line.split_once("-->")?;
    let end = rest.split_whitespace().next()?;
    Some((parse_timestamp(start)?, parse_timestamp(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:00:01.000"), Some(1000));
        assert_eq!(parse_timestamp("01:02:03,456"), Some(3_723_456));
        assert_eq!(parse_timestamp("02:03.004"), Some(123_004));
        assert_eq!(parse_timestamp("00:61:00.000"), None);
        assert_eq!(parse_timestamp("00:00:01.5"), None);
        assert_eq!(parse_timestamp("hello"), None);
        assert_eq!(parse_timestamp("99999999999999999:00:00.000"), None);
        assert_eq!(parse_timing_line("18446744073709551615:00:00.000 --> 00:00:01.000"), None);
    }

    #[test]
    fn test_parse_timing_line_ignores_settings() {
        assert_eq!(
            parse_timing_line("00:00:01.000 --> 00:00:04.500 align:start position:0%"),
            Some((1000, 4500))
        );
        assert_eq!(parse_timing_line("00:00:01,000-->00:00:02,000"), Some((1000, 2000)));
        assert_eq!(parse_timing_line("no arrow here"), None);
    }

    #[test]
    fn test_cue_duration() {
        let cue = Cue::new(1000, 3000, "Hello World");
        assert_eq!(cue.duration_ms(), 2000);
        assert_eq!(Cue::new(3000, 1000, "").duration_ms(), 0);
    }

    #[test]
    fn test_parse_with_sniff_recovers() {
        let vtt = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nhello\n";
        let (format, cues) = parse_with_sniff(vtt, CaptionFormat::Json3).unwrap();
        assert_eq!(format, CaptionFormat::WebVtt);
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn test_parse_with_sniff_reports_declared_error() {
        let err = parse_with_sniff("{not json", CaptionFormat::Json3).unwrap_err();
        assert!(err.to_string().contains("json3"));
    }
}
