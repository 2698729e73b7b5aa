//! SubRip parser

use super::{parse_timing_line, Cue};

/// Parse SRT content. Sequence numbers are optional; a block is recognised
/// by its timing line.
pub fn parse(content: &str) -> Result<Vec<Cue>, String> {
    let content = content.trim_start_matches('\u{FEFF}');
    let mut cues = Vec::new();
    let mut lines = content.lines().map(str::trim_end).peekable();

    while let Some(line) = lines.next() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let timing = if line.contains("-->") {
            line
        } else if line.bytes().all(|b| b.is_ascii_digit()) {
            match lines.next() {
                Some(next) if next.contains("-->") => next.trim(),
                Some(next) => return Err(format!("Expected timing line, found: {}", next)),
                None => break,
            }
        } else {
            return Err(format!("Unexpected line outside a cue: {}", line));
        };

        let (start_ms, end_ms) =
            parse_timing_line(timing).ok_or_else(|| format!("Invalid cue timing: {}", timing))?;

        let mut text = Vec::new();
        while let Some(next) = lines.peek() {
            if next.trim().is_empty() {
                break;
            }
            text.push(*next);
            lines.next();
        }

        cues.push(Cue::new(start_ms, end_ms, text.join("\n")));
    }

    Ok(cues)
}
