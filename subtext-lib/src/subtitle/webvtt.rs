//! WebVTT parser
//!
//! Handles the subset of <https://www.w3.org/TR/webvtt1/> that subtitle hosts
//! emit: the header, `NOTE`/`STYLE`/`REGION` blocks, optional cue
//! identifiers, cue settings after the timing line, and multi-line payloads.

use super::{parse_timing_line, Cue};

pub fn parse(content: &str) -> Result<Vec<Cue>, String> {
    let content = content.trim_start_matches('\u{FEFF}');
    let lines: Vec<&str> = content.lines().collect();

    let header = lines.first().map(|l| l.trim()).unwrap_or_default();
    if !header.starts_with("WEBVTT") {
        return Err("No WEBVTT header found".to_string());
    }

    let mut cues = Vec::new();
    let mut i = skip_block(&lines, 0);

    while i < lines.len() {
        let line = lines[i].trim();

        if line.is_empty() {
            i += 1;
            continue;
        }

        if line.starts_with("NOTE") || line.starts_with("STYLE") || line.starts_with("REGION") {
            i = skip_block(&lines, i);
            continue;
        }

        // Optional cue identifier on the line before the timing line
        let timing = if line.contains("-->") {
            line
        } else if i + 1 < lines.len() && lines[i + 1].contains("-->") {
            i += 1;
            lines[i].trim()
        } else {
            // Stray text outside a cue
            i = skip_block(&lines, i);
            continue;
        };

        let (start_ms, end_ms) =
            parse_timing_line(timing).ok_or_else(|| format!("Invalid cue timing: {}", timing))?;
        i += 1;

        // Only a truly empty line ends a cue; YouTube pads cues with " " lines
        let mut payload = Vec::new();
        while i < lines.len() && !is_blank(lines[i]) && !lines[i].contains("-->") {
            payload.push(lines[i]);
            i += 1;
        }

        cues.push(Cue::new(start_ms, end_ms, payload.join("\n")));
    }

    Ok(cues)
}

/// Index of the first line after the block starting at `start`
fn skip_block(lines: &[&str], mut start: usize) -> usize {
    start += 1;
    while start < lines.len() && !is_blank(lines[start]) {
        start += 1;
    }
    start
}

fn is_blank(line: &str) -> bool {
    line.trim_end_matches('\r').is_empty()
}
