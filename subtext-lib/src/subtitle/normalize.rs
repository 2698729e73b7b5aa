//! Cue normalization to plain text
//!
//! Output is one caption line per text line, joined with `\n`, without a
//! trailing newline. A line identical to the previously emitted one is
//! dropped: auto-generated captions repeat the previous line at the top of
//! each new cue.

use regex::Regex;
use std::sync::OnceLock;

use super::Cue;

/// Line separator used in normalized output
pub const LINE_SEPARATOR: &str = "\n";

fn tag_regex() -> &'static Regex {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    // Tag-shaped only, so literal "a < b" survives
    TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?[A-Za-z0-9.:][^>]*>").expect("Failed to compile tag regex")
    })
}

fn override_regex() -> &'static Regex {
    static OVERRIDE_REGEX: OnceLock<Regex> = OnceLock::new();
    OVERRIDE_REGEX
        .get_or_init(|| Regex::new(r"\{[^}]*\}").expect("Failed to compile override regex"))
}

/// Normalize parsed cues into plain text
pub fn normalize_cues(cues: &[Cue]) -> String {
    let mut ordered: Vec<&Cue> = cues.iter().collect();
    ordered.sort_by_key(|cue| cue.start_ms);

    let mut lines: Vec<String> = Vec::new();
    for cue in ordered {
        let cleaned = clean_markup(&cue.text);
        for line in cleaned.lines() {
            let line = collapse_whitespace(line);
            if line.is_empty() {
                continue;
            }
            if lines.last() == Some(&line) {
                continue;
            }
            lines.push(line);
        }
    }

    lines.join(LINE_SEPARATOR)
}

/// Strip inline tags and `{...}` overrides, then decode entities
fn clean_markup(text: &str) -> String {
    let without_tags = tag_regex().replace_all(text, "");
    let without_overrides = override_regex().replace_all(&without_tags, "");
    decode_entities(&without_overrides)
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        // Last, so "&amp;lt;" stays "&lt;"
        .replace("&amp;", "&")
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}
