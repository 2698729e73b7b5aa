//! YouTube timed-text (`json3`) parser

use serde::Deserialize;

use super::Cue;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Option<Vec<Segment>>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    utf8: String,
}

/// Parse a json3 document. Events without segments (window and style
/// declarations) produce no cue.
pub fn parse(content: &str) -> Result<Vec<Cue>, String> {
    let doc: Document = serde_json::from_str(content.trim_start_matches('\u{FEFF}'))
        .map_err(|e| e.to_string())?;

    let cues = doc
        .events
        .into_iter()
        .filter_map(|event| {
            let segs = event.segs?;
            let text: String = segs.into_iter().map(|s| s.utf8).collect();
            Some(Cue::new(
                event.t_start_ms,
                event.t_start_ms.saturating_add(event.d_duration_ms),
                text,
            ))
        })
        .collect();

    Ok(cues)
}
