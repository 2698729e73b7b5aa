//! Track selection
//!
//! Order of preference for a requested language `L`:
//! 1. manual track for exactly `L`
//! 2. automatic track for exactly `L`
//! 3. manual track for a regional variant of `L` (`L-*`)
//! 4. automatic track for a regional variant of `L`
//! 5. with [`FallbackPolicy::BestEffort`] only: the first manual track,
//!    then the first automatic track, whatever their language
//!
//! Language codes compare case-insensitively. Tracks with no parseable
//! rendition are never selected.

use tracing::info;

use crate::types::{FallbackPolicy, SubtitleTrack, TrackKind, VideoMetadata};

/// Pick the track to extract, or `None` when the policy allows nothing
pub fn select_track<'a>(
    metadata: &'a VideoMetadata,
    language: &str,
    policy: FallbackPolicy,
) -> Option<&'a SubtitleTrack> {
    let candidates = |kind: TrackKind| {
        metadata
            .tracks_of(kind)
            .filter(|track| track.is_parseable())
    };

    let requested = language.to_ascii_lowercase();
    let variant_prefix = format!("{}-", requested);
    let exact = |track: &&SubtitleTrack| track.language.to_ascii_lowercase() == requested;
    let variant =
        |track: &&SubtitleTrack| track.language.to_ascii_lowercase().starts_with(&variant_prefix);

    let matched = candidates(TrackKind::Manual)
        .find(exact)
        .or_else(|| candidates(TrackKind::Automatic).find(exact))
        .or_else(|| candidates(TrackKind::Manual).find(variant))
        .or_else(|| candidates(TrackKind::Automatic).find(variant));
    if matched.is_some() {
        return matched;
    }

    if policy == FallbackPolicy::Strict {
        return None;
    }

    let fallback = candidates(TrackKind::Manual)
        .next()
        .or_else(|| candidates(TrackKind::Automatic).next());
    if let Some(track) = fallback {
        info!(
            "Requested language '{}' not found. Using first available {} track: '{}'",
            language,
            track.kind.as_str(),
            track.language
        );
    }
    fallback
}
