//! Pick the video to download from collected candidates.
//!
//! Titles on the video host are unstructured, so the only signal shared with
//! the metadata provider is duration.  Matching starts strict and widens one
//! second at a time; the first candidate (in the host's ranking) inside the
//! tightest tolerance that matches anything wins.

use crate::candidates::VideoCandidate;
use crate::metadata::TrackMetadata;
use crate::operator::Operator;
use crate::video::full_url;

/// Initial allowed deviation in seconds.
pub const MIN_TOLERANCE_SECS: u32 = 10;
/// Widest allowed deviation in seconds.
pub const MAX_TOLERANCE_SECS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Automatic,
    /// Ask the operator to pick from the list
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(VideoCandidate),
    NoMatch,
    /// Operator chose to skip (manual mode only)
    Skipped,
}

impl Selection {
    pub fn candidate(&self) -> Option<&VideoCandidate> {
        match self {
            Selection::Chosen(c) => Some(c),
            _ => None,
        }
    }
}

/// Select a candidate.  See the module docs for the automatic strategy;
/// without metadata the first candidate is taken unchecked.
pub fn select(
    candidates: &[VideoCandidate],
    metadata: Option<&TrackMetadata>,
    mode: SelectionMode,
    operator: &dyn Operator,
) -> Selection {
    if candidates.is_empty() {
        return Selection::NoMatch;
    }

    match mode {
        SelectionMode::Manual => select_manual(candidates, metadata, operator),
        SelectionMode::Automatic => match metadata {
            Some(meta) => match match_by_duration(candidates, meta.duration_secs()) {
                Some((candidate, tolerance)) => {
                    log::debug!(
                        "Matched \"{}\" ({}s) within {}s of {:.1}s",
                        candidate.title,
                        candidate.seconds,
                        tolerance,
                        meta.duration_secs()
                    );
                    Selection::Chosen(candidate.clone())
                }
                None => {
                    log::error!("{} by {} was not found.", meta.title, meta.artist);
                    Selection::NoMatch
                }
            },
            None => Selection::Chosen(candidates[0].clone()),
        },
    }
}

/// First candidate within the smallest tolerance in
/// `MIN_TOLERANCE_SECS..=MAX_TOLERANCE_SECS` that matches anything, together
/// with that tolerance.
pub fn match_by_duration(candidates: &[VideoCandidate], target_secs: f64) -> Option<(&VideoCandidate, u32)> {
    (MIN_TOLERANCE_SECS..=MAX_TOLERANCE_SECS).find_map(|tolerance| {
        candidates
            .iter()
            .find(|c| (c.seconds as f64 - target_secs).abs() <= tolerance as f64)
            .map(|c| (c, tolerance))
    })
}

fn select_manual(
    candidates: &[VideoCandidate],
    metadata: Option<&TrackMetadata>,
    operator: &dyn Operator,
) -> Selection {
    let heading = metadata
        .map(|m| m.song_name())
        .unwrap_or_else(|| "Select a video".to_string());
    let options: Vec<String> = candidates
        .iter()
        .map(|c| format!("{} {} {}", c.title, c.display_duration(), full_url(&c.link)))
        .collect();

    match operator.choose(&heading, &options) {
        Some(index) if index < candidates.len() => Selection::Chosen(candidates[index].clone()),
        _ => Selection::Skipped,
    }
}
