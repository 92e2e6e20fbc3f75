//! Candidate collection from video search results.

use crate::error::Result;
use crate::video::{SearchOrder, VideoHost};

/// Total search rounds before giving up on a results page whose durations
/// can't be read.
pub const MAX_SEARCH_ATTEMPTS: u32 = 5;

/// A video that might be the wanted track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCandidate {
    pub title: String,
    /// Duration in whole seconds
    pub seconds: u32,
    pub link: String,
}

impl VideoCandidate {
    /// Duration formatted back as "M:SS" / "H:MM:SS" for display.
    pub fn display_duration(&self) -> String {
        let (h, m, s) = (self.seconds / 3600, (self.seconds / 60) % 60, self.seconds % 60);
        if h > 0 {
            format!("{}:{:02}:{:02}", h, m, s)
        } else {
            format!("{}:{:02}", m, s)
        }
    }
}

/// Parse a display duration like "6:40" or "1:02:30" into seconds.
/// Anything else (empty, "LIVE", extra fields) is `None`.
pub fn parse_duration(s: &str) -> Option<u32> {
    let parts: Vec<&str> = s.trim().split(':').collect();
    let nums: Vec<u32> = parts
        .iter()
        .map(|p| p.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    // Scraped values can be arbitrarily large; overflow reads as unparseable
    match nums.as_slice() {
        [mins, secs] if *secs < 60 => mins.checked_mul(60)?.checked_add(*secs),
        [hrs, mins, secs] if *mins < 60 && *secs < 60 => hrs.checked_mul(3600)?.checked_add(mins * 60 + secs),
        _ => None,
    }
}

/// Search the video host and collect candidates in result-page order.
///
/// Non-video results are skipped.  If any video's duration can't be parsed
/// the page is discarded and a fresh search is issued, for at most
/// [`MAX_SEARCH_ATTEMPTS`] rounds; after that the result is empty.  With
/// `want_many == false` collection stops at the first candidate.
pub fn collect(
    host: &dyn VideoHost,
    search_text: &str,
    order: SearchOrder,
    want_many: bool,
) -> Result<Vec<VideoCandidate>> {
    for attempt in 1..=MAX_SEARCH_ATTEMPTS {
        match collect_page(host, search_text, order, want_many)? {
            Some(candidates) => return Ok(candidates),
            None => {
                log::debug!(
                    "Unreadable duration in results for \"{}\" (attempt {}/{})",
                    search_text,
                    attempt,
                    MAX_SEARCH_ATTEMPTS
                );
            }
        }
    }

    log::warn!("Giving up on \"{}\" after {} searches", search_text, MAX_SEARCH_ATTEMPTS);
    Ok(Vec::new())
}

/// One search round.  `None` means a duration failed to parse.
fn collect_page(
    host: &dyn VideoHost,
    search_text: &str,
    order: SearchOrder,
    want_many: bool,
) -> Result<Option<Vec<VideoCandidate>>> {
    let mut candidates = Vec::new();

    for result in host.search(search_text, order)? {
        if !result.is_video() {
            continue;
        }

        let seconds = match result.duration.as_deref().and_then(parse_duration) {
            Some(s) => s,
            None => return Ok(None),
        };

        candidates.push(VideoCandidate {
            title: result.title,
            seconds,
            link: result.link,
        });

        if !want_many {
            break;
        }
    }

    Ok(Some(candidates))
}
