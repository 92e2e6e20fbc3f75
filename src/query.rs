//! Classify raw user input into direct references or search text.

/// A normalized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Track id on the metadata provider (Spotify)
    DirectMetadataRef(String),
    /// Video id on the video host (YouTube)
    DirectVideoRef(String),
    /// Anything else: "artist - title" or arbitrary search words
    FreeText(String),
}

impl Query {
    /// Classify a raw query string.  Never fails: anything that doesn't look
    /// like a direct reference is treated as search text.
    pub fn parse(raw: &str) -> Query {
        let raw = raw.trim();
        if let Some(id) = spotify_track_id(raw) {
            Query::DirectMetadataRef(id)
        } else if let Some(id) = youtube_video_id(raw) {
            Query::DirectVideoRef(id)
        } else {
            Query::FreeText(raw.to_string())
        }
    }

    pub fn is_direct_metadata_ref(&self) -> bool {
        matches!(self, Query::DirectMetadataRef(_))
    }
}

/// Extract the track id from `spotify:track:<id>` or
/// `https://open.spotify.com/track/<id>?si=...`.
fn spotify_track_id(raw: &str) -> Option<String> {
    if let Some(rest) = raw.strip_prefix("spotify:track:") {
        return non_empty_id(rest);
    }
    if raw.contains("open.spotify.com") {
        let idx = raw.find("/track/")?;
        return non_empty_id(&raw[idx + "/track/".len()..]);
    }
    None
}

/// Extract the video id from `youtube.com/watch?v=<id>` (any host prefix)
/// or `youtu.be/<id>`.
fn youtube_video_id(raw: &str) -> Option<String> {
    if raw.contains("youtube.com") {
        let idx = raw.find("v=")?;
        let id = &raw[idx + 2..];
        let id = id.split('&').next().unwrap_or(id);
        return non_empty_id(id);
    }
    if let Some(idx) = raw.find("youtu.be/") {
        return non_empty_id(&raw[idx + "youtu.be/".len()..]);
    }
    None
}

/// Cut query strings/fragments and trailing slashes; reject ids with spaces.
fn non_empty_id(s: &str) -> Option<String> {
    let id = s.split(['?', '#', '/']).next().unwrap_or(s).trim();
    if id.is_empty() || id.contains(char::is_whitespace) {
        None
    } else {
        Some(id.to_string())
    }
}
