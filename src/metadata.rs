use serde::Serialize;

/// Resolved metadata for one track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackMetadata {
    pub id: String,
    pub title: String,
    /// First credited artist
    pub artist: String,
    pub album: String,
    pub duration_ms: u64,
    /// First artist genre, title-cased
    pub genre: Option<String>,
    /// First album copyright line
    pub copyright: Option<String>,
    /// Album label
    pub publisher: Option<String>,
    pub release_date: Option<String>,
    pub isrc: Option<String>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    pub total_tracks: u32,
}

impl TrackMetadata {
    /// "[artist] - [title]", used both as video search text and file name.
    pub fn song_name(&self) -> String {
        format!("{} - {}", self.artist, self.title)
    }

    /// Duration in (fractional) seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}
