//! Video host interface (search + audio stream download).

use std::path::Path;

use crate::error::Result;

/// Base URL prepended to relative result links.
pub const VIDEO_HOST_URL: &str = "https://youtube.com";

/// Result ordering requested from the video host search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOrder {
    Relevance,
    ViewCount,
}

/// One entry of a search results page, before any filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub title: String,
    /// Relative link like "/watch?v=..."
    pub link: String,
    /// Display duration, e.g. "3:28" or "1:02:03"; missing for live streams
    pub duration: Option<String>,
    pub is_channel: bool,
    pub is_playlist: bool,
    pub is_ad: bool,
}

impl SearchResult {
    /// Channels, mixes/playlists and ads are not candidates.
    pub fn is_video(&self) -> bool {
        !(self.is_channel || self.is_playlist || self.is_ad)
    }
}

/// A downloadable audio-only stream of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioStream {
    /// Container extension including the dot, e.g. ".m4a"
    pub extension: String,
    pub bitrate_kbps: u32,
    pub url: String,
}

/// Stream metadata for a single video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub title: String,
    pub link: String,
    pub audio_streams: Vec<AudioStream>,
}

impl VideoInfo {
    /// Highest-bitrate audio stream in the given container.
    pub fn best_audio(&self, extension: &str) -> Option<&AudioStream> {
        self.audio_streams
            .iter()
            .filter(|s| s.extension == extension)
            .max_by_key(|s| s.bitrate_kbps)
    }
}

pub trait VideoHost {
    /// Fetch and parse the first results page for `text`.
    fn search(&self, text: &str, order: SearchOrder) -> Result<Vec<SearchResult>>;

    /// Resolve a link or video id into stream metadata.
    fn video(&self, link: &str) -> Result<VideoInfo>;

    /// Download a stream to `dest`.  Partial data must be written under a
    /// `.temp` suffix so an interrupted download is swept on the next run.
    fn download(&self, stream: &AudioStream, dest: &Path) -> Result<()>;
}

/// Absolute URL for a (possibly relative) result link.
pub fn full_url(link: &str) -> String {
    if link.starts_with('/') {
        format!("{}{}", VIDEO_HOST_URL, link)
    } else {
        link.to_string()
    }
}
