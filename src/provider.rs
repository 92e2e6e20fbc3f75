//! Metadata provider interface.
//!
//! The response types mirror the JSON shapes of the Spotify Web API closely
//! enough that an HTTP client can deserialize straight into them.  Optional
//! fields are `Option`/defaulted: providers omit keys as often as they null
//! them.

use serde::Deserialize;

use crate::error::Result;

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AlbumRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub isrc: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

/// A track as returned by search and track lookups.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderTrack {
    pub id: String,
    pub name: String,
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    #[serde(default)]
    pub external_ids: ExternalIds,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub disc_number: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Copyright {
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackCount {
    pub total: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProviderAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub copyrights: Vec<Copyright>,
    pub tracks: TrackCount,
}

/// A track entry inside a playlist or album listing.  Local files added to a
/// playlist have no public URL.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrackLink {
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl TrackLink {
    pub fn url(&self) -> Option<&str> {
        self.external_urls.spotify.as_deref()
    }

    pub fn artist_name(&self) -> &str {
        self.artists.first().map(|a| a.name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

/// Entry of a user's playlist listing.  Names can be missing for playlists
/// that are no longer accessible.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub owner: PlaylistOwner,
    pub tracks: TrackCount,
}

/// One page of a paginated listing.  `next` is an opaque cursor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub next: Option<String>,
}

/// A playlist with its first page of tracks.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistDetails {
    pub name: String,
    pub tracks: Page<TrackLink>,
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// An authenticated metadata provider client.
///
/// "Not found" is `Ok(None)` or an empty list.  Expired credentials must be
/// reported as [`crate::Error::AuthExpired`] so the caller can re-issue the
/// client through its [`Connector`].
pub trait MetadataProvider {
    /// Ranked search results, at most `limit` of them.
    fn search_track(&self, text: &str, limit: usize) -> Result<Vec<ProviderTrack>>;

    fn track(&self, id: &str) -> Result<ProviderTrack>;

    fn artist(&self, id: &str) -> Result<ProviderArtist>;

    fn album(&self, id: &str) -> Result<ProviderAlbum>;

    fn user_playlists(&self, user: &str) -> Result<Page<PlaylistSummary>>;

    fn playlist(&self, owner: &str, id: &str) -> Result<Option<PlaylistDetails>>;

    fn album_tracks(&self, album_id: &str) -> Result<Page<TrackLink>>;

    fn next_playlists(&self, cursor: &str) -> Result<Page<PlaylistSummary>>;

    fn next_tracks(&self, cursor: &str) -> Result<Page<TrackLink>>;
}

/// Issues authenticated provider clients.  Called once at start-up and again
/// whenever a client reports expired credentials.
pub trait Connector {
    fn connect(&self) -> Result<Box<dyn MetadataProvider>>;
}
