//! In-memory stand-ins for the external services, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::metadata::TrackMetadata;
use crate::operator::Operator;
use crate::pipeline::{Encoder, StopSignal, Transcoder};
use crate::provider::{
    AlbumRef, ArtistRef, Connector, Copyright, ExternalIds, ExternalUrls, MetadataProvider, Page, PlaylistDetails,
    PlaylistOwner, PlaylistSummary, ProviderAlbum, ProviderArtist, ProviderTrack, TrackCount, TrackLink,
};
use crate::tags::{EmbeddedTags, TagReader, TagWriter};
use crate::video::{AudioStream, SearchOrder, SearchResult, VideoHost, VideoInfo};

/// Metadata for "The Band - Song One" with the given duration.
pub fn metadata_with_duration(duration_ms: u64) -> TrackMetadata {
    TrackMetadata {
        id: "t1".to_string(),
        title: "Song One".to_string(),
        artist: "The Band".to_string(),
        album: "First Album".to_string(),
        duration_ms,
        genre: Some("Indie Rock".to_string()),
        copyright: None,
        publisher: None,
        release_date: Some("2011-05-02".to_string()),
        isrc: None,
        track_number: Some(1),
        disc_number: Some(1),
        total_tracks: 10,
    }
}

/// A plain video search result whose link is derived from its title.
pub fn result(title: &str, duration: Option<&str>) -> SearchResult {
    SearchResult {
        title: title.to_string(),
        link: format!("/watch?v={}", title),
        duration: duration.map(String::from),
        ..SearchResult::default()
    }
}

fn track_link(name: &str, url: Option<&str>) -> TrackLink {
    TrackLink {
        name: name.to_string(),
        artists: vec![ArtistRef { id: String::new(), name: "The Band".to_string() }],
        external_urls: ExternalUrls { spotify: url.map(String::from) },
    }
}

// ── Metadata provider ────────────────────────────────────────────────────────

#[derive(Default)]
struct ProviderState {
    tracks: Vec<ProviderTrack>,
    artists: HashMap<String, ProviderArtist>,
    albums: HashMap<String, ProviderAlbum>,
    calls: usize,
    search_limits: Vec<usize>,
    searched_texts: Vec<String>,
    fail_next: Option<Error>,
    fail_queries: HashMap<String, Error>,
    stop_after: Option<(String, StopSignal)>,
}

/// Catalog-backed provider.  Clones share state, so a "reconnected" client
/// sees the same catalog and call log.
#[derive(Clone, Default)]
pub struct FakeProvider {
    state: Rc<RefCell<ProviderState>>,
}

impl FakeProvider {
    /// Two tracks: "t1" fully populated, "t2" with every optional field missing.
    pub fn with_catalog() -> Self {
        let mut state = ProviderState::default();

        state.tracks.push(ProviderTrack {
            id: "t1".to_string(),
            name: "Song One".to_string(),
            duration_ms: 208_000,
            artists: vec![ArtistRef { id: "a1".to_string(), name: "The Band".to_string() }],
            album: AlbumRef { id: "al1".to_string(), name: "First Album".to_string() },
            external_ids: ExternalIds { isrc: Some("USABC1100001".to_string()) },
            track_number: Some(1),
            disc_number: Some(1),
        });
        state.tracks.push(ProviderTrack {
            id: "t2".to_string(),
            name: "Song Two".to_string(),
            duration_ms: 185_000,
            artists: vec![ArtistRef { id: "a2".to_string(), name: "Solo Act".to_string() }],
            album: AlbumRef { id: "al2".to_string(), name: "Demo".to_string() },
            ..ProviderTrack::default()
        });

        state.artists.insert(
            "a1".to_string(),
            ProviderArtist {
                id: "a1".to_string(),
                name: "The Band".to_string(),
                genres: vec!["indie rock".to_string(), "rock".to_string()],
            },
        );
        state.artists.insert(
            "a2".to_string(),
            ProviderArtist { id: "a2".to_string(), name: "Solo Act".to_string(), genres: vec![] },
        );

        state.albums.insert(
            "al1".to_string(),
            ProviderAlbum {
                id: "al1".to_string(),
                name: "First Album".to_string(),
                release_date: Some("2011-05-02".to_string()),
                label: Some("Label Records".to_string()),
                copyrights: vec![
                    Copyright { text: "2011 Label Records".to_string(), kind: Some("C".to_string()) },
                    Copyright { text: "2011 Label Records".to_string(), kind: Some("P".to_string()) },
                ],
                tracks: TrackCount { total: 10 },
            },
        );
        state.albums.insert(
            "al2".to_string(),
            ProviderAlbum {
                id: "al2".to_string(),
                name: "Demo".to_string(),
                release_date: Some("2019".to_string()),
                label: None,
                copyrights: vec![],
                tracks: TrackCount { total: 1 },
            },
        );

        FakeProvider { state: Rc::new(RefCell::new(state)) }
    }

    /// Fail the very next call with `error`.
    pub fn fail_next(&self, error: Error) {
        self.state.borrow_mut().fail_next = Some(error);
    }

    /// Fail the next search for exactly `text`.
    pub fn fail_query_once(&self, text: &str, error: Error) {
        self.state.borrow_mut().fail_queries.insert(text.to_string(), error);
    }

    /// Request a stop while searching for `text`.
    pub fn stop_after_query(&self, text: &str, stop: StopSignal) {
        self.state.borrow_mut().stop_after = Some((text.to_string(), stop));
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().calls
    }

    pub fn search_limits(&self) -> Vec<usize> {
        self.state.borrow().search_limits.clone()
    }

    pub fn searched_texts(&self) -> Vec<String> {
        self.state.borrow().searched_texts.clone()
    }

    fn begin_call(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls += 1;
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl MetadataProvider for FakeProvider {
    fn search_track(&self, text: &str, limit: usize) -> Result<Vec<ProviderTrack>> {
        self.begin_call()?;
        let mut state = self.state.borrow_mut();
        state.search_limits.push(limit);
        state.searched_texts.push(text.to_string());

        if let Some((query, stop)) = &state.stop_after {
            if query == text {
                stop.request_stop();
            }
        }
        if let Some(error) = state.fail_queries.remove(text) {
            return Err(error);
        }

        let wanted = text.to_lowercase();
        let found = state
            .tracks
            .iter()
            .filter(|t| wanted.contains(&t.name.to_lowercase()))
            .take(limit)
            .cloned()
            .collect();
        Ok(found)
    }

    fn track(&self, id: &str) -> Result<ProviderTrack> {
        self.begin_call()?;
        let found = self.state.borrow().tracks.iter().find(|t| t.id == id).cloned();
        found.ok_or_else(|| Error::Network(format!("no track {}", id)))
    }

    fn artist(&self, id: &str) -> Result<ProviderArtist> {
        self.begin_call()?;
        self.state
            .borrow()
            .artists
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Network(format!("no artist {}", id)))
    }

    fn album(&self, id: &str) -> Result<ProviderAlbum> {
        self.begin_call()?;
        self.state
            .borrow()
            .albums
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Network(format!("no album {}", id)))
    }

    fn user_playlists(&self, _user: &str) -> Result<Page<PlaylistSummary>> {
        self.begin_call()?;
        let summary = |id: &str, name: Option<&str>, total| PlaylistSummary {
            id: id.to_string(),
            name: name.map(String::from),
            owner: PlaylistOwner { id: "alex".to_string() },
            tracks: TrackCount { total },
        };
        Ok(Page {
            items: vec![summary("p1", Some("Road Trip: 2019"), 3), summary("gone", None, 0)],
            total: 3,
            next: Some("playlists:2".to_string()),
        })
    }

    fn playlist(&self, _owner: &str, id: &str) -> Result<Option<PlaylistDetails>> {
        self.begin_call()?;
        if id != "p1" {
            return Ok(None);
        }
        Ok(Some(PlaylistDetails {
            name: "Road Trip: 2019".to_string(),
            tracks: Page {
                items: vec![
                    track_link("Song One", Some("https://open.spotify.com/track/t1")),
                    track_link("Home Recording", None),
                ],
                total: 3,
                next: Some("tracks:p1:2".to_string()),
            },
        }))
    }

    fn album_tracks(&self, _album_id: &str) -> Result<Page<TrackLink>> {
        self.begin_call()?;
        Ok(Page {
            items: vec![
                track_link("Song One", Some("https://open.spotify.com/track/t1")),
                track_link("Song Three", Some("https://open.spotify.com/track/t3")),
            ],
            total: 2,
            next: None,
        })
    }

    fn next_playlists(&self, cursor: &str) -> Result<Page<PlaylistSummary>> {
        self.begin_call()?;
        if cursor != "playlists:2" {
            return Err(Error::Network(format!("bad cursor {}", cursor)));
        }
        Ok(Page {
            items: vec![PlaylistSummary {
                id: "p2".to_string(),
                name: Some("Chill".to_string()),
                owner: PlaylistOwner { id: "alex".to_string() },
                tracks: TrackCount { total: 1 },
            }],
            total: 3,
            next: None,
        })
    }

    fn next_tracks(&self, cursor: &str) -> Result<Page<TrackLink>> {
        self.begin_call()?;
        if cursor != "tracks:p1:2" {
            return Err(Error::Network(format!("bad cursor {}", cursor)));
        }
        Ok(Page {
            items: vec![track_link("Song Three", Some("https://open.spotify.com/track/t3"))],
            total: 3,
            next: None,
        })
    }
}

/// Hands out clones of one shared [`FakeProvider`], counting connections.
#[derive(Default)]
pub struct FakeConnector {
    pub state: FakeProvider,
    connections: Cell<usize>,
    fail_next: RefCell<Option<Error>>,
}

impl FakeConnector {
    /// Counts attempts, failed ones included.
    pub fn connections(&self) -> usize {
        self.connections.get()
    }

    /// Fail the next `connect` with `error`.
    pub fn fail_next_connect(&self, error: Error) {
        *self.fail_next.borrow_mut() = Some(error);
    }
}

impl Connector for FakeConnector {
    fn connect(&self) -> Result<Box<dyn MetadataProvider>> {
        self.connections.set(self.connections.get() + 1);
        if let Some(error) = self.fail_next.borrow_mut().take() {
            return Err(error);
        }
        Ok(Box::new(self.state.clone()))
    }
}

// ── Video host ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeVideoHost {
    /// Served in order; the last page repeats
    pages: Vec<Vec<SearchResult>>,
    /// Answer every search with a single result titled after the search text
    echo_duration: Option<String>,
    videos: RefCell<HashMap<String, String>>,
    searches: RefCell<Vec<(String, SearchOrder)>>,
    resolved: RefCell<Vec<String>>,
    downloads: RefCell<Vec<PathBuf>>,
}

impl FakeVideoHost {
    pub fn with_pages(pages: Vec<Vec<SearchResult>>) -> Self {
        FakeVideoHost { pages, ..FakeVideoHost::default() }
    }

    pub fn echoing(duration: &str) -> Self {
        FakeVideoHost { echo_duration: Some(duration.to_string()), ..FakeVideoHost::default() }
    }

    /// Register a video reachable by id.
    pub fn add_video(&self, id: &str, title: &str) {
        self.videos.borrow_mut().insert(id.to_string(), title.to_string());
    }

    pub fn searches(&self) -> Vec<(String, SearchOrder)> {
        self.searches.borrow().clone()
    }

    pub fn resolved(&self) -> Vec<String> {
        self.resolved.borrow().clone()
    }

    pub fn downloads(&self) -> Vec<PathBuf> {
        self.downloads.borrow().clone()
    }
}

impl VideoHost for FakeVideoHost {
    fn search(&self, text: &str, order: SearchOrder) -> Result<Vec<SearchResult>> {
        let round = {
            let mut searches = self.searches.borrow_mut();
            searches.push((text.to_string(), order));
            searches.len() - 1
        };

        if let Some(duration) = &self.echo_duration {
            return Ok(vec![result(text, Some(duration))]);
        }
        Ok(self
            .pages
            .get(round)
            .or_else(|| self.pages.last())
            .cloned()
            .unwrap_or_default())
    }

    fn video(&self, link: &str) -> Result<VideoInfo> {
        self.resolved.borrow_mut().push(link.to_string());
        let title = match self.videos.borrow().get(link) {
            Some(title) => title.clone(),
            None => link.rsplit("v=").next().unwrap_or(link).to_string(),
        };
        Ok(VideoInfo {
            title,
            link: link.to_string(),
            audio_streams: vec![
                AudioStream { extension: ".m4a".to_string(), bitrate_kbps: 128, url: format!("{}#m4a", link) },
                AudioStream { extension: ".webm".to_string(), bitrate_kbps: 160, url: format!("{}#webm", link) },
            ],
        })
    }

    fn download(&self, stream: &AudioStream, dest: &Path) -> Result<()> {
        self.downloads.borrow_mut().push(dest.to_path_buf());
        fs::write(dest, stream.url.as_bytes())?;
        Ok(())
    }
}

// ── Transcoder / tags ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeTranscoder {
    conversions: RefCell<Vec<(String, String)>>,
    encoders: RefCell<Vec<Encoder>>,
}

impl FakeTranscoder {
    pub fn conversions(&self) -> Vec<(String, String)> {
        self.conversions.borrow().clone()
    }

    pub fn encoders(&self) -> Vec<Encoder> {
        self.encoders.borrow().clone()
    }
}

impl Transcoder for FakeTranscoder {
    fn convert(&self, encoder: Encoder, folder: &Path, input: &str, output: &str) -> Result<()> {
        self.conversions.borrow_mut().push((input.to_string(), output.to_string()));
        self.encoders.borrow_mut().push(encoder);
        let data = fs::read(folder.join(input))?;
        fs::write(folder.join(output), data)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeTagWriter {
    embedded: RefCell<Vec<(PathBuf, String)>>,
    failure: Option<String>,
}

impl FakeTagWriter {
    /// Every write fails with a `Tag` error carrying `reason`.
    pub fn failing(reason: &str) -> Self {
        FakeTagWriter { failure: Some(reason.to_string()), ..FakeTagWriter::default() }
    }

    /// (file, track id) pairs in write order
    pub fn embedded(&self) -> Vec<(PathBuf, String)> {
        self.embedded.borrow().clone()
    }
}

impl TagWriter for FakeTagWriter {
    fn embed(&self, path: &Path, metadata: &TrackMetadata) -> Result<()> {
        if let Some(reason) = &self.failure {
            return Err(Error::Tag(reason.clone()));
        }
        self.embedded.borrow_mut().push((path.to_path_buf(), metadata.id.clone()));
        Ok(())
    }
}

pub struct FakeTagReader {
    tags: Option<EmbeddedTags>,
}

impl FakeTagReader {
    pub fn returning(tags: EmbeddedTags) -> Self {
        FakeTagReader { tags: Some(tags) }
    }

    /// Every read fails, as for a corrupt or unsupported file.
    pub fn failing() -> Self {
        FakeTagReader { tags: None }
    }
}

impl TagReader for FakeTagReader {
    fn read_tags(&self, path: &Path) -> Result<EmbeddedTags> {
        self.tags
            .clone()
            .ok_or_else(|| Error::Tag(format!("unreadable: {}", path.display())))
    }
}

// ── Operator ─────────────────────────────────────────────────────────────────

/// Scripted operator.  The default skips every choice and declines every
/// confirmation.
#[derive(Default)]
pub struct FakeOperator {
    choice: Option<usize>,
    confirm: bool,
    prompts: RefCell<Vec<(String, Vec<String>)>>,
    questions: RefCell<Vec<String>>,
}

impl FakeOperator {
    pub fn choosing(choice: Option<usize>) -> Self {
        FakeOperator { choice, ..FakeOperator::default() }
    }

    pub fn confirming(confirm: bool) -> Self {
        FakeOperator { confirm, ..FakeOperator::default() }
    }

    pub fn prompts(&self) -> Vec<(String, Vec<String>)> {
        self.prompts.borrow().clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Operator for FakeOperator {
    fn choose(&self, heading: &str, options: &[String]) -> Option<usize> {
        self.prompts.borrow_mut().push((heading.to_string(), options.to_vec()));
        self.choice
    }

    fn confirm(&self, question: &str) -> bool {
        self.questions.borrow_mut().push(question.to_string());
        self.confirm
    }
}
