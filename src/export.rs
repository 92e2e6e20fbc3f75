//! Write playlist and album track URLs to text files usable as batch queues.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::naming::slugify;
use crate::operator::Operator;
use crate::provider::{MetadataProvider, Page, PlaylistSummary, TrackLink};

/// A user playlist reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    pub user: String,
    pub id: String,
}

impl PlaylistRef {
    /// Parse `spotify:user:<user>:playlist:<id>` or
    /// `https://open.spotify.com/user/<user>/playlist/<id>`.
    pub fn parse(input: &str) -> Result<Self> {
        let parts = split_reference(input);
        if parts.len() < 3 {
            return Err(Error::UnrecognizedPlaylist(input.to_string()));
        }
        let user = parts[parts.len() - 3];
        let id = parts[parts.len() - 1];
        if user.is_empty() || id.is_empty() {
            return Err(Error::UnrecognizedPlaylist(input.to_string()));
        }
        Ok(PlaylistRef { user: user.to_string(), id: id.to_string() })
    }
}

/// An album reference; only the trailing id matters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumRef {
    pub id: String,
}

impl AlbumRef {
    pub fn parse(input: &str) -> Result<Self> {
        match split_reference(input).last() {
            Some(id) if !id.is_empty() => Ok(AlbumRef { id: id.to_string() }),
            _ => Err(Error::Config(format!("not an album reference: {}", input))),
        }
    }
}

/// URLs split on '/', URIs on ':'.  Trailing slash and query string dropped.
fn split_reference(input: &str) -> Vec<&str> {
    let input = input.trim();
    let input = input.split('?').next().unwrap_or(input);
    if input.contains('/') {
        input.trim_end_matches('/').split('/').collect()
    } else {
        input.split(':').collect()
    }
}

/// Export file name for a playlist/album name.
pub fn export_file_name(name: &str) -> String {
    format!("{}.txt", slugify(name))
}

/// Write all track URLs of a playlist to `<dir>/<slug>.txt`.
pub fn export_playlist(provider: &dyn MetadataProvider, playlist: &PlaylistRef, dir: &Path) -> Result<PathBuf> {
    let details = match provider.playlist(&playlist.user, &playlist.id)? {
        Some(details) => details,
        None => {
            log::error!("Unable to find playlist");
            log::info!("Make sure the playlist is set to publicly visible and then try again");
            return Err(Error::PlaylistNotFound(playlist.id.clone()));
        }
    };

    let path = dir.join(export_file_name(&details.name));
    log::info!("writing {} tracks to {}", details.tracks.total, path.display());
    write_tracks(provider, &path, details.tracks)?;
    Ok(path)
}

/// Write all track URLs of an album to `<dir>/<slug>.txt`.
pub fn export_album(provider: &dyn MetadataProvider, album: &AlbumRef, dir: &Path) -> Result<PathBuf> {
    let info = provider.album(&album.id)?;
    let tracks = provider.album_tracks(&album.id)?;

    let path = dir.join(export_file_name(&info.name));
    log::info!("writing {} tracks to {}", tracks.total, path.display());
    write_tracks(provider, &path, tracks)?;
    Ok(path)
}

/// Append one URL per line for every page of `tracks`.  Tracks without a
/// public URL (local files) are skipped.  Returns the number of lines written.
pub fn write_tracks(provider: &dyn MetadataProvider, path: &Path, tracks: Page<TrackLink>) -> Result<usize> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut written = 0;
    let mut page = tracks;

    loop {
        for track in &page.items {
            match track.url() {
                Some(url) => {
                    writeln!(file, "{}", url)?;
                    written += 1;
                }
                None => log::warn!("Skipping track {} by {} (local only?)", track.name, track.artist_name()),
            }
        }

        match page.next.take() {
            Some(cursor) => page = provider.next_tracks(&cursor)?,
            None => break,
        }
    }

    Ok(written)
}

/// All named playlists of a user, across pages.
pub fn list_user_playlists(provider: &dyn MetadataProvider, user: &str) -> Result<Vec<PlaylistSummary>> {
    let mut playlists = Vec::new();
    let mut page = provider.user_playlists(user)?;

    loop {
        for playlist in page.items.drain(..) {
            // Inaccessible playlists come back without a name
            if let Some(name) = &playlist.name {
                log::info!("{:>5}. {:<30}  ({} tracks)", playlists.len() + 1, name, playlist.tracks.total);
                playlists.push(playlist);
            }
        }

        match page.next.take() {
            Some(cursor) => page = provider.next_playlists(&cursor)?,
            None => break,
        }
    }

    Ok(playlists)
}

/// Let the operator pick one of a user's playlists and export it.
/// `Ok(None)` when the operator skips.
pub fn export_user_playlist(
    provider: &dyn MetadataProvider,
    user: &str,
    operator: &dyn Operator,
    dir: &Path,
) -> Result<Option<PathBuf>> {
    let playlists = list_user_playlists(provider, user)?;
    let options: Vec<String> = playlists
        .iter()
        .map(|p| format!("{} ({} tracks)", p.name.as_deref().unwrap_or(""), p.tracks.total))
        .collect();

    let chosen = match operator.choose(&format!("Playlists of {}", user), &options) {
        Some(index) => match playlists.get(index) {
            Some(playlist) => playlist,
            None => return Ok(None),
        },
        None => return Ok(None),
    };

    let playlist = PlaylistRef { user: chosen.owner.id.clone(), id: chosen.id.clone() };
    export_playlist(provider, &playlist, dir).map(Some)
}
