//! Metadata resolution: query → provider lookup → enriched [`TrackMetadata`].

use crate::error::Result;
use crate::metadata::TrackMetadata;
use crate::naming::title_case;
use crate::provider::{MetadataProvider, ProviderAlbum, ProviderTrack};
use crate::query::Query;

/// Resolve metadata for a query.
///
/// * Direct track references are fetched as-is.
/// * Free text is searched and the first hit is used; no hit → `Ok(None)`.
/// * Video references carry no provider identity and resolve to `None`.
///
/// Provider errors are returned unchanged; retry policy belongs to the caller.
pub fn resolve(provider: &dyn MetadataProvider, query: &Query) -> Result<Option<TrackMetadata>> {
    let track = match query {
        Query::DirectMetadataRef(id) => provider.track(id)?,
        Query::FreeText(text) => match provider.search_track(text, 1)?.into_iter().next() {
            Some(track) => track,
            None => {
                log::debug!("No metadata found for \"{}\"", text);
                return Ok(None);
            }
        },
        Query::DirectVideoRef(_) => return Ok(None),
    };

    enrich(provider, track).map(Some)
}

/// Attach artist genre and album details to a bare track.
fn enrich(provider: &dyn MetadataProvider, track: ProviderTrack) -> Result<TrackMetadata> {
    let primary = track.artists.first().cloned().unwrap_or_default();

    let genre = if primary.id.is_empty() {
        None
    } else {
        provider
            .artist(&primary.id)?
            .genres
            .first()
            .map(|g| title_case(g))
    };

    let album = if track.album.id.is_empty() {
        ProviderAlbum::default()
    } else {
        provider.album(&track.album.id)?
    };
    let copyright = album.copyrights.first().map(|c| c.text.clone());

    Ok(TrackMetadata {
        id: track.id,
        title: track.name,
        artist: primary.name,
        album: track.album.name,
        duration_ms: track.duration_ms,
        genre,
        copyright,
        publisher: album.label,
        release_date: album.release_date,
        isrc: track.external_ids.isrc,
        track_number: track.track_number,
        disc_number: track.disc_number,
        total_tracks: album.tracks.total,
    })
}
