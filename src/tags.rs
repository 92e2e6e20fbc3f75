//! Embedded tag access for downloaded files.

use std::path::Path;

use lofty::file::TaggedFileExt;
use lofty::prelude::Accessor;
use lofty::read_from_path;

use crate::error::{Error, Result};
use crate::metadata::TrackMetadata;

/// The subset of embedded tags used to recognize an earlier download.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbeddedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl EmbeddedTags {
    /// Whether the file was tagged from this metadata: title and artist must
    /// both be present and equal (ignoring surrounding whitespace).
    pub fn matches(&self, metadata: &TrackMetadata) -> bool {
        let same = |tag: &Option<String>, want: &str| {
            tag.as_deref().map(str::trim) == Some(want.trim())
        };
        same(&self.title, &metadata.title) && same(&self.artist, &metadata.artist)
    }
}

pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<EmbeddedTags>;
}

/// Writes metadata into a finished audio file.
pub trait TagWriter {
    fn embed(&self, path: &Path, metadata: &TrackMetadata) -> Result<()>;
}

/// Tag reader for any format `lofty` understands (ID3v2, MP4, Vorbis, ...).
#[derive(Debug, Default)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<EmbeddedTags> {
        let tagged_file =
            read_from_path(path).map_err(|e| Error::Tag(format!("{}: {}", path.display(), e)))?;
        let tag = match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
            Some(tag) => tag,
            None => return Ok(EmbeddedTags::default()),
        };

        Ok(EmbeddedTags {
            title: tag.title().map(|v| v.into_owned()),
            artist: tag.artist().map(|v| v.into_owned()),
            album: tag.album().map(|v| v.into_owned()),
        })
    }
}
