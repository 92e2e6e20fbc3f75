//! Decide what to do when the destination folder may already hold the track.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::metadata::TrackMetadata;
use crate::naming::sanitize_title;
use crate::operator::Operator;
use crate::query::Query;
use crate::tags::TagReader;

/// Suffix of partially downloaded files.
pub const TEMP_SUFFIX: &str = ".temp";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// An acceptable copy exists; don't download.
    Keep,
    /// The operator asked for a fresh copy; the old file has been removed.
    Replace,
    /// Nothing usable on disk (a stale copy may have been removed).
    ProceedToDownload,
}

impl Reconciliation {
    pub fn needs_download(self) -> bool {
        self != Reconciliation::Keep
    }
}

/// Create the destination folder if it doesn't exist yet.
pub fn prepare_folder(folder: &Path) -> Result<()> {
    if !folder.is_dir() {
        log::info!("Creating folder {}", folder.display());
        fs::create_dir_all(folder)?;
    }
    Ok(())
}

pub struct Reconciler<'a> {
    folder: &'a Path,
    tag_reader: &'a dyn TagReader,
    operator: &'a dyn Operator,
}

impl<'a> Reconciler<'a> {
    pub fn new(folder: &'a Path, tag_reader: &'a dyn TagReader, operator: &'a dyn Operator) -> Self {
        Reconciler { folder, tag_reader, operator }
    }

    /// Check the folder for an earlier download of `target_basename`.
    ///
    /// The folder is listed on every call.  Leftover `.temp` files are
    /// deleted along the way, whatever track they belong to.  Tags are only
    /// held against `metadata` for direct metadata references; a file whose
    /// tags can't be read counts as mismatched.  Batch runs never prompt.
    pub fn reconcile(
        &self,
        target_basename: &str,
        query: &Query,
        metadata: Option<&TrackMetadata>,
        is_batch: bool,
    ) -> Result<Reconciliation> {
        let prefix = sanitize_title(target_basename);

        for path in self.list_folder()? {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name,
                None => continue,
            };

            if name.ends_with(TEMP_SUFFIX) {
                log::debug!("Removing leftover {}", name);
                fs::remove_file(&path)?;
                continue;
            }

            if prefix.is_empty() || !name.starts_with(&prefix) {
                continue;
            }

            if let (true, Some(meta)) = (query.is_direct_metadata_ref(), metadata) {
                if !self.already_tagged(&path, meta) {
                    log::info!("Replacing {} (tags don't match)", name);
                    fs::remove_file(&path)?;
                    return Ok(Reconciliation::ProceedToDownload);
                }
            }

            if is_batch {
                log::warn!("Song already exists");
                return Ok(Reconciliation::Keep);
            }

            let redownload = self
                .operator
                .confirm("Song with same name has already been downloaded. Re-download?");
            if redownload {
                fs::remove_file(&path)?;
                return Ok(Reconciliation::Replace);
            }
            return Ok(Reconciliation::Keep);
        }

        Ok(Reconciliation::ProceedToDownload)
    }

    fn already_tagged(&self, path: &Path, metadata: &TrackMetadata) -> bool {
        match self.tag_reader.read_tags(path) {
            Ok(tags) => tags.matches(metadata),
            Err(e) => {
                log::debug!("Could not read tags of {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Folder entries in name order so repeated calls see the same sequence.
    fn list_folder(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(self.folder)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }
}
