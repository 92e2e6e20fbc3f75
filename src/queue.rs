//! Persisted batch queue.
//!
//! The queue file holds one raw query per line and always lists the work
//! that is still left.  Every change rewrites the file through a temporary
//! file in the same directory followed by a rename, so a reader sees either
//! the old or the new queue, never a half-moved entry.

use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;

/// Lifecycle of a queue entry within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    InFlight,
    Done,
    Requeued,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub query: String,
    /// 1-based position in the original batch
    pub number: usize,
    /// How often the entry was moved to the back after a transient failure
    pub retries: u32,
    pub state: EntryState,
}

#[derive(Debug)]
pub struct BatchQueue {
    path: PathBuf,
    entries: VecDeque<QueueEntry>,
}

impl BatchQueue {
    /// Load the queue file, ignoring blank lines.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let entries = parse_lines(&content)
            .into_iter()
            .enumerate()
            .map(|(i, query)| QueueEntry {
                query,
                number: i + 1,
                retries: 0,
                state: EntryState::Pending,
            })
            .collect();

        Ok(BatchQueue { path: path.to_path_buf(), entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn front(&self) -> Option<&QueueEntry> {
        self.entries.front()
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    /// Mark the head entry as being processed.
    pub fn start_front(&mut self) -> Option<&QueueEntry> {
        let entry = self.entries.front_mut()?;
        entry.state = EntryState::InFlight;
        Some(entry)
    }

    /// Drop the head entry after success.
    pub fn complete_front(&mut self) -> Result<Option<QueueEntry>> {
        let mut entry = match self.entries.pop_front() {
            Some(entry) => entry,
            None => return Ok(None),
        };
        self.persist()?;
        entry.state = EntryState::Done;
        Ok(Some(entry))
    }

    /// Move the head entry to the back after a transient failure.
    pub fn requeue_front(&mut self) -> Result<Option<&QueueEntry>> {
        let mut entry = match self.entries.pop_front() {
            Some(entry) => entry,
            None => return Ok(None),
        };
        entry.retries += 1;
        entry.state = EntryState::Requeued;
        self.entries.push_back(entry);
        self.persist()?;
        Ok(self.entries.back())
    }

    /// Rewrite the queue file atomically with the remaining entries.
    fn persist(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        for entry in &self.entries {
            writeln!(tmp, "{}", entry.query)?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Non-blank lines, trimmed of line endings.
pub fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect()
}
