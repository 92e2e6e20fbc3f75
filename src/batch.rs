//! Batch runner over a persisted queue file.
//!
//! Entries are processed one at a time, in file order:
//!
//! * success → the entry is removed from the file
//! * expired credentials → a fresh provider client is requested from the
//!   [`Connector`] and the entry retried once in place
//! * network / I-O failure → the entry moves to the end of the file and the
//!   run continues after a short pause; there is no retry limit
//! * operator interrupt → the run stops, the file is the resume point
//! * anything fatal → the run stops and the error is returned

use std::path::Path;
use std::thread;

use crate::config::Settings;
use crate::error::{Error, ErrorKind, Result};
use crate::pipeline::{Pipeline, Services, StopSignal, TrackOutcome};
use crate::provider::{Connector, MetadataProvider};
use crate::queue::BatchQueue;

/// Counters for a finished (or interrupted) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub downloaded: usize,
    pub already_present: usize,
    pub not_found: usize,
    pub skipped: usize,
    pub no_audio: usize,
    pub requeued: usize,
    pub credential_refreshes: usize,
    pub interrupted: bool,
}

impl BatchSummary {
    fn record(&mut self, outcome: &TrackOutcome) {
        match outcome {
            TrackOutcome::Downloaded(_) => self.downloaded += 1,
            TrackOutcome::AlreadyPresent => self.already_present += 1,
            TrackOutcome::NotFound => self.not_found += 1,
            TrackOutcome::Skipped => self.skipped += 1,
            TrackOutcome::NoAudioStream => self.no_audio += 1,
        }
    }
}

pub struct BatchRunner<'a> {
    settings: &'a Settings,
    connector: &'a dyn Connector,
    provider: Box<dyn MetadataProvider>,
    services: Services<'a>,
    stop: StopSignal,
}

impl<'a> BatchRunner<'a> {
    /// Connect to the metadata provider and prepare a runner.
    pub fn new(
        settings: &'a Settings,
        connector: &'a dyn Connector,
        services: Services<'a>,
        stop: StopSignal,
    ) -> Result<Self> {
        let provider = connector.connect()?;
        Ok(BatchRunner { settings, connector, provider, services, stop })
    }

    /// Process a single query outside of a batch (prompts allowed).
    pub fn run_single(&mut self, raw: &str) -> Result<TrackOutcome> {
        match self.pipeline().fetch(raw, None) {
            Err(Error::AuthExpired) => self.refresh().and_then(|()| self.pipeline().fetch(raw, None)),
            other => other,
        }
    }

    /// Work through the queue file until it is empty or a stop is requested.
    pub fn run_file(&mut self, path: &Path) -> Result<BatchSummary> {
        let mut queue = BatchQueue::load(path)?;
        log::info!("Preparing to download {} songs", queue.len());
        self.run_queue(&mut queue)
    }

    pub fn run_queue(&mut self, queue: &mut BatchQueue) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();

        loop {
            if self.stop.is_stopped() {
                log::warn!("Interrupted, {} songs left in {}", queue.len(), queue.path().display());
                summary.interrupted = true;
                break;
            }

            let (query, number) = match queue.start_front() {
                Some(entry) => (entry.query.clone(), entry.number),
                None => break,
            };

            let mut result = self.pipeline().fetch(&query, Some(number));
            if matches!(result, Err(Error::AuthExpired)) {
                log::info!("Refreshing access token");
                // A failed refresh is classified like a failed fetch of this entry
                result = match self.refresh() {
                    Ok(()) => {
                        summary.credential_refreshes += 1;
                        self.pipeline().fetch(&query, Some(number))
                    }
                    Err(e) => Err(e),
                };
            }

            match result {
                Ok(outcome) => {
                    summary.record(&outcome);
                    queue.complete_front()?;
                }
                Err(e) => match e.kind() {
                    // A second expiry right after a refresh is treated like
                    // any other transient failure.
                    ErrorKind::Transient | ErrorKind::AuthExpired => {
                        log::warn!("Failed to download song ({}). Will retry after other songs", e);
                        queue.requeue_front()?;
                        summary.requeued += 1;
                        thread::sleep(self.settings.requeue_delay);
                    }
                    ErrorKind::UserAbort => {
                        log::warn!("Interrupted, {} songs left in {}", queue.len(), queue.path().display());
                        summary.interrupted = true;
                        break;
                    }
                    ErrorKind::Fatal => return Err(e),
                },
            }
        }

        Ok(summary)
    }

    /// Re-issue the provider client with fresh credentials.
    fn refresh(&mut self) -> Result<()> {
        self.provider = self.connector.connect()?;
        Ok(())
    }

    fn pipeline(&self) -> Pipeline<'_> {
        Pipeline::new(self.settings, self.provider.as_ref(), self.services, &self.stop)
    }
}
