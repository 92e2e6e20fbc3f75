//! Single-track pipeline: query → metadata → candidates → selection →
//! reconcile → download → transcode → tag.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::candidates::collect;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::metadata::TrackMetadata;
use crate::naming::{sanitize_title, slugify};
use crate::operator::Operator;
use crate::provider::MetadataProvider;
use crate::query::Query;
use crate::reconcile::Reconciler;
use crate::resolver::resolve;
use crate::selector::{select, Selection, SelectionMode};
use crate::tags::{TagReader, TagWriter};
use crate::video::{SearchOrder, VideoHost, VideoInfo};

/// Command-line encoder the transcoder should drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    Ffmpeg,
    Avconv,
}

impl Encoder {
    /// `avconv` when the settings ask for it, `ffmpeg` otherwise.
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.avconv {
            Encoder::Avconv
        } else {
            Encoder::Ffmpeg
        }
    }
}

/// Converts a downloaded file into the output container.
pub trait Transcoder {
    /// Convert `folder/input` into `folder/output` with `encoder`.
    fn convert(&self, encoder: Encoder, folder: &Path, input: &str, output: &str) -> Result<()>;
}

/// Operator interrupt flag shared between the signal handler and the run.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once a stop was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_stopped() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// Everything outside the matching logic that a track run talks to.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub video: &'a dyn VideoHost,
    pub transcoder: &'a dyn Transcoder,
    pub tag_writer: &'a dyn TagWriter,
    pub tag_reader: &'a dyn TagReader,
    pub operator: &'a dyn Operator,
}

/// How a single track run ended (errors aside).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Final file written
    Downloaded(PathBuf),
    /// A previous download was kept
    AlreadyPresent,
    /// No acceptable video was found
    NotFound,
    /// The operator skipped the track
    Skipped,
    /// The video has no audio stream in the configured container
    NoAudioStream,
}

pub struct Pipeline<'a> {
    settings: &'a Settings,
    provider: &'a dyn MetadataProvider,
    services: Services<'a>,
    stop: &'a StopSignal,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        provider: &'a dyn MetadataProvider,
        services: Services<'a>,
        stop: &'a StopSignal,
    ) -> Self {
        Pipeline { settings, provider, services, stop }
    }

    /// Process one raw query.  `number` is the 1-based batch position; batch
    /// runs never prompt during reconciliation.
    pub fn fetch(&self, raw: &str, number: Option<usize>) -> Result<TrackOutcome> {
        let query = Query::parse(raw);

        let (metadata, video) = match &query {
            Query::DirectVideoRef(id) => {
                let video = self.services.video.video(id)?;
                self.stop.check()?;
                // The video's title stands in for the user's search text
                let text = slugify(&video.title).replace('-', " ");
                let metadata = resolve(self.provider, &Query::FreeText(text))?;
                (metadata, video)
            }
            _ => {
                let metadata = resolve(self.provider, &query)?;
                self.stop.check()?;
                match self.find_video(raw, metadata.as_ref())? {
                    Ok(video) => (metadata, video),
                    Err(outcome) => return Ok(outcome),
                }
            }
        };
        self.stop.check()?;

        match number {
            Some(n) => log::info!("{}. {}", n, video.title),
            None => log::info!("{}", video.title),
        }

        let file_name = output_basename(&video, metadata.as_ref());
        let reconciler = Reconciler::new(&self.settings.folder, self.services.tag_reader, self.services.operator);
        if !reconciler
            .reconcile(&file_name, &query, metadata.as_ref(), number.is_some())?
            .needs_download()
        {
            return Ok(TrackOutcome::AlreadyPresent);
        }

        self.download(&video, &file_name, metadata.as_ref())
    }

    /// Search, collect and select.  The inner `Err` is a terminal outcome
    /// that isn't an error (nothing found, operator skip).
    fn find_video(
        &self,
        raw: &str,
        metadata: Option<&TrackMetadata>,
    ) -> Result<std::result::Result<VideoInfo, TrackOutcome>> {
        let (text, order) = match metadata {
            Some(meta) => (meta.song_name(), SearchOrder::ViewCount),
            None => (raw.to_string(), SearchOrder::Relevance),
        };

        let candidates = collect(self.services.video, &text, order, metadata.is_some())?;
        self.stop.check()?;

        let mode = if self.settings.manual { SelectionMode::Manual } else { SelectionMode::Automatic };
        let chosen = match select(&candidates, metadata, mode, self.services.operator) {
            Selection::Chosen(candidate) => candidate,
            Selection::NoMatch => {
                if candidates.is_empty() {
                    log::warn!("No videos found for \"{}\"", text);
                }
                return Ok(Err(TrackOutcome::NotFound));
            }
            Selection::Skipped => return Ok(Err(TrackOutcome::Skipped)),
        };

        self.services.video.video(&chosen.link).map(Ok)
    }

    fn download(&self, video: &VideoInfo, file_name: &str, metadata: Option<&TrackMetadata>) -> Result<TrackOutcome> {
        let settings = self.settings;
        let stream = match video.best_audio(&settings.input_ext) {
            Some(stream) => stream,
            None => {
                log::error!("No audio streams available");
                return Ok(TrackOutcome::NoAudioStream);
            }
        };

        let input = format!("{}{}", file_name, settings.input_ext);
        let output = format!("{}{}", file_name, settings.output_ext);

        self.services.video.download(stream, &settings.folder.join(&input))?;
        self.stop.check()?;

        self.services
            .transcoder
            .convert(Encoder::from_settings(settings), &settings.folder, &input, &output)?;
        if settings.input_ext != settings.output_ext {
            fs::remove_file(settings.folder.join(&input))?;
        }

        let output_path = settings.folder.join(&output);
        // The audio is in place at this point; a tagging failure leaves it untagged
        match metadata {
            Some(meta) if !settings.no_metadata => {
                if let Err(e) = self.services.tag_writer.embed(&output_path, meta) {
                    log::warn!("Could not tag {}: {}", output_path.display(), e);
                }
            }
            Some(_) => {}
            None => log::warn!("Could not find metadata, file left untagged"),
        }

        Ok(TrackOutcome::Downloaded(output_path))
    }
}

/// "[artist] - [title]" when metadata is usable, else the video title;
/// sanitized for the filesystem.
pub fn output_basename(video: &VideoInfo, metadata: Option<&TrackMetadata>) -> String {
    let name = match metadata.map(|m| m.song_name()) {
        Some(name) if name != " - " => name,
        _ => video.title.clone(),
    };
    sanitize_title(&name)
}
