pub mod batch;
pub mod candidates;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod metadata;
pub mod naming;
pub mod operator;
pub mod pipeline;
pub mod provider;
pub mod query;
pub mod queue;
pub mod reconcile;
pub mod resolver;
pub mod selector;
pub mod tags;
pub mod video;

#[cfg(test)]
mod testing;

pub use batch::{BatchRunner, BatchSummary};
pub use candidates::{collect, VideoCandidate};
pub use config::{Config, Settings};
pub use error::{Error, ErrorKind, Result};
pub use export::{export_album, export_playlist, export_user_playlist, AlbumRef, PlaylistRef};
pub use metadata::TrackMetadata;
pub use operator::{ConsoleOperator, Operator};
pub use pipeline::{Encoder, Pipeline, Services, StopSignal, TrackOutcome, Transcoder};
pub use provider::{Connector, MetadataProvider};
pub use query::Query;
pub use queue::BatchQueue;
pub use reconcile::{prepare_folder, Reconciler, Reconciliation};
pub use resolver::resolve;
pub use selector::{select, Selection, SelectionMode};
pub use tags::{EmbeddedTags, LoftyTagReader, TagReader, TagWriter};
pub use video::{SearchOrder, VideoHost};
