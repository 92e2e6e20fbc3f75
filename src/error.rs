//! Crate-wide error type.
//!
//! Collaborators (metadata provider, video host, transcoder, tag writer)
//! report failures through [`Error`].  The batch runner only cares about the
//! coarse [`ErrorKind`]: whether to refresh credentials, requeue, stop or
//! abort the whole run.  "Nothing found" is never an error; lookups return
//! `Option` or an empty list instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The metadata provider rejected the access token.
    #[error("access token expired")]
    AuthExpired,

    /// A remote service could not be reached or answered garbage.
    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operator asked the run to stop.
    #[error("interrupted by operator")]
    Interrupted,

    #[error("the provided playlist URL is not in a recognized format: {0}")]
    UnrecognizedPlaylist(String),

    #[error("unable to find playlist {0}")]
    PlaylistNotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("tag error: {0}")]
    Tag(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// How the batch runner reacts to a failed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Refresh credentials and retry the entry in place.
    AuthExpired,
    /// Move the entry to the end of the queue and carry on.
    Transient,
    /// Stop processing; the queue file is the resume point.
    UserAbort,
    /// Terminate the run.
    Fatal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AuthExpired => ErrorKind::AuthExpired,
            Error::Network(_) | Error::Io(_) => ErrorKind::Transient,
            Error::Interrupted => ErrorKind::UserAbort,
            Error::UnrecognizedPlaylist(_)
            | Error::PlaylistNotFound(_)
            | Error::Config(_)
            | Error::Tag(_) => ErrorKind::Fatal,
        }
    }

    /// Process exit status for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UnrecognizedPlaylist(_) => 10,
            Error::PlaylistNotFound(_) => 11,
            _ => 1,
        }
    }
}
