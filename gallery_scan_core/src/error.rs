//! Error types for the gallery scan core library
//!
//! Errors are split into I/O failures (listing, permission) and validation
//! failures (bad options). Per-directory failures during a walk are not
//! errors at this level; they are reported through
//! [`TraversalError`](crate::walker::TraversalError) inside a walk report.

use thiserror::Error;

pub mod io;
pub mod validation;

pub use self::io::{IoError, IoErrorKind};
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the gallery scan core library
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// The I/O error kind, if this is an I/O error
    pub fn io_kind(&self) -> Option<IoErrorKind> {
        match self {
            Self::Io(err) => Some(err.kind),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}
