//! Results of a directory walk

use crate::error::{IoError, IoErrorKind};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Ordered paths of every regular file found by a walk
pub type FileList = Vec<PathBuf>;

/// A directory that could not be listed; its subtree contributed no files
#[derive(Error, Debug)]
#[error("{source}")]
pub struct TraversalError {
    /// Directory whose listing failed
    pub path: PathBuf,
    /// Underlying listing failure
    #[source]
    pub source: IoError,
}

impl TraversalError {
    pub fn new(path: &Path, source: IoError) -> Self {
        let source = if source.path.is_none() {
            source.with_path(path)
        } else {
            source
        };
        Self {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn kind(&self) -> IoErrorKind {
        self.source.kind
    }
}

/// How a walk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkOutcome {
    /// Every reachable directory was processed
    Completed,
    /// The cancellation token fired; files hold the partial result
    Cancelled,
    /// The deadline passed; files hold the partial result
    TimedOut,
    /// A subtree failed under the abort policy; files hold the partial result
    Aborted,
}

impl WalkOutcome {
    pub fn is_complete(self) -> bool {
        self == Self::Completed
    }
}

impl fmt::Display for WalkOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed out",
            Self::Aborted => "aborted",
        };
        f.write_str(text)
    }
}

/// Full result of a walk: the file list plus everything that went wrong
#[derive(Debug)]
pub struct WalkReport {
    /// Root the walk started from
    pub root: PathBuf,
    /// Files in discovery order
    pub files: FileList,
    /// Directories that were skipped (empty under the ignore policy)
    pub errors: Vec<TraversalError>,
    /// How the walk ended
    pub outcome: WalkOutcome,
    /// Number of directory listings the walk consumed, failed ones included
    pub directories_listed: usize,
    /// Wall-clock duration of the walk
    pub elapsed: Duration,
}

impl WalkReport {
    pub fn is_complete(&self) -> bool {
        self.outcome.is_complete()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Drop the diagnostics and keep only the file list
    pub fn into_files(self) -> FileList {
        self.files
    }
}
