//! Progress reporting abstractions for directory scans
//!
//! The walker reports what it is doing through a [`ProgressProvider`] so the
//! core library stays independent of any particular UI. The CLI plugs in a
//! channel-backed provider that drives a spinner; everything else can use
//! [`NullProvider`].

use std::path::PathBuf;

/// Core trait for progress reporting
pub trait ProgressProvider: Send + Sync {
    /// Report a progress update
    fn report(&self, update: ProgressUpdate);

    /// Signal that the operation is complete
    fn complete(&self);
}

/// Unified progress update type
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// A directory was listed successfully
    DirectoryListed { path: PathBuf, entries: usize },

    /// A file was appended to the file list
    FileDiscovered { path: PathBuf, files_found: usize },

    /// A directory could not be listed and its subtree was skipped
    DirectoryFailed { path: PathBuf, reason: String },

    /// Free-form status, sent once when a walk starts
    Status { message: String },
}

/// Null implementation for when no progress is needed
pub struct NullProvider;

impl ProgressProvider for NullProvider {
    fn report(&self, _update: ProgressUpdate) {}

    fn complete(&self) {}
}

/// Helper functions for creating providers
impl dyn ProgressProvider {
    /// Create a null provider (useful for tests and when progress isn't needed)
    pub fn null() -> Box<dyn ProgressProvider> {
        Box::new(NullProvider)
    }
}
