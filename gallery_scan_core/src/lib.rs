//! Gallery Scan Core Library
//!
//! Collects every regular file below a directory in a deterministic
//! depth-first order, skipping unreadable subtrees instead of failing. The
//! result feeds a photo/screenshot gallery.

pub mod error;
pub mod gallery;
pub mod listing;
pub mod permission;
pub mod progress;
pub mod walker;

// Re-export main types
pub use error::{Error, IoError, IoErrorKind, Result, ValidationError};
pub use gallery::{GalleryLayout, GalleryTile, default_screenshots_dir};
pub use listing::{DirectoryEntry, DirectoryIdentity, DirectoryLister, EntryKind, FsLister};
pub use permission::{PermissionStatus, StoragePermission, Unrestricted, ensure_storage_access};
pub use progress::{NullProvider, ProgressProvider, ProgressUpdate};
pub use walker::{
    DirectoryWalker, EntryOrder, FileList, RootFailurePolicy, SubtreeErrorPolicy, TraversalError,
    WalkOptions, WalkOutcome, WalkReport, walk, walk_files,
};

/// Cancellation signal shared between a walk and its caller
pub use tokio_util::sync::CancellationToken;

use std::path::PathBuf;
use std::time::Duration;

/// Scan configuration as stored in configuration files
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub order: EntryOrder,
    pub on_subtree_error: SubtreeErrorPolicy,
    pub root_failure: RootFailurePolicy,
    pub follow_links: bool,
    pub max_concurrency: usize,
    pub timeout_seconds: Option<u64>,
    pub default_root: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            order: EntryOrder::Name,
            on_subtree_error: SubtreeErrorPolicy::Collect,
            root_failure: RootFailurePolicy::EmptyResult,
            follow_links: false,
            max_concurrency: 1,
            timeout_seconds: None,
            default_root: None,
        }
    }
}

impl ScanConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            max_concurrency: 2,
            timeout_seconds: Some(10),
            ..Self::default()
        }
    }

    pub fn to_walk_options(&self) -> WalkOptions {
        WalkOptions::new()
            .with_order(self.order)
            .with_subtree_errors(self.on_subtree_error)
            .with_root_failure(self.root_failure)
            .with_max_concurrency(self.max_concurrency)
            .with_timeout(self.timeout_seconds.map(Duration::from_secs))
    }

    /// Filesystem lister honoring `follow_links`
    pub fn lister(&self) -> FsLister {
        FsLister::new().with_follow_links(self.follow_links)
    }

    /// Explicit default root, else the platform screenshots folder
    pub fn resolve_default_root(&self) -> Option<PathBuf> {
        self.default_root.clone().or_else(default_screenshots_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_maps_onto_walk_options() {
        let config = ScanConfig {
            order: EntryOrder::Listing,
            on_subtree_error: SubtreeErrorPolicy::Abort,
            max_concurrency: 8,
            timeout_seconds: Some(3),
            ..ScanConfig::default()
        };
        let options = config.to_walk_options();

        assert_eq!(options.order, EntryOrder::Listing);
        assert_eq!(options.on_subtree_error, SubtreeErrorPolicy::Abort);
        assert_eq!(options.root_failure, RootFailurePolicy::EmptyResult);
        assert_eq!(options.max_concurrency, 8);
        assert_eq!(options.timeout, Some(Duration::from_secs(3)));
        assert!(options.detect_cycles);
    }

    #[test]
    fn test_scan_config_partial_deserialization() {
        let config: ScanConfig =
            serde_json::from_str(r#"{"order": "listing", "follow_links": true}"#).unwrap();
        assert_eq!(config.order, EntryOrder::Listing);
        assert!(config.follow_links);
        assert_eq!(config.max_concurrency, 1);
        assert!(config.lister().follows_links());
    }

    #[test]
    fn test_explicit_default_root_wins() {
        let config = ScanConfig {
            default_root: Some(PathBuf::from("/shots")),
            ..ScanConfig::default()
        };
        assert_eq!(config.resolve_default_root(), Some(PathBuf::from("/shots")));
    }
}
