//! Directory listing capability
//!
//! The walker never touches the filesystem directly. It asks a
//! [`DirectoryLister`] for the immediate entries of one directory at a time,
//! which lets tests substitute an in-memory tree and lets hosts plug in
//! their own storage APIs.

use crate::error::IoError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Classification of a discovered filesystem node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file, emitted by the walker
    File,
    /// Directory, traversed but never emitted
    Directory,
    /// Symlink, socket, device or anything else; neither emitted nor traversed
    Other,
}

/// A single entry produced by listing one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Final path component
    pub name: OsString,
    /// Full path (the listed directory joined with `name`)
    pub path: PathBuf,
    /// What the entry is
    pub kind: EntryKind,
}

impl DirectoryEntry {
    /// Build an entry for `name` inside `parent`
    pub fn new(parent: &Path, name: impl Into<OsString>, kind: EntryKind) -> Self {
        let name = name.into();
        let path = parent.join(&name);
        Self { name, path, kind }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Stable identity of a directory, used to detect symlink cycles
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DirectoryIdentity {
    /// Device and inode number (Unix)
    Inode { dev: u64, ino: u64 },
    /// Canonicalized path (platforms without inode numbers)
    Canonical(PathBuf),
}

/// Read-only directory listing capability consumed by the walker
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// List the immediate entries of `path`.
    ///
    /// Fails with a distinguishable [`IoError`] when the path is missing,
    /// unreadable or not a directory.
    async fn list_directory(&self, path: &Path) -> Result<Vec<DirectoryEntry>, IoError>;

    /// Identity of the directory at `path`, if the lister can tell.
    ///
    /// The default returns `None`, which disables cycle detection for this
    /// lister.
    async fn directory_identity(&self, _path: &Path) -> Option<DirectoryIdentity> {
        None
    }
}

#[async_trait]
impl<T: DirectoryLister + ?Sized> DirectoryLister for Arc<T> {
    async fn list_directory(&self, path: &Path) -> Result<Vec<DirectoryEntry>, IoError> {
        (**self).list_directory(path).await
    }

    async fn directory_identity(&self, path: &Path) -> Option<DirectoryIdentity> {
        (**self).directory_identity(path).await
    }
}

/// Lister backed by the local filesystem through `tokio::fs`
#[derive(Debug, Clone, Default)]
pub struct FsLister {
    follow_links: bool,
}

impl FsLister {
    /// Create a lister that reports symlinks as [`EntryKind::Other`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve symlinks and classify them by their target
    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn follows_links(&self) -> bool {
        self.follow_links
    }

    async fn classify(&self, entry: &tokio::fs::DirEntry) -> EntryKind {
        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                log::debug!("Cannot stat {}: {e}", entry.path().display());
                return EntryKind::Other;
            }
        };

        if file_type.is_symlink() {
            if !self.follow_links {
                return EntryKind::Other;
            }
            // Dangling links have no target to classify
            return match tokio::fs::metadata(entry.path()).await {
                Ok(meta) if meta.is_dir() => EntryKind::Directory,
                Ok(meta) if meta.is_file() => EntryKind::File,
                _ => EntryKind::Other,
            };
        }

        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

#[async_trait]
impl DirectoryLister for FsLister {
    async fn list_directory(&self, path: &Path) -> Result<Vec<DirectoryEntry>, IoError> {
        let mut read_dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| IoError::from_std(e).with_path(path))?;

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| IoError::from_std(e).with_path(path))?
        {
            let kind = self.classify(&entry).await;
            entries.push(DirectoryEntry {
                name: entry.file_name(),
                path: entry.path(),
                kind,
            });
        }

        Ok(entries)
    }

    async fn directory_identity(&self, path: &Path) -> Option<DirectoryIdentity> {
        // Without following links the tree cannot loop back on itself
        if !self.follow_links {
            return None;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            let meta = tokio::fs::metadata(path).await.ok()?;
            Some(DirectoryIdentity::Inode {
                dev: meta.dev(),
                ino: meta.ino(),
            })
        }

        #[cfg(not(unix))]
        {
            tokio::fs::canonicalize(path)
                .await
                .ok()
                .map(DirectoryIdentity::Canonical)
        }
    }
}
