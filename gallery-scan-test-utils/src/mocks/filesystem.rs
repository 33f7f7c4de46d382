//! Mock file system implementation for testing

use async_trait::async_trait;
use gallery_scan_core::{
    DirectoryEntry, DirectoryIdentity, DirectoryLister, EntryKind, IoError, IoErrorKind,
};
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type ListHook = Box<dyn Fn(&Path) + Send + Sync>;

const MAX_LINK_HOPS: usize = 64;

/// In-memory directory tree implementing [`DirectoryLister`].
///
/// Children keep insertion order, so tests can exercise both name ordering
/// and raw listing order. Parents are created on demand.
pub struct MockFileSystem {
    directories: HashMap<PathBuf, Vec<(OsString, EntryKind)>>,
    files: HashSet<PathBuf>,
    failures: HashMap<PathBuf, IoErrorKind>,
    links: Vec<(PathBuf, PathBuf)>,
    delay: Option<Duration>,
    on_list: Option<ListHook>,
    calls: Mutex<Vec<PathBuf>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFileSystem {
    /// Create a new mock file system
    pub fn new() -> Self {
        Self {
            directories: HashMap::new(),
            files: HashSet::new(),
            failures: HashMap::new(),
            links: Vec::new(),
            delay: None,
            on_list: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Check if the mock file system is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    /// Add a regular file, creating missing parent directories
    pub fn add_file(&mut self, path: &str) {
        let path = PathBuf::from(path);
        self.attach(&path, EntryKind::File);
        self.files.insert(path);
    }

    /// Add several files in order
    pub fn add_files(&mut self, paths: &[&str]) {
        for path in paths {
            self.add_file(path);
        }
    }

    /// Create a directory (and its parents)
    pub fn create_directory(&mut self, path: &str) {
        self.ensure_directory(Path::new(path));
    }

    /// Add an entry that is neither a file nor a directory (socket, dangling link)
    pub fn add_other(&mut self, path: &str) {
        self.attach(Path::new(path), EntryKind::Other);
    }

    /// Add a directory entry at `link` that resolves to `target`.
    ///
    /// Listing the link lists the target, and both report the same identity.
    pub fn add_directory_link(&mut self, link: &str, target: &str) {
        let link = PathBuf::from(link);
        self.attach(&link, EntryKind::Directory);
        self.links.push((link, PathBuf::from(target)));
    }

    /// Make listing `path` fail with a permission error
    pub fn deny(&mut self, path: &str) {
        self.fail_with(path, IoErrorKind::PermissionDenied);
    }

    /// Make listing `path` fail with the given error kind
    pub fn fail_with(&mut self, path: &str, kind: IoErrorKind) {
        self.failures.insert(PathBuf::from(path), kind);
    }

    /// Restore access to a previously failing path
    pub fn allow(&mut self, path: &str) {
        self.failures.remove(Path::new(path));
    }

    /// Delay every listing by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Run `hook` at the start of every listing call
    pub fn on_list(&mut self, hook: impl Fn(&Path) + Send + Sync + 'static) {
        self.on_list = Some(Box::new(hook));
    }

    /// Paths listed so far, in call order
    pub fn list_calls(&self) -> Vec<PathBuf> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Highest number of listings that were in progress at the same time
    pub fn peak_concurrent_listings(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Reset the mock file system
    pub fn reset(&mut self) {
        self.directories.clear();
        self.files.clear();
        self.failures.clear();
        self.links.clear();
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }

    fn ensure_directory(&mut self, path: &Path) {
        if self.directories.contains_key(path) {
            return;
        }
        self.directories.insert(path.to_path_buf(), Vec::new());
        self.attach(path, EntryKind::Directory);
    }

    /// Register `path` in its parent, creating missing ancestors iteratively
    fn attach(&mut self, path: &Path, kind: EntryKind) {
        let mut pending = vec![(path.to_path_buf(), kind)];
        let mut cursor = path.parent();
        while let Some(dir) = cursor {
            if self.directories.contains_key(dir) {
                break;
            }
            self.directories.insert(dir.to_path_buf(), Vec::new());
            pending.push((dir.to_path_buf(), EntryKind::Directory));
            cursor = dir.parent();
        }

        for (child, kind) in pending.into_iter().rev() {
            if let (Some(parent), Some(name)) = (child.parent(), child.file_name())
                && let Some(children) = self.directories.get_mut(parent)
                && !children.iter().any(|(existing, _)| existing == name)
            {
                children.push((name.to_os_string(), kind));
            }
        }
    }

    /// Rewrite link prefixes until the path names a real directory
    fn resolve(&self, path: &Path) -> PathBuf {
        let mut resolved = path.to_path_buf();
        for _ in 0..MAX_LINK_HOPS {
            let rewritten = self.links.iter().find_map(|(link, target)| {
                resolved
                    .strip_prefix(link)
                    .ok()
                    .map(|rest| target.join(rest))
            });
            match rewritten {
                Some(next) if next != resolved => resolved = next,
                _ => break,
            }
        }
        resolved
    }

    fn failure(&self, path: &Path, kind: IoErrorKind) -> IoError {
        match kind {
            IoErrorKind::NotFound => IoError::not_found(path),
            IoErrorKind::PermissionDenied => {
                IoError::permission_denied(path, io::Error::from(io::ErrorKind::PermissionDenied))
            }
            IoErrorKind::NotADirectory => IoError::not_a_directory(path),
            IoErrorKind::TimedOut => {
                IoError::from_std(io::Error::from(io::ErrorKind::TimedOut)).with_path(path)
            }
            IoErrorKind::Other => {
                IoError::from_std(io::Error::other("injected failure")).with_path(path)
            }
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DirectoryLister for MockFileSystem {
    async fn list_directory(&self, path: &Path) -> Result<Vec<DirectoryEntry>, IoError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(path.to_path_buf());
        }
        if let Some(hook) = &self.on_list {
            hook(path);
        }

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(kind) = self.failures.get(path) {
            return Err(self.failure(path, *kind));
        }

        let resolved = self.resolve(path);
        if let Some(kind) = self.failures.get(&resolved) {
            return Err(self.failure(path, *kind));
        }

        match self.directories.get(&resolved) {
            Some(children) => Ok(children
                .iter()
                .map(|(name, kind)| DirectoryEntry::new(path, name.clone(), *kind))
                .collect()),
            None if self.files.contains(&resolved) => Err(IoError::not_a_directory(path)),
            None => Err(IoError::not_found(path)),
        }
    }

    async fn directory_identity(&self, path: &Path) -> Option<DirectoryIdentity> {
        Some(DirectoryIdentity::Canonical(self.resolve(path)))
    }
}
