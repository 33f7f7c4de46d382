//! Recursive directory walker
//!
//! Produces the flat list of regular files below a root in depth-first
//! pre-order: within each directory, entries are processed in order and a
//! subdirectory's files are emitted before the directory's later siblings.
//!
//! The walk is iterative. Each open directory is a frame on an explicit
//! stack holding its not-yet-processed entries, so arbitrarily deep trees
//! never grow the call stack. Directories that cannot be listed are skipped
//! according to [`SubtreeErrorPolicy`]; the walk continues with the next
//! sibling.
//!
//! With `max_concurrency > 1`, the subdirectory listings of a frame are
//! fetched ahead of time with a bounded, order-preserving stream. Output
//! order is identical to the sequential walk.

mod options;
mod report;

pub use options::{EntryOrder, RootFailurePolicy, SubtreeErrorPolicy, WalkOptions};
pub use report::{FileList, TraversalError, WalkOutcome, WalkReport};

use crate::error::{IoError, Result};
use crate::listing::{DirectoryEntry, DirectoryIdentity, DirectoryLister, EntryKind, FsLister};
use crate::progress::{NullProvider, ProgressProvider, ProgressUpdate};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::Instant as Deadline;
use tokio_util::sync::CancellationToken;

/// Walk `root` on the local filesystem with default options
pub async fn walk(root: impl AsRef<Path>) -> Result<WalkReport> {
    DirectoryWalker::new(FsLister::new()).walk(root).await
}

/// Collect every file below `root` on the local filesystem.
///
/// Never fails: unreadable subtrees (and an unreadable root) contribute
/// nothing to the list.
pub async fn walk_files(root: impl AsRef<Path>) -> FileList {
    DirectoryWalker::new(FsLister::new()).walk_files(root).await
}

/// Depth-first file collector over any [`DirectoryLister`]
pub struct DirectoryWalker<L> {
    lister: L,
    options: WalkOptions,
    cancel: CancellationToken,
    progress: Arc<dyn ProgressProvider>,
}

/// Result of asking the lister for one directory
enum Listing {
    Entries(Vec<DirectoryEntry>),
    Failed(IoError),
    /// Cancellation or the deadline won the race against the lister
    Interrupted(WalkOutcome),
}

/// An open directory on the traversal stack
struct Frame {
    entries: VecDeque<DirectoryEntry>,
    prefetched: HashMap<PathBuf, Listing>,
}

/// Mutable state accumulated during one walk
#[derive(Default)]
struct Traversal {
    files: FileList,
    errors: Vec<TraversalError>,
    visited: HashSet<DirectoryIdentity>,
    directories_listed: usize,
}

impl Traversal {
    /// Record `identity` and report whether it was new. Unknown identities
    /// always count as new.
    fn first_visit(&mut self, identity: Option<DirectoryIdentity>) -> bool {
        match identity {
            Some(identity) => self.visited.insert(identity),
            None => true,
        }
    }
}

impl Default for DirectoryWalker<FsLister> {
    fn default() -> Self {
        Self::new(FsLister::new())
    }
}

impl<L: DirectoryLister> DirectoryWalker<L> {
    /// Create a walker with default options
    pub fn new(lister: L) -> Self {
        Self {
            lister,
            options: WalkOptions::default(),
            cancel: CancellationToken::new(),
            progress: Arc::new(NullProvider),
        }
    }

    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    /// Observe `token`; cancelling it makes the walk return its partial result
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressProvider>) -> Self {
        self.progress = progress;
        self
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// Walk `root` and return the file list together with its diagnostics.
    ///
    /// Only invalid options and, under [`RootFailurePolicy::Fail`], an
    /// unreadable root produce an `Err`. Everything else ends up in the
    /// report.
    pub async fn walk(&self, root: impl AsRef<Path>) -> Result<WalkReport> {
        self.options.validate()?;

        let root = root.as_ref().to_path_buf();
        let started = Instant::now();
        let deadline = self.options.timeout.map(|timeout| Deadline::now() + timeout);
        let mut traversal = Traversal::default();

        log::debug!(
            "Walking {} (order: {:?}, subtree errors: {:?}, concurrency: {})",
            root.display(),
            self.options.order,
            self.options.on_subtree_error,
            self.options.max_concurrency
        );
        self.progress.report(ProgressUpdate::Status {
            message: format!("Opening {}", root.display()),
        });

        if self.options.detect_cycles {
            let identity = self.lister.directory_identity(&root).await;
            traversal.first_visit(identity);
        }

        let outcome = match self.list(&root, deadline).await {
            Listing::Entries(entries) => {
                traversal.directories_listed += 1;
                self.report_listed(&root, entries.len());
                let frame = self.open_frame(entries, deadline).await;
                self.drain(vec![frame], deadline, &mut traversal).await
            }
            Listing::Failed(err) => {
                traversal.directories_listed += 1;
                if self.options.root_failure == RootFailurePolicy::Fail {
                    let err = if err.path.is_none() {
                        err.with_path(&root)
                    } else {
                        err
                    };
                    log::warn!("Cannot list walk root: {err}");
                    return Err(err.into());
                }
                self.skip_subtree(&root, err, &mut traversal)
                    .unwrap_or(WalkOutcome::Completed)
            }
            Listing::Interrupted(outcome) => outcome,
        };

        let report = WalkReport {
            root,
            files: traversal.files,
            errors: traversal.errors,
            outcome,
            directories_listed: traversal.directories_listed,
            elapsed: started.elapsed(),
        };

        log::debug!(
            "Walk of {} {}: {} files, {} skipped directories, {} listings in {:?}",
            report.root.display(),
            report.outcome,
            report.files.len(),
            report.errors.len(),
            report.directories_listed,
            report.elapsed
        );

        Ok(report)
    }

    /// Walk `root` and return only the file list.
    ///
    /// Any error, including invalid options, yields an empty list.
    pub async fn walk_files(&self, root: impl AsRef<Path>) -> FileList {
        match self.walk(root).await {
            Ok(report) => report.into_files(),
            Err(e) => {
                log::debug!("Walk failed, returning no files: {e}");
                Vec::new()
            }
        }
    }

    /// Process frames until the stack is empty or the walk is interrupted
    async fn drain(
        &self,
        mut stack: Vec<Frame>,
        deadline: Option<Deadline>,
        traversal: &mut Traversal,
    ) -> WalkOutcome {
        loop {
            let Some(frame) = stack.last_mut() else {
                return WalkOutcome::Completed;
            };
            let Some(entry) = frame.entries.pop_front() else {
                stack.pop();
                continue;
            };

            match entry.kind {
                EntryKind::File => {
                    traversal.files.push(entry.path.clone());
                    self.progress.report(ProgressUpdate::FileDiscovered {
                        path: entry.path,
                        files_found: traversal.files.len(),
                    });
                }
                EntryKind::Other => {
                    log::trace!("Ignoring non-regular entry {}", entry.path.display());
                }
                EntryKind::Directory => {
                    let prefetched = frame.prefetched.remove(&entry.path);

                    if self.options.detect_cycles {
                        let identity = self.lister.directory_identity(&entry.path).await;
                        if !traversal.first_visit(identity) {
                            log::debug!(
                                "Skipping already visited directory {}",
                                entry.path.display()
                            );
                            continue;
                        }
                    }

                    // A prefetched listing finished before any interruption
                    let listing = match prefetched {
                        Some(listing) => listing,
                        None => self.list(&entry.path, deadline).await,
                    };

                    match listing {
                        Listing::Entries(children) => {
                            traversal.directories_listed += 1;
                            self.report_listed(&entry.path, children.len());
                            let frame = self.open_frame(children, deadline).await;
                            stack.push(frame);
                        }
                        Listing::Failed(err) => {
                            traversal.directories_listed += 1;
                            if let Some(outcome) = self.skip_subtree(&entry.path, err, traversal)
                            {
                                return outcome;
                            }
                        }
                        Listing::Interrupted(outcome) => return outcome,
                    }
                }
            }
        }
    }

    /// Order a directory's entries and, in parallel mode, fetch the listings
    /// of its subdirectories ahead of time
    async fn open_frame(
        &self,
        mut entries: Vec<DirectoryEntry>,
        deadline: Option<Deadline>,
    ) -> Frame {
        if self.options.order == EntryOrder::Name {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let mut prefetched = HashMap::new();
        if self.options.max_concurrency > 1 {
            let subdirectories: Vec<PathBuf> = entries
                .iter()
                .filter(|entry| entry.is_directory())
                .map(|entry| entry.path.clone())
                .collect();

            if subdirectories.len() > 1 {
                let mut listings = stream::iter(subdirectories)
                    .map(|path| async move {
                        let listing = self.list(&path, deadline).await;
                        (path, listing)
                    })
                    .buffered(self.options.max_concurrency);

                // An interruption is stored like any other listing; `drain`
                // emits everything that precedes it before stopping there.
                while let Some((path, listing)) = listings.next().await {
                    let interrupted = matches!(listing, Listing::Interrupted(_));
                    prefetched.insert(path, listing);
                    if interrupted {
                        break;
                    }
                }
            }
        }

        Frame {
            entries: entries.into(),
            prefetched,
        }
    }

    /// List one directory, racing the lister against cancellation and the
    /// deadline
    async fn list(&self, path: &Path, deadline: Option<Deadline>) -> Listing {
        if let Some(outcome) = self.interruption(deadline) {
            return Listing::Interrupted(outcome);
        }

        log::debug!("Listing {}", path.display());
        let listing = self.lister.list_directory(path);
        let bounded = async move {
            match deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, listing).await.ok(),
                None => Some(listing.await),
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Listing::Interrupted(WalkOutcome::Cancelled),
            result = bounded => match result {
                Some(Ok(entries)) => Listing::Entries(entries),
                Some(Err(err)) => Listing::Failed(err),
                None => {
                    log::debug!("Deadline passed while listing {}", path.display());
                    Listing::Interrupted(WalkOutcome::TimedOut)
                }
            },
        }
    }

    fn interruption(&self, deadline: Option<Deadline>) -> Option<WalkOutcome> {
        if self.cancel.is_cancelled() {
            return Some(WalkOutcome::Cancelled);
        }
        if deadline.is_some_and(|deadline| Deadline::now() >= deadline) {
            return Some(WalkOutcome::TimedOut);
        }
        None
    }

    /// Apply the subtree error policy. Returns the outcome when the walk
    /// must stop.
    fn skip_subtree(
        &self,
        path: &Path,
        err: IoError,
        traversal: &mut Traversal,
    ) -> Option<WalkOutcome> {
        let error = TraversalError::new(path, err);
        self.progress.report(ProgressUpdate::DirectoryFailed {
            path: path.to_path_buf(),
            reason: error.to_string(),
        });

        match self.options.on_subtree_error {
            SubtreeErrorPolicy::Ignore => {
                log::debug!("Skipping unreadable directory: {error}");
                None
            }
            SubtreeErrorPolicy::Collect => {
                log::warn!("Skipping unreadable directory: {error}");
                traversal.errors.push(error);
                None
            }
            SubtreeErrorPolicy::Abort => {
                log::warn!("Aborting walk: {error}");
                traversal.errors.push(error);
                Some(WalkOutcome::Aborted)
            }
        }
    }

    fn report_listed(&self, path: &Path, entries: usize) {
        self.progress.report(ProgressUpdate::DirectoryListed {
            path: path.to_path_buf(),
            entries,
        });
    }
}
