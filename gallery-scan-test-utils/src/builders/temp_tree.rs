//! Temporary directory trees on the real filesystem

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A directory tree under a temporary root, removed on drop
pub struct TempTree {
    dir: TempDir,
    locked: Vec<PathBuf>,
}

impl TempTree {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            locked: Vec::new(),
        })
    }

    /// The tree used throughout the walker tests:
    ///
    /// ```text
    /// a.txt
    /// other.png
    /// sub/b.jpg
    /// sub/sub2/c.png
    /// ```
    pub fn scenario() -> io::Result<Self> {
        let tree = Self::new()?;
        tree.add_file("a.txt")?;
        tree.add_file("sub/b.jpg")?;
        tree.add_file("sub/sub2/c.png")?;
        tree.add_file("other.png")?;
        Ok(tree)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of `relative` inside the tree
    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Create a file with placeholder contents, creating parent directories
    pub fn add_file(&self, relative: &str) -> io::Result<PathBuf> {
        self.add_file_with(relative, relative.as_bytes())
    }

    pub fn add_file_with(&self, relative: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn add_dir(&self, relative: &str) -> io::Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Create a symlink at `link` pointing to `target` (both relative to the root)
    #[cfg(unix)]
    pub fn add_symlink(&self, link: &str, target: &str) -> io::Result<PathBuf> {
        let path = self.join(link);
        std::os::unix::fs::symlink(self.join(target), &path)?;
        Ok(path)
    }

    /// Remove all permissions from a directory.
    ///
    /// Returns `false` when the current user can still read it (for example
    /// when running as root), in which case permission tests should be
    /// skipped. Permissions are restored on drop.
    #[cfg(unix)]
    pub fn make_unreadable(&mut self, relative: &str) -> io::Result<bool> {
        use std::os::unix::fs::PermissionsExt;

        let path = self.join(relative);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000))?;
        self.locked.push(path.clone());
        Ok(fs::read_dir(&path).is_err())
    }
}

impl Drop for TempTree {
    fn drop(&mut self) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            for path in &self.locked {
                let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o755));
            }
        }
    }
}
