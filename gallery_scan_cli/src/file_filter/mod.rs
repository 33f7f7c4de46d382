//! Post-walk filtering of file lists
//!
//! The walker always returns every regular file. Include, exclude and
//! image-only filters are applied to that list afterwards, matching glob
//! patterns against each path relative to the scan root.

mod extensions;
mod filter;

pub use extensions::{DEFAULT_IMAGE_EXTENSIONS, extensions_to_patterns};
pub use filter::{FileFilter, PatternMatcher};

use std::path::{Path, PathBuf};

/// Error type for filter construction
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Result type for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Keep the files `filter` accepts, preserving walk order
pub fn apply(filter: &FileFilter, root: &Path, files: Vec<PathBuf>) -> Vec<PathBuf> {
    if !filter.has_patterns() {
        return files;
    }

    files
        .into_iter()
        .filter(|path| filter.should_include(path.strip_prefix(root).unwrap_or(path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_matches_relative_to_root() {
        let root = Path::new("/root");
        let files = vec![
            PathBuf::from("/root/a.txt"),
            PathBuf::from("/root/other.png"),
            PathBuf::from("/root/sub/b.jpg"),
            PathBuf::from("/root/sub/sub2/c.png"),
        ];
        let filter = FileFilter::new(vec![], vec!["sub/sub2/**".to_string()])
            .unwrap()
            .images_only(true)
            .unwrap();

        assert_eq!(
            apply(&filter, root, files),
            vec![PathBuf::from("/root/other.png"), PathBuf::from("/root/sub/b.jpg")]
        );
    }
}
