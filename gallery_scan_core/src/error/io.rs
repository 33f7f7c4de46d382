//! I/O related error types

use std::path::PathBuf;
use thiserror::Error;

/// I/O error with additional context
#[derive(Error, Debug)]
#[error("{}", format_io_error(self))]
pub struct IoError {
    /// The kind of I/O error
    pub kind: IoErrorKind,
    /// Path associated with the error (if any)
    pub path: Option<PathBuf>,
    /// Underlying I/O error (if any)
    #[source]
    pub source: Option<std::io::Error>,
}

/// Kind of I/O error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    /// Path does not exist
    NotFound,
    /// Permission denied
    PermissionDenied,
    /// Path exists but is not a directory
    NotADirectory,
    /// Listing did not finish before the deadline
    TimedOut,
    /// Generic I/O error
    Other,
}

impl IoErrorKind {
    /// Stable snake_case name for machine-readable output
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::PermissionDenied => "permission_denied",
            Self::NotADirectory => "not_a_directory",
            Self::TimedOut => "timed_out",
            Self::Other => "other",
        }
    }
}

impl IoError {
    /// Create a not found error
    pub fn not_found(path: &std::path::Path) -> Self {
        Self {
            kind: IoErrorKind::NotFound,
            path: Some(path.to_path_buf()),
            source: None,
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: &std::path::Path, source: std::io::Error) -> Self {
        Self {
            kind: IoErrorKind::PermissionDenied,
            path: Some(path.to_path_buf()),
            source: Some(source),
        }
    }

    /// Create a not-a-directory error
    pub fn not_a_directory(path: &std::path::Path) -> Self {
        Self {
            kind: IoErrorKind::NotADirectory,
            path: Some(path.to_path_buf()),
            source: None,
        }
    }

    /// Storage access was refused before any path was touched
    pub fn access_denied() -> Self {
        Self {
            kind: IoErrorKind::PermissionDenied,
            path: None,
            source: None,
        }
    }

    /// Create an I/O error from a standard I/O error
    pub fn from_std(source: std::io::Error) -> Self {
        let kind = match source.kind() {
            std::io::ErrorKind::NotFound => IoErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => IoErrorKind::PermissionDenied,
            std::io::ErrorKind::NotADirectory => IoErrorKind::NotADirectory,
            std::io::ErrorKind::TimedOut => IoErrorKind::TimedOut,
            _ => IoErrorKind::Other,
        };

        Self {
            kind,
            path: None,
            source: Some(source),
        }
    }

    /// Create an I/O error with a path
    pub fn with_path(mut self, path: &std::path::Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }
}

fn format_io_error(error: &IoError) -> String {
    match (&error.kind, &error.path) {
        (IoErrorKind::NotFound, Some(path)) => format!("Not found: {}", path.display()),
        (IoErrorKind::NotFound, None) => "Not found".to_string(),
        (IoErrorKind::PermissionDenied, Some(path)) => {
            format!("Permission denied: {}", path.display())
        }
        (IoErrorKind::PermissionDenied, None) => "Permission denied".to_string(),
        (IoErrorKind::NotADirectory, Some(path)) => {
            format!("Not a directory: {}", path.display())
        }
        (IoErrorKind::NotADirectory, None) => "Not a directory".to_string(),
        (IoErrorKind::TimedOut, Some(path)) => format!("Timed out listing {}", path.display()),
        (IoErrorKind::TimedOut, None) => "Timed out".to_string(),
        (IoErrorKind::Other, path) => match (&error.source, path) {
            (Some(source), Some(path)) => format!("I/O error on {}: {source}", path.display()),
            (Some(source), None) => format!("I/O error: {source}"),
            (None, _) => "I/O error".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_error() {
        let path = std::path::Path::new("/storage/emulated/0/Pictures");
        let error = IoError::not_found(path);

        assert_eq!(error.kind, IoErrorKind::NotFound);
        assert_eq!(error.path, Some(path.to_path_buf()));
        assert!(error.source.is_none());
        assert!(error.to_string().contains("Not found"));
        assert!(error.to_string().contains("/storage/emulated/0/Pictures"));
    }

    #[test]
    fn test_permission_denied_error() {
        let path = std::path::Path::new("/root/private");
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let error = IoError::permission_denied(path, io_error);

        assert_eq!(error.kind, IoErrorKind::PermissionDenied);
        assert_eq!(error.path, Some(path.to_path_buf()));
        assert!(error.source.is_some());
        assert!(error.to_string().contains("Permission denied"));
        assert!(error.to_string().contains("/root/private"));
    }

    #[test]
    fn test_from_std_maps_kinds() {
        let not_found = IoError::from_std(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(not_found.kind, IoErrorKind::NotFound);
        assert!(not_found.path.is_none());

        let denied = IoError::from_std(io::Error::new(io::ErrorKind::PermissionDenied, "no"));
        assert_eq!(denied.kind, IoErrorKind::PermissionDenied);

        let other = IoError::from_std(io::Error::other("weird"));
        assert_eq!(other.kind, IoErrorKind::Other);
    }

    #[test]
    fn test_with_path() {
        let path = std::path::Path::new("/photos");
        let error = IoError::from_std(io::Error::other("Generic error")).with_path(path);

        assert_eq!(error.kind, IoErrorKind::Other);
        assert_eq!(error.path, Some(path.to_path_buf()));
        assert!(error.to_string().contains("/photos"));
    }

    #[test]
    fn test_access_denied_has_no_path() {
        let error = IoError::access_denied();
        assert_eq!(error.kind, IoErrorKind::PermissionDenied);
        assert_eq!(error.to_string(), "Permission denied");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(IoErrorKind::PermissionDenied.as_str(), "permission_denied");
        assert_eq!(IoErrorKind::NotADirectory.as_str(), "not_a_directory");
    }
}
