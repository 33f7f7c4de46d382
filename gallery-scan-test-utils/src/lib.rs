//! Test utilities for gallery scan
//!
//! This crate provides an in-memory directory lister with injectable
//! failures, a mock storage permission, and a builder for real directory
//! trees on disk.

pub mod builders;
pub mod mocks;

// Re-export commonly used types
pub use builders::TempTree;
pub use mocks::{MockFileSystem, MockPermission};
