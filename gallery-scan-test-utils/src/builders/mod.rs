//! Builders for on-disk test fixtures

mod temp_tree;

pub use temp_tree::TempTree;
