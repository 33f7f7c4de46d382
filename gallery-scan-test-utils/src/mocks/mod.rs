//! Mock implementations for testing

mod filesystem;
mod permission;

pub use filesystem::MockFileSystem;
pub use permission::MockPermission;
