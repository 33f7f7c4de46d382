//! Mock storage permission for testing

use async_trait::async_trait;
use gallery_scan_core::{PermissionStatus, StoragePermission};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Permission source with a fixed answer that counts how often it was asked
pub struct MockPermission {
    status: PermissionStatus,
    requests: AtomicUsize,
}

impl MockPermission {
    pub fn granting() -> Self {
        Self::with_status(PermissionStatus::Granted)
    }

    pub fn denying() -> Self {
        Self::with_status(PermissionStatus::Denied)
    }

    pub fn with_status(status: PermissionStatus) -> Self {
        Self {
            status,
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of times access was requested
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoragePermission for MockPermission {
    async fn request(&self) -> PermissionStatus {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.status
    }
}
