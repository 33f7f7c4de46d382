//! Storage access permission
//!
//! Hosts that gate filesystem access behind a user prompt implement
//! [`StoragePermission`]. The application asks for access before starting a
//! walk; the walker itself never consults it.

use crate::error::{IoError, Result};
use async_trait::async_trait;

/// Answer to a storage access request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

#[async_trait]
pub trait StoragePermission: Send + Sync {
    /// Ask the host for read access to shared storage
    async fn request(&self) -> PermissionStatus;
}

/// Permission source for platforms without a storage prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct Unrestricted;

#[async_trait]
impl StoragePermission for Unrestricted {
    async fn request(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }
}

/// Request access and turn a denial into an error
pub async fn ensure_storage_access(permission: &dyn StoragePermission) -> Result<()> {
    match permission.request().await {
        PermissionStatus::Granted => Ok(()),
        PermissionStatus::Denied => {
            log::warn!("Storage access was denied");
            Err(IoError::access_denied().into())
        }
    }
}
