//! Progress provider implementation for CLI
//!
//! Bridges the core library's progress reporting with the CLI's rendering
//! task through a bounded channel.

use gallery_scan_core::{ProgressProvider, ProgressUpdate};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Updates buffered between the walker and the renderer
const CHANNEL_CAPACITY: usize = 100;

/// Channel-based progress provider for CLI rendering
///
/// Updates are sent with `try_send`: when the renderer falls behind, updates
/// are dropped rather than slowing down the walk.
pub struct ChannelProvider {
    tx: Mutex<Option<mpsc::Sender<ProgressUpdate>>>,
}

impl ChannelProvider {
    /// Create a new channel provider
    pub fn new(tx: mpsc::Sender<ProgressUpdate>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }
}

impl ProgressProvider for ChannelProvider {
    fn report(&self, update: ProgressUpdate) {
        // Never block or panic if the receiver is gone
        let tx_opt = match self.tx.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        };
        if let Some(tx) = tx_opt {
            let _ = tx.try_send(update);
        }
    }

    fn complete(&self) {
        // Drop our sender so the renderer can exit its loop
        if let Ok(mut guard) = self.tx.lock() {
            *guard = None;
        }
    }
}

/// Create a progress provider and the receiver its renderer drains
pub fn create_progress_infrastructure()
-> (Arc<dyn ProgressProvider>, mpsc::Receiver<ProgressUpdate>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let provider = Arc::new(ChannelProvider::new(tx)) as Arc<dyn ProgressProvider>;
    (provider, rx)
}
