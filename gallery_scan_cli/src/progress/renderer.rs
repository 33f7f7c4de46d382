//! Progress rendering for the CLI
//!
//! Turns walker progress updates into a single spinner line on stderr.

use colored::*;
use gallery_scan_core::ProgressUpdate;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

/// Render progress updates from a channel until every sender is gone
pub async fn render_progress(
    mut rx: mpsc::Receiver<ProgressUpdate>,
    mut renderer: ProgressRenderer,
) {
    while let Some(update) = rx.recv().await {
        renderer.handle_update(update);
    }

    renderer.finish();
}

/// Spinner that counts directories, files and skipped subtrees
pub struct ProgressRenderer {
    spinner: ProgressBar,
    directories: usize,
    files: usize,
    skipped: usize,
}

impl Default for ProgressRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressRenderer {
    /// Create a renderer drawing to stderr
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self::with_bar(spinner)
    }

    /// Create a renderer that counts but never draws
    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden()))
    }

    fn with_bar(spinner: ProgressBar) -> Self {
        Self {
            spinner,
            directories: 0,
            files: 0,
            skipped: 0,
        }
    }

    pub fn directories(&self) -> usize {
        self.directories
    }

    pub fn files(&self) -> usize {
        self.files
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Current spinner message
    pub fn message(&self) -> String {
        self.spinner.message()
    }

    /// Handle a progress update
    pub fn handle_update(&mut self, update: ProgressUpdate) {
        match update {
            ProgressUpdate::DirectoryListed { path, .. } => {
                self.directories += 1;
                self.show_counts(Some(&path));
            }
            ProgressUpdate::FileDiscovered { files_found, .. } => {
                // Updates can be dropped under load; the walker's count is authoritative
                self.files = self.files.max(files_found);
                self.show_counts(None);
            }
            ProgressUpdate::DirectoryFailed { .. } => {
                // The walker already logs the failure itself
                self.skipped += 1;
                self.show_counts(None);
            }
            ProgressUpdate::Status { message } => {
                self.spinner.set_message(message);
            }
        }
    }

    fn show_counts(&self, current: Option<&Path>) {
        let mut message = format!(
            "{} {} directories, {} files",
            "Scanning".bold(),
            self.directories,
            self.files
        );
        if self.skipped > 0 {
            message.push_str(&format!(", {} skipped", self.skipped));
        }
        if let Some(path) = current {
            message.push_str(&format!(" {}", path.display().to_string().dimmed()));
        }
        self.spinner.set_message(message);
    }

    /// Clear the spinner line
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_counts_follow_updates() {
        colored::control::set_override(false);
        let mut renderer = ProgressRenderer::hidden();

        renderer.handle_update(ProgressUpdate::DirectoryListed {
            path: PathBuf::from("/shots"),
            entries: 3,
        });
        renderer.handle_update(ProgressUpdate::FileDiscovered {
            path: PathBuf::from("/shots/a.png"),
            files_found: 1,
        });
        renderer.handle_update(ProgressUpdate::FileDiscovered {
            path: PathBuf::from("/shots/b.png"),
            files_found: 2,
        });
        renderer.handle_update(ProgressUpdate::DirectoryFailed {
            path: PathBuf::from("/shots/private"),
            reason: "Permission denied".to_string(),
        });

        assert_eq!(renderer.directories(), 1);
        assert_eq!(renderer.files(), 2);
        assert_eq!(renderer.skipped(), 1);
        assert_eq!(
            renderer.message(),
            "Scanning 1 directories, 2 files, 1 skipped"
        );
    }

    #[test]
    fn test_stale_file_count_does_not_go_backwards() {
        let mut renderer = ProgressRenderer::hidden();
        renderer.handle_update(ProgressUpdate::FileDiscovered {
            path: PathBuf::from("/b"),
            files_found: 5,
        });
        renderer.handle_update(ProgressUpdate::FileDiscovered {
            path: PathBuf::from("/a"),
            files_found: 4,
        });
        assert_eq!(renderer.files(), 5);
    }

    #[tokio::test]
    async fn test_render_progress_drains_channel() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(ProgressUpdate::Status {
            message: "Requesting storage access".to_string(),
        })
        .await
        .unwrap();
        drop(tx);

        // Returns once the sender is dropped
        render_progress(rx, ProgressRenderer::hidden()).await;
    }
}
