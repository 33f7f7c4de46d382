//! Scan command orchestrator
//!
//! Resolves the root, asks for storage access, walks with the configured
//! policies while a spinner and a Ctrl-C handler run alongside, then
//! filters and renders the file list.

use crate::config::{AppConfig, ScanOverrides};
use crate::error::{CliError, CliResult, ErrorContext, ExitCode};
use crate::file_filter::{self, FileFilter};
use crate::output::{OutputFormat, ScanOutput, create_formatter};
use crate::progress::{
    ProgressRenderer, create_progress_infrastructure, format_elapsed, render_progress,
};
use crate::terminal;
use colored::*;
use gallery_scan_core::{
    CancellationToken, DirectoryWalker, NullProvider, ProgressProvider, StoragePermission,
    Unrestricted, WalkOutcome, ensure_storage_access,
};
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the `scan` command was asked to do
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Root directory; the configured default when `None`
    pub root: Option<PathBuf>,
    pub overrides: ScanOverrides,
    /// Output format; `output.default_format` when `None`
    pub format: Option<OutputFormat>,
    pub images_only: bool,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
}

/// What a finished scan produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub root: PathBuf,
    pub outcome: WalkOutcome,
    /// Files written after filtering
    pub files: usize,
    /// Subtrees that could not be listed
    pub skipped: usize,
}

impl ScanSummary {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.outcome)
    }
}

/// Orchestrator for the scan command
pub struct ScanOrchestrator {
    config: AppConfig,
    permission: Arc<dyn StoragePermission>,
    cancel: CancellationToken,
    use_color: bool,
}

impl ScanOrchestrator {
    /// Create an orchestrator that never needs to ask for storage access
    pub fn new(config: AppConfig) -> Self {
        let use_color = config.output.color_enabled && terminal::supports_ansi();
        Self {
            config,
            permission: Arc::new(Unrestricted),
            cancel: CancellationToken::new(),
            use_color,
        }
    }

    /// Gate the walk behind a platform storage permission
    pub fn with_permission(mut self, permission: Arc<dyn StoragePermission>) -> Self {
        self.permission = permission;
        self
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the walk; Ctrl-C triggers it while a scan runs
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run a scan, writing the listing to `out` and diagnostics to `diag`
    ///
    /// Returns `Ok` for every walk that produced a report, including
    /// cancelled, timed-out and aborted ones; their partial output has
    /// already been written and [`ScanSummary::exit_code`] tells them apart.
    pub async fn run<O: Write, E: Write>(
        &self,
        request: &ScanRequest,
        out: &mut O,
        diag: &mut E,
    ) -> CliResult<ScanSummary> {
        let mut config = self.config.clone();
        config.apply_cli_overrides(&request.overrides);

        let root = match &request.root {
            Some(root) => root.clone(),
            None => config.scan.resolve_default_root().ok_or_else(|| {
                CliError::misuse("No root directory given and no Pictures directory found")
                    .with_suggestion("Pass a directory: gallery-scan scan <ROOT>")
                    .with_suggestion("Or set one: gallery-scan config set scan.default_root <DIR>")
            })?,
        };
        validate_root(&root).await?;

        // Reject bad options before touching the filesystem
        let options = config.scan.to_walk_options();
        options.validate()?;

        let filter = FileFilter::new(
            request.include_patterns.clone(),
            request.exclude_patterns.clone(),
        )?
        .images_only(request.images_only)?;

        let format = match request.format {
            Some(format) => format,
            None => OutputFormat::from_string(&config.output.default_format).map_err(|e| {
                CliError::misuse(&e.to_string())
                    .with_context("key", "output.default_format")
                    .with_suggestion("Valid formats are: text, json, grid")
            })?,
        };
        let formatter = create_formatter(format, self.use_color, config.output.grid_columns)?;

        ensure_storage_access(self.permission.as_ref())
            .await
            .map_err(|e| {
                CliError::from(e)
                    .with_context("root", &root.display().to_string())
                    .with_suggestion("Grant storage access and run the scan again")
            })?;

        let show_progress =
            config.output.progress_enabled && terminal::should_show_progress_by_default();
        let (provider, renderer) = if show_progress {
            let (provider, rx) = create_progress_infrastructure();
            let renderer = tokio::spawn(render_progress(rx, ProgressRenderer::new()));
            (provider, Some(renderer))
        } else {
            (Arc::new(NullProvider) as Arc<dyn ProgressProvider>, None)
        };

        let interrupt = {
            let token = self.cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    debug!("Interrupt received, cancelling scan");
                    token.cancel();
                }
            })
        };

        info!("Scanning {}", root.display());
        let walker = DirectoryWalker::new(config.scan.lister())
            .with_options(options)
            .with_cancellation(self.cancel.clone())
            .with_progress(Arc::clone(&provider));
        let result = walker.walk(&root).await;

        interrupt.abort();
        provider.complete();
        if let Some(renderer) = renderer {
            // The spinner must be cleared before anything else hits stderr
            let _ = renderer.await;
        }

        let report = result.map_err(|e| {
            CliError::from(e).with_context("root", &root.display().to_string())
        })?;
        debug!(
            "Walk of {} finished: {} in {}",
            root.display(),
            report.outcome,
            format_elapsed(report.elapsed)
        );

        let files = file_filter::apply(&filter, &report.root, report.files.clone());
        let output = ScanOutput::new(&report, &files);
        let text = formatter.format(&output)?;
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|e| CliError::general(&format!("Failed to write output: {e}")))?;

        let summary = ScanSummary {
            root: report.root.clone(),
            outcome: report.outcome,
            files: files.len(),
            skipped: report.errors.len(),
        };
        self.write_diagnostics(&summary, report.elapsed, diag);

        Ok(summary)
    }

    fn write_diagnostics<E: Write>(
        &self,
        summary: &ScanSummary,
        elapsed: std::time::Duration,
        diag: &mut E,
    ) {
        let paint = |text: String, color: Color| {
            if self.use_color {
                text.color(color).to_string()
            } else {
                text
            }
        };

        // Diagnostics are best effort; a closed stderr must not fail the scan
        if summary.skipped > 0 {
            let noun = if summary.skipped == 1 {
                "directory"
            } else {
                "directories"
            };
            let _ = writeln!(
                diag,
                "{}",
                paint(
                    format!("Skipped {} unreadable {noun}", summary.skipped),
                    Color::Yellow
                )
            );
        }

        let partial = match summary.outcome {
            WalkOutcome::Completed => None,
            WalkOutcome::Cancelled => Some("Scan cancelled; output is partial".to_string()),
            WalkOutcome::TimedOut => Some(format!(
                "Scan timed out after {}; output is partial",
                format_elapsed(elapsed)
            )),
            WalkOutcome::Aborted => {
                Some("Scan aborted at an unreadable directory; output is partial".to_string())
            }
        };
        if let Some(message) = partial {
            let _ = writeln!(diag, "{}", paint(message, Color::Red));
        }
    }
}

/// Reject roots that can never name a directory
async fn validate_root(root: &Path) -> CliResult<()> {
    if root.as_os_str().is_empty() {
        return Err(CliError::misuse("Root path is empty"));
    }
    if root.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(CliError::misuse("Root path contains a NUL byte"));
    }
    let is_file = tokio::fs::metadata(root)
        .await
        .is_ok_and(|metadata| metadata.is_file());
    if is_file {
        return Err(
            CliError::misuse(&format!("{} is a file, not a directory", root.display()))
                .with_suggestion("Pass the folder containing it instead"),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_root() {
        assert_eq!(
            validate_root(Path::new("")).await.unwrap_err().exit_code(),
            ExitCode::Misuse
        );

        #[cfg(unix)]
        {
            use std::ffi::OsString;
            use std::os::unix::ffi::OsStringExt;
            let with_nul = PathBuf::from(OsString::from_vec(b"/tmp/a\0b".to_vec()));
            assert!(validate_root(&with_nul).await.is_err());
        }

        // Missing roots are left to the root failure policy
        assert!(validate_root(Path::new("/definitely/not/here")).await.is_ok());
    }

    #[tokio::test]
    async fn test_validate_root_rejects_regular_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let shot = dir.path().join("shot.png");
        std::fs::write(&shot, b"png").unwrap();

        let err = validate_root(&shot).await.unwrap_err();
        assert_eq!(err.exit_code(), ExitCode::Misuse);
        assert!(err.message().contains("is a file"));
        assert!(validate_root(dir.path()).await.is_ok());
    }

    #[test]
    fn test_summary_exit_codes() {
        let summary = ScanSummary {
            root: PathBuf::from("/shots"),
            outcome: WalkOutcome::TimedOut,
            files: 3,
            skipped: 0,
        };
        assert_eq!(summary.exit_code(), ExitCode::TimedOut);
    }
}
