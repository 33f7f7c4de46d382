//! Gallery Scan CLI library
//!
//! Command plumbing for the `gallery-scan` binary: layered configuration,
//! result filtering, output formats, progress rendering and the scan
//! orchestrator.

pub mod config;
pub mod error;
pub mod file_filter;
pub mod orchestrators;
pub mod output;
pub mod paths;
pub mod progress;
pub mod terminal;

pub use config::{AppConfig, ConfigManager, OutputConfig, ScanOverrides};
pub use error::{CliError, CliResult, ErrorContext, ExitCode};
pub use orchestrators::{ScanOrchestrator, ScanRequest, ScanSummary};
pub use output::OutputFormat;
