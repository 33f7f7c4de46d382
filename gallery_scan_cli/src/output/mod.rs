//! Rendering of scan results for stdout

mod formatters;

pub use formatters::{GridFormatter, JsonFormatter, TextFormatter};

use anyhow::Result;
use gallery_scan_core::{WalkOutcome, WalkReport};
use serde::Serialize;
use std::path::PathBuf;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One path per line
    Text,
    /// A single JSON document with files, errors and outcome
    Json,
    /// File names laid out in gallery columns
    Grid,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "grid" => Ok(Self::Grid),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// A skipped subtree as shown to users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDirectory {
    pub path: String,
    pub kind: &'static str,
    pub message: String,
}

/// Everything a formatter needs from a finished scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanOutput {
    pub root: String,
    pub outcome: WalkOutcome,
    pub files: Vec<String>,
    pub errors: Vec<SkippedDirectory>,
    pub directories_listed: usize,
    pub elapsed_ms: u128,
}

impl ScanOutput {
    /// Combine a walk report with its filtered file list
    pub fn new(report: &WalkReport, files: &[PathBuf]) -> Self {
        Self {
            root: report.root.to_string_lossy().into_owned(),
            outcome: report.outcome,
            files: files
                .iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect(),
            errors: report
                .errors
                .iter()
                .map(|error| SkippedDirectory {
                    path: error.path.to_string_lossy().into_owned(),
                    kind: error.kind().as_str(),
                    message: error.to_string(),
                })
                .collect(),
            directories_listed: report.directories_listed,
            elapsed_ms: report.elapsed.as_millis(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Render the whole scan; the result is written to stdout as is
    fn format(&self, output: &ScanOutput) -> Result<String>;
}

/// Create a formatter based on output format
pub fn create_formatter(
    format: OutputFormat,
    use_color: bool,
    columns: usize,
) -> gallery_scan_core::Result<Box<dyn OutputFormatter>> {
    match format {
        OutputFormat::Text => Ok(Box::new(TextFormatter)),
        OutputFormat::Json => Ok(Box::new(JsonFormatter::new(true))),
        OutputFormat::Grid => Ok(Box::new(GridFormatter::new(columns, use_color)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_string() {
        assert_eq!(OutputFormat::from_string("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_string("grid").unwrap(), OutputFormat::Grid);
        assert!(OutputFormat::from_string("csv").is_err());
    }

    #[test]
    fn test_zero_columns_is_rejected() {
        assert!(create_formatter(OutputFormat::Grid, false, 0).is_err());
        assert!(create_formatter(OutputFormat::Text, false, 0).is_ok());
    }
}
