use colored::*;
use gallery_scan_core::WalkOutcome;
use std::error::Error as StdError;
use std::fmt;

/// CLI-specific error type with semantic exit codes
#[derive(Debug)]
pub struct CliError {
    /// The main error message
    message: String,

    /// Error category for exit code determination
    category: ErrorCategory,

    /// Additional context information
    context: Vec<(String, String)>,

    /// Suggestions for recovery
    pub suggestions: Vec<String>,

    /// Source error if any
    source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Error categories that map to exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCategory {
    General,
    Misuse,
    Filesystem,
}

/// Semantic exit codes for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    Misuse = 2,
    FilesystemError = 4,
    TimedOut = 124,
    Cancelled = 130,
}

impl From<WalkOutcome> for ExitCode {
    fn from(outcome: WalkOutcome) -> Self {
        match outcome {
            WalkOutcome::Completed => Self::Success,
            WalkOutcome::Cancelled => Self::Cancelled,
            WalkOutcome::TimedOut => Self::TimedOut,
            WalkOutcome::Aborted => Self::FilesystemError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Extension trait for adding context to errors
pub trait ErrorContext {
    fn with_context(self, key: &str, value: &str) -> Self;
    fn with_suggestion(self, suggestion: &str) -> Self;
    fn with_source(self, source: Box<dyn StdError + Send + Sync>) -> Self;
}

impl CliError {
    /// Create a general error
    pub fn general(message: &str) -> Self {
        Self {
            message: message.to_string(),
            category: ErrorCategory::General,
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Create a command misuse error
    pub fn misuse(message: &str) -> Self {
        Self {
            message: message.to_string(),
            category: ErrorCategory::Misuse,
            context: Vec::new(),
            suggestions: vec!["Run 'gallery-scan --help' for usage information".to_string()],
            source: None,
        }
    }

    /// Create a filesystem error
    pub fn filesystem(message: &str) -> Self {
        let mut error = Self {
            message: message.to_string(),
            category: ErrorCategory::Filesystem,
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        };

        // Add specific suggestions based on the message
        let lowered = message.to_lowercase();
        if lowered.contains("not found") {
            error
                .suggestions
                .push("Check if the directory exists".to_string());
            error
                .suggestions
                .push("Verify you have the correct path".to_string());
        } else if lowered.contains("permission") || lowered.contains("denied") {
            error
                .suggestions
                .push("Check directory permissions".to_string());
            error.suggestions.push(
                "Grant the terminal access to your pictures folder if your OS requires it"
                    .to_string(),
            );
        }

        error
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.category {
            ErrorCategory::General => ExitCode::GeneralError,
            ErrorCategory::Misuse => ExitCode::Misuse,
            ErrorCategory::Filesystem => ExitCode::FilesystemError,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Format the error for user display
    pub fn format_for_user(&self, debug: bool) -> String {
        let mut output = String::new();

        // Main error message
        let prefix = match self.category {
            ErrorCategory::General => "Error".red(),
            ErrorCategory::Misuse => "Usage Error".yellow(),
            ErrorCategory::Filesystem => "File Error".red(),
        };

        output.push_str(&format!("{}: {}\n", prefix, self.message));

        // Context information
        if !self.context.is_empty() {
            output.push_str("\nContext:\n");
            for (key, value) in &self.context {
                output.push_str(&format!("  {}: {}\n", key.bold(), value));
            }
        }

        // Error chain in debug mode
        if debug && let Some(source) = &self.source {
            output.push_str("\nCaused by:\n");
            let mut current: Option<&dyn StdError> = Some(source.as_ref());
            let mut level = 1;

            while let Some(err) = current {
                output.push_str(&format!("  {level}: {err}\n"));
                current = err.source();
                level += 1;
            }
        }

        // Suggestions
        if !self.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in &self.suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            match self.category {
                ErrorCategory::General => "Error",
                ErrorCategory::Misuse => "Usage Error",
                ErrorCategory::Filesystem => "File Error",
            },
            self.message
        )?;

        // Include context in display
        for (key, value) in &self.context {
            write!(f, " ({key}: {value})")?;
        }

        Ok(())
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl ErrorContext for CliError {
    fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.push((key.to_string(), value.to_string()));
        self
    }

    fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestions.push(suggestion.to_string());
        self
    }

    fn with_source(mut self, source: Box<dyn StdError + Send + Sync>) -> Self {
        self.source = Some(source);
        self
    }
}

/// Convert anyhow errors to CLI errors
impl From<anyhow::Error> for CliError {
    fn from(error: anyhow::Error) -> Self {
        Self::general(&format!("{error:#}"))
    }
}

/// Invalid options are misuse; everything else is a filesystem problem
impl From<gallery_scan_core::Error> for CliError {
    fn from(error: gallery_scan_core::Error) -> Self {
        let cli_error = match &error {
            gallery_scan_core::Error::Validation(_) => Self::misuse(&error.to_string()),
            gallery_scan_core::Error::Io(_) => Self::filesystem(&error.to_string()),
        };
        cli_error.with_source(Box::new(error))
    }
}

impl From<crate::file_filter::FilterError> for CliError {
    fn from(error: crate::file_filter::FilterError) -> Self {
        Self::misuse(&error.to_string())
            .with_suggestion("Quote patterns so the shell does not expand them, e.g. -i '*.png'")
    }
}

/// Candidates within a small edit distance of `input`, closest first
pub fn suggest_similar<'a>(input: &str, candidates: &[&'a str]) -> Vec<&'a str> {
    let mut close: Vec<(usize, &str)> = candidates
        .iter()
        .map(|candidate| (levenshtein_distance(input, candidate), *candidate))
        .filter(|(distance, _)| *distance <= 2)
        .collect();
    close.sort();
    close.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Simple Levenshtein distance for key suggestions
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let len1 = s1_chars.len();
    let len2 = s2_chars.len();
    let mut matrix = vec![vec![0; len2 + 1]; len1 + 1];

    for (i, row) in matrix.iter_mut().enumerate().take(len1 + 1) {
        row[0] = i;
    }
    for (j, cell) in matrix[0].iter_mut().enumerate().take(len2 + 1) {
        *cell = j;
    }

    for (i, c1) in s1_chars.iter().enumerate() {
        let i1 = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let j1 = j + 1;
            let cost = if c1 == c2 { 0 } else { 1 };
            matrix[i1][j1] = std::cmp::min(
                std::cmp::min(matrix[i][j1] + 1, matrix[i1][j] + 1),
                matrix[i][j] + cost,
            );
        }
    }

    matrix[len1][len2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_scan_core::{IoError, ValidationError};
    use std::path::Path;

    #[test]
    fn test_outcome_exit_codes() {
        assert_eq!(ExitCode::from(WalkOutcome::Completed) as u8, 0);
        assert_eq!(ExitCode::from(WalkOutcome::Aborted) as u8, 4);
        assert_eq!(ExitCode::from(WalkOutcome::TimedOut) as u8, 124);
        assert_eq!(ExitCode::from(WalkOutcome::Cancelled) as u8, 130);
    }

    #[test]
    fn test_core_errors_map_to_categories() {
        let io: CliError =
            gallery_scan_core::Error::from(IoError::not_found(Path::new("/shots"))).into();
        assert_eq!(io.exit_code(), ExitCode::FilesystemError);
        assert!(io.suggestions.iter().any(|s| s.contains("exists")));

        let validation: CliError = gallery_scan_core::Error::from(
            ValidationError::invalid_parameter("max_concurrency", "must be at least 1"),
        )
        .into();
        assert_eq!(validation.exit_code(), ExitCode::Misuse);
    }

    #[test]
    fn test_format_for_user_includes_context_and_chain() {
        let error = CliError::filesystem("Cannot scan /shots")
            .with_context("root", "/shots")
            .with_source(Box::new(std::io::Error::other("disk on fire")));

        let plain = error.format_for_user(false);
        assert!(plain.contains("Cannot scan /shots"));
        assert!(plain.contains("root"));
        assert!(!plain.contains("disk on fire"));

        let debug = error.format_for_user(true);
        assert!(debug.contains("Caused by"));
        assert!(debug.contains("disk on fire"));
    }

    #[test]
    fn test_suggest_similar() {
        let keys = ["scan.order", "scan.root_failure", "output.grid_columns"];
        assert_eq!(suggest_similar("scan.ordr", &keys), vec!["scan.order"]);
        assert!(suggest_similar("completely.different", &keys).is_empty());
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }
}
