//! Options controlling a directory walk

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Order in which the entries of each directory are processed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrder {
    /// Sort entries by file name before processing (deterministic)
    #[default]
    Name,
    /// Keep whatever order the lister returned (platform dependent)
    Listing,
}

/// What to do when a directory below the root cannot be listed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtreeErrorPolicy {
    /// Skip the subtree and keep no record of the failure
    Ignore,
    /// Skip the subtree and record the failure in the report
    #[default]
    Collect,
    /// Record the failure and stop the walk, keeping the partial list
    Abort,
}

/// What to do when the root itself cannot be listed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootFailurePolicy {
    /// Treat the root like any other unreadable subtree: empty result
    #[default]
    #[serde(rename = "empty")]
    EmptyResult,
    /// Return the listing error to the caller
    Fail,
}

/// Options for a single walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Entry ordering within each directory
    pub order: EntryOrder,
    /// Policy for unreadable subdirectories
    pub on_subtree_error: SubtreeErrorPolicy,
    /// Policy for an unreadable root
    pub root_failure: RootFailurePolicy,
    /// Maximum number of sibling directories listed concurrently (1 = sequential)
    pub max_concurrency: usize,
    /// Deadline for the whole walk; partial results are returned when it passes
    pub timeout: Option<Duration>,
    /// Skip directories whose identity was already visited
    pub detect_cycles: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            order: EntryOrder::default(),
            on_subtree_error: SubtreeErrorPolicy::default(),
            root_failure: RootFailurePolicy::default(),
            max_concurrency: 1,
            timeout: None,
            detect_cycles: true,
        }
    }
}

impl WalkOptions {
    /// Create new options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set entry ordering
    pub fn with_order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Set the subtree error policy
    pub fn with_subtree_errors(mut self, policy: SubtreeErrorPolicy) -> Self {
        self.on_subtree_error = policy;
        self
    }

    /// Set the root failure policy
    pub fn with_root_failure(mut self, policy: RootFailurePolicy) -> Self {
        self.root_failure = policy;
        self
    }

    /// Set the listing concurrency limit
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    /// Set the overall deadline
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable or disable cycle detection
    pub fn with_cycle_detection(mut self, detect: bool) -> Self {
        self.detect_cycles = detect;
        self
    }

    /// Check the options before a walk starts
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(
                ValidationError::invalid_parameter("max_concurrency", "must be at least 1").into(),
            );
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(
                ValidationError::invalid_parameter("timeout", "must be greater than zero").into(),
            );
        }
        Ok(())
    }
}
