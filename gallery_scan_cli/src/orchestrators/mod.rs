//! Command orchestrators
//!
//! Orchestrators coordinate between the CLI layer and the core library.

pub mod scan_orchestrator;

pub use scan_orchestrator::{ScanOrchestrator, ScanRequest, ScanSummary};
