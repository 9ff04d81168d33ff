//! Convenient imports for vulnflow.
//!
//! This module re-exports the most commonly used types so a component or a
//! pipeline driver can get started with a single import:
//!
//! ```ignore
//! use vulnflow::prelude::*;
//! ```

// Runner entry points
pub use crate::{run_enricher, run_filter, run_reporter, run_scanner, run_target, Runner};

// Configuration
pub use crate::{
    runner_with_component_name, runner_with_instance_id, runner_with_logger, runner_with_storer,
    RunnerConfig,
};

// Capability contracts
pub use crate::{Enricher, Filter, Reporter, Scanner, Target};

// Error handling
pub use crate::{BoxError, Error, Result};

// Core types
pub use crate::{Context, Finding, FindingId, InstanceId, Logger, VulnerabilityFinding};

// Store
pub use crate::{MemorySession, MemoryStore, ReadOutcome, Storer};

// Re-export serde_json for building findings
pub use serde_json::json;
