//! Public types for the vulnflow API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Identifiers and findings
pub use vulnflow_core::{Finding, FindingId, InstanceId, QueryOpts, VulnerabilityFinding};

// Run context and logging
pub use vulnflow_core::{logger_from_context, CancelHandle, Cancelled, Context, Logger};

// Store contract
pub use vulnflow_core::{
    BoxError, Closer, ReadOutcome, Reader, Storer, Updater, Validator, Writer,
};
