//! # vulnflow
//!
//! Execution runtime for a vulnerability-finding pipeline.
//!
//! vulnflow runs pluggable pipeline components (targets, scanners, filters,
//! enrichers and reporters) under one lifecycle against a shared finding
//! store. Whatever a component does, the runtime guarantees that:
//!
//! - the store is closed exactly once per run
//! - a panicking component becomes an ordinary error, not a crash
//! - an instance without findings is a successful no-op
//! - a run returns a single error describing the step that failed
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use vulnflow::prelude::*;
//!
//! let store = MemoryStore::new();
//! let ctx = Context::background();
//!
//! run_enricher(
//!     &ctx,
//!     &my_enricher,
//!     [
//!         runner_with_component_name("cve-enricher"),
//!         runner_with_instance_id(instance_id),
//!         runner_with_storer(Arc::new(store.session())),
//!     ],
//! )?;
//! ```
//!
//! ## Crates
//!
//! - `vulnflow-core` - ids, findings, context, logger, store contract
//! - `vulnflow-storage` - [`MemoryStore`] and its per-run [`MemorySession`]
//! - `vulnflow-runner` - capability contracts, configuration, runner

#![warn(missing_docs)]

mod types;

pub mod prelude;

// Runner entry points
pub use vulnflow_runner::{
    run_enricher, run_filter, run_reporter, run_scanner, run_target, Runner,
};

// Configuration
pub use vulnflow_runner::{
    runner_with_component_name, runner_with_instance_id, runner_with_logger, runner_with_storer,
    RunnerConfig, RunnerConfigBuilder, RunnerOption, DEFAULT_COMPONENT_NAME, ENV_COMPONENT_NAME,
    ENV_INSTANCE_ID,
};

// Capability contracts
pub use vulnflow_runner::{Enricher, Filter, Reporter, Scanner, StageKind, Target};

// Panic containment
pub use vulnflow_runner::{panic_with_error, DefaultPanicHandler, PanicHandler, PanicOutcome};

// Errors
pub use vulnflow_runner::{Error, PersistOp, Result};

// Store implementation
pub use vulnflow_storage::{MemorySession, MemoryStore, StoreError};

// Re-export types
pub use types::*;
