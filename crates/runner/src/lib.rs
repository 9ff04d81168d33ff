//! Stage runner for vulnflow
//!
//! This crate drives pipeline components through a fixed lifecycle:
//! - Capability contracts, one per stage kind ([`component`])
//! - Validated run configuration ([`config`])
//! - Panic containment around stage calls ([`panic`])
//! - The runner itself ([`runner`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod component;
pub mod config;
pub mod error;
pub mod panic;
pub mod runner;
mod session;

pub use component::{Enricher, Filter, Reporter, Scanner, StageKind, Target};
pub use config::{
    runner_with_component_name, runner_with_instance_id, runner_with_logger, runner_with_storer,
    RunnerConfig, RunnerConfigBuilder, RunnerOption, DEFAULT_COMPONENT_NAME, ENV_COMPONENT_NAME,
    ENV_INSTANCE_ID,
};
pub use error::{Error, PersistOp, Result};
pub use panic::{panic_with_error, DefaultPanicHandler, PanicHandler, PanicOutcome};
pub use runner::{run_enricher, run_filter, run_reporter, run_scanner, run_target, Runner};
