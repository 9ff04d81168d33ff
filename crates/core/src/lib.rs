//! Core types for vulnflow
//!
//! This crate holds everything the runner and store implementations share:
//! - Identifiers and finding types ([`types`])
//! - The run [`Context`] and its [`Logger`]
//! - The finding store contract ([`store`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod logger;
pub mod store;
pub mod types;

pub use context::{CancelHandle, Context};
pub use error::{BoxError, Cancelled, InvalidInstanceId};
pub use logger::{logger_from_context, Logger};
pub use store::{Closer, ReadOutcome, Reader, Storer, Updater, Validator, Writer};
pub use types::{Finding, FindingId, InstanceId, QueryOpts, VulnerabilityFinding};
