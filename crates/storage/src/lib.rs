//! Storage layer for vulnflow
//!
//! This crate provides [`MemoryStore`] and its per-run [`MemorySession`], an
//! in-process implementation of the finding store contract:
//! - Per-instance shards in a DashMap, so runs never contend
//! - Store-assigned finding ids
//! - Validation before write
//! - Idempotent close, scoped to the session

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod memory;

pub use error::StoreError;
pub use memory::{MemorySession, MemoryStore};
