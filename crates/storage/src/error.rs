//! Errors raised by the in-memory store.

use thiserror::Error;
use vulnflow_core::{Cancelled, FindingId, InstanceId};

/// Failures of [`MemoryStore`](crate::MemoryStore) operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store was closed before the operation
    #[error("store is closed")]
    Closed,

    /// The caller's context was cancelled
    #[error("store operation cancelled")]
    Cancelled(#[from] Cancelled),

    /// An update referenced a finding the instance does not hold
    #[error("finding {id} does not exist for instance {instance_id}")]
    UnknownFinding {
        /// Instance addressed by the update
        instance_id: InstanceId,
        /// Offending id
        id: FindingId,
    },

    /// The same id appears more than once in an update
    #[error("finding {0} appears more than once in update")]
    DuplicateFinding(FindingId),

    /// A finding failed validation
    #[error("invalid finding: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Check if this is a closed-store error
    pub fn is_closed(&self) -> bool {
        matches!(self, StoreError::Closed)
    }

    /// Check if this is a validation error
    pub fn is_invalid(&self) -> bool {
        matches!(self, StoreError::Invalid(_))
    }
}
