//! Runner error types.
//!
//! A run returns a single [`Error`]. Each variant names the step that failed
//! and the component it failed in; collaborator errors are kept as the
//! `source()` so callers can look for a specific cause with
//! [`Error::find_cause`].

use crate::component::StageKind;
use thiserror::Error;
use vulnflow_core::{BoxError, InstanceId};

/// Which persistence call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOp {
    /// Writing newly produced findings
    Write,
    /// Updating existing findings
    Update,
}

impl std::fmt::Display for PersistOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistOp::Write => write!(f, "write"),
            PersistOp::Update => write!(f, "update"),
        }
    }
}

/// All runner errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration is incomplete or malformed; nothing was executed
    #[error("invalid runner configuration: {0}")]
    Config(String),

    /// The store failed to read findings
    #[error("{component}: could not read findings for instance {instance_id}: {source}")]
    Read {
        /// Component name
        component: String,
        /// Instance being read
        instance_id: InstanceId,
        /// Store error
        #[source]
        source: BoxError,
    },

    /// The stage's capability method returned an error
    #[error("{component}: {kind} failed: {source}")]
    Stage {
        /// Component name
        component: String,
        /// Stage kind
        kind: StageKind,
        /// Stage error
        #[source]
        source: BoxError,
    },

    /// The stage panicked and the panic was contained
    #[error("{component}: {kind} panicked: {message}")]
    Panicked {
        /// Component name
        component: String,
        /// Stage kind
        kind: StageKind,
        /// Whether the panic handler classified the panic as fatal
        fatal: bool,
        /// Description of the panic payload
        message: String,
        /// Error carried by the panic, if it carried one
        #[source]
        source: Option<BoxError>,
    },

    /// The store failed to persist the stage's output
    #[error("{component}: could not {op} findings for instance {instance_id}: {source}")]
    Persist {
        /// Component name
        component: String,
        /// Stage kind
        kind: StageKind,
        /// Failed operation
        op: PersistOp,
        /// Instance being written
        instance_id: InstanceId,
        /// Store error
        #[source]
        source: BoxError,
    },

    /// Closing the store failed after an otherwise successful run
    #[error("{component}: could not close store: {source}")]
    Close {
        /// Component name
        component: String,
        /// Store error
        #[source]
        source: BoxError,
    },
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Check if this error comes from a contained panic
    pub fn is_panic(&self) -> bool {
        matches!(self, Error::Panicked { .. })
    }

    /// Check if the store was at fault (read, persist or close)
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            Error::Read { .. } | Error::Persist { .. } | Error::Close { .. }
        )
    }

    /// Stage kind the error was raised in, when it is tied to one
    pub fn kind(&self) -> Option<StageKind> {
        match self {
            Error::Stage { kind, .. }
            | Error::Panicked { kind, .. }
            | Error::Persist { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Walk the `source()` chain looking for an error of type `E`
    ///
    /// This is the "is or wraps" check: it matches the error itself or any of
    /// its causes.
    pub fn find_cause<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        let mut current: Option<&(dyn std::error::Error + 'static)> = Some(self);
        while let Some(err) = current {
            if let Some(found) = err.downcast_ref::<E>() {
                return Some(found);
            }
            current = err.source();
        }
        None
    }
}
