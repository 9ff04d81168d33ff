//! Capability contracts for pipeline stages
//!
//! Each stage kind exposes exactly one method. A concrete component
//! implements one of these traits and is handed to the matching runner entry
//! point; the runner never depends on a concrete type.
//!
//! # Panics
//!
//! A panic inside any capability method is contained and reported as
//! [`Error::Panicked`](crate::Error::Panicked). To make the panic carry its
//! cause, raise it with [`panic_with_error`](crate::panic_with_error); the
//! error is then reachable through
//! [`Error::find_cause`](crate::Error::find_cause). A concrete error passed
//! straight to `std::panic::panic_any` is reported without its cause.

use vulnflow_core::{BoxError, Context, Finding, VulnerabilityFinding};

/// Prepares the workflow environment (fetching and extracting sources, ...)
///
/// Panics carrying an error must use [`panic_with_error`](crate::panic_with_error).
pub trait Target: Send + Sync {
    /// Prepare the target to be scanned
    fn prepare(&self, ctx: &Context) -> Result<(), BoxError>;
}

/// Turns a scan's raw results into findings
///
/// Panics carrying an error must use [`panic_with_error`](crate::panic_with_error).
pub trait Scanner: Send + Sync {
    /// Transform raw scan data into findings
    fn transform(&self, ctx: &Context) -> Result<Vec<Finding>, BoxError>;
}

/// Filters out findings by some criteria
///
/// Panics carrying an error must use [`panic_with_error`](crate::panic_with_error).
pub trait Filter: Send + Sync {
    /// Return the retained findings and whether anything was removed
    fn filter(
        &self,
        ctx: &Context,
        findings: Vec<VulnerabilityFinding>,
    ) -> Result<(Vec<VulnerabilityFinding>, bool), BoxError>;
}

/// Enriches findings with extra context
///
/// Panics carrying an error must use [`panic_with_error`](crate::panic_with_error).
pub trait Enricher: Send + Sync {
    /// Annotate findings
    fn annotate(
        &self,
        ctx: &Context,
        findings: Vec<VulnerabilityFinding>,
    ) -> Result<Vec<VulnerabilityFinding>, BoxError>;
}

/// Reports findings to an external destination (chat, ticketing, ...)
///
/// Panics carrying an error must use [`panic_with_error`](crate::panic_with_error).
pub trait Reporter: Send + Sync {
    /// Report findings
    fn report(&self, ctx: &Context, findings: &[VulnerabilityFinding]) -> Result<(), BoxError>;
}

/// The five stage kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// [`Target`]
    Target,
    /// [`Scanner`]
    Scanner,
    /// [`Filter`]
    Filter,
    /// [`Enricher`]
    Enricher,
    /// [`Reporter`]
    Reporter,
}

impl StageKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Target => "target",
            StageKind::Scanner => "scanner",
            StageKind::Filter => "filter",
            StageKind::Enricher => "enricher",
            StageKind::Reporter => "reporter",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
