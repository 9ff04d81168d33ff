//! Finding store contract
//!
//! The store is split into single-purpose capabilities that are composed into
//! [`Storer`], the handle the runner works against. Every operation is scoped
//! to an [`InstanceId`] and receives the run's [`Context`]; implementations are
//! expected to observe cancellation themselves.
//!
//! Any backend satisfying these traits is acceptable. Validating findings
//! before they are written is the store's job, not the runner's.

use crate::context::Context;
use crate::error::BoxError;
use crate::types::{Finding, InstanceId, QueryOpts, VulnerabilityFinding};

/// Outcome of a successful store read
///
/// "Nothing matched" is a distinguished outcome rather than an error, so
/// callers can tell an empty instance from a failed read by matching.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// Findings in store order (may still be empty)
    Found(Vec<VulnerabilityFinding>),
    /// The instance has no findings matching the query
    NoFindingsFound,
}

impl ReadOutcome {
    /// Collapse `NoFindingsFound` and an empty `Found` into `None`
    pub fn into_non_empty(self) -> Option<Vec<VulnerabilityFinding>> {
        match self {
            ReadOutcome::Found(findings) if !findings.is_empty() => Some(findings),
            _ => None,
        }
    }

    /// Number of findings carried
    pub fn len(&self) -> usize {
        match self {
            ReadOutcome::Found(findings) => findings.len(),
            ReadOutcome::NoFindingsFound => 0,
        }
    }

    /// Check if no findings are carried
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validates findings before they are persisted
pub trait Validator: Send + Sync {
    /// Return an error if `finding` must not be stored
    fn validate(&self, finding: &Finding) -> Result<(), BoxError>;
}

/// Reads findings from a store
pub trait Reader: Send + Sync {
    /// Read findings for `instance_id`; `None` means all of them
    fn read(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        query: Option<&QueryOpts>,
    ) -> Result<ReadOutcome, BoxError>;
}

/// Updates existing findings in place
pub trait Updater: Send + Sync {
    /// Replace the stored findings of `instance_id` with `findings`
    fn update(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        findings: &[VulnerabilityFinding],
    ) -> Result<(), BoxError>;
}

/// Writes newly discovered findings
pub trait Writer: Send + Sync {
    /// Insert `findings` for `instance_id`; the store assigns their ids
    fn write(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        findings: &[Finding],
    ) -> Result<(), BoxError>;
}

/// Releases the resources behind a store
pub trait Closer: Send + Sync {
    /// Close the store; must be safe to call after a prior error
    fn close(&self, ctx: &Context) -> Result<(), BoxError>;
}

/// Full store handle used by the runner
pub trait Storer: Validator + Reader + Updater + Writer + Closer {}

impl<T> Storer for T where T: Validator + Reader + Updater + Writer + Closer {}
