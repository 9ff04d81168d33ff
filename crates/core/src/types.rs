//! Core types for vulnflow
//!
//! This module defines the foundational types used throughout the runtime:
//! - [`InstanceId`]: Unique identifier for one pipeline execution
//! - [`FindingId`]: Store-assigned identifier of a persisted finding
//! - [`Finding`]: Opaque finding payload produced by scanners
//! - [`VulnerabilityFinding`]: A finding as persisted in the store
//! - [`QueryOpts`]: Optional criteria for store reads

use crate::error::InvalidInstanceId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a run instance (one pipeline execution)
///
/// Every store operation is addressed to an instance. The id is assigned once
/// before the run starts and never regenerated while the run is in progress.
///
/// # Examples
///
/// ```
/// use vulnflow_core::types::InstanceId;
///
/// let id1 = InstanceId::new();
/// let id2 = InstanceId::new();
/// assert_ne!(id1, id2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    /// Create a new random InstanceId using UUID v4
    pub fn new() -> Self {
        InstanceId(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        InstanceId(uuid)
    }

    /// Create InstanceId from raw bytes
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        InstanceId(Uuid::from_bytes(bytes))
    }

    /// Get raw bytes representation
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceId {
    type Err = InvalidInstanceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(InstanceId)
            .map_err(|source| InvalidInstanceId {
                input: s.to_string(),
                source,
            })
    }
}

/// Store-assigned identifier of a persisted finding, unique within an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FindingId(pub u64);

impl std::fmt::Display for FindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finding payload as produced by a scanner
///
/// The runtime never looks inside: the schema belongs to the scanners that
/// produce it and the store that persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Finding(pub serde_json::Value);

impl Finding {
    /// Wrap a JSON document
    pub fn new(value: serde_json::Value) -> Self {
        Finding(value)
    }

    /// Borrow the underlying document
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consume and return the underlying document
    pub fn into_value(self) -> serde_json::Value {
        self.0
    }
}

impl From<serde_json::Value> for Finding {
    fn from(value: serde_json::Value) -> Self {
        Finding(value)
    }
}

/// A finding persisted in the store for some instance
///
/// Filters, enrichers and reporters operate on these. Order matters: the
/// sequence returned by a read is the sequence handed to the stage and, after
/// processing, back to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityFinding {
    /// Store-assigned id
    pub id: FindingId,
    /// The finding payload
    pub finding: Finding,
}

impl VulnerabilityFinding {
    /// Create a new stored finding
    pub fn new(id: FindingId, finding: Finding) -> Self {
        VulnerabilityFinding { id, finding }
    }
}

/// Optional criteria for reading findings
///
/// Passing `None` to a read means "all findings for this instance".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOpts {
    /// Restrict the result to these ids (empty = no restriction)
    pub ids: Vec<FindingId>,
    /// Maximum number of findings returned, applied after id filtering
    pub limit: Option<usize>,
}

impl QueryOpts {
    /// Restrict to the given ids
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = FindingId>) -> Self {
        self.ids = ids.into_iter().collect();
        self
    }

    /// Cap the number of findings returned
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check whether a finding id passes the id restriction
    pub fn matches(&self, id: FindingId) -> bool {
        self.ids.is_empty() || self.ids.contains(&id)
    }
}
