//! In-memory finding store
//!
//! # Design
//!
//! - [`MemoryStore`]: shared backing data, cheap to clone
//! - DashMap keyed by InstanceId: each run gets its own shard
//! - Shard: findings in insertion order plus the next id to hand out
//! - [`MemorySession`]: the `Storer` handed to one run, with its own closed
//!   flag; closing a session leaves the data and other sessions untouched
//!
//! # Update semantics
//!
//! `update` replaces the instance's sequence with the supplied one. Every
//! supplied id must already exist; stored findings absent from the update are
//! dropped. This is how a filter's removals reach the store.

use crate::error::StoreError;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use vulnflow_core::{
    BoxError, Closer, Context, Finding, FindingId, InstanceId, QueryOpts, ReadOutcome, Reader,
    Updater, Validator, VulnerabilityFinding, Writer,
};

/// Per-instance shard
#[derive(Debug, Default)]
struct Shard {
    findings: Vec<VulnerabilityFinding>,
    next_id: u64,
}

impl Shard {
    fn allocate_id(&mut self) -> FindingId {
        self.next_id += 1;
        FindingId(self.next_id)
    }
}

/// Thread-safe in-memory finding data shared by any number of sessions
///
/// # Example
///
/// ```
/// use vulnflow_core::{Closer, Context, Finding, InstanceId, Reader, Writer};
/// use vulnflow_storage::MemoryStore;
///
/// let store = MemoryStore::new();
/// let ctx = Context::background();
/// let instance = InstanceId::new();
///
/// let writer = store.session();
/// writer.write(&ctx, instance, &[Finding::new(serde_json::json!({"rule": "xss"}))]).unwrap();
/// writer.close(&ctx).unwrap();
///
/// let reader = store.session();
/// assert_eq!(reader.read(&ctx, instance, None).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shards: Arc<DashMap<InstanceId, Shard>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for one run
    pub fn session(&self) -> MemorySession {
        MemorySession {
            shards: self.shards.clone(),
            closed: AtomicBool::new(false),
        }
    }

    /// Copy of the findings currently held for `instance_id`, in store order
    pub fn findings(&self, instance_id: InstanceId) -> Vec<VulnerabilityFinding> {
        self.shards
            .get(&instance_id)
            .map(|shard| shard.findings.clone())
            .unwrap_or_default()
    }

    /// Number of instances with at least one write
    pub fn instance_count(&self) -> usize {
        self.shards.len()
    }
}

/// A run's handle on a [`MemoryStore`]
///
/// Once closed, every operation except close fails with
/// [`StoreError::Closed`]. Close is idempotent.
#[derive(Debug)]
pub struct MemorySession {
    shards: Arc<DashMap<InstanceId, Shard>>,
    closed: AtomicBool,
}

impl MemorySession {
    /// Check if [`Closer::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn check_open(&self, ctx: &Context) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        ctx.err()?;
        Ok(())
    }

    fn read_inner(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        query: Option<&QueryOpts>,
    ) -> Result<ReadOutcome, StoreError> {
        self.check_open(ctx)?;

        let shard = match self.shards.get(&instance_id) {
            Some(shard) => shard,
            None => return Ok(ReadOutcome::NoFindingsFound),
        };

        let findings: Vec<VulnerabilityFinding> = match query {
            Some(opts) => shard
                .findings
                .iter()
                .filter(|f| opts.matches(f.id))
                .take(opts.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => shard.findings.clone(),
        };

        if findings.is_empty() {
            return Ok(ReadOutcome::NoFindingsFound);
        }
        debug!(instance_id = %instance_id, count = findings.len(), "read findings");
        Ok(ReadOutcome::Found(findings))
    }

    fn update_inner(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        findings: &[VulnerabilityFinding],
    ) -> Result<(), StoreError> {
        self.check_open(ctx)?;
        for f in findings {
            self.validate_inner(&f.finding)?;
        }

        let mut shard = match self.shards.get_mut(&instance_id) {
            Some(shard) => shard,
            None => {
                return match findings.first() {
                    Some(f) => Err(StoreError::UnknownFinding {
                        instance_id,
                        id: f.id,
                    }),
                    None => Ok(()),
                }
            }
        };
        let known: HashSet<FindingId> = shard.findings.iter().map(|f| f.id).collect();
        let mut seen = HashSet::with_capacity(findings.len());
        for f in findings {
            if !known.contains(&f.id) {
                return Err(StoreError::UnknownFinding {
                    instance_id,
                    id: f.id,
                });
            }
            if !seen.insert(f.id) {
                return Err(StoreError::DuplicateFinding(f.id));
            }
        }

        let dropped = shard.findings.len() - findings.len();
        shard.findings = findings.to_vec();
        debug!(
            instance_id = %instance_id,
            count = findings.len(),
            dropped,
            "updated findings"
        );
        Ok(())
    }

    fn write_inner(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        findings: &[Finding],
    ) -> Result<(), StoreError> {
        self.check_open(ctx)?;
        // All-or-nothing: reject the batch before touching the shard
        for f in findings {
            self.validate_inner(f)?;
        }

        let mut shard = self.shards.entry(instance_id).or_default();
        for f in findings {
            let id = shard.allocate_id();
            shard.findings.push(VulnerabilityFinding::new(id, f.clone()));
        }
        debug!(instance_id = %instance_id, count = findings.len(), "wrote findings");
        Ok(())
    }

    fn validate_inner(&self, finding: &Finding) -> Result<(), StoreError> {
        match finding.as_value() {
            serde_json::Value::Object(map) if !map.is_empty() => Ok(()),
            serde_json::Value::Object(_) => {
                Err(StoreError::Invalid("finding document is empty".to_string()))
            }
            other => Err(StoreError::Invalid(format!(
                "finding must be a JSON object, got {}",
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl Validator for MemorySession {
    fn validate(&self, finding: &Finding) -> Result<(), BoxError> {
        Ok(self.validate_inner(finding)?)
    }
}

impl Reader for MemorySession {
    fn read(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        query: Option<&QueryOpts>,
    ) -> Result<ReadOutcome, BoxError> {
        Ok(self.read_inner(ctx, instance_id, query)?)
    }
}

impl Updater for MemorySession {
    fn update(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        findings: &[VulnerabilityFinding],
    ) -> Result<(), BoxError> {
        Ok(self.update_inner(ctx, instance_id, findings)?)
    }
}

impl Writer for MemorySession {
    fn write(
        &self,
        ctx: &Context,
        instance_id: InstanceId,
        findings: &[Finding],
    ) -> Result<(), BoxError> {
        Ok(self.write_inner(ctx, instance_id, findings)?)
    }
}

impl Closer for MemorySession {
    fn close(&self, _ctx: &Context) -> Result<(), BoxError> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!("closed memory session");
        }
        Ok(())
    }
}
