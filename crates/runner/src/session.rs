//! Store session scoped to one run
//!
//! [`StoreSession`] is the runner's only way to touch the store. It attaches
//! the component name and instance to every store error, and guarantees the
//! store is closed exactly once: explicitly through [`StoreSession::release`],
//! or by `Drop` when a panic unwinds through the runner before release.

use crate::component::StageKind;
use crate::error::{Error, PersistOp, Result};
use tracing::{debug, error, warn};
use vulnflow_core::{
    BoxError, Context, Finding, InstanceId, ReadOutcome, Storer, VulnerabilityFinding,
};

pub(crate) struct StoreSession<'a> {
    ctx: &'a Context,
    store: &'a dyn Storer,
    component: &'a str,
    instance_id: InstanceId,
    released: bool,
}

impl<'a> StoreSession<'a> {
    pub(crate) fn open(
        ctx: &'a Context,
        store: &'a dyn Storer,
        component: &'a str,
        instance_id: InstanceId,
    ) -> Self {
        StoreSession {
            ctx,
            store,
            component,
            instance_id,
            released: false,
        }
    }

    /// Read every finding of the instance
    ///
    /// `Ok(None)` when the store reports no findings or returns an empty set.
    pub(crate) fn read_all(&self) -> Result<Option<Vec<VulnerabilityFinding>>> {
        debug!("reading findings");
        let outcome = self
            .store
            .read(self.ctx, self.instance_id, None)
            .map_err(|source| Error::Read {
                component: self.component.to_string(),
                instance_id: self.instance_id,
                source,
            })?;

        if let ReadOutcome::NoFindingsFound = outcome {
            debug!("store reported no findings");
        }
        let findings = outcome.into_non_empty();
        match &findings {
            Some(findings) => debug!(count = findings.len(), "read findings"),
            None => debug!("no findings to process"),
        }
        Ok(findings)
    }

    pub(crate) fn update(&self, kind: StageKind, findings: &[VulnerabilityFinding]) -> Result<()> {
        debug!(count = findings.len(), "updating findings");
        self.store
            .update(self.ctx, self.instance_id, findings)
            .map_err(|source| self.persist_error(kind, PersistOp::Update, source))
    }

    pub(crate) fn write(&self, kind: StageKind, findings: &[Finding]) -> Result<()> {
        debug!(count = findings.len(), "writing findings");
        self.store
            .write(self.ctx, self.instance_id, findings)
            .map_err(|source| self.persist_error(kind, PersistOp::Write, source))
    }

    /// Close the store, returning its error
    pub(crate) fn release(mut self) -> std::result::Result<(), BoxError> {
        self.released = true;
        debug!("closing store");
        self.store.close(self.ctx)
    }

    fn persist_error(&self, kind: StageKind, op: PersistOp, source: BoxError) -> Error {
        Error::Persist {
            component: self.component.to_string(),
            kind,
            op,
            instance_id: self.instance_id,
            source,
        }
    }
}

impl Drop for StoreSession<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        warn!("store session dropped without release, closing store");
        if let Err(e) = self.store.close(self.ctx) {
            error!(error = %e, "could not close store");
        }
    }
}
