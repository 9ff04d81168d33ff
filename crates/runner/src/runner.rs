//! Stage runner
//!
//! Every stage kind goes through the same template:
//!
//! 1. Configuration is validated when the [`RunnerConfig`] is built
//! 2. The store is acquired for the run
//! 3. Filters, enrichers and reporters read the instance's findings; nothing
//!    to read ends the run successfully without invoking the stage
//! 4. The capability method runs inside the panic containment boundary
//! 5. Scanners write, filters and enrichers update; reporters and targets
//!    persist nothing
//! 6. The store is closed exactly once, whatever happened before
//!
//! The first error of steps 1-5 is returned. A close failure is returned only
//! when nothing failed earlier; otherwise it is logged.
//!
//! The runner never inspects the context's cancellation state. It hands the
//! same context to every store and stage call and leaves it to them to
//! observe cancellation.

use crate::component::{Enricher, Filter, Reporter, Scanner, StageKind, Target};
use crate::config::{RunnerConfig, RunnerOption};
use crate::error::{Error, Result};
use crate::panic::{describe_payload, DefaultPanicHandler, PanicHandler};
use crate::session::StoreSession;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, info_span, warn};
use vulnflow_core::{logger_from_context, BoxError, Context};

/// Runs one component against the configured store
///
/// A runner is consumed by the run: configuration, and with it the store
/// handle, is released when the run returns.
pub struct Runner {
    config: RunnerConfig,
    panic_handler: Box<dyn PanicHandler>,
}

impl Runner {
    /// Create a runner with the default panic handler
    pub fn new(config: RunnerConfig) -> Self {
        Runner {
            config,
            panic_handler: Box::new(DefaultPanicHandler),
        }
    }

    /// Replace the panic handler
    pub fn with_panic_handler(mut self, handler: impl PanicHandler + 'static) -> Self {
        self.panic_handler = Box::new(handler);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a target: prepare, no store reads or writes
    pub fn run_target(self, ctx: &Context, target: &dyn Target) -> Result<()> {
        self.execute(ctx, StageKind::Target, |ctx, _session| {
            self.invoke(ctx, StageKind::Target, || target.prepare(ctx))
        })
    }

    /// Run a scanner: transform, then write the produced findings
    pub fn run_scanner(self, ctx: &Context, scanner: &dyn Scanner) -> Result<()> {
        self.execute(ctx, StageKind::Scanner, |ctx, session| {
            let findings = self.invoke(ctx, StageKind::Scanner, || scanner.transform(ctx))?;
            if findings.is_empty() {
                info!("scanner produced no findings, nothing to write");
                return Ok(());
            }
            session.write(StageKind::Scanner, &findings)
        })
    }

    /// Run a filter: read, filter, update when something was filtered out
    pub fn run_filter(self, ctx: &Context, filter: &dyn Filter) -> Result<()> {
        self.execute(ctx, StageKind::Filter, |ctx, session| {
            let findings = match session.read_all()? {
                Some(findings) => findings,
                None => return Ok(()),
            };
            let before = findings.len();
            let (filtered, changed) =
                self.invoke(ctx, StageKind::Filter, || filter.filter(ctx, findings))?;
            if !changed {
                info!("no findings were filtered out, skipping update");
                return Ok(());
            }
            info!(before, after = filtered.len(), "filtered findings");
            session.update(StageKind::Filter, &filtered)
        })
    }

    /// Run an enricher: read, annotate, update
    pub fn run_enricher(self, ctx: &Context, enricher: &dyn Enricher) -> Result<()> {
        self.execute(ctx, StageKind::Enricher, |ctx, session| {
            let findings = match session.read_all()? {
                Some(findings) => findings,
                None => return Ok(()),
            };
            let annotated =
                self.invoke(ctx, StageKind::Enricher, || enricher.annotate(ctx, findings))?;
            session.update(StageKind::Enricher, &annotated)
        })
    }

    /// Run a reporter: read, report
    pub fn run_reporter(self, ctx: &Context, reporter: &dyn Reporter) -> Result<()> {
        self.execute(ctx, StageKind::Reporter, |ctx, session| {
            let findings = match session.read_all()? {
                Some(findings) => findings,
                None => return Ok(()),
            };
            self.invoke(ctx, StageKind::Reporter, || reporter.report(ctx, &findings))
        })
    }

    /// Acquire the store, run `body`, release the store
    fn execute<F>(&self, ctx: &Context, kind: StageKind, body: F) -> Result<()>
    where
        F: FnOnce(&Context, &StoreSession<'_>) -> Result<()>,
    {
        let logger = match self.config.logger() {
            Some(logger) => logger.clone(),
            None => logger_from_context(ctx),
        };
        let ctx = ctx.with_logger(logger.clone());
        let component = self.config.component_name();
        let instance_id = self.config.instance_id();

        logger.in_scope(|| {
            let span = info_span!(
                "component",
                component = %component,
                kind = %kind,
                instance_id = %instance_id
            );
            let _guard = span.enter();
            info!("starting component");

            let session =
                StoreSession::open(&ctx, self.config.storer().as_ref(), component, instance_id);
            let result = body(&ctx, &session);
            let closed = session.release();

            let result = match (result, closed) {
                (Ok(()), Ok(())) => Ok(()),
                (Ok(()), Err(source)) => Err(Error::Close {
                    component: component.to_string(),
                    source,
                }),
                (Err(e), Ok(())) => Err(e),
                (Err(e), Err(close_err)) => {
                    error!(error = %close_err, "could not close store after failure");
                    Err(e)
                }
            };

            match &result {
                Ok(()) => info!("component completed"),
                Err(e) => error!(error = %e, "component failed"),
            }
            result
        })
    }

    /// Call a capability method inside the panic containment boundary
    fn invoke<T, F>(&self, ctx: &Context, kind: StageKind, call: F) -> Result<T>
    where
        F: FnOnce() -> std::result::Result<T, BoxError>,
    {
        debug!("invoking {}", kind);
        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(Error::Stage {
                component: self.config.component_name().to_string(),
                kind,
                source,
            }),
            Err(payload) => {
                let message = describe_payload(payload.as_ref());
                let outcome = self.panic_handler.handle_panic(ctx, payload);
                if !outcome.fatal {
                    warn!(message = %message, "panic classified as non-fatal, reporting it anyway");
                }
                Err(Error::Panicked {
                    component: self.config.component_name().to_string(),
                    kind,
                    fatal: outcome.fatal,
                    message,
                    source: outcome.error,
                })
            }
        }
    }
}

/// Run a target with the given options
pub fn run_target(
    ctx: &Context,
    target: &dyn Target,
    options: impl IntoIterator<Item = RunnerOption>,
) -> Result<()> {
    Runner::new(RunnerConfig::from_options(options)?).run_target(ctx, target)
}

/// Run a scanner with the given options
pub fn run_scanner(
    ctx: &Context,
    scanner: &dyn Scanner,
    options: impl IntoIterator<Item = RunnerOption>,
) -> Result<()> {
    Runner::new(RunnerConfig::from_options(options)?).run_scanner(ctx, scanner)
}

/// Run a filter with the given options
pub fn run_filter(
    ctx: &Context,
    filter: &dyn Filter,
    options: impl IntoIterator<Item = RunnerOption>,
) -> Result<()> {
    Runner::new(RunnerConfig::from_options(options)?).run_filter(ctx, filter)
}

/// Run an enricher with the given options
pub fn run_enricher(
    ctx: &Context,
    enricher: &dyn Enricher,
    options: impl IntoIterator<Item = RunnerOption>,
) -> Result<()> {
    Runner::new(RunnerConfig::from_options(options)?).run_enricher(ctx, enricher)
}

/// Run a reporter with the given options
pub fn run_reporter(
    ctx: &Context,
    reporter: &dyn Reporter,
    options: impl IntoIterator<Item = RunnerOption>,
) -> Result<()> {
    Runner::new(RunnerConfig::from_options(options)?).run_reporter(ctx, reporter)
}
