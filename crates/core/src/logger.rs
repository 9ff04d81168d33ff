//! Logger bound to a run context
//!
//! A [`Logger`] wraps a `tracing` dispatcher. The runtime never installs a
//! global subscriber: the logger travels with the [`Context`] and is scoped
//! around the code that runs on behalf of a component, so stage code simply
//! uses the `tracing` macros.

use crate::context::Context;
use tracing::subscriber::NoSubscriber;
use tracing::Dispatch;

/// Structured logger sink
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Wrap an existing dispatcher
    pub fn new(dispatch: Dispatch) -> Self {
        Logger { dispatch }
    }

    /// Build a logger from any `tracing` subscriber
    pub fn from_subscriber<S>(subscriber: S) -> Self
    where
        S: tracing::Subscriber + Send + Sync + 'static,
    {
        Logger::new(Dispatch::new(subscriber))
    }

    /// A logger that discards everything
    pub fn noop() -> Self {
        Logger::new(Dispatch::new(NoSubscriber::default()))
    }

    /// Run `f` with this logger as the thread's default dispatcher
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::noop()
    }
}

/// Get the logger bound to `ctx`, falling back to a no-op logger
pub fn logger_from_context(ctx: &Context) -> Logger {
    ctx.logger().cloned().unwrap_or_else(Logger::noop)
}
