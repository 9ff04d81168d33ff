//! Run context
//!
//! A [`Context`] flows unchanged through every store and stage call of a run.
//! It carries two things:
//! - a cancellation signal, observed cooperatively by callees
//! - the logger bound to the run
//!
//! Contexts form a tree. A child derived with [`Context::with_cancel`] is
//! cancelled when its own handle fires or when any ancestor is cancelled;
//! cancelling a child never affects the parent.

use crate::error::Cancelled;
use crate::logger::Logger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Node {
    parent: Option<Context>,
    cancelled: Option<Arc<AtomicBool>>,
    logger: Option<Logger>,
}

/// Cancellable context carrying the run's logger
///
/// Cloning is cheap and clones observe the same cancellation state.
#[derive(Debug, Clone)]
pub struct Context {
    node: Arc<Node>,
}

/// Handle that cancels the context it was created with
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel the associated context and all of its descendants
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}

impl Context {
    /// Root context: never cancelled, no logger
    pub fn background() -> Self {
        Context {
            node: Arc::new(Node {
                parent: None,
                cancelled: None,
                logger: None,
            }),
        }
    }

    /// Derive a child context that can be cancelled independently
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let child = Context {
            node: Arc::new(Node {
                parent: Some(self.clone()),
                cancelled: Some(flag.clone()),
                logger: None,
            }),
        };
        (child, CancelHandle { flag })
    }

    /// Derive a child context bound to `logger`
    pub fn with_logger(&self, logger: Logger) -> Context {
        Context {
            node: Arc::new(Node {
                parent: Some(self.clone()),
                cancelled: None,
                logger: Some(logger),
            }),
        }
    }

    /// Check whether this context or any ancestor has been cancelled
    pub fn is_cancelled(&self) -> bool {
        let mut node = Some(self);
        while let Some(ctx) = node {
            if let Some(flag) = &ctx.node.cancelled {
                if flag.load(Ordering::Acquire) {
                    return true;
                }
            }
            node = ctx.node.parent.as_ref();
        }
        false
    }

    /// `Err(Cancelled)` once the context is cancelled
    pub fn err(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// The nearest logger bound to this context or an ancestor
    pub fn logger(&self) -> Option<&Logger> {
        let mut node = Some(self);
        while let Some(ctx) = node {
            if let Some(logger) = &ctx.node.logger {
                return Some(logger);
            }
            node = ctx.node.parent.as_ref();
        }
        None
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::background()
    }
}
