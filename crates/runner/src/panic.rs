//! Panic containment around stage invocations
//!
//! The runner catches a panic raised by a stage's capability method and asks
//! a [`PanicHandler`] to classify the payload. Whatever the handler decides,
//! the run reports the panic through its normal error value; the handler only
//! extracts the carried error (if any) and flags the panic as fatal or not.
//!
//! Stages that want their panic to carry a typed error should raise it with
//! [`panic_with_error`]. A payload of type `Box<dyn Error + Send>` is also
//! recognized, but only its message survives since it is not `Sync`. A
//! concrete error type passed to `panic_any` cannot be recovered.

use std::any::Any;
use std::error::Error as StdError;
use std::backtrace::Backtrace;
use tracing::error;
use vulnflow_core::{BoxError, Context};

/// Classification of a recovered panic
#[derive(Debug)]
pub struct PanicOutcome {
    /// Error carried by the panic payload, when it carried one
    pub error: Option<BoxError>,
    /// Whether the run must stop
    pub fatal: bool,
}

/// Contract for handling a recovered panic
pub trait PanicHandler: Send + Sync {
    /// Turn a panic payload into an optional error and a fatal flag
    fn handle_panic(&self, ctx: &Context, payload: Box<dyn Any + Send>) -> PanicOutcome;
}

/// Default policy: every panic is fatal
///
/// An error payload is returned as the cause and logged with a stack trace.
/// Any other payload yields no error but is still fatal.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPanicHandler;

impl PanicHandler for DefaultPanicHandler {
    fn handle_panic(&self, _ctx: &Context, payload: Box<dyn Any + Send>) -> PanicOutcome {
        match payload_error(payload) {
            Ok(err) => {
                error!(
                    error = %err,
                    panic_stack_trace = %Backtrace::force_capture(),
                    "received a panic, check the stack trace for more information"
                );
                PanicOutcome {
                    error: Some(err),
                    fatal: true,
                }
            }
            Err(other) => {
                error!(
                    payload = %describe_payload(other.as_ref()),
                    "received a panic without an error payload"
                );
                PanicOutcome {
                    error: None,
                    fatal: true,
                }
            }
        }
    }
}

/// Extract the error carried by a panic payload, or hand the payload back
fn payload_error(payload: Box<dyn Any + Send>) -> Result<BoxError, Box<dyn Any + Send>> {
    let payload = match payload.downcast::<BoxError>() {
        Ok(err) => return Ok(*err),
        Err(payload) => payload,
    };
    match payload.downcast::<Box<dyn StdError + Send>>() {
        Ok(err) => Ok(BoxError::from(err.to_string())),
        Err(payload) => Err(payload),
    }
}

/// Panic with `err` as the payload so the handler can recover it as an error
pub fn panic_with_error<E>(err: E) -> !
where
    E: Into<BoxError>,
{
    let err: BoxError = err.into();
    std::panic::panic_any(err)
}

/// Human-readable description of a panic payload
pub fn describe_payload(payload: &(dyn Any + Send)) -> String {
    if let Some(err) = payload.downcast_ref::<BoxError>() {
        err.to_string()
    } else if let Some(err) = payload.downcast_ref::<Box<dyn StdError + Send>>() {
        err.to_string()
    } else if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-error panic payload".to_string()
    }
}
