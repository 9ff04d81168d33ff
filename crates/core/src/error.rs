//! Error types shared by the store contract and stage components.

use thiserror::Error;

/// Error type returned by collaborators: stores and stage components
///
/// The runtime treats these as opaque causes and wraps them with the step
/// and component that produced them.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Returned by [`Context::err`](crate::context::Context::err) once the
/// context has been cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("context cancelled")]
pub struct Cancelled;

/// An instance id that could not be parsed
#[derive(Debug, Error)]
#[error("invalid instance id {input:?}: {source}")]
pub struct InvalidInstanceId {
    /// The rejected input
    pub input: String,
    /// Underlying parse failure
    #[source]
    pub source: uuid::Error,
}
