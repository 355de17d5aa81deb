//! Error types for each boundary.

use crate::response::Response;
use thiserror::Error;

/// Executor invocation errors — what the collaborator behind
/// [`crate::Executor`] can report.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// The executor ran and failed.
    #[error("executor failed: {0}")]
    Failed(String),

    /// The executor rejected the action as unsupported.
    #[error("unsupported action: {0}")]
    UnsupportedAction(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Everything that can stop a request between submission and a routed
/// execution. Each variant converts into a well-formed failure
/// [`Response`]; none of them ever crosses the dispatcher boundary raw.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Malformed request, rejected before any component was consulted.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// The target executor is health-gated.
    #[error("circuit breaker open: executor {0} is temporarily unavailable")]
    CircuitOpen(String),

    /// The policy engine denied the request.
    #[error("denied by policy: {0}")]
    PolicyDenied(String),

    /// The executor is unknown to the registry.
    #[error("executor not found: {0}")]
    NotFound(String),

    /// The executor ran and failed.
    #[error("executor error: {0}")]
    Executor(#[from] ExecutorError),

    /// The executor did not complete within the dispatch timeout.
    #[error("executor timed out after {0}ms")]
    Timeout(u64),

    /// The request's priority lane was at capacity.
    #[error("queue full for priority {0}")]
    QueueFull(String),

    /// Submitted while the dispatcher was not accepting requests.
    #[error("dispatcher not accepting requests: {0}")]
    NotAccepting(String),

    /// Unexpected failure inside the dispatcher's own bookkeeping.
    #[error("internal dispatch error: {0}")]
    Internal(String),
}

impl From<&DispatchError> for Response {
    fn from(err: &DispatchError) -> Self {
        Response::failure(err.to_string())
    }
}

impl From<DispatchError> for Response {
    fn from(err: DispatchError) -> Self {
        Response::from(&err)
    }
}

/// Audit sink errors. These are counted and logged but never fail the
/// request being audited.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AuditError {
    /// The write was rejected or lost.
    #[error("audit write failed: {0}")]
    WriteFailed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
