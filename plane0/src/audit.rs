//! Audit vocabulary — the append-only record of every routing decision.

use crate::error::AuditError;
use crate::id::{ExecutorId, RequestId};
use crate::priority::Priority;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// What the control plane decided about a request.
///
/// `Received` is written at submission; every request then gets exactly one
/// terminal decision, whatever its outcome.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditDecision {
    /// Request accepted into the queue; terminal entry follows.
    Received,
    /// Routed to the executor and executed successfully.
    Routed,
    /// Rejected before queuing: malformed request.
    InvalidRequest,
    /// Rejected before queuing: the target lane was at capacity.
    QueueFull,
    /// Rejected: submitted while the dispatcher was not accepting requests.
    RejectedShutdown,
    /// Short-circuited: the executor's circuit breaker is open.
    DeniedByCircuit,
    /// Short-circuited: the policy engine denied the request.
    DeniedByPolicy,
    /// The executor is unknown to the registry.
    ExecutorNotFound,
    /// The executor ran and failed, or timed out.
    ExecutorError,
    /// The dispatcher's own bookkeeping failed.
    InternalError,
}

impl AuditDecision {
    /// Whether this decision closes out the request (everything except
    /// [`AuditDecision::Received`]).
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AuditDecision::Received)
    }
}

/// One immutable record of one routing decision.
///
/// Never mutated or deleted by the control plane; retention and storage are
/// the audit sink's concern. The timestamp is unix milliseconds for a
/// stable wire format.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Correlates entries with the request and its response.
    pub request_id: RequestId,
    /// Target executor of the request.
    pub executor: ExecutorId,
    /// Scheduling tier of the request.
    pub priority: Priority,
    /// What the control plane decided.
    pub decision: AuditDecision,
    /// Unix timestamp in milliseconds when the entry was created.
    pub timestamp_ms: u64,
    /// One-line human-readable summary of the outcome.
    pub result_summary: String,
}

impl AuditEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        request_id: RequestId,
        executor: ExecutorId,
        priority: Priority,
        decision: AuditDecision,
        result_summary: impl Into<String>,
    ) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            request_id,
            executor,
            priority,
            decision,
            timestamp_ms,
            result_summary: result_summary.into(),
        }
    }
}

/// Accepts audit entries, append-only.
///
/// Fire-and-forget from the dispatcher's perspective: a failed write must
/// not block or fail the request it describes. The dispatcher counts failed
/// writes so the loss is observable.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append one entry.
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}
