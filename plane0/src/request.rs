//! Request and executor-descriptor types.

use crate::id::{ExecutorId, RequestId};
use crate::priority::Priority;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Broad role of an executor, used for reporting and policy matching.
/// The control plane never branches on category itself.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorCategory {
    /// Safety- or life-critical executors.
    Critical,
    /// Day-to-day operational executors.
    Operational,
    /// Forecasting / scoring executors.
    Predictive,
    /// Executors that coordinate other executors.
    Coordination,
}

/// Registration lifecycle status of an executor.
///
/// Informational metadata owned by the registry. Routing is governed by
/// registration presence and circuit state, not by this flag — take an
/// executor out of rotation by deregistering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorStatus {
    /// Registered and in service.
    Active,
    /// Registered but administratively parked.
    Inactive,
}

/// Identity and metadata for one registered executor.
///
/// Owned exclusively by the registry; everything else sees clones.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorDescriptor {
    /// Unique executor id.
    pub id: ExecutorId,
    /// Human-readable name.
    pub name: String,
    /// Broad role of the executor.
    pub category: ExecutorCategory,
    /// Registration lifecycle status.
    pub status: ExecutorStatus,
    /// Opaque extension metadata that passes through unchanged.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl ExecutorDescriptor {
    /// Create an active descriptor with empty metadata.
    pub fn new(
        id: impl Into<ExecutorId>,
        name: impl Into<String>,
        category: ExecutorCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            status: ExecutorStatus::Active,
            metadata: serde_json::Value::Null,
        }
    }

    /// Override the lifecycle status.
    pub fn with_status(mut self, status: ExecutorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach opaque metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

// Process-local counter for generated request ids. Requests are unique per
// process; callers that need global uniqueness supply their own id.
static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

/// One typed action request.
///
/// Immutable once constructed. The caller owns it until it is handed to the
/// dispatcher; from then on the in-flight processing context does.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    /// Target executor.
    pub executor: ExecutorId,
    /// Command name the executor should perform.
    pub action: String,
    /// Opaque structured payload for the executor.
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Scheduling tier.
    pub priority: Priority,
    /// Unique id for correlation across response and audit trail.
    pub request_id: RequestId,
}

impl Request {
    /// Create a medium-priority request with a generated request id and a
    /// null payload.
    pub fn new(executor: impl Into<ExecutorId>, action: impl Into<String>) -> Self {
        let n = NEXT_REQUEST.fetch_add(1, Ordering::Relaxed);
        Self {
            executor: executor.into(),
            action: action.into(),
            payload: serde_json::Value::Null,
            priority: Priority::Medium,
            request_id: RequestId::new(format!("req-{n}")),
        }
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Set the scheduling tier.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Use a caller-supplied request id instead of the generated one.
    pub fn with_request_id(mut self, id: impl Into<RequestId>) -> Self {
        self.request_id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_request_ids_are_unique() {
        let a = Request::new("exec", "do");
        let b = Request::new("exec", "do");
        assert_ne!(a.request_id, b.request_id);
    }

    #[test]
    fn reregistration_style_builder() {
        let d = ExecutorDescriptor::new("bed_orchestrator", "Bed Orchestrator", ExecutorCategory::Critical)
            .with_status(ExecutorStatus::Inactive)
            .with_metadata(serde_json::json!({"ward": "east"}));
        assert_eq!(d.status, ExecutorStatus::Inactive);
        assert_eq!(d.metadata["ward"], "east");
    }
}
