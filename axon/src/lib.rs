#![deny(missing_docs)]
//! # axon — umbrella crate
//!
//! Single import surface for the axon control plane. Re-exports the
//! protocol crate and component implementations behind feature flags,
//! plus a `prelude` for the happy path.

#[cfg(feature = "audit")]
pub use axon_audit;
#[cfg(feature = "dispatch")]
pub use axon_dispatch;
#[cfg(feature = "health")]
pub use axon_health;
#[cfg(feature = "policy")]
pub use axon_policy;
#[cfg(feature = "registry")]
pub use axon_registry;
#[cfg(feature = "core")]
pub use plane0;

/// Happy-path imports for wiring a control plane.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use plane0::{
        AuditDecision, AuditEntry, AuditSink, DispatchError, DurationMs, Executor,
        ExecutorCategory, ExecutorDescriptor, ExecutorId, ExecutorStatus, Invocation,
        PolicyDecision, Priority, Request, RequestId, Response, Rule, RuleAction, RuleMatch,
        RuleSet, RuleSource,
    };

    #[cfg(feature = "registry")]
    pub use axon_registry::ExecutorRegistry;

    #[cfg(feature = "health")]
    pub use axon_health::{CircuitBreakerConfig, CircuitBreakerManager, CircuitPhase};

    #[cfg(feature = "policy")]
    pub use axon_policy::{PolicyEngine, SharedRules, StaticRules};

    #[cfg(feature = "audit")]
    pub use axon_audit::{MemoryAuditSink, TracingAuditSink};

    #[cfg(feature = "dispatch")]
    pub use axon_dispatch::{Dispatcher, DispatcherConfig, PendingResponse};
}
