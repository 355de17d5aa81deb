//! # plane0 — Protocol types for the axon control plane
//!
//! This crate defines the vocabulary shared by every axon component and the
//! three collaborator boundaries the control plane talks across.
//!
//! ## The Vocabulary
//!
//! | Concern | Types |
//! |---------|-------|
//! | Identity | [`ExecutorId`], [`RequestId`] |
//! | Requests | [`Request`], [`Priority`] |
//! | Results | [`Response`], [`Invocation`] |
//! | Executor metadata | [`ExecutorDescriptor`], [`ExecutorCategory`], [`ExecutorStatus`] |
//! | Policy | [`PolicyDecision`], [`RuleSet`], [`Rule`] |
//! | Audit | [`AuditEntry`], [`AuditDecision`] |
//!
//! ## The Collaborator Traits
//!
//! | Trait | Who implements it |
//! |-------|-------------------|
//! | [`Executor`] | Domain logic invoked by the dispatcher |
//! | [`RuleSource`] | Whatever supplies the current policy rule set |
//! | [`AuditSink`] | Whatever records routing decisions |
//!
//! ## Design Principle
//!
//! The control plane never sees inside a payload or a result. Opaque data
//! fields are `serde_json::Value` — the same interchange choice the rest of
//! the agent ecosystem makes — so executors of any domain plug in without
//! the protocol layer growing domain types.
//!
//! Every error that can cross the dispatcher boundary is an enum variant in
//! [`error`], and every one of them converts into a well-formed failure
//! [`Response`]. Callers always get a structured result, never a bare fault.

#![deny(missing_docs)]

pub mod audit;
pub mod duration;
pub mod error;
pub mod executor;
pub mod id;
pub mod policy;
pub mod priority;
pub mod request;
pub mod response;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use audit::{AuditDecision, AuditEntry, AuditSink};
pub use duration::DurationMs;
pub use error::{AuditError, DispatchError, ExecutorError};
pub use executor::{Executor, Invocation};
pub use id::{ExecutorId, RequestId};
pub use policy::{PolicyDecision, Rule, RuleAction, RuleMatch, RuleSet, RuleSource};
pub use priority::Priority;
pub use request::{ExecutorCategory, ExecutorDescriptor, ExecutorStatus, Request};
pub use response::Response;
