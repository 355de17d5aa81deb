//! The Executor boundary — the unit of domain logic the dispatcher invokes.

use crate::error::ExecutorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What a successful executor invocation produced.
#[non_exhaustive]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invocation {
    /// Opaque result data.
    pub data: serde_json::Value,
    /// Confidence score in `[0, 1]`, when the executor reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Invocation {
    /// Result data with no confidence score.
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data,
            confidence: None,
        }
    }

    /// Attach a confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// An opaque capability the dispatcher invokes to perform one action.
///
/// The control plane knows nothing about what an executor does — a bed
/// allocator, an ambulance router and a mock in a test all implement the
/// same trait. Invocations must be side-effect-complete when they return;
/// the dispatcher bounds them with a timeout and records the outcome
/// against the executor's circuit, but never retries.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Perform `action` against `payload`.
    ///
    /// Errors are recorded as circuit-breaker failures and surfaced to the
    /// caller; they must describe what went wrong.
    async fn invoke(
        &self,
        action: &str,
        payload: &serde_json::Value,
    ) -> Result<Invocation, ExecutorError>;
}
