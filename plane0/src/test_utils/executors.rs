//! Mock executors: fixed results, fixed failures, call counting, ordering.

use crate::error::ExecutorError;
use crate::executor::{Executor, Invocation};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns the same result for every invocation.
pub struct StaticExecutor {
    data: serde_json::Value,
    confidence: Option<f64>,
}

impl StaticExecutor {
    /// Always succeed with `data`.
    pub fn new(data: serde_json::Value) -> Self {
        Self {
            data,
            confidence: None,
        }
    }

    /// Also report a confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

#[async_trait]
impl Executor for StaticExecutor {
    async fn invoke(
        &self,
        _action: &str,
        _payload: &serde_json::Value,
    ) -> Result<Invocation, ExecutorError> {
        let mut inv = Invocation::new(self.data.clone());
        inv.confidence = self.confidence;
        Ok(inv)
    }
}

/// Fails every invocation with a fixed message.
pub struct FailingExecutor(pub String);

impl FailingExecutor {
    /// Fail with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[async_trait]
impl Executor for FailingExecutor {
    async fn invoke(
        &self,
        _action: &str,
        _payload: &serde_json::Value,
    ) -> Result<Invocation, ExecutorError> {
        Err(ExecutorError::Failed(self.0.clone()))
    }
}

/// Counts invocations and echoes the payload back.
///
/// The count is the assertion surface for fail-closed tests: a request that
/// must never reach an executor leaves the count at zero.
#[derive(Default)]
pub struct CountingExecutor {
    calls: AtomicUsize,
}

impl CountingExecutor {
    /// New executor with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invocations observed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Executor for CountingExecutor {
    async fn invoke(
        &self,
        _action: &str,
        payload: &serde_json::Value,
    ) -> Result<Invocation, ExecutorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Invocation::new(payload.clone()))
    }
}

/// Records the `action` of each invocation in arrival order.
///
/// Used to assert scheduling order: submit requests with distinct actions,
/// then inspect the recorded sequence.
#[derive(Default)]
pub struct RecordingExecutor {
    seen: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    /// New executor with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions in the order they were invoked.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("recording executor poisoned").clone()
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn invoke(
        &self,
        action: &str,
        _payload: &serde_json::Value,
    ) -> Result<Invocation, ExecutorError> {
        self.seen
            .lock()
            .expect("recording executor poisoned")
            .push(action.to_owned());
        Ok(Invocation::new(serde_json::Value::Null))
    }
}
