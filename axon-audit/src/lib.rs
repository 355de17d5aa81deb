#![deny(missing_docs)]
//! Audit sink implementations for the axon control plane.
//!
//! The dispatcher writes one [`AuditEntry`] per routing decision through the
//! [`AuditSink`] trait and treats the write as fire-and-forget: a sink
//! failure is counted, never propagated. The sinks here cover development
//! and single-process deployments; durable retention belongs to an external
//! collaborator behind the same trait.

use async_trait::async_trait;
use plane0::{AuditEntry, AuditError, AuditSink, RequestId};
use tokio::sync::RwLock;

/// In-memory append-only audit log.
///
/// Backed by a `Vec` behind a tokio `RwLock`. The primary sink for tests
/// and development; entries are never mutated or dropped once appended.
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every entry recorded so far, in append order.
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }

    /// Entries for one request, in append order.
    pub async fn for_request(&self, id: &RequestId) -> Vec<AuditEntry> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| &e.request_id == id)
            .cloned()
            .collect()
    }

    /// Number of entries recorded so far.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether no entry has been recorded yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries.write().await.push(entry);
        Ok(())
    }
}

/// Audit sink that emits each entry as a structured `tracing` event.
///
/// Useful as a lightweight trail in deployments that already collect logs;
/// pair it with a durable sink when retention matters.
#[derive(Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Create the sink.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        tracing::info!(
            request_id = %entry.request_id,
            executor = %entry.executor,
            priority = %entry.priority,
            decision = ?entry.decision,
            summary = %entry.result_summary,
            "audit"
        );
        Ok(())
    }
}
