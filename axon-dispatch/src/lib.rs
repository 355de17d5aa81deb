#![deny(missing_docs)]
//! Priority dispatcher — the coordination core of the axon control plane.
//!
//! A request travels: validation → health gate → policy → registry lookup →
//! timed executor invocation → audit. Only the invocation may suspend;
//! every earlier step is a non-blocking in-memory read. The dispatcher
//! never retries — transient executor failures feed the circuit breaker
//! and go back to the caller, who owns retry policy.
//!
//! Scheduling is lane-per-priority: four FIFO queues drained highest tier
//! first by a bounded pool of tokio workers, so an eligible `critical`
//! request never waits behind lower tiers. Submission is non-blocking; a
//! full lane rejects immediately instead of backpressuring the submitter.
//!
//! Every outcome, including rejections before dispatch, becomes a
//! well-formed failure [`Response`] and exactly one terminal [`AuditEntry`]
//! correlated by request id.

mod lanes;

use axon_health::CircuitBreakerManager;
use axon_policy::PolicyEngine;
use axon_registry::ExecutorRegistry;
use lanes::{Job, PriorityLanes};
use plane0::{
    AuditDecision, AuditEntry, AuditSink, DispatchError, DurationMs, ExecutorDescriptor,
    ExecutorId, Request, Response,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Dispatcher tunables.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Worker tasks draining the lanes.
    pub workers: usize,
    /// Per-lane queue capacity; a full lane rejects submissions.
    pub queue_capacity: usize,
    /// Wall-clock bound on one executor invocation.
    pub dispatch_timeout: DurationMs,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            queue_capacity: 1024,
            dispatch_timeout: DurationMs::from_secs(30),
        }
    }
}

// Lifecycle states. Submissions are accepted only while RUNNING.
const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// A response that has been queued but not yet produced.
///
/// Returned by [`Dispatcher::enqueue`]; awaiting it yields the final
/// [`Response`]. Dropping it abandons the caller's interest — the request
/// still executes and is still audited.
pub struct PendingResponse(oneshot::Receiver<Response>);

impl Future for PendingResponse {
    type Output = Response;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(|result| {
            result.unwrap_or_else(|_| {
                DispatchError::Internal("response channel closed before completion".into()).into()
            })
        })
    }
}

// Audit entries go through a channel to a background writer so a slow sink
// never stalls submission or the workers.
enum AuditMessage {
    Entry(AuditEntry),
    Flush(oneshot::Sender<()>),
}

struct Inner {
    registry: Arc<ExecutorRegistry>,
    health: Arc<CircuitBreakerManager>,
    policy: Arc<PolicyEngine>,
    audit_sink: Arc<dyn AuditSink>,
    lanes: PriorityLanes,
    config: DispatcherConfig,
    state: AtomicU8,
    audit_tx: OnceLock<mpsc::UnboundedSender<AuditMessage>>,
    audit_drops: Arc<AtomicU64>,
}

/// Routes requests to executors, enforcing health gating, policy, priority
/// order, and the audit contract.
///
/// Independently constructible: every collaborator is injected, so multiple
/// isolated control planes can run in one process.
pub struct Dispatcher {
    inner: Arc<Inner>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Dispatcher {
    /// Dispatcher with default tunables.
    pub fn new(
        registry: Arc<ExecutorRegistry>,
        health: Arc<CircuitBreakerManager>,
        policy: Arc<PolicyEngine>,
        audit_sink: Arc<dyn AuditSink>,
    ) -> Self {
        Self::with_config(registry, health, policy, audit_sink, DispatcherConfig::default())
    }

    /// Dispatcher with explicit tunables.
    pub fn with_config(
        registry: Arc<ExecutorRegistry>,
        health: Arc<CircuitBreakerManager>,
        policy: Arc<PolicyEngine>,
        audit_sink: Arc<dyn AuditSink>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry,
                health,
                policy,
                audit_sink,
                lanes: PriorityLanes::new(config.queue_capacity),
                config,
                state: AtomicU8::new(IDLE),
                audit_tx: OnceLock::new(),
                audit_drops: Arc::new(AtomicU64::new(0)),
            }),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Begin accepting and processing requests.
    ///
    /// Spawns the worker pool; must be called from within a tokio runtime.
    /// Calling `start` on a running or stopped dispatcher is a no-op.
    pub fn start(&self) {
        if self
            .inner
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }
        let mut workers = self.workers.lock().expect("worker handle lock poisoned");
        for _ in 0..self.inner.config.workers.max(1) {
            let inner = Arc::clone(&self.inner);
            workers.push(tokio::spawn(worker_loop(inner)));
        }
        tracing::debug!(workers = workers.len(), "dispatcher started");
    }

    /// Stop accepting new requests, drain the queued ones, and join the
    /// workers. After this returns the lanes are empty and every audit
    /// entry handed to the writer has been recorded; any later submission
    /// is rejected with an audited response, never dropped. Idempotent: a
    /// second call only flushes the audit writer again.
    pub async fn stop(&self) {
        let was = self.inner.state.swap(STOPPED, Ordering::SeqCst);
        if was == RUNNING {
            // One wakeup starts the cascade: each exiting worker wakes the
            // next.
            self.inner.lanes.wake_one();
            let handles: Vec<JoinHandle<()>> = {
                let mut workers = self.workers.lock().expect("worker handle lock poisoned");
                workers.drain(..).collect()
            };
            for handle in handles {
                let _ = handle.await;
            }
            // A submission that saw RUNNING can still land a job after the
            // last worker exits; nothing will pop it, so reject it here.
            self.inner.reject_stranded();
            tracing::debug!("dispatcher stopped, queues drained");
        }
        self.inner.flush_audit().await;
    }

    /// Queue a request without waiting for its outcome.
    ///
    /// Non-blocking: the request is validated, audited as received, and
    /// pushed onto its priority lane; the audit write itself is handed to
    /// a background writer. `Err` carries the already-audited rejection
    /// response for requests that never made it into a lane (malformed,
    /// lane full, dispatcher not running).
    pub async fn enqueue(&self, request: Request) -> Result<PendingResponse, Response> {
        self.inner
            .audit(&request, AuditDecision::Received, "request received");

        if let Err(err) = validate(&request) {
            self.inner
                .audit(&request, AuditDecision::InvalidRequest, err.to_string());
            return Err(err.into());
        }

        if self.inner.state.load(Ordering::SeqCst) != RUNNING {
            let err = DispatchError::NotAccepting("dispatcher is not running".into());
            self.inner
                .audit(&request, AuditDecision::RejectedShutdown, err.to_string());
            return Err(err.into());
        }

        let (reply, rx) = oneshot::channel();
        if let Err(job) = self.inner.lanes.push(Job { request, reply }) {
            let err = DispatchError::QueueFull(job.request.priority.to_string());
            self.inner
                .audit(&job.request, AuditDecision::QueueFull, err.to_string());
            return Err(err.into());
        }
        // stop() may have completed between the state check and the push;
        // its workers are gone, so sweep the lanes ourselves. Our own job
        // resolves through its reply channel either way.
        if self.inner.state.load(Ordering::SeqCst) != RUNNING {
            self.inner.reject_stranded();
        }
        Ok(PendingResponse(rx))
    }

    /// Queue a request and wait for its outcome.
    pub async fn submit(&self, request: Request) -> Response {
        match self.enqueue(request).await {
            Ok(pending) => pending.await,
            Err(rejected) => rejected,
        }
    }

    /// Whether the executor's circuit is currently open. Pure read for the
    /// transport surface; never admits a half-open probe.
    pub fn circuit_open(&self, id: &ExecutorId) -> bool {
        self.inner
            .health
            .snapshot(id)
            .is_some_and(|s| s.phase == axon_health::CircuitPhase::Open)
    }

    /// Snapshot of the registered executors, for the transport surface.
    pub fn executors(&self) -> Vec<ExecutorDescriptor> {
        self.inner.registry.list()
    }

    /// Audit entries lost to sink failures since construction.
    pub fn audit_drops(&self) -> u64 {
        self.inner.audit_drops.load(Ordering::SeqCst)
    }

    /// Requests currently queued across all lanes.
    pub fn queued(&self) -> usize {
        self.inner.lanes.len()
    }
}

/// Shape checks. Invalid priorities cannot reach this point — they fail
/// `Priority` parsing at the transport boundary before a `Request` exists.
fn validate(request: &Request) -> Result<(), DispatchError> {
    if request.executor.is_empty() {
        return Err(DispatchError::Invalid("empty executor id".into()));
    }
    if request.action.is_empty() {
        return Err(DispatchError::Invalid("empty action".into()));
    }
    if request.request_id.is_empty() {
        return Err(DispatchError::Invalid("empty request id".into()));
    }
    Ok(())
}

async fn worker_loop(inner: Arc<Inner>) {
    loop {
        // Register interest before checking the lanes so a push landing
        // between the pop miss and the await still wakes this worker.
        let notified = inner.lanes.notified();
        if let Some(job) = inner.lanes.pop() {
            inner.process(job).await;
            continue;
        }
        if inner.state.load(Ordering::SeqCst) == STOPPED {
            // Pass the shutdown wakeup along to the next parked worker.
            inner.lanes.wake_one();
            return;
        }
        notified.await;
    }
}

impl Inner {
    async fn process(&self, job: Job) {
        let Job { request, reply } = job;
        let (response, decision, summary) = match self.route(&request).await {
            Ok(response) => (response, AuditDecision::Routed, "executed".to_string()),
            Err(err) => {
                let decision = terminal_decision(&err);
                let summary = err.to_string();
                (Response::from(err), decision, summary)
            }
        };
        self.audit(&request, decision, summary);
        // The caller may have dropped its PendingResponse; that is not an
        // error for the control plane.
        let _ = reply.send(response);
    }

    /// Steps 2-5 of the pipeline: health gate, policy, registry, invocation.
    async fn route(&self, request: &Request) -> Result<Response, DispatchError> {
        if self.health.is_open(&request.executor) {
            return Err(DispatchError::CircuitOpen(request.executor.to_string()));
        }

        let policy_decision = self.policy.validate(request);
        if let Some(reason) = policy_decision.reason() {
            // Exits past the health gate that never invoke must hand back a
            // half-open probe slot they may have been admitted on.
            self.health.release_probe(&request.executor);
            return Err(DispatchError::PolicyDenied(reason.to_owned()));
        }

        let Some(executor) = self.registry.capability(&request.executor) else {
            self.health.release_probe(&request.executor);
            return Err(DispatchError::NotFound(request.executor.to_string()));
        };

        let action = request.action.clone();
        let payload = request.payload.clone();
        // Spawned so a panicking executor is caught at the join boundary
        // instead of unwinding through the worker.
        let mut invocation = tokio::spawn(async move { executor.invoke(&action, &payload).await });

        let timeout = self.config.dispatch_timeout;
        match tokio::time::timeout(timeout.to_std(), &mut invocation).await {
            Err(_elapsed) => {
                invocation.abort();
                self.health.record_failure(&request.executor);
                Err(DispatchError::Timeout(timeout.as_millis()))
            }
            Ok(Err(join_err)) => {
                self.health.record_failure(&request.executor);
                if join_err.is_panic() {
                    tracing::error!(
                        executor = %request.executor,
                        request_id = %request.request_id,
                        "executor panicked during invocation"
                    );
                    Err(DispatchError::Internal(format!(
                        "executor {} panicked",
                        request.executor
                    )))
                } else {
                    Err(DispatchError::Internal("invocation task cancelled".into()))
                }
            }
            Ok(Ok(Err(executor_err))) => {
                self.health.record_failure(&request.executor);
                Err(DispatchError::Executor(executor_err))
            }
            Ok(Ok(Ok(invocation))) => {
                self.health.record_success(&request.executor);
                let mut response = Response::ok(invocation.data);
                response.confidence = invocation.confidence;
                Ok(response)
            }
        }
    }

    /// Reject every job still sitting in the lanes. Only called once the
    /// workers are gone; each job gets a terminal audit entry and its reply
    /// channel resolves with the rejection.
    fn reject_stranded(&self) {
        while let Some(job) = self.lanes.pop() {
            let err = DispatchError::NotAccepting("dispatcher stopped before dispatch".into());
            self.audit(&job.request, AuditDecision::RejectedShutdown, err.to_string());
            let _ = job.reply.send(Response::from(err));
        }
    }

    /// Audit write, fire-and-forget: the entry goes to a background writer
    /// so the request path never waits on the sink. Write failures are
    /// counted and logged by the writer, never surfaced to the request.
    fn audit(&self, request: &Request, decision: AuditDecision, summary: impl Into<String>) {
        let entry = AuditEntry::new(
            request.request_id.clone(),
            request.executor.clone(),
            request.priority,
            decision,
            summary,
        );
        // The writer is spawned on first use; audit is only reachable from
        // async contexts, so a runtime is always present here.
        let tx = self.audit_tx.get_or_init(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            tokio::spawn(audit_writer(
                rx,
                Arc::clone(&self.audit_sink),
                Arc::clone(&self.audit_drops),
            ));
            tx
        });
        if tx.send(AuditMessage::Entry(entry)).is_err() {
            self.audit_drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Wait until every audit entry sent so far has been recorded.
    async fn flush_audit(&self) {
        let Some(tx) = self.audit_tx.get() else {
            return;
        };
        let (ack, done) = oneshot::channel();
        if tx.send(AuditMessage::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

async fn audit_writer(
    mut rx: mpsc::UnboundedReceiver<AuditMessage>,
    sink: Arc<dyn AuditSink>,
    drops: Arc<AtomicU64>,
) {
    while let Some(message) = rx.recv().await {
        match message {
            AuditMessage::Entry(entry) => {
                let request_id = entry.request_id.clone();
                if let Err(err) = sink.record(entry).await {
                    drops.fetch_add(1, Ordering::SeqCst);
                    tracing::warn!(
                        request_id = %request_id,
                        error = %err,
                        "audit write failed, entry dropped"
                    );
                }
            }
            AuditMessage::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

fn terminal_decision(err: &DispatchError) -> AuditDecision {
    match err {
        DispatchError::Invalid(_) => AuditDecision::InvalidRequest,
        DispatchError::CircuitOpen(_) => AuditDecision::DeniedByCircuit,
        DispatchError::PolicyDenied(_) => AuditDecision::DeniedByPolicy,
        DispatchError::NotFound(_) => AuditDecision::ExecutorNotFound,
        DispatchError::Executor(_) | DispatchError::Timeout(_) => AuditDecision::ExecutorError,
        DispatchError::QueueFull(_) => AuditDecision::QueueFull,
        DispatchError::NotAccepting(_) => AuditDecision::RejectedShutdown,
        _ => AuditDecision::InternalError,
    }
}
