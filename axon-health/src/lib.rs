#![deny(missing_docs)]
//! Health gate: per-executor circuit breakers.
//!
//! Tracks failure/success history per executor and derives a
//! closed/open/half-open state. State is created lazily on the first
//! recorded observation and lives for the process lifetime or until an
//! explicit reset. An executor that has never been observed is closed —
//! absence of history is health, not failure.
//!
//! Each executor's state is one `DashMap` shard entry, so updates for
//! different executors never contend on a global lock and executor A's
//! history can never leak into executor B's state.

use dashmap::DashMap;
use plane0::{DurationMs, ExecutorId};
use std::time::Instant;

/// Tunables for the circuit breaker state machine.
///
/// Injected at construction — nothing is hardwired — so tests can drive the
/// machine with small thresholds and deployments can tune per environment.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures (with no intervening success) that open a
    /// circuit.
    pub failure_threshold: u32,
    /// Cooldown after which an open circuit admits a single half-open
    /// trial request. `None` disables half-open recovery: an open circuit
    /// then stays open until [`CircuitBreakerManager::reset`].
    pub cooldown: Option<DurationMs>,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: None,
        }
    }
}

/// Derived state of one circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitPhase {
    /// Requests pass.
    Closed,
    /// Requests are rejected immediately.
    Open,
    /// Cooldown elapsed; one trial request decides open vs closed.
    HalfOpen,
}

struct Circuit {
    phase: CircuitPhase,
    failure_count: u32,
    success_count: u64,
    last_failure: Option<Instant>,
    probe_in_flight: bool,
}

impl Circuit {
    fn fresh() -> Self {
        Self {
            phase: CircuitPhase::Closed,
            failure_count: 0,
            success_count: 0,
            last_failure: None,
            probe_in_flight: false,
        }
    }
}

/// Read-only view of one circuit, for transports and dashboards.
#[derive(Debug, Clone, Copy)]
pub struct CircuitSnapshot {
    /// Current derived phase.
    pub phase: CircuitPhase,
    /// Consecutive failures since the last success or reset.
    pub failure_count: u32,
    /// Total successes observed.
    pub success_count: u64,
}

/// Per-executor circuit breaker state machine.
pub struct CircuitBreakerManager {
    circuits: DashMap<ExecutorId, Circuit>,
    config: CircuitBreakerConfig,
}

impl CircuitBreakerManager {
    /// Manager with the default configuration (threshold 5, no half-open
    /// recovery).
    pub fn new() -> Self {
        Self::with_config(CircuitBreakerConfig::default())
    }

    /// Manager with explicit tunables.
    pub fn with_config(config: CircuitBreakerConfig) -> Self {
        Self {
            circuits: DashMap::new(),
            config,
        }
    }

    /// Record a failed invocation for `id`.
    ///
    /// Increments the failure count and stamps the failure time. At the
    /// configured threshold the circuit opens. A failure during a half-open
    /// trial re-opens immediately.
    pub fn record_failure(&self, id: &ExecutorId) {
        let mut circuit = self
            .circuits
            .entry(id.clone())
            .or_insert_with(Circuit::fresh);
        circuit.failure_count = circuit.failure_count.saturating_add(1);
        circuit.last_failure = Some(Instant::now());

        let reopened = circuit.phase == CircuitPhase::HalfOpen;
        if reopened || circuit.failure_count >= self.config.failure_threshold {
            if circuit.phase != CircuitPhase::Open {
                tracing::warn!(
                    executor = %id,
                    failures = circuit.failure_count,
                    "circuit opened"
                );
            }
            circuit.phase = CircuitPhase::Open;
            circuit.probe_in_flight = false;
        }
    }

    /// Record a successful invocation for `id`.
    ///
    /// Resets the failure count to zero unconditionally and closes a
    /// half-open circuit. Does not by itself close an open circuit: that
    /// takes a half-open probe (when a cooldown is configured) or an
    /// explicit [`reset`](Self::reset). On an executor never seen before
    /// this creates a fresh closed state.
    pub fn record_success(&self, id: &ExecutorId) {
        let mut circuit = self
            .circuits
            .entry(id.clone())
            .or_insert_with(Circuit::fresh);
        circuit.success_count = circuit.success_count.saturating_add(1);
        circuit.failure_count = 0;
        if circuit.phase == CircuitPhase::HalfOpen {
            tracing::info!(executor = %id, "circuit closed after successful probe");
            circuit.phase = CircuitPhase::Closed;
            circuit.probe_in_flight = false;
        }
    }

    /// Whether requests to `id` should be rejected right now.
    ///
    /// Never-observed executors read as closed, and this read never creates
    /// state. When a cooldown is configured and has elapsed since the last
    /// failure, the first caller after the window is admitted as the
    /// half-open trial; concurrent callers keep seeing the circuit as open
    /// until that probe's outcome is recorded.
    pub fn is_open(&self, id: &ExecutorId) -> bool {
        let Some(mut circuit) = self.circuits.get_mut(id) else {
            return false;
        };
        match circuit.phase {
            CircuitPhase::Closed => false,
            CircuitPhase::HalfOpen => {
                if circuit.probe_in_flight {
                    true
                } else {
                    circuit.probe_in_flight = true;
                    false
                }
            }
            CircuitPhase::Open => {
                let Some(cooldown) = self.config.cooldown else {
                    return true;
                };
                let cooled = circuit
                    .last_failure
                    .is_none_or(|t| t.elapsed() >= cooldown.to_std());
                if cooled {
                    tracing::debug!(executor = %id, "circuit half-open, admitting trial");
                    circuit.phase = CircuitPhase::HalfOpen;
                    circuit.probe_in_flight = true;
                    false
                } else {
                    true
                }
            }
        }
    }

    /// Return a half-open probe slot that will never report an outcome.
    ///
    /// [`is_open`](Self::is_open) hands out the trial slot before the caller
    /// knows whether the request will actually reach the executor. A caller
    /// that bails out between the health check and the invocation (policy
    /// denial, unknown executor) must release the slot, or the circuit would
    /// sit half-open with its one probe claimed forever. No-op unless the
    /// circuit is currently half-open.
    pub fn release_probe(&self, id: &ExecutorId) {
        if let Some(mut circuit) = self.circuits.get_mut(id) {
            if circuit.phase == CircuitPhase::HalfOpen {
                circuit.probe_in_flight = false;
            }
        }
    }

    /// Explicitly reset `id` to a fresh closed circuit.
    pub fn reset(&self, id: &ExecutorId) {
        self.circuits.insert(id.clone(), Circuit::fresh());
    }

    /// Read-only view of the circuit for `id`, or `None` when the executor
    /// has never been observed.
    pub fn snapshot(&self, id: &ExecutorId) -> Option<CircuitSnapshot> {
        self.circuits.get(id).map(|c| CircuitSnapshot {
            phase: c.phase,
            failure_count: c.failure_count,
            success_count: c.success_count,
        })
    }
}

impl Default for CircuitBreakerManager {
    fn default() -> Self {
        Self::new()
    }
}
