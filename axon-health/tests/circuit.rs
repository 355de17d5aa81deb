use axon_health::{CircuitBreakerConfig, CircuitBreakerManager, CircuitPhase};
use plane0::{DurationMs, ExecutorId};
use std::sync::Arc;

fn id(s: &str) -> ExecutorId {
    ExecutorId::new(s)
}

// --- Threshold ---

#[test]
fn threshold_minus_one_failures_stays_closed() {
    let gate = CircuitBreakerManager::new();
    for _ in 0..4 {
        gate.record_failure(&id("agent-x"));
    }
    assert!(!gate.is_open(&id("agent-x")));
}

#[test]
fn threshold_failures_open_the_circuit() {
    let gate = CircuitBreakerManager::new();
    for _ in 0..5 {
        gate.record_failure(&id("agent-x"));
    }
    assert!(gate.is_open(&id("agent-x")));
    assert_eq!(
        gate.snapshot(&id("agent-x")).unwrap().phase,
        CircuitPhase::Open
    );
}

#[test]
fn threshold_is_injectable() {
    let gate = CircuitBreakerManager::with_config(CircuitBreakerConfig {
        failure_threshold: 2,
        cooldown: None,
    });
    gate.record_failure(&id("agent-x"));
    assert!(!gate.is_open(&id("agent-x")));
    gate.record_failure(&id("agent-x"));
    assert!(gate.is_open(&id("agent-x")));
}

// --- Reset on success ---

#[test]
fn success_resets_failure_count_unconditionally() {
    let gate = CircuitBreakerManager::new();
    for _ in 0..4 {
        gate.record_failure(&id("agent-x"));
    }
    gate.record_success(&id("agent-x"));
    assert_eq!(gate.snapshot(&id("agent-x")).unwrap().failure_count, 0);

    // Another threshold-minus-one run must not open the circuit.
    for _ in 0..4 {
        gate.record_failure(&id("agent-x"));
    }
    assert!(!gate.is_open(&id("agent-x")));
}

#[test]
fn success_does_not_close_an_open_circuit() {
    let gate = CircuitBreakerManager::new();
    for _ in 0..5 {
        gate.record_failure(&id("agent-x"));
    }
    gate.record_success(&id("agent-x"));
    assert!(gate.is_open(&id("agent-x")));
}

#[test]
fn success_on_unseen_executor_creates_fresh_closed_state() {
    let gate = CircuitBreakerManager::new();
    gate.record_success(&id("newcomer"));
    let snap = gate.snapshot(&id("newcomer")).unwrap();
    assert_eq!(snap.phase, CircuitPhase::Closed);
    assert_eq!(snap.success_count, 1);
}

// --- Unseen executors ---

#[test]
fn unseen_executor_is_closed_and_stays_stateless() {
    let gate = CircuitBreakerManager::new();
    assert!(!gate.is_open(&id("never-seen")));
    // The read must not have created a circuit.
    assert!(gate.snapshot(&id("never-seen")).is_none());
}

// --- Isolation ---

#[test]
fn opening_a_leaves_b_closed() {
    let gate = CircuitBreakerManager::new();
    for _ in 0..5 {
        gate.record_failure(&id("agent-a"));
    }
    assert!(gate.is_open(&id("agent-a")));
    assert!(!gate.is_open(&id("agent-b")));
}

#[tokio::test(flavor = "multi_thread")]
async fn isolation_holds_under_concurrent_updates() {
    let gate = Arc::new(CircuitBreakerManager::new());
    let mut handles = vec![];
    for i in 0..8 {
        let gate = Arc::clone(&gate);
        handles.push(tokio::spawn(async move {
            let me = ExecutorId::new(format!("agent-{i}"));
            for _ in 0..100 {
                // Even executors only ever succeed; odd ones only fail.
                if i % 2 == 0 {
                    gate.record_success(&me);
                } else {
                    gate.record_failure(&me);
                }
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }
    for i in 0..8 {
        let me = ExecutorId::new(format!("agent-{i}"));
        if i % 2 == 0 {
            assert!(!gate.is_open(&me), "agent-{i} should be closed");
            assert_eq!(gate.snapshot(&me).unwrap().success_count, 100);
        } else {
            assert!(gate.is_open(&me), "agent-{i} should be open");
        }
    }
}

// --- Explicit reset ---

#[test]
fn reset_closes_an_open_circuit() {
    let gate = CircuitBreakerManager::new();
    for _ in 0..5 {
        gate.record_failure(&id("agent-x"));
    }
    gate.reset(&id("agent-x"));
    assert!(!gate.is_open(&id("agent-x")));
    assert_eq!(gate.snapshot(&id("agent-x")).unwrap().failure_count, 0);
}

// --- Half-open recovery (opt-in via cooldown) ---

#[tokio::test]
async fn cooldown_admits_single_probe_then_success_closes() {
    let gate = CircuitBreakerManager::with_config(CircuitBreakerConfig {
        failure_threshold: 2,
        cooldown: Some(DurationMs::from_millis(20)),
    });
    gate.record_failure(&id("agent-x"));
    gate.record_failure(&id("agent-x"));
    assert!(gate.is_open(&id("agent-x")));

    tokio::time::sleep(std::time::Duration::from_millis(40)).await;

    // First caller after the window is the trial; concurrent callers still
    // see the circuit as open until the probe's outcome lands.
    assert!(!gate.is_open(&id("agent-x")));
    assert!(gate.is_open(&id("agent-x")));

    gate.record_success(&id("agent-x"));
    assert_eq!(
        gate.snapshot(&id("agent-x")).unwrap().phase,
        CircuitPhase::Closed
    );
    assert!(!gate.is_open(&id("agent-x")));
}

#[tokio::test]
async fn released_probe_slot_readmits_a_later_trial() {
    let gate = CircuitBreakerManager::with_config(CircuitBreakerConfig {
        failure_threshold: 2,
        cooldown: Some(DurationMs::from_millis(20)),
    });
    gate.record_failure(&id("agent-x"));
    gate.record_failure(&id("agent-x"));

    tokio::time::sleep(std::time::Duration::from_millis(40)).await;
    assert!(!gate.is_open(&id("agent-x"))); // probe admitted

    // The admitted caller bailed out before invoking; without a release the
    // circuit would hold its one probe slot forever.
    gate.release_probe(&id("agent-x"));
    assert!(!gate.is_open(&id("agent-x")));

    gate.record_success(&id("agent-x"));
    assert_eq!(
        gate.snapshot(&id("agent-x")).unwrap().phase,
        CircuitPhase::Closed
    );
}

#[test]
fn release_probe_is_a_noop_outside_half_open() {
    let gate = CircuitBreakerManager::new();
    gate.release_probe(&id("never-seen"));
    assert!(gate.snapshot(&id("never-seen")).is_none());

    for _ in 0..5 {
        gate.record_failure(&id("agent-x"));
    }
    gate.release_probe(&id("agent-x"));
    assert_eq!(
        gate.snapshot(&id("agent-x")).unwrap().phase,
        CircuitPhase::Open
    );
}

#[tokio::test]
async fn failed_probe_reopens() {
    let gate = CircuitBreakerManager::with_config(CircuitBreakerConfig {
        failure_threshold: 2,
        cooldown: Some(DurationMs::from_millis(20)),
    });
    gate.record_failure(&id("agent-x"));
    gate.record_failure(&id("agent-x"));

    tokio::time::sleep(std::time::Duration::from_millis(40)).await;
    assert!(!gate.is_open(&id("agent-x"))); // probe admitted

    gate.record_failure(&id("agent-x"));
    assert_eq!(
        gate.snapshot(&id("agent-x")).unwrap().phase,
        CircuitPhase::Open
    );
}
