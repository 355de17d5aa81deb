use axon_registry::ExecutorRegistry;
use plane0::test_utils::StaticExecutor;
use plane0::{ExecutorCategory, ExecutorDescriptor, ExecutorId, ExecutorStatus};
use std::sync::Arc;

fn descriptor(id: &str, name: &str) -> ExecutorDescriptor {
    ExecutorDescriptor::new(id, name, ExecutorCategory::Operational)
}

fn executor() -> Arc<StaticExecutor> {
    Arc::new(StaticExecutor::new(serde_json::json!({"ok": true})))
}

#[test]
fn lookup_returns_registered_descriptor() {
    let registry = ExecutorRegistry::new();
    registry.register(descriptor("bed_orchestrator", "Bed Orchestrator"), executor());

    let found = registry.lookup(&ExecutorId::new("bed_orchestrator")).unwrap();
    assert_eq!(found.name, "Bed Orchestrator");
    assert_eq!(found.status, ExecutorStatus::Active);
}

#[test]
fn lookup_miss_is_none_not_an_error() {
    let registry = ExecutorRegistry::new();
    assert!(registry.lookup(&ExecutorId::new("ghost")).is_none());
    assert!(registry.capability(&ExecutorId::new("ghost")).is_none());
}

#[test]
fn reregistration_overwrites_with_no_duplicates() {
    let registry = ExecutorRegistry::new();
    registry.register(descriptor("agent-a", "First Name"), executor());
    registry.register(
        descriptor("agent-a", "Second Name").with_status(ExecutorStatus::Inactive),
        executor(),
    );

    assert_eq!(registry.len(), 1);
    let found = registry.lookup(&ExecutorId::new("agent-a")).unwrap();
    assert_eq!(found.name, "Second Name");
    assert_eq!(found.status, ExecutorStatus::Inactive);

    let listed = registry.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Second Name");
}

#[test]
fn deregister_removes_and_reports() {
    let registry = ExecutorRegistry::new();
    registry.register(descriptor("agent-a", "A"), executor());

    assert!(registry.deregister(&ExecutorId::new("agent-a")));
    assert!(!registry.deregister(&ExecutorId::new("agent-a")));
    assert!(registry.is_empty());
}

#[test]
fn list_is_a_snapshot() {
    let registry = ExecutorRegistry::new();
    registry.register(descriptor("a", "A"), executor());
    let snapshot = registry.list();

    registry.register(descriptor("b", "B"), executor());
    assert_eq!(snapshot.len(), 1);
    assert_eq!(registry.list().len(), 2);
}

#[tokio::test]
async fn capability_is_invokable() {
    let registry = ExecutorRegistry::new();
    registry.register(descriptor("a", "A"), executor());

    let cap = registry.capability(&ExecutorId::new("a")).unwrap();
    let inv = cap.invoke("anything", &serde_json::Value::Null).await.unwrap();
    assert_eq!(inv.data["ok"], true);
}
