#![deny(missing_docs)]
//! Executor registry for the axon control plane.
//!
//! Holds the set of known executors: a descriptor (identity, category,
//! status, metadata) paired with the invokable capability. Registration is
//! insert-or-replace by id, so re-registering an executor updates its
//! metadata in place with no duplicate entries. Lookups are pure reads and
//! a miss is `None`, not an error — absence becomes a not-found decision
//! one level up, in the dispatcher.
//!
//! Registration is rare relative to lookups, so the map sits behind a
//! `std::sync::RwLock`. No method blocks or awaits.

use plane0::{Executor, ExecutorDescriptor, ExecutorId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

struct Registered {
    descriptor: ExecutorDescriptor,
    executor: Arc<dyn Executor>,
}

/// The set of known executors and their metadata.
///
/// All methods take `&self`; the registry is shared behind an `Arc` between
/// the dispatcher and the transport surface.
pub struct ExecutorRegistry {
    entries: RwLock<HashMap<ExecutorId, Registered>>,
}

impl ExecutorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Insert or replace the executor under its id.
    ///
    /// Idempotent by key: registering the same id again overwrites the
    /// previous descriptor and capability, which is how status and metadata
    /// updates are expressed.
    pub fn register(&self, descriptor: ExecutorDescriptor, executor: Arc<dyn Executor>) {
        let id = descriptor.id.clone();
        self.entries
            .write()
            .expect("registry lock poisoned")
            .insert(
                id,
                Registered {
                    descriptor,
                    executor,
                },
            );
    }

    /// Remove an executor. Returns whether anything was removed.
    pub fn deregister(&self, id: &ExecutorId) -> bool {
        self.entries
            .write()
            .expect("registry lock poisoned")
            .remove(id)
            .is_some()
    }

    /// Snapshot of the descriptor for `id`, or `None` when unknown.
    pub fn lookup(&self, id: &ExecutorId) -> Option<ExecutorDescriptor> {
        self.entries
            .read()
            .expect("registry lock poisoned")
            .get(id)
            .map(|r| r.descriptor.clone())
    }

    /// The invokable capability for `id`, or `None` when unknown.
    pub fn capability(&self, id: &ExecutorId) -> Option<Arc<dyn Executor>> {
        self.entries
            .read()
            .expect("registry lock poisoned")
            .get(id)
            .map(|r| Arc::clone(&r.executor))
    }

    /// Point-in-time snapshot of every registered descriptor.
    ///
    /// Order is unspecified and callers must not assume it is stable
    /// across mutations.
    pub fn list(&self) -> Vec<ExecutorDescriptor> {
        self.entries
            .read()
            .expect("registry lock poisoned")
            .values()
            .map(|r| r.descriptor.clone())
            .collect()
    }

    /// Number of registered executors.
    pub fn len(&self) -> usize {
        self.entries.read().expect("registry lock poisoned").len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ExecutorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
