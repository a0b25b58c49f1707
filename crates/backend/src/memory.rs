use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;
use veneer_core::Value;

use crate::error::BackendResult;
use crate::traits::{Backend, ChangeObserver};

/// In-memory, BTreeMap-based backend.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock`;
/// observers are invoked after the data lock has been released, so an
/// observer may freely read (or write) the backend from inside its callback.
///
/// Change semantics: `set` fires one change event per call (assignment
/// counts as a change even when the stored value is identical); `remove`
/// fires only when the key actually existed.
pub struct MemoryBackend {
    entries: RwLock<BTreeMap<String, Value>>,
    observers: RwLock<Vec<Arc<dyn Fn() + Send + Sync>>>,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Create a backend pre-populated with `entries`.
    pub fn with_entries(entries: BTreeMap<String, Value>) -> Self {
        Self {
            entries: RwLock::new(entries),
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Read a single raw value without building a full dump.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().get(key).cloned()
    }

    fn notify(&self) {
        // Snapshot the observer list first: an observer may re-enter the
        // backend (including registering further observers) while we fan out.
        let observers: Vec<Arc<dyn Fn() + Send + Sync>> =
            self.observers.read().iter().cloned().collect();
        for observer in observers {
            observer();
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MemoryBackend {
    fn dump(&self) -> BackendResult<BTreeMap<String, Value>> {
        Ok(self.entries.read().clone())
    }

    fn set(&self, key: &str, value: Value) -> BackendResult<()> {
        trace!(key, kind = %value.kind(), "memory backend set");
        self.entries.write().insert(key.to_string(), value);
        self.notify();
        Ok(())
    }

    fn remove(&self, key: &str) -> BackendResult<()> {
        let removed = self.entries.write().remove(key).is_some();
        if removed {
            trace!(key, "memory backend remove");
            self.notify();
        }
        Ok(())
    }

    fn on_change(&self, observer: ChangeObserver) {
        self.observers.write().push(observer.into());
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("entry_count", &self.len())
            .field("observer_count", &self.observers.read().len())
            .finish()
    }
}
