//! Shared helpers for the store API suite.

use std::sync::Arc;

use veneerdb::prelude::*;

/// Counter field bound to key "a" with default 0.
pub const COUNT: Field<i64> = Field::new("a", 0);

/// Optional name field bound to key "b".
pub const NAME: OptionalField<String> = OptionalField::new("b");

/// A store over a fresh in-memory backend, with the backend handle kept
/// around so tests can inspect raw state and simulate foreign writers.
pub struct TestStore {
    pub backend: Arc<MemoryBackend>,
    pub store: Store,
}

impl TestStore {
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let store = Store::new(backend.clone() as Arc<dyn Backend>);
        Self { backend, store }
    }
}

/// Error type for test transaction bodies.
pub type TxResult = Result<(), String>;
