use std::collections::BTreeMap;

use veneer_core::Value;

use crate::error::BackendResult;

/// Payload-free change observer. Fired after any key changes, whatever the
/// source of the change.
pub type ChangeObserver = Box<dyn Fn() + Send + Sync>;

/// External, untyped key-value store.
///
/// All implementations must satisfy these invariants:
/// - `dump` returns the complete current mapping; the caller owns the copy
///   and later mutations of the backend never alter it.
/// - `set` stores the value under the key, replacing any previous value.
/// - `remove` deletes the key if present and is a no-op when absent.
/// - After any key changes - through this handle, another handle, or a
///   foreign writer - every registered observer is invoked at least once.
///   Observers receive no payload; "something changed" is the whole message.
/// - Observers are invoked outside the backend's internal locks, so an
///   observer may call back into the backend.
/// - All I/O errors are propagated, never silently ignored.
pub trait Backend: Send + Sync {
    /// Read the complete current key-to-value mapping.
    fn dump(&self) -> BackendResult<BTreeMap<String, Value>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: Value) -> BackendResult<()>;

    /// Delete `key` if present. No-op when absent.
    fn remove(&self, key: &str) -> BackendResult<()>;

    /// Register a change observer for the lifetime of the backend.
    ///
    /// There is no unregistration; observers that become irrelevant are
    /// expected to degrade to no-ops (e.g. by holding only weak references
    /// to their state).
    fn on_change(&self, observer: ChangeObserver);
}
