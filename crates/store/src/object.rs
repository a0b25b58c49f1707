//! Schema objects: merged read over staged write
//!
//! A `SchemaObject` is one transaction's mutation context. It holds an
//! immutable base capture of the backend (taken once, at snapshot or
//! transaction start) and a private set of staged writes. Reads resolve
//! staged state first, then fall back to the base; writes only ever touch
//! the staged set - never the base, never the backend.
//!
//! A key is in exactly one of three states during a transaction: absent
//! (never set), explicitly removed (a deletion staged this transaction), or
//! holding a value. After commit the first two collapse into "key does not
//! exist"; they differ only while the transaction is alive.
//!
//! Schema objects are identity types, not value types: two objects holding
//! identical data are distinct mutation contexts. Equality and hashing use
//! an opaque id assigned at construction. They are intended for
//! single-thread, single-transaction use and are deliberately not `Clone`.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use veneer_core::{StoreValue, Value};

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// One staged mutation: a value to store, or an explicit removal.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Staged {
    Value(Value),
    Removed,
}

/// Typed view over a base capture of backend data plus staged writes.
pub struct SchemaObject {
    id: u64,
    base: BTreeMap<String, Value>,
    staged: BTreeMap<String, Staged>,
}

impl SchemaObject {
    /// Construct over a raw base mapping, with no staged writes.
    pub fn new(base: BTreeMap<String, Value>) -> Self {
        Self {
            id: NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed),
            base,
            staged: BTreeMap::new(),
        }
    }

    /// Read `key` as `T`.
    ///
    /// Resolution order: a staged removal hides the key regardless of the
    /// base; a staged value decodes as `T` (possibly `None` if the decode
    /// fails); otherwise the base entry decodes as `T` (`None` when the key
    /// is missing or holds a foreign value `T` cannot interpret).
    pub fn read<T: StoreValue>(&self, key: &str) -> Option<T> {
        match self.staged.get(key) {
            Some(Staged::Removed) => None,
            Some(Staged::Value(value)) => T::from_value(value),
            None => self.base.get(key).and_then(T::from_value),
        }
    }

    /// Read `key` as `T`, substituting `default` wherever [`read`] would be
    /// absent.
    ///
    /// [`read`]: SchemaObject::read
    pub fn read_or<T: StoreValue>(&self, key: &str, default: T) -> T {
        self.read(key).unwrap_or(default)
    }

    /// Stage a write of `value` at `key`.
    ///
    /// `None` stages an explicit removal; `Some(v)` stages `v`'s encoding.
    /// Nothing reaches the backend until the surrounding transaction
    /// commits.
    pub fn write<T: StoreValue>(&mut self, key: impl Into<String>, value: Option<T>) {
        let staged = match value {
            Some(v) => Staged::Value(v.to_value()),
            None => Staged::Removed,
        };
        self.staged.insert(key.into(), staged);
    }

    /// Stage an explicit removal of `key`.
    pub fn remove(&mut self, key: impl Into<String>) {
        self.staged.insert(key.into(), Staged::Removed);
    }

    /// Whether `key` currently resolves to a value in the merged view.
    ///
    /// Unlike [`read`], this does not attempt a decode: a key holding a
    /// foreign value still counts as present.
    ///
    /// [`read`]: SchemaObject::read
    pub fn contains_key(&self, key: &str) -> bool {
        match self.staged.get(key) {
            Some(Staged::Removed) => false,
            Some(Staged::Value(_)) => true,
            None => self.base.contains_key(key),
        }
    }

    /// Keys of the merged view: base keys not staged for removal, plus keys
    /// with staged values. No order is guaranteed.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let base = self
            .base
            .keys()
            .filter(|key| !matches!(self.staged.get(*key), Some(Staged::Removed)));
        let added = self
            .staged
            .iter()
            .filter(|(key, staged)| {
                matches!(staged, Staged::Value(_)) && !self.base.contains_key(*key)
            })
            .map(|(key, _)| key);
        base.chain(added).map(String::as_str)
    }

    /// Number of staged mutations.
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Consume the object, yielding its staged mutations for commit.
    pub(crate) fn into_staged(self) -> BTreeMap<String, Staged> {
        self.staged
    }
}

impl PartialEq for SchemaObject {
    fn eq(&self, other: &Self) -> bool {
        // Identity, not content: two objects holding identical data are
        // distinct mutation contexts.
        self.id == other.id
    }
}

impl Eq for SchemaObject {}

impl std::hash::Hash for SchemaObject {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Debug for SchemaObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaObject")
            .field("id", &self.id)
            .field("base_len", &self.base.len())
            .field("staged_len", &self.staged.len())
            .finish()
    }
}
