//! # Veneer
//!
//! Typed, consistency-bounded views over untyped key-value stores.
//!
//! Veneer lets consumers declare a typed schema of fields and read/write
//! them through strongly-typed accessors, while the underlying store only
//! ever holds a flat mapping of string keys to a small closed set of
//! primitive kinds. The backend may be written concurrently by foreign,
//! untyped code; typed readers degrade gracefully instead of failing.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use veneerdb::prelude::*;
//!
//! const LAUNCH_COUNT: Field<i64> = Field::new("launch_count", 0);
//! const DISPLAY_NAME: OptionalField<String> = OptionalField::new("display_name");
//!
//! let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::new());
//! let store = Store::new(backend);
//!
//! // All-or-nothing transactional write
//! store.write(|settings| -> Result<(), Infallible> {
//!     LAUNCH_COUNT.set(settings, LAUNCH_COUNT.get(settings) + 1);
//!     DISPLAY_NAME.set(settings, Some("Alice".to_string()));
//!     Ok(())
//! })?;
//!
//! // Immutable point-in-time view
//! let snapshot = store.make_snapshot()?;
//! assert_eq!(LAUNCH_COUNT.get(&snapshot), 1);
//!
//! // Change subscription: one synchronous delivery now, one per change
//! let token = store.subscribe(|snapshot| {
//!     println!("launches: {}", LAUNCH_COUNT.get(&snapshot));
//! })?;
//! token.cancel();
//! ```
//!
//! ## Pieces
//!
//! - [`Value`] / [`StoreValue`] - the closed primitive vocabulary and the
//!   typed bridging contract over it
//! - [`Backend`] / [`MemoryBackend`] - the external store boundary and an
//!   in-memory reference implementation
//! - [`Store`] - snapshots, transactions, and change fan-out over one
//!   backend, serialized by a single reentrant lock
//! - [`SchemaObject`] / [`Snapshot`] - one transaction's mutation context,
//!   and the frozen shareable form of it
//! - [`Field`] / [`OptionalField`] - key-plus-default descriptors replacing
//!   stringly-typed access

#![warn(missing_docs)]

pub mod prelude;

pub use veneer_backend::{Backend, BackendError, BackendResult, ChangeObserver, MemoryBackend};
pub use veneer_core::{Bytes, StoreValue, Value, ValueKind};
pub use veneer_store::{
    DeliveryContext, DeliveryTask, Field, OptionalField, SchemaObject, Snapshot, Store,
    Subscription, TransactionError,
};
