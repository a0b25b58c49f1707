//! Typed schema objects, snapshots, and the transactional store
//!
//! This crate is the consistency layer over the backend boundary:
//!
//! - [`SchemaObject`]: a typed view combining an immutable base capture of
//!   backend data with a mutable set of staged writes.
//! - [`Snapshot`]: a schema object frozen with no staged writes; immutable,
//!   cheap to clone, safe to share across threads.
//! - [`Store`]: owns the backend reference and the subscriber registry;
//!   provides snapshot creation, all-or-nothing transactional writes, and
//!   change subscriptions, all serialized by one reentrant lock.
//! - [`Field`] / [`OptionalField`]: reusable descriptors binding a key (and
//!   optionally a default) to a typed accessor pair.

pub mod error;
pub mod field;
pub mod object;
pub mod snapshot;
pub mod store;
pub mod subscription;

pub use error::TransactionError;
pub use field::{Field, OptionalField};
pub use object::SchemaObject;
pub use snapshot::Snapshot;
pub use store::Store;
pub use subscription::{DeliveryContext, DeliveryTask, Subscription};
