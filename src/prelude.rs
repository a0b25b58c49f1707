//! Convenience re-exports for typical usage.
//!
//! ```ignore
//! use veneerdb::prelude::*;
//! ```

pub use crate::{
    Backend, BackendError, BackendResult, Bytes, DeliveryContext, DeliveryTask, Field,
    MemoryBackend, OptionalField, SchemaObject, Snapshot, Store, StoreValue, Subscription,
    TransactionError, Value, ValueKind,
};
