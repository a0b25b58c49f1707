//! Immutable point-in-time views.

use std::collections::BTreeMap;
use std::ops::Deref;
use std::sync::Arc;

use veneer_core::Value;

use crate::object::SchemaObject;

/// An immutable, freely shareable, point-in-time typed view.
///
/// A snapshot is a [`SchemaObject`] frozen with an empty staged set. Cloning
/// is an `Arc` bump; the same snapshot can be handed to any number of
/// subscribers or threads without synchronization. All read APIs are
/// available through deref; mutation requires `&mut SchemaObject` and is
/// unreachable through the shared reference.
#[derive(Clone)]
pub struct Snapshot {
    object: Arc<SchemaObject>,
}

impl Snapshot {
    /// Build a snapshot directly over a raw base mapping.
    pub fn new(base: BTreeMap<String, Value>) -> Self {
        Self::freeze(SchemaObject::new(base))
    }

    /// Freeze a schema object. Callers must pass an object with no staged
    /// writes; the store only ever freezes freshly dumped objects.
    pub(crate) fn freeze(object: SchemaObject) -> Self {
        debug_assert_eq!(object.staged_len(), 0, "snapshots carry no staged writes");
        Self {
            object: Arc::new(object),
        }
    }
}

impl Deref for Snapshot {
    type Target = SchemaObject;

    fn deref(&self) -> &SchemaObject {
        &self.object
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        // Delegates to the inner object's identity.
        self.object == other.object
    }
}

impl Eq for Snapshot {}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Snapshot").field(&*self.object).finish()
    }
}
