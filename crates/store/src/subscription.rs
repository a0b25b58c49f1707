//! Subscription handles and delivery contexts.

use std::sync::{Arc, Weak};

use crate::snapshot::Snapshot;
use crate::store::StoreInner;

/// A deferred unit of delivery work.
pub type DeliveryTask = Box<dyn FnOnce() + Send>;

pub(crate) type SnapshotCallback = Arc<dyn Fn(Snapshot) + Send + Sync>;

/// Where a subscriber's deliveries run.
///
/// Supplied per subscription via
/// [`Store::subscribe_on`](crate::Store::subscribe_on), e.g. to serialize
/// deliveries onto a UI event loop or a worker queue. The store knows
/// nothing about any particular runtime: it hands each delivery to
/// `dispatch` and moves on, so the thread that triggered the change never
/// waits for the subscriber to finish.
///
/// The initial delivery at subscribe time is always invoked directly,
/// synchronously, before `subscribe_on` returns; the context receives every
/// delivery after that.
pub trait DeliveryContext: Send + Sync {
    /// Run (or enqueue) one delivery. Implementations that care about
    /// per-subscriber ordering must execute tasks in the order received.
    fn dispatch(&self, task: DeliveryTask);
}

#[derive(Clone)]
pub(crate) struct SubscriberEntry {
    pub(crate) callback: SnapshotCallback,
    pub(crate) context: Option<Arc<dyn DeliveryContext>>,
}

/// Cancellable handle for one subscription.
///
/// Holds only a weak reference back to the store's internals: cancelling
/// twice, or after the store has been torn down, is a silent no-op.
/// Dropping the token does not cancel the subscription.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    pub(crate) fn new(store: Weak<StoreInner>, id: u64) -> Self {
        Self { store, id }
    }

    /// Remove the registration if it is still present. Idempotent.
    pub fn cancel(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner.subscribers.lock().remove(&self.id);
        }
    }

    /// Whether this subscription no longer receives deliveries, either
    /// because it was cancelled or because the store is gone.
    pub fn is_cancelled(&self) -> bool {
        match self.store.upgrade() {
            Some(inner) => !inner.subscribers.lock().contains_key(&self.id),
            None => true,
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
