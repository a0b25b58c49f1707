//! The transactional store
//!
//! `Store` wraps a [`Backend`] with three guarantees the raw dictionary
//! cannot give:
//!
//! - **Consistent reads**: [`Store::make_snapshot`] captures the full dump
//!   under the store lock, so a snapshot never observes a half-applied
//!   commit from this store.
//! - **All-or-nothing writes**: [`Store::write`] runs a body against a fresh
//!   [`SchemaObject`]; on success every staged entry is applied to the
//!   backend, on failure every staged entry is discarded and the backend is
//!   left exactly as before.
//! - **Change fan-out**: each backend change event (from this store or any
//!   foreign writer) builds exactly one fresh [`Snapshot`] and delivers that
//!   same snapshot to every registered subscriber, with no coalescing and no
//!   reordering.
//!
//! ## Locking
//!
//! One reentrant mutex per store serializes `make_snapshot`, `write`, and
//! `remove_all_values`. Reentrancy is load-bearing twice over: a nested
//! `write` from inside a transaction body must not deadlock, and the
//! store's own commits trigger backend notifications on the committing
//! thread, whose fan-out re-enters the lock to build the delivery snapshot.
//! Operations on one store are totally ordered by lock acquisition; nothing
//! is implied across two stores wrapping the same backend.
//!
//! A backend fault while applying a commit surfaces as
//! [`TransactionError::Backend`] and can leave the applied prefix in place;
//! only body failure gives the full rollback guarantee.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, trace, warn};
use veneer_backend::{Backend, BackendError};

use crate::error::TransactionError;
use crate::object::{SchemaObject, Staged};
use crate::snapshot::Snapshot;
use crate::subscription::{DeliveryContext, SubscriberEntry, Subscription};

/// Typed, consistency-bounded access to a backend.
///
/// Cheap to clone; all clones share the same lock, registry, and backend
/// reference. See the [module docs](self) for the consistency model.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

pub(crate) struct StoreInner {
    backend: Arc<dyn Backend>,
    txn_lock: ReentrantMutex<()>,
    pub(crate) subscribers: Mutex<HashMap<u64, SubscriberEntry>>,
    next_subscriber_id: AtomicU64,
}

impl Store {
    /// Wrap `backend`, registering for its change notifications.
    ///
    /// The registered observer holds only a weak reference to the store's
    /// internals; once every `Store` clone is dropped it degrades to a
    /// no-op.
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let inner = Arc::new(StoreInner {
            backend,
            txn_lock: ReentrantMutex::new(()),
            subscribers: Mutex::new(HashMap::new()),
            next_subscriber_id: AtomicU64::new(1),
        });

        let weak = Arc::downgrade(&inner);
        inner.backend.on_change(Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.fan_out();
            }
        }));

        Store { inner }
    }

    /// Capture an immutable point-in-time view of the backend.
    ///
    /// Cost is proportional to the total stored key count.
    pub fn make_snapshot(&self) -> Result<Snapshot, BackendError> {
        self.inner.make_snapshot()
    }

    /// Run `body` as one all-or-nothing transaction.
    ///
    /// The body receives a fresh [`SchemaObject`] over the current backend
    /// dump. If it returns `Ok`, every staged entry is applied to the
    /// backend (a set per value, a remove per explicit removal) and its
    /// result is returned. If it returns `Err`, the staged set is discarded
    /// without touching the backend and the error propagates as
    /// [`TransactionError::Aborted`].
    ///
    /// Reentrant: a nested `write` on the same thread does not deadlock. The
    /// nested transaction sees the outer one's uncommitted state as absent
    /// (it dumps the backend, not the outer staged set) and commits
    /// independently.
    pub fn write<T, E, F>(&self, body: F) -> Result<T, TransactionError<E>>
    where
        F: FnOnce(&mut SchemaObject) -> Result<T, E>,
    {
        let _guard = self.inner.txn_lock.lock();

        let base = self.inner.backend.dump()?;
        let mut object = SchemaObject::new(base);

        let out = match body(&mut object) {
            Ok(out) => out,
            Err(err) => {
                trace!(
                    staged = object.staged_len(),
                    "transaction body failed, discarding staged changes"
                );
                return Err(TransactionError::Aborted(err));
            }
        };

        let staged = object.into_staged();
        debug!(staged = staged.len(), "committing transaction");
        for (key, change) in staged {
            match change {
                Staged::Value(value) => self.inner.backend.set(&key, value)?,
                Staged::Removed => self.inner.backend.remove(&key)?,
            }
        }

        Ok(out)
    }

    /// Remove every key from the backend.
    ///
    /// Routed through the same transactional path as [`write`]: the removals
    /// are staged against the current dump and committed together, with the
    /// same semantics as any other transaction - a backend rejection
    /// surfaces as an error rather than being skipped. After a successful
    /// return the dump is empty.
    ///
    /// [`write`]: Store::write
    pub fn remove_all_values(&self) -> Result<(), BackendError> {
        let result: Result<(), TransactionError<Infallible>> = self.write(|object| {
            let keys: Vec<String> = object.keys().map(str::to_owned).collect();
            for key in keys {
                object.remove(key);
            }
            Ok(())
        });
        match result {
            Ok(()) => Ok(()),
            Err(TransactionError::Backend(err)) => Err(err),
            Err(TransactionError::Aborted(never)) => match never {},
        }
    }

    /// Register `callback` for change deliveries.
    ///
    /// Before returning, the callback is invoked once - synchronously, under
    /// the store lock - with a snapshot of current state, so a new
    /// subscriber always observes current state with no race against
    /// concurrent writers. Every subsequent backend change delivers one
    /// fresh snapshot.
    ///
    /// On a dump failure the registration is removed before the error
    /// returns; no deliveries will occur.
    pub fn subscribe(
        &self,
        callback: impl Fn(Snapshot) + Send + Sync + 'static,
    ) -> Result<Subscription, BackendError> {
        self.subscribe_entry(SubscriberEntry {
            callback: Arc::new(callback),
            context: None,
        })
    }

    /// Like [`subscribe`], but redirect every delivery after the initial one
    /// through `context`.
    ///
    /// The initial delivery is always direct and synchronous; see
    /// [`DeliveryContext`] for the redirection contract.
    ///
    /// [`subscribe`]: Store::subscribe
    pub fn subscribe_on(
        &self,
        callback: impl Fn(Snapshot) + Send + Sync + 'static,
        context: Arc<dyn DeliveryContext>,
    ) -> Result<Subscription, BackendError> {
        self.subscribe_entry(SubscriberEntry {
            callback: Arc::new(callback),
            context: Some(context),
        })
    }

    fn subscribe_entry(&self, entry: SubscriberEntry) -> Result<Subscription, BackendError> {
        let _guard = self.inner.txn_lock.lock();

        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().insert(id, entry.clone());

        let snapshot = match self.inner.make_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.inner.subscribers.lock().remove(&id);
                return Err(err);
            }
        };
        (entry.callback)(snapshot);

        Ok(Subscription::new(Arc::downgrade(&self.inner), id))
    }

    /// Remove `subscription`'s registration if present. Idempotent; a no-op
    /// for already-cancelled tokens.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        subscription.cancel();
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl StoreInner {
    fn make_snapshot(&self) -> Result<Snapshot, BackendError> {
        let _guard = self.txn_lock.lock();
        let base = self.backend.dump()?;
        Ok(Snapshot::freeze(SchemaObject::new(base)))
    }

    /// One delivery cycle: build one fresh snapshot, hand that same snapshot
    /// to every currently registered subscriber.
    fn fan_out(&self) {
        let snapshot = match self.make_snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "skipping delivery cycle, snapshot build failed");
                return;
            }
        };

        // Clone the entries out of the registry lock before invoking
        // anything: a callback may subscribe, cancel, or write.
        let entries: Vec<SubscriberEntry> =
            self.subscribers.lock().values().cloned().collect();
        trace!(subscribers = entries.len(), "delivering change notification");

        for entry in entries {
            let snapshot = snapshot.clone();
            match entry.context {
                Some(context) => {
                    let callback = Arc::clone(&entry.callback);
                    context.dispatch(Box::new(move || callback(snapshot)));
                }
                None => (entry.callback)(snapshot),
            }
        }
    }
}
