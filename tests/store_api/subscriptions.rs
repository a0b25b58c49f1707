//! Subscription and fan-out tests.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::common::*;
use veneerdb::prelude::*;

/// Collects the counter value of every delivered snapshot.
fn recording() -> (Arc<Mutex<Vec<i64>>>, impl Fn(Snapshot) + Send + Sync) {
    let seen: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    (seen, move |snapshot: Snapshot| {
        sink.lock().push(COUNT.get(&snapshot));
    })
}

fn bump(store: &Store) {
    store
        .write(|d| -> TxResult {
            COUNT.set(d, COUNT.get(d) + 1);
            Ok(())
        })
        .unwrap();
}

// ============================================================================
// Initial delivery
// ============================================================================

#[test]
fn subscribe_delivers_current_state_synchronously() {
    let t = TestStore::new();
    t.backend.set("a", Value::Int(41)).unwrap();

    let (seen, callback) = recording();
    let _token = t.store.subscribe(callback).unwrap();

    // Delivered before subscribe returned, no waiting involved.
    assert_eq!(*seen.lock(), vec![41]);
}

#[test]
fn counter_sequence_across_commits() {
    let t = TestStore::new();
    let (seen, callback) = recording();
    let _token = t.store.subscribe(callback).unwrap();

    bump(&t.store);
    bump(&t.store);

    // One initial delivery plus exactly one per committed write.
    assert_eq!(*seen.lock(), vec![0, 1, 2]);
}

#[test]
fn external_backend_writes_trigger_delivery() {
    let t = TestStore::new();
    let (seen, callback) = recording();
    let _token = t.store.subscribe(callback).unwrap();

    // A foreign writer mutates the backend directly.
    t.backend.set("a", Value::Int(10)).unwrap();

    assert_eq!(*seen.lock(), vec![0, 10]);
}

#[test]
fn one_cycle_delivers_the_same_snapshot_to_every_subscriber() {
    let t = TestStore::new();

    let first: Arc<Mutex<Vec<Snapshot>>> = Arc::new(Mutex::new(Vec::new()));
    let second: Arc<Mutex<Vec<Snapshot>>> = Arc::new(Mutex::new(Vec::new()));

    let sink = first.clone();
    let _a = t
        .store
        .subscribe(move |snapshot| sink.lock().push(snapshot))
        .unwrap();
    let sink = second.clone();
    let _b = t
        .store
        .subscribe(move |snapshot| sink.lock().push(snapshot))
        .unwrap();

    bump(&t.store);

    let first = first.lock();
    let second = second.lock();
    // Initial deliveries are per-subscriber builds; the change cycle hands
    // out one shared snapshot object.
    assert_eq!(first.last(), second.last());
    assert_ne!(first.first(), second.first());
}

// ============================================================================
// Cancellation
// ============================================================================

#[test]
fn cancelled_subscription_receives_nothing_further() {
    let t = TestStore::new();
    let (seen, callback) = recording();
    let token = t.store.subscribe(callback).unwrap();

    bump(&t.store);
    token.cancel();
    bump(&t.store);

    assert_eq!(*seen.lock(), vec![0, 1]);
    assert!(token.is_cancelled());
}

#[test]
fn cancelling_twice_is_a_noop() {
    let t = TestStore::new();
    let (seen, callback) = recording();
    let token = t.store.subscribe(callback).unwrap();

    token.cancel();
    token.cancel();

    bump(&t.store);
    assert_eq!(*seen.lock(), vec![0]);
}

#[test]
fn cancel_after_store_is_gone_is_a_noop() {
    let backend = Arc::new(MemoryBackend::new());
    let token = {
        let store = Store::new(backend.clone() as Arc<dyn Backend>);
        store.subscribe(|_snapshot| {}).unwrap()
        // Store (and its internals) dropped here.
    };

    assert!(token.is_cancelled());
    token.cancel();
    token.cancel();

    // The backend outlives the store; its notifications go nowhere.
    backend.set("a", Value::Int(1)).unwrap();
}

#[test]
fn unsubscribe_via_store_matches_token_cancel() {
    let t = TestStore::new();
    let (seen, callback) = recording();
    let token = t.store.subscribe(callback).unwrap();
    assert_eq!(t.store.subscriber_count(), 1);

    t.store.unsubscribe(&token);
    assert_eq!(t.store.subscriber_count(), 0);

    bump(&t.store);
    assert_eq!(*seen.lock(), vec![0]);
}

// ============================================================================
// Delivery contexts
// ============================================================================

/// Queues deliveries until the test drains them, preserving order.
struct QueueContext {
    tasks: Mutex<Vec<DeliveryTask>>,
}

impl QueueContext {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            tasks: Mutex::new(Vec::new()),
        })
    }

    fn drain(&self) {
        let tasks: Vec<DeliveryTask> = std::mem::take(&mut *self.tasks.lock());
        for task in tasks {
            task();
        }
    }
}

impl DeliveryContext for QueueContext {
    fn dispatch(&self, task: DeliveryTask) {
        self.tasks.lock().push(task);
    }
}

#[test]
fn redirected_deliveries_run_on_the_supplied_context() {
    let t = TestStore::new();
    let context = QueueContext::new();

    let (seen, callback) = recording();
    let _token = t
        .store
        .subscribe_on(callback, context.clone())
        .unwrap();

    // The initial delivery is always direct and synchronous.
    assert_eq!(*seen.lock(), vec![0]);

    bump(&t.store);
    bump(&t.store);

    // The writer thread was never blocked on the subscriber: the deliveries
    // are still queued.
    assert_eq!(*seen.lock(), vec![0]);

    context.drain();
    assert_eq!(*seen.lock(), vec![0, 1, 2]);
}
