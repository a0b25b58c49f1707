//! Transactional write tests: staged mutation, commit, and rollback.

use crate::common::*;
use veneerdb::prelude::*;

use chrono::{TimeZone, Utc};

// ============================================================================
// Commit
// ============================================================================

#[test]
fn committed_write_is_visible_in_snapshot_and_raw_dump() {
    let t = TestStore::new();

    t.store
        .write(|d| -> TxResult {
            NAME.set(d, Some("alice".to_string()));
            Ok(())
        })
        .unwrap();

    let snapshot = t.store.make_snapshot().unwrap();
    assert_eq!(NAME.get(&snapshot), Some("alice".to_string()));
    assert_eq!(
        t.backend.get("b"),
        Some(Value::String("alice".to_string()))
    );
}

#[test]
fn committed_removal_clears_snapshot_and_dump() {
    let t = TestStore::new();

    t.store
        .write(|d| -> TxResult {
            NAME.set(d, Some("alice".to_string()));
            Ok(())
        })
        .unwrap();

    t.store
        .write(|d| -> TxResult {
            NAME.set(d, None);
            Ok(())
        })
        .unwrap();

    let snapshot = t.store.make_snapshot().unwrap();
    assert_eq!(NAME.get(&snapshot), None);
    assert_eq!(t.backend.get("b"), None);
}

#[test]
fn transaction_result_value_propagates() {
    let t = TestStore::new();

    let next = t
        .store
        .write(|d| -> Result<i64, String> {
            let next = COUNT.get(d) + 1;
            COUNT.set(d, next);
            Ok(next)
        })
        .unwrap();

    assert_eq!(next, 1);
    assert_eq!(t.backend.get("a"), Some(Value::Int(1)));
}

#[test]
fn consecutive_transactions_see_committed_state() {
    let t = TestStore::new();

    for expected in 1..=3i64 {
        t.store
            .write(|d| -> TxResult {
                COUNT.set(d, COUNT.get(d) + 1);
                Ok(())
            })
            .unwrap();
        assert_eq!(t.backend.get("a"), Some(Value::Int(expected)));
    }
}

#[test]
fn typed_values_round_trip_through_the_backend() {
    let t = TestStore::new();
    let when = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

    t.store
        .write(|d| -> TxResult {
            d.write("flag", Some(true));
            d.write("count", Some(42i64));
            d.write("ratio", Some(0.5f64));
            d.write("title", Some("hello".to_string()));
            d.write("seen_at", Some(when));
            d.write("blob", Some(Bytes(vec![0, 255, 7])));
            d.write("history", Some(vec![1i64, 2, 3]));
            Ok(())
        })
        .unwrap();

    let snapshot = t.store.make_snapshot().unwrap();
    assert_eq!(snapshot.read::<bool>("flag"), Some(true));
    assert_eq!(snapshot.read::<i64>("count"), Some(42));
    assert_eq!(snapshot.read::<f64>("ratio"), Some(0.5));
    assert_eq!(snapshot.read::<String>("title"), Some("hello".to_string()));
    assert_eq!(snapshot.read("seen_at"), Some(when));
    assert_eq!(snapshot.read("blob"), Some(Bytes(vec![0, 255, 7])));
    assert_eq!(snapshot.read("history"), Some(vec![1i64, 2, 3]));

    // The raw dump holds the exact encodings.
    assert_eq!(t.backend.get("flag"), Some(Value::Bool(true)));
    assert_eq!(t.backend.get("count"), Some(Value::Int(42)));
    assert_eq!(t.backend.get("seen_at"), Some(Value::Timestamp(when)));
    assert_eq!(
        t.backend.get("history"),
        Some(Value::Array(vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3)
        ]))
    );
}

// ============================================================================
// Rollback
// ============================================================================

#[test]
fn failing_body_rolls_back_completely() {
    let t = TestStore::new();
    t.store
        .write(|d| -> TxResult {
            COUNT.set(d, 7);
            Ok(())
        })
        .unwrap();
    let before = t.backend.dump().unwrap();

    let result = t.store.write(|d| -> TxResult {
        COUNT.set(d, 100);
        NAME.set(d, Some("never".to_string()));
        d.remove("a");
        Err("boom".to_string())
    });

    match result {
        Err(TransactionError::Aborted(msg)) => assert_eq!(msg, "boom"),
        other => panic!("expected aborted transaction, got {other:?}"),
    }
    assert_eq!(t.backend.dump().unwrap(), before);
}

#[test]
fn write_remove_then_failed_write_scenario() {
    let t = TestStore::new();

    // Commit a value...
    t.store
        .write(|d| -> TxResult {
            NAME.set(d, Some("x".to_string()));
            Ok(())
        })
        .unwrap();

    // ...commit its removal...
    t.store
        .write(|d| -> TxResult {
            NAME.set(d, None);
            Ok(())
        })
        .unwrap();

    // ...then stage a new value and fail.
    let result = t.store.write(|d| -> TxResult {
        NAME.set(d, Some("y".to_string()));
        Err("error!".to_string())
    });
    assert!(result.is_err());

    // The removal persisted; the failed write was fully rolled back.
    let snapshot = t.store.make_snapshot().unwrap();
    assert_eq!(NAME.get(&snapshot), None);
    assert!(!t.backend.dump().unwrap().contains_key("b"));
}

// ============================================================================
// Foreign writers
// ============================================================================

#[test]
fn foreign_value_of_wrong_kind_reads_as_default() {
    let t = TestStore::new();

    // A foreign, untyped writer stores a string under the counter's key.
    t.backend
        .set("a", Value::String("not a number".to_string()))
        .unwrap();

    let snapshot = t.store.make_snapshot().unwrap();
    assert_eq!(COUNT.get(&snapshot), 0);
    assert_eq!(snapshot.read::<i64>("a"), None);
    // The raw value is still there; only the typed read degrades.
    assert!(snapshot.contains_key("a"));
}

#[test]
fn remove_all_values_empties_the_backend() {
    let t = TestStore::new();
    t.store
        .write(|d| -> TxResult {
            COUNT.set(d, 1);
            NAME.set(d, Some("alice".to_string()));
            Ok(())
        })
        .unwrap();

    t.store.remove_all_values().unwrap();
    assert!(t.backend.dump().unwrap().is_empty());

    let snapshot = t.store.make_snapshot().unwrap();
    assert_eq!(COUNT.get(&snapshot), 0);
    assert_eq!(NAME.get(&snapshot), None);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_writers_serialize_without_deadlock() {
    use std::thread;

    let t = TestStore::new();
    let writers: Vec<_> = (0..4)
        .map(|i| {
            let store = t.store.clone();
            thread::spawn(move || {
                for j in 0..25i64 {
                    store
                        .write(|d| -> TxResult {
                            d.write(format!("w{i}"), Some(j));
                            Ok(())
                        })
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in writers {
        handle.join().expect("writer thread panicked");
    }

    let dump = t.backend.dump().unwrap();
    for i in 0..4 {
        assert_eq!(dump.get(&format!("w{i}")), Some(&Value::Int(24)));
    }
}
