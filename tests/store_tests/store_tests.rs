//! Tests for Store
//!
//! These tests verify:
//! - Set/get round trips and latest-write-wins
//! - Absence reported as NotFound
//! - Teardown releasing entries and refusing later requests
//! - Concurrent access through the single lock

use std::sync::Arc;
use std::thread;

use kdict::config::Config;
use kdict::store::Store;
use kdict::table::{Key, Value};
use kdict::KdictError;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_store() -> Store {
    Store::new(8).unwrap()
}

fn set(store: &Store, k: &str, v: &str) {
    store.set(&Key::from(k), &Value::from(v)).unwrap();
}

fn get(store: &Store, k: &str) -> kdict::Result<String> {
    store
        .get(&Key::from(k))
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_store_open_from_config() {
    let config = Config::builder().bucket_bits(10).build();
    let store = Store::open(&config).unwrap();

    assert_eq!(store.bucket_count(), 1024);
    assert!(!store.is_torn_down());
}

#[test]
fn test_store_rejects_bad_bucket_bits() {
    assert!(matches!(Store::new(17), Err(KdictError::Config(_))));
    assert!(matches!(Store::new(32), Err(KdictError::Config(_))));
}

#[test]
fn test_store_with_single_bucket() {
    let store = Store::new(0).unwrap();
    assert_eq!(store.bucket_count(), 1);

    set(&store, "a", "1");
    set(&store, "b", "2");
    set(&store, "a", "3");

    assert_eq!(get(&store, "a").unwrap(), "3");
    assert_eq!(get(&store, "b").unwrap(), "2");
    assert!(matches!(get(&store, "c"), Err(KdictError::NotFound)));
    assert_eq!(store.debug_longest_chain(), 2);
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_store_set_get() {
    let store = setup_store();

    set(&store, "foo", "bar");

    assert_eq!(get(&store, "foo").unwrap(), "bar");
}

#[test]
fn test_store_get_missing() {
    let store = setup_store();

    assert!(matches!(get(&store, "missing"), Err(KdictError::NotFound)));
}

#[test]
fn test_store_latest_write_wins() {
    let store = setup_store();

    set(&store, "foo", "bar");
    set(&store, "foo", "baz");

    assert_eq!(get(&store, "foo").unwrap(), "baz");
    assert_eq!(store.debug_entry_count(), 1);
}

#[test]
fn test_store_multiple_keys() {
    let store = setup_store();

    set(&store, "a", "1");
    set(&store, "b", "2");

    assert_eq!(get(&store, "a").unwrap(), "1");
    assert_eq!(get(&store, "b").unwrap(), "2");
}

#[test]
fn test_store_empty_value_is_not_absence() {
    let store = setup_store();

    set(&store, "blank", "");

    assert_eq!(get(&store, "blank").unwrap(), "");
}

// =============================================================================
// Teardown Tests
// =============================================================================

#[test]
fn test_teardown_releases_entries() {
    let store = setup_store();
    set(&store, "a", "1");
    set(&store, "b", "2");
    set(&store, "a", "3");

    assert_eq!(store.teardown(), 2);
    assert!(store.is_torn_down());
    assert_eq!(store.debug_entry_count(), 0);
}

#[test]
fn test_requests_after_teardown_are_refused() {
    let store = setup_store();
    set(&store, "foo", "bar");
    store.teardown();

    assert!(matches!(get(&store, "foo"), Err(KdictError::ShuttingDown)));
    assert!(matches!(
        store.set(&Key::from("foo"), &Value::from("baz")),
        Err(KdictError::ShuttingDown)
    ));
}

#[test]
fn test_teardown_twice_is_noop() {
    let store = setup_store();
    set(&store, "foo", "bar");

    assert_eq!(store.teardown(), 1);
    assert_eq!(store.teardown(), 0);
}

#[test]
fn test_teardown_waits_for_in_flight_writers() {
    let store = Arc::new(setup_store());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let mut ok = 0usize;
                for i in 0..500 {
                    let k = Key::from(format!("t{}-{}", t, i).as_str());
                    match store.set(&k, &Value::from("v")) {
                        Ok(()) => ok += 1,
                        Err(KdictError::ShuttingDown) => break,
                        Err(e) => panic!("unexpected error: {}", e),
                    }
                }
                ok
            })
        })
        .collect();

    let released = store.teardown();
    let accepted: usize = writers.into_iter().map(|h| h.join().unwrap()).sum();

    // Every write that succeeded happened before teardown took the table
    assert_eq!(released, accepted);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_disjoint_writers() {
    let store = Arc::new(setup_store());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..200 {
                    let k = format!("thread{}_key{}", t, i);
                    let v = format!("thread{}_value{}", t, i);
                    store.set(&Key::from(k.as_str()), &Value::from(v.as_str())).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.debug_entry_count(), 8 * 200);
    for t in 0..8 {
        for i in 0..200 {
            let expected = format!("thread{}_value{}", t, i);
            assert_eq!(get(&store, &format!("thread{}_key{}", t, i)).unwrap(), expected);
        }
    }
}

#[test]
fn test_concurrent_overlapping_keys_no_duplicates() {
    let store = Arc::new(setup_store());
    let keys = ["shared0", "shared1", "shared2", "shared3"];

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..500 {
                    let k = keys[i % keys.len()];
                    let v = format!("{}:{}", t, i);
                    store.set(&Key::from(k), &Value::from(v.as_str())).unwrap();
                    // Reads interleave with other writers; a value must always exist
                    let read = store.get(&Key::from(k)).unwrap();
                    assert!(read.as_bytes().contains(&b':'));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.debug_entry_count(), keys.len());
    for k in keys {
        let v = get(&store, k).unwrap();
        let (t, i) = v.split_once(':').unwrap();
        assert!(t.parse::<usize>().unwrap() < 8);
        assert!(i.parse::<usize>().unwrap() < 500);
    }
}

#[test]
fn test_get_observes_completed_set() {
    let store = Arc::new(setup_store());

    for round in 0..100 {
        let v = format!("round{}", round);
        let writer = {
            let store = Arc::clone(&store);
            let v = v.clone();
            thread::spawn(move || set(&store, "k", &v))
        };
        writer.join().unwrap();

        assert_eq!(get(&store, "k").unwrap(), v);
    }
}
