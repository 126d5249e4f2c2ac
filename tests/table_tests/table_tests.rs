//! Table Tests
//!
//! Tests verify:
//! - Bounded buffer truncation and termination
//! - Insert and exact-match lookup
//! - Overwrite in place (no duplicate entries)
//! - Collision handling when many keys share a bucket
//! - Out-of-range keys collapsing onto their truncated form

use kdict::table::{
    bucket_index, jhash, HashIndex, Key, Value, KEY_CAPACITY, VALUE_CAPACITY,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn key(s: &str) -> Key {
    Key::from(s)
}

fn value(s: &str) -> Value {
    Value::from(s)
}

// =============================================================================
// Bounded Buffer Tests
// =============================================================================

#[test]
fn test_key_and_value_capacities() {
    assert_eq!(Key::CAPACITY, KEY_CAPACITY);
    assert_eq!(Key::MAX_LEN, 63);
    assert_eq!(Value::CAPACITY, VALUE_CAPACITY);
    assert_eq!(Value::MAX_LEN, 255);
}

#[test]
fn test_oversized_key_truncated_to_63_bytes() {
    let long = "k".repeat(100);
    let k = key(&long);

    assert_eq!(k.len(), 63);
    assert_eq!(k.as_bytes(), &long.as_bytes()[..63]);
    assert_eq!(k.as_raw()[63], 0);
}

#[test]
fn test_oversized_value_truncated_to_255_bytes() {
    let long = vec![b'v'; 1000];
    let v = Value::from_raw(&long);

    assert_eq!(v.len(), 255);
    assert_eq!(v.as_raw()[255], 0);
}

#[test]
fn test_truncation_is_deterministic() {
    let long = vec![0xABu8; 300];
    let first = Value::from_raw(&long);
    let second = Value::from_raw(&long);

    assert_eq!(first, second);
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn test_unterminated_full_buffer_is_terminated() {
    // Exactly CAPACITY bytes with no NUL, as a caller might send
    let raw = [b'x'; KEY_CAPACITY];
    let k = Key::from_raw(&raw);

    assert_eq!(k.len(), KEY_CAPACITY - 1);
    assert_eq!(k.as_raw()[KEY_CAPACITY - 1], 0);
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_index_is_empty() {
    let index = HashIndex::new(8);

    assert_eq!(index.bucket_count(), 256);
    assert_eq!(index.debug_entry_count(), 0);
    assert!(index.find(&key("anything")).is_none());
}

#[test]
fn test_upsert_and_find() {
    let mut index = HashIndex::new(8);

    index.upsert(&key("foo"), &value("bar")).unwrap();

    let entry = index.find(&key("foo")).expect("entry should exist");
    assert_eq!(entry.key().as_bytes(), b"foo");
    assert_eq!(entry.value().as_bytes(), b"bar");
}

#[test]
fn test_find_missing_key() {
    let mut index = HashIndex::new(8);
    index.upsert(&key("foo"), &value("bar")).unwrap();

    assert!(index.find(&key("fo")).is_none());
    assert!(index.find(&key("foo2")).is_none());
}

#[test]
fn test_upsert_overwrites_existing() {
    let mut index = HashIndex::new(8);

    index.upsert(&key("foo"), &value("a much longer first value")).unwrap();
    index.upsert(&key("foo"), &value("baz")).unwrap();

    let entry = index.find(&key("foo")).unwrap();
    assert_eq!(entry.value().as_bytes(), b"baz");
    // Full replace: nothing of the old value survives past the new data
    assert!(entry.value().as_raw()[3..].iter().all(|&b| b == 0));
    assert_eq!(index.debug_entry_count(), 1);
}

#[test]
fn test_empty_key_is_a_valid_key() {
    let mut index = HashIndex::new(8);

    index.upsert(&key(""), &value("empty")).unwrap();

    assert_eq!(index.find(&key("")).unwrap().value().as_bytes(), b"empty");
}

#[test]
fn test_keys_equal_after_truncation_share_an_entry() {
    let mut index = HashIndex::new(8);
    let prefix = "p".repeat(63);

    index.upsert(&key(&format!("{}A", prefix)), &value("1")).unwrap();
    index.upsert(&key(&format!("{}B", prefix)), &value("2")).unwrap();

    assert_eq!(index.debug_entry_count(), 1);
    assert_eq!(index.find(&key(&prefix)).unwrap().value().as_bytes(), b"2");
}

// =============================================================================
// Collision Tests
// =============================================================================

#[test]
fn test_single_bucket_keeps_keys_distinct() {
    // bits = 0: every key shares the one chain
    let mut index = HashIndex::new(0);
    assert_eq!(index.bucket_count(), 1);

    for i in 0..100 {
        index
            .upsert(&key(&format!("key{}", i)), &value(&format!("value{}", i)))
            .unwrap();
    }

    assert_eq!(index.debug_entry_count(), 100);
    assert_eq!(index.debug_longest_chain(), 100);
    for i in 0..100 {
        let entry = index.find(&key(&format!("key{}", i))).unwrap();
        assert_eq!(entry.value().as_bytes(), format!("value{}", i).as_bytes());
    }
}

#[test]
fn test_colliding_keys_isolated_regardless_of_order() {
    // Find two distinct keys that land in the same bucket of a 256-bucket table
    let bucket_of = |s: &str| bucket_index(jhash(s.as_bytes(), 0), 8);
    let a = "collide-0".to_string();
    let b = (1..10_000)
        .map(|i| format!("collide-{}", i))
        .find(|s| bucket_of(s) == bucket_of(&a))
        .expect("a colliding key exists");

    for (first, second) in [(&a, &b), (&b, &a)] {
        let mut index = HashIndex::new(8);
        index.upsert(&key(first), &value("first")).unwrap();
        index.upsert(&key(second), &value("second")).unwrap();

        assert_eq!(index.find(&key(first)).unwrap().value().as_bytes(), b"first");
        assert_eq!(index.find(&key(second)).unwrap().value().as_bytes(), b"second");
        assert_eq!(index.debug_longest_chain(), 2);
    }
}

#[test]
fn test_index_never_resizes() {
    let mut index = HashIndex::new(4);

    for i in 0..1000 {
        index.upsert(&key(&format!("k{}", i)), &value("v")).unwrap();
    }

    // Chains grow instead
    assert_eq!(index.bucket_count(), 16);
    assert_eq!(index.debug_entry_count(), 1000);
    assert!(index.debug_longest_chain() > 1000 / 16);
}
