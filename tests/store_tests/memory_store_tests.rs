//! Tests for MemoryStore
//!
//! These tests verify:
//! - Basic read/write/delete and batched reads
//! - Entry size limit enforcement
//! - Expiry
//! - Failure injection used by the cache tests

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use slabpage::store::{MemoryStore, Store, StoreOptions};
use slabpage::SlabError;

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_write_read() {
    let store = MemoryStore::new(1000);

    assert!(store.write("hello", b"world", &StoreOptions::default()).unwrap());
    assert_eq!(store.read("hello").unwrap(), Some(b"world".to_vec()));
}

#[test]
fn test_read_missing() {
    let store = MemoryStore::new(1000);
    assert_eq!(store.read("nope").unwrap(), None);
}

#[test]
fn test_overwrite() {
    let store = MemoryStore::new(1000);
    let options = StoreOptions::default();

    store.write("k", b"one", &options).unwrap();
    store.write("k", b"two", &options).unwrap();

    assert_eq!(store.read("k").unwrap(), Some(b"two".to_vec()));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_delete() {
    let store = MemoryStore::new(1000);
    store.write("k", b"v", &StoreOptions::default()).unwrap();

    assert!(store.delete("k").unwrap());
    assert!(!store.delete("k").unwrap());
    assert_eq!(store.read("k").unwrap(), None);
}

#[test]
fn test_read_multi_marks_absent_keys() {
    let store = MemoryStore::new(1000);
    let options = StoreOptions::default();
    store.write("a", b"1", &options).unwrap();
    store.write("c", b"3", &options).unwrap();

    let found = store.read_multi(&keys(&["a", "b", "c"])).unwrap();

    assert_eq!(found.len(), 3);
    assert_eq!(found["a"], Some(b"1".to_vec()));
    assert_eq!(found["b"], None);
    assert_eq!(found["c"], Some(b"3".to_vec()));
    assert_eq!(store.multi_read_count(), 1);
}

#[test]
fn test_raw_hint_recorded() {
    let store = MemoryStore::new(1000);

    store.write("page", b"x", &StoreOptions::default().as_raw()).unwrap();
    store.write("manifest", b"y", &StoreOptions::default()).unwrap();

    assert_eq!(store.is_raw("page"), Some(true));
    assert_eq!(store.is_raw("manifest"), Some(false));
    assert_eq!(store.is_raw("missing"), None);
}

// =============================================================================
// Size Limit Tests
// =============================================================================

#[test]
fn test_entry_at_limit_accepted() {
    let store = MemoryStore::new(100);
    let value = vec![0u8; 99];

    assert!(store.write("k", &value, &StoreOptions::default()).unwrap());
}

#[test]
fn test_oversized_entry_refused() {
    let store = MemoryStore::new(100);
    let value = vec![0u8; 100];

    assert!(!store.write("k", &value, &StoreOptions::default()).unwrap());
    assert!(!store.contains_key("k"));
}

// =============================================================================
// Expiry Tests
// =============================================================================

#[test]
fn test_expired_entry_is_absent() {
    let store = MemoryStore::new(1000);
    let options = StoreOptions {
        raw: false,
        expires_in: Some(Duration::from_millis(100)),
    };

    store.write("short", b"lived", &options).unwrap();
    assert!(store.contains_key("short"));

    thread::sleep(Duration::from_millis(300));

    assert_eq!(store.read("short").unwrap(), None);
    assert_eq!(store.read_multi(&keys(&["short"])).unwrap()["short"], None);
    assert!(!store.delete("short").unwrap());
}

// =============================================================================
// Failure Injection Tests
// =============================================================================

#[test]
fn test_fail_nth_write() {
    let store = MemoryStore::new(1000);
    let options = StoreOptions::default();
    store.fail_nth_write(2);

    assert!(store.write("a", b"1", &options).unwrap());
    assert!(!store.write("b", b"2", &options).unwrap());
    assert!(store.write("c", b"3", &options).unwrap());

    assert!(!store.contains_key("b"));
    assert_eq!(store.write_count(), 3);
}

#[test]
fn test_fail_writes_to_key() {
    let store = MemoryStore::new(1000);
    let options = StoreOptions::default();
    store.fail_writes_to("bad");

    assert!(!store.write("bad", b"1", &options).unwrap());
    assert!(!store.write("bad", b"2", &options).unwrap());
    assert!(store.write("good", b"3", &options).unwrap());

    store.clear_failures();
    assert!(store.write("bad", b"4", &options).unwrap());
}

#[test]
fn test_fail_with_error() {
    let store = MemoryStore::new(1000);
    store.fail_writes_to("k");
    store.fail_with_error(true);

    let result = store.write("k", b"v", &StoreOptions::default());
    assert!(matches!(result, Err(SlabError::Backend(_))));
}

#[test]
fn test_out_of_band_changes() {
    let store = MemoryStore::new(1000);
    store.put_out_of_band("k", b"v".to_vec());

    assert!(store.contains_key("k"));
    assert!(store.remove_out_of_band("k"));
    assert!(!store.contains_key("k"));
    assert!(store.is_empty());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_writers() {
    let store = Arc::new(MemoryStore::new(1000));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("t{}_{}", t, i);
                    assert!(store.write(&key, key.as_bytes(), &StoreOptions::default()).unwrap());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 800);
    assert_eq!(store.read("t3_42").unwrap(), Some(b"t3_42".to_vec()));
}
