//! Tests for the Page Splitter
//!
//! These tests verify:
//! - Slice size derivation from limits and key length
//! - Page counts follow ceil(len / slice_size), never zero
//! - Slices concatenate back to the payload

use slabpage::paging::{manifest_key, page_count, page_key, payload_keys, slice_size, split};
use slabpage::{Config, SlabError};

// =============================================================================
// Slice Size Tests
// =============================================================================

#[test]
fn test_slice_size_reference_limits() {
    assert_eq!(slice_size(1, 1000, 100).unwrap(), 899);
    assert_eq!(slice_size(5, 1024 * 1024, 100).unwrap(), 1_048_471);
}

#[test]
fn test_slice_size_from_config() {
    let config = Config::builder().max_entry_size(1000).header_overhead(100).build();
    assert_eq!(config.slice_size(3).unwrap(), 897);
}

#[test]
fn test_slice_size_shrinks_with_key_length() {
    let short = slice_size(1, 1000, 100).unwrap();
    let long = slice_size(400, 1000, 100).unwrap();

    assert_eq!(short - long, 399);
}

#[test]
fn test_key_too_long() {
    let result = slice_size(900, 1000, 100);
    match result {
        Err(SlabError::KeyTooLong { key_len, max_entry_size, header_overhead }) => {
            assert_eq!(key_len, 900);
            assert_eq!(max_entry_size, 1000);
            assert_eq!(header_overhead, 100);
        }
        other => panic!("Expected KeyTooLong, got {:?}", other),
    }

    assert!(matches!(slice_size(5000, 1000, 100), Err(SlabError::KeyTooLong { .. })));
    assert!(matches!(slice_size(0, 100, 200), Err(SlabError::KeyTooLong { .. })));
    assert_eq!(slice_size(899, 1000, 100).unwrap(), 1);
}

// =============================================================================
// Page Count Tests
// =============================================================================

#[test]
fn test_page_count() {
    assert_eq!(page_count(0, 899), 1);
    assert_eq!(page_count(1, 899), 1);
    assert_eq!(page_count(899, 899), 1);
    assert_eq!(page_count(900, 899), 2);
    assert_eq!(page_count(1798, 899), 2);
    assert_eq!(page_count(1800, 899), 3);
}

// =============================================================================
// Split Tests
// =============================================================================

#[test]
fn test_split_concrete_scenario() {
    let payload: Vec<u8> = (0..1800u32).map(|i| (i % 251) as u8).collect();
    let slices = split(&payload, 1, 1000, 100).unwrap();

    let sizes: Vec<usize> = slices.iter().map(|s| s.len()).collect();
    assert_eq!(sizes, vec![899, 899, 2]);
    assert_eq!(slices.concat(), payload);
}

#[test]
fn test_split_exact_multiple_keeps_every_slice() {
    let payload = vec![7u8; 899 * 2];
    let slices = split(&payload, 1, 1000, 100).unwrap();

    assert_eq!(slices.len(), 2);
    assert_eq!(slices.len(), page_count(payload.len(), 899));
    assert!(slices.iter().all(|s| s.len() == 899));
}

#[test]
fn test_split_small_payload_single_slice() {
    let payload = b"tiny".to_vec();
    let slices = split(&payload, 1, 1000, 100).unwrap();

    assert_eq!(slices, vec![payload.as_slice()]);
}

#[test]
fn test_split_empty_payload() {
    let slices = split(&[], 1, 1000, 100).unwrap();

    assert_eq!(slices.len(), 1);
    assert!(slices[0].is_empty());
}

#[test]
fn test_split_never_yields_empty_slice() {
    for len in [1usize, 50, 99, 100, 101, 999, 1000, 1001] {
        let payload = vec![1u8; len];
        let slices = split(&payload, 10, 120, 10).unwrap();

        assert!(slices.iter().all(|s| !s.is_empty()), "len {}", len);
        assert_eq!(slices.len(), page_count(len, 100));
        assert_eq!(slices.concat(), payload);
    }
}

#[test]
fn test_split_longer_key_more_pages() {
    let payload = vec![0u8; 1000];

    let short_key = split(&payload, 1, 1000, 100).unwrap();
    let long_key = split(&payload, 500, 1000, 100).unwrap();

    assert_eq!(short_key.len(), 2);
    assert_eq!(long_key.len(), 3);
}

#[test]
fn test_split_key_too_long() {
    let result = split(b"data", 950, 1000, 100);
    assert!(matches!(result, Err(SlabError::KeyTooLong { .. })));
}

// =============================================================================
// Key Derivation Tests
// =============================================================================

#[test]
fn test_page_keys() {
    assert_eq!(manifest_key("k"), "k_0");
    assert_eq!(page_key("user:42", 7), "user:42_7");
    assert_eq!(payload_keys("k", 3), vec!["k_1", "k_2", "k_3"]);
    assert!(payload_keys("k", 0).is_empty());
}
