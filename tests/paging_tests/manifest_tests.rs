//! Tests for Manifest encoding

use slabpage::paging::{Manifest, MANIFEST_PAGED_LEN, TAG_PAGED, TAG_RAW};
use slabpage::SlabError;

#[test]
fn test_raw_manifest_layout() {
    let manifest = Manifest::Raw(b"payload".to_vec());
    let encoded = manifest.encode();

    assert_eq!(encoded[0], TAG_RAW);
    assert_eq!(&encoded[1..], b"payload");
    assert_eq!(Manifest::decode(&encoded).unwrap(), manifest);
}

#[test]
fn test_raw_manifest_with_empty_payload() {
    let encoded = Manifest::Raw(vec![]).encode();

    assert_eq!(encoded, vec![TAG_RAW]);
    assert_eq!(Manifest::decode(&encoded).unwrap(), Manifest::Raw(vec![]));
}

#[test]
fn test_paged_manifest_layout() {
    let payload = vec![3u8; 1800];
    let manifest = Manifest::paged(&payload, 3).unwrap();
    let encoded = manifest.encode();

    assert_eq!(encoded.len(), MANIFEST_PAGED_LEN);
    assert_eq!(encoded[0], TAG_PAGED);
    assert_eq!(&encoded[1..5], &3u32.to_be_bytes());
    assert_eq!(&encoded[5..13], &1800u64.to_be_bytes());
    assert_eq!(&encoded[13..17], &crc32fast::hash(&payload).to_be_bytes());

    assert_eq!(Manifest::decode(&encoded).unwrap(), manifest);
    assert_eq!(manifest.payload_pages(), 3);
}

#[test]
fn test_raw_payload_starting_with_paged_tag_stays_raw() {
    // Payload bytes that look like a paged manifest must not be confused
    let mut payload = vec![TAG_PAGED];
    payload.extend_from_slice(&[0, 0, 0, 9]);
    let encoded = Manifest::Raw(payload.clone()).encode();

    assert_eq!(Manifest::decode(&encoded).unwrap(), Manifest::Raw(payload));
}

#[test]
fn test_decode_empty_manifest() {
    assert!(matches!(Manifest::decode(&[]), Err(SlabError::Decode(_))));
}

#[test]
fn test_decode_unknown_tag() {
    let result = Manifest::decode(&[0x7F, 1, 2]);
    assert!(result.unwrap_err().to_string().contains("Unknown manifest tag"));
}

#[test]
fn test_decode_truncated_paged_manifest() {
    let encoded = Manifest::paged(&[1, 2, 3], 2).unwrap().encode();
    let result = Manifest::decode(&encoded[..10]);

    assert!(matches!(result, Err(SlabError::Decode(_))));
}

#[test]
fn test_decode_paged_manifest_with_single_page() {
    let encoded = Manifest::Paged { page_count: 1, payload_len: 5, checksum: 0 }.encode();
    assert!(matches!(Manifest::decode(&encoded), Err(SlabError::Decode(_))));
}
