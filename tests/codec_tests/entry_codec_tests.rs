//! Tests for the Entry Codec
//!
//! These tests verify:
//! - Plain and compressed values decode back to the original
//! - Envelope framing selects the decompression path
//! - Malformed payloads surface decode/compression errors

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use slabpage::codec::{
    compress, decompress, CompressedEnvelope, CompressionAlgorithm, EntryCodec, Envelope,
};
use slabpage::SlabError;

// =============================================================================
// Helper Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Report {
    id: u64,
    title: String,
    tags: Vec<String>,
    sections: BTreeMap<String, Vec<u32>>,
    parent: Option<Box<Report>>,
}

fn sample_report() -> Report {
    let mut sections = BTreeMap::new();
    sections.insert("intro".to_string(), vec![1, 2, 3]);
    sections.insert("body".to_string(), (0..500).collect());

    Report {
        id: 42,
        title: "quarterly".to_string(),
        tags: vec!["a".to_string(), "b".to_string()],
        sections,
        parent: Some(Box::new(Report {
            id: 1,
            title: "root".to_string(),
            tags: vec![],
            sections: BTreeMap::new(),
            parent: None,
        })),
    }
}

/// Deterministic high-entropy bytes (xorshift)
fn noise(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_plain_nested_value() {
    let codec = EntryCodec::default();
    let report = sample_report();

    let bytes = codec.encode(&report, false).unwrap();
    let decoded: Report = codec.decode(&bytes).unwrap();

    assert_eq!(decoded, report);
}

#[test]
fn test_compressed_nested_value() {
    let codec = EntryCodec::default();
    let report = sample_report();

    let bytes = codec.encode(&report, true).unwrap();
    let decoded: Report = codec.decode(&bytes).unwrap();

    assert_eq!(decoded, report);
}

#[test]
fn test_compressed_empty_collections() {
    let codec = EntryCodec::default();

    let empty_vec: Vec<String> = Vec::new();
    let decoded: Vec<String> = codec.decode(&codec.encode(&empty_vec, true).unwrap()).unwrap();
    assert!(decoded.is_empty());

    let empty_map: BTreeMap<String, u32> = BTreeMap::new();
    let decoded: BTreeMap<String, u32> =
        codec.decode(&codec.encode(&empty_map, true).unwrap()).unwrap();
    assert!(decoded.is_empty());

    let decoded: String = codec.decode(&codec.encode("", true).unwrap()).unwrap();
    assert_eq!(decoded, "");
}

#[test]
fn test_compressed_repetitive_payload_shrinks() {
    let codec = EntryCodec::default();
    let value = "abcdefgh".repeat(50_000);

    let plain = codec.encode(&value, false).unwrap();
    let compressed = codec.encode(&value, true).unwrap();

    assert!(compressed.len() * 10 < plain.len());
    let decoded: String = codec.decode(&compressed).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_compressed_high_entropy_payload() {
    let codec = EntryCodec::new(9);
    let value = noise(200_000);

    let compressed = codec.encode(&value, true).unwrap();
    let decoded: Vec<u8> = codec.decode(&compressed).unwrap();

    assert_eq!(decoded, value);
}

#[test]
fn test_plain_and_compressed_share_decoder() {
    let codec = EntryCodec::default();
    let value = vec![1u32, 2, 3];

    let plain = codec.encode(&value, false).unwrap();
    let compressed = codec.encode(&value, true).unwrap();

    assert_ne!(plain, compressed);
    assert_eq!(codec.decode::<Vec<u32>>(&plain).unwrap(), value);
    assert_eq!(codec.decode::<Vec<u32>>(&compressed).unwrap(), value);
}

// =============================================================================
// Envelope Framing Tests
// =============================================================================

#[test]
fn test_plain_envelope_wraps_serialized_value() {
    let codec = EntryCodec::default();
    let bytes = codec.encode(&7u64, false).unwrap();

    let envelope: Envelope = bincode::deserialize(&bytes).unwrap();
    assert_eq!(envelope, Envelope::Plain(bincode::serialize(&7u64).unwrap()));
}

#[test]
fn test_compressed_envelope_is_byte_exact() {
    let codec = EntryCodec::default();
    let report = sample_report();
    let serialized = bincode::serialize(&report).unwrap();

    let bytes = codec.encode(&report, true).unwrap();
    let envelope: Envelope = bincode::deserialize(&bytes).unwrap();

    match envelope {
        Envelope::Compressed(wrapped) => {
            assert_eq!(wrapped.algorithm, CompressionAlgorithm::Deflate);
            assert_eq!(wrapped.unwrap_bytes().unwrap(), serialized);
        }
        Envelope::Plain(_) => panic!("Expected compressed envelope"),
    }
}

#[test]
fn test_compression_functions() {
    let data = b"Hello, World! This is a test of deflate compression. ".repeat(10);
    let compressed = compress(&data, CompressionAlgorithm::Deflate, 6).unwrap();

    assert!(compressed.len() < data.len());
    assert_eq!(decompress(&compressed, CompressionAlgorithm::Deflate).unwrap(), data);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_malformed_payload_is_decode_error() {
    let codec = EntryCodec::default();
    let result = codec.decode::<String>(&[0xFF, 0xFF, 0xFF, 0xFF, 0x01]);

    assert!(matches!(result, Err(SlabError::Decode(_))));
}

#[test]
fn test_truncated_payload_is_decode_error() {
    let codec = EntryCodec::default();
    let mut bytes = codec.encode(&"a fairly long string value".to_string(), false).unwrap();
    bytes.truncate(bytes.len() - 5);

    assert!(matches!(codec.decode::<String>(&bytes), Err(SlabError::Decode(_))));
}

#[test]
fn test_corrupt_compressed_data_is_compression_error() {
    let codec = EntryCodec::default();
    let envelope = Envelope::Compressed(CompressedEnvelope {
        algorithm: CompressionAlgorithm::Deflate,
        data: vec![0x00, 0x11, 0x22, 0x33],
    });
    let bytes = bincode::serialize(&envelope).unwrap();

    assert!(matches!(
        codec.decode::<String>(&bytes),
        Err(SlabError::Compression(_))
    ));
}

#[test]
fn test_wrong_type_is_decode_error() {
    let codec = EntryCodec::default();
    let bytes = codec.encode(&true, false).unwrap();

    assert!(matches!(codec.decode::<String>(&bytes), Err(SlabError::Decode(_))));
}
