//! Compression support for compressed envelopes

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlabError};

/// Compression algorithm recorded inside a compressed envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// zlib-framed deflate stream
    Deflate,
}

/// Compress data using specified algorithm
pub fn compress(data: &[u8], algorithm: CompressionAlgorithm, level: u32) -> Result<Vec<u8>> {
    match algorithm {
        CompressionAlgorithm::Deflate => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
            encoder
                .write_all(data)
                .map_err(|e| SlabError::Compression(format!("Failed to compress: {}", e)))?;
            encoder
                .finish()
                .map_err(|e| SlabError::Compression(format!("Failed to finish compression: {}", e)))
        }
    }
}

/// Decompress data using specified algorithm
pub fn decompress(data: &[u8], algorithm: CompressionAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        CompressionAlgorithm::Deflate => {
            let mut decoder = ZlibDecoder::new(data);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| SlabError::Compression(format!("Failed to decompress: {}", e)))?;
            Ok(out)
        }
    }
}
