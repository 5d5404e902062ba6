//! Envelope framing and the EntryCodec
//!
//! Serialization is bincode throughout; compression wraps the value's
//! serialized bytes, never the envelope itself.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlabError};

use super::compression::{compress, decompress, CompressionAlgorithm};

/// Compressed serialization of a logical value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressedEnvelope {
    /// Algorithm used to produce `data`
    pub algorithm: CompressionAlgorithm,

    /// Compressed bincode serialization of the value
    pub data: Vec<u8>,
}

impl CompressedEnvelope {
    /// Serialize-then-compress a value
    pub fn wrap(serialized: &[u8], algorithm: CompressionAlgorithm, level: u32) -> Result<Self> {
        Ok(Self {
            algorithm,
            data: compress(serialized, algorithm, level)?,
        })
    }

    /// Recover the value's serialized bytes
    pub fn unwrap_bytes(&self) -> Result<Vec<u8>> {
        decompress(&self.data, self.algorithm)
    }
}

/// Top-level frame of every encoded payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Envelope {
    /// bincode serialization of the value as-is
    Plain(Vec<u8>),

    /// Value compressed at write time
    Compressed(CompressedEnvelope),
}

/// Converts values to EncodedPayload bytes and back
#[derive(Debug, Clone, Copy)]
pub struct EntryCodec {
    algorithm: CompressionAlgorithm,
    level: u32,
}

impl Default for EntryCodec {
    fn default() -> Self {
        Self::new(6)
    }
}

impl EntryCodec {
    /// Create a codec using deflate at the given level
    pub fn new(level: u32) -> Self {
        Self {
            algorithm: CompressionAlgorithm::Deflate,
            level,
        }
    }

    /// Encode a value, optionally inside a compressed envelope
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T, compress: bool) -> Result<Vec<u8>> {
        let serialized =
            bincode::serialize(value).map_err(|e| SlabError::Serialization(e.to_string()))?;

        let envelope = if compress {
            let wrapped = CompressedEnvelope::wrap(&serialized, self.algorithm, self.level)?;
            tracing::trace!(
                original = serialized.len(),
                compressed = wrapped.data.len(),
                "Compressed entry"
            );
            Envelope::Compressed(wrapped)
        } else {
            Envelope::Plain(serialized)
        };

        bincode::serialize(&envelope).map_err(|e| SlabError::Serialization(e.to_string()))
    }

    /// Decode an EncodedPayload back into a value
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T> {
        let envelope: Envelope = bincode::deserialize(bytes)?;

        let serialized = match envelope {
            Envelope::Plain(serialized) => serialized,
            Envelope::Compressed(wrapped) => wrapped.unwrap_bytes()?,
        };

        Ok(bincode::deserialize(&serialized)?)
    }
}
