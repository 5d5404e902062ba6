//! Manifest encoding
//!
//! ## Format
//! ```text
//! Raw:   ┌─────────┬────────────────────────────────────────────┐
//!        │ 0x00    │ EncodedPayload                             │
//!        └─────────┴────────────────────────────────────────────┘
//! Paged: ┌─────────┬───────────┬─────────────────┬─────────────┐
//!        │ 0x01    │ Count (4) │ Payload Len (8) │ CRC32 (4)   │
//!        └─────────┴───────────┴─────────────────┴─────────────┘
//! ```
//! Integers are big-endian.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{Result, SlabError};

/// Tag byte of a raw manifest
pub const TAG_RAW: u8 = 0x00;

/// Tag byte of a paged manifest
pub const TAG_PAGED: u8 = 0x01;

/// Encoded length of a paged manifest: tag + count + len + crc
pub const MANIFEST_PAGED_LEN: usize = 1 + 4 + 8 + 4;

/// Contents of page 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Manifest {
    /// The whole payload fit in one page
    Raw(Vec<u8>),

    /// Payload lives in pages 1..=page_count
    Paged {
        page_count: u32,
        payload_len: u64,
        checksum: u32,
    },
}

impl Manifest {
    /// Build a paged manifest describing `payload`
    pub fn paged(payload: &[u8], page_count: usize) -> Result<Self> {
        let page_count = u32::try_from(page_count).map_err(|_| {
            SlabError::Serialization(format!("page count {} exceeds u32", page_count))
        })?;

        Ok(Manifest::Paged {
            page_count,
            payload_len: payload.len() as u64,
            checksum: crc32fast::hash(payload),
        })
    }

    /// Serialize the manifest
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Manifest::Raw(payload) => {
                let mut buf = BytesMut::with_capacity(1 + payload.len());
                buf.put_u8(TAG_RAW);
                buf.put_slice(payload);
                buf.to_vec()
            }
            Manifest::Paged {
                page_count,
                payload_len,
                checksum,
            } => {
                let mut buf = BytesMut::with_capacity(MANIFEST_PAGED_LEN);
                buf.put_u8(TAG_PAGED);
                buf.put_u32(*page_count);
                buf.put_u64(*payload_len);
                buf.put_u32(*checksum);
                buf.to_vec()
            }
        }
    }

    /// Parse manifest bytes read from page 0
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut buf = bytes;
        if !buf.has_remaining() {
            return Err(SlabError::Decode("empty manifest".to_string()));
        }

        match buf.get_u8() {
            TAG_RAW => Ok(Manifest::Raw(buf.to_vec())),
            TAG_PAGED => {
                if bytes.len() != MANIFEST_PAGED_LEN {
                    return Err(SlabError::Decode(format!(
                        "paged manifest: expected {} bytes, got {}",
                        MANIFEST_PAGED_LEN,
                        bytes.len()
                    )));
                }
                let page_count = buf.get_u32();
                let payload_len = buf.get_u64();
                let checksum = buf.get_u32();

                if page_count < 2 {
                    return Err(SlabError::Decode(format!(
                        "paged manifest with page count {}",
                        page_count
                    )));
                }

                Ok(Manifest::Paged {
                    page_count,
                    payload_len,
                    checksum,
                })
            }
            tag => Err(SlabError::Decode(format!(
                "Unknown manifest tag: 0x{:02x}",
                tag
            ))),
        }
    }

    /// Number of payload pages this manifest refers to (0 for raw)
    pub fn payload_pages(&self) -> usize {
        match self {
            Manifest::Raw(_) => 0,
            Manifest::Paged { page_count, .. } => *page_count as usize,
        }
    }
}
