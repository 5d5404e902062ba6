//! Entry Codec Module
//!
//! Turns a logical value into the byte payload that gets paged, and back.
//!
//! ## Payload Layout
//! ```text
//! EncodedPayload = bincode(Envelope)
//!
//!   Envelope::Plain(bincode(value))
//!   Envelope::Compressed(CompressedEnvelope { algorithm, data: deflate(bincode(value)) })
//! ```
//!
//! The envelope tag is what tells `decode` whether a decompression step is
//! needed, so plain and compressed entries can coexist under the same cache.

mod compression;
mod envelope;

pub use compression::{compress, decompress, CompressionAlgorithm};
pub use envelope::{CompressedEnvelope, EntryCodec, Envelope};
