//! Paging Module
//!
//! Splits an encoded payload into slab-sized pages and describes them with a
//! manifest stored at page 0.
//!
//! ## Key Layout
//! ```text
//! {key}_0   manifest (Raw payload, or Paged { count, len, crc })
//! {key}_1   payload[0 .. S]
//! {key}_2   payload[S .. 2S]
//! ...
//! {key}_N   payload[(N-1)S .. len]
//! ```
//!
//! `S = max_entry_size - header_overhead - key.len()`, a function of the
//! backend limits and key length only.

mod keys;
mod manifest;
mod splitter;

pub use keys::{manifest_key, page_key, payload_keys};
pub use manifest::{Manifest, MANIFEST_PAGED_LEN, TAG_PAGED, TAG_RAW};
pub use splitter::{page_count, slice_size, split};
