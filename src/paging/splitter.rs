//! Page Splitter
//!
//! Pure functions, no I/O.

use crate::error::{Result, SlabError};

/// Bytes of payload one page can hold for a base key of `key_len` bytes
///
/// Fails with `KeyTooLong` when the limits leave no room for data.
pub fn slice_size(key_len: usize, max_entry_size: usize, header_overhead: usize) -> Result<usize> {
    match max_entry_size
        .checked_sub(header_overhead)
        .and_then(|room| room.checked_sub(key_len))
    {
        Some(size) if size > 0 => Ok(size),
        _ => Err(SlabError::KeyTooLong {
            key_len,
            max_entry_size,
            header_overhead,
        }),
    }
}

/// Number of pages a payload of `len` bytes needs (never zero)
pub fn page_count(len: usize, slice_size: usize) -> usize {
    len.div_ceil(slice_size).max(1)
}

/// Split a payload into ordered slices
///
/// Every slice is exactly `slice_size` bytes except the last, which holds the
/// remainder. An empty payload yields a single empty slice.
pub fn split<'a>(
    payload: &'a [u8],
    key_len: usize,
    max_entry_size: usize,
    header_overhead: usize,
) -> Result<Vec<&'a [u8]>> {
    let size = slice_size(key_len, max_entry_size, header_overhead)?;

    if payload.is_empty() {
        return Ok(vec![payload]);
    }

    let slices: Vec<&[u8]> = payload.chunks(size).collect();
    debug_assert_eq!(slices.len(), page_count(payload.len(), size));

    Ok(slices)
}
