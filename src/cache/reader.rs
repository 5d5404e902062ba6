//! Paged Reader

use crate::error::{Result, SlabError};
use crate::paging::{self, manifest_key, payload_keys, Manifest};
use crate::store::Store;

use super::PagedCache;

impl<S: Store> PagedCache<S> {
    /// Read and reassemble the encoded payload of `key`
    ///
    /// Returns `None` on a missing manifest, a missing page, or a payload that
    /// does not match the manifest's length and checksum.
    pub(crate) fn read_payload(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let Some(bytes) = self.store.read(&manifest_key(key))? else {
            return Ok(None);
        };

        let (page_count, payload_len, checksum) = match Manifest::decode(&bytes)? {
            Manifest::Raw(payload) => return Ok(Some(payload)),
            Manifest::Paged {
                page_count,
                payload_len,
                checksum,
            } => (page_count as usize, payload_len, checksum),
        };

        self.check_layout(key, page_count, payload_len)?;

        let keys = payload_keys(key, page_count);
        let mut found = self.store.read_multi(&keys)?;
        tracing::trace!("{}: multi-read of {} pages", key, page_count);

        let received = found.values().flatten().map(Vec::len).sum();
        let mut payload = Vec::with_capacity(received);

        for page in &keys {
            match found.remove(page).flatten() {
                Some(slice) => payload.extend_from_slice(&slice),
                None => {
                    tracing::debug!("{}: page {} missing, treating as miss", key, page);
                    return Ok(None);
                }
            }
        }

        if payload.len() as u64 != payload_len || crc32fast::hash(&payload) != checksum {
            tracing::warn!(
                "{}: reassembled {} bytes do not match manifest ({} bytes), treating as miss",
                key,
                payload.len(),
                payload_len
            );
            return Ok(None);
        }

        Ok(Some(payload))
    }

    /// Check that a paged manifest describes the layout these limits produce
    ///
    /// A writer splits `payload_len` bytes into exactly
    /// `page_count(payload_len, slice_size)` pages; any other count is a
    /// corrupt manifest.
    pub(crate) fn check_layout(&self, key: &str, page_count: usize, payload_len: u64) -> Result<()> {
        let layout = usize::try_from(payload_len).ok().and_then(|len| {
            let slice = self.config.slice_size(key.len()).ok()?;
            Some(paging::page_count(len, slice))
        });

        if layout != Some(page_count) {
            return Err(SlabError::Decode(format!(
                "manifest of {} claims {} pages for {} bytes",
                key, page_count, payload_len
            )));
        }
        Ok(())
    }
}
