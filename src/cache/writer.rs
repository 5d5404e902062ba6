//! Paged Writer

use crate::error::Result;
use crate::paging::{manifest_key, page_key, split, Manifest};
use crate::store::{Store, StoreOptions};

use super::PagedCache;

impl<S: Store> PagedCache<S> {
    /// Write an already encoded payload under `key`
    ///
    /// One slice goes to page 0 as a raw manifest. Otherwise pages 1..N are
    /// written in order with the raw hint and the page count goes to page 0
    /// last; the first refused page aborts the write.
    pub(crate) fn write_payload(
        &self,
        key: &str,
        payload: &[u8],
        options: &StoreOptions,
    ) -> Result<bool> {
        let slices = split(
            payload,
            key.len(),
            self.config.max_entry_size,
            self.config.header_overhead,
        )?;

        if slices.len() == 1 {
            tracing::trace!("{}: raw manifest, {} bytes", key, payload.len());
            let manifest = Manifest::Raw(payload.to_vec());
            return Ok(self.put(&manifest_key(key), &manifest.encode(), options));
        }

        let page_options = options.as_raw();
        for (index, slice) in slices.iter().enumerate() {
            let page = page_key(key, index + 1);
            if !self.put(&page, slice, &page_options) {
                tracing::warn!(
                    "{}: page {} of {} refused, abandoning write",
                    key,
                    index + 1,
                    slices.len()
                );
                return Ok(false);
            }
        }

        let manifest = Manifest::paged(payload, slices.len())?;
        tracing::debug!("{}: wrote {} pages ({} bytes)", key, slices.len(), payload.len());

        Ok(self.put(&manifest_key(key), &manifest.encode(), options))
    }

    /// Single store write; backend errors count as a refusal
    fn put(&self, key: &str, value: &[u8], options: &StoreOptions) -> bool {
        match self.store.write(key, value, options) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Store write of {} failed: {}", key, e);
                false
            }
        }
    }
}
