//! Cache Module
//!
//! `PagedCache` stores values of any size on a slab-limited `Store`.
//!
//! ## Flow
//! ```text
//! write: value ─▶ EntryCodec::encode ─▶ split ─▶ pages 1..N ─▶ manifest (page 0)
//! read:  manifest ─▶ Raw payload | read_multi(pages 1..N) ─▶ EntryCodec::decode
//! ```
//!
//! ## Consistency
//! Multi-page writes are not atomic. A failed page write leaves earlier pages
//! orphaned and no manifest, so readers miss. Concurrent writers to the same
//! key are not coordinated: a reader can pair one writer's manifest with
//! another writer's pages (a torn read). The paged manifest carries the
//! payload length and CRC32, and a reassembled payload that disagrees with
//! them is reported as a miss.
//!
//! `delete` removes only the manifest; payload pages stay until the backend
//! evicts or a later write overwrites them. `delete_all` also removes them.

mod reader;
mod writer;

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::EntryCodec;
use crate::config::Config;
use crate::error::Result;
use crate::paging::{manifest_key, payload_keys, Manifest};
use crate::store::{Store, StoreOptions};

/// Options for `PagedCache::write`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Compress the value before paging
    pub compress: bool,

    /// Expire all written entries after this long
    pub expires_in: Option<Duration>,
}

impl WriteOptions {
    /// Compressed write
    pub fn compressed() -> Self {
        Self {
            compress: true,
            ..Self::default()
        }
    }

    /// Set the expiry
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.expires_in = Some(ttl);
        self
    }

    /// Options handed to the store: everything except `compress`
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            raw: false,
            expires_in: self.expires_in,
        }
    }
}

/// How a key is laid out in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Manifest holds the payload
    Raw,
    /// Payload split across pages 1..N
    Paged,
}

/// Layout of a stored key, read from its manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub mode: PageMode,
    /// Payload pages (0 in raw mode)
    pub page_count: usize,
    /// Length of the encoded payload
    pub payload_len: u64,
}

/// Paged cache over a slab-limited store
pub struct PagedCache<S: Store> {
    store: S,
    config: Config,
    codec: EntryCodec,
}

impl<S: Store> PagedCache<S> {
    /// Create a cache with default limits (1 MB entries, 100 byte overhead)
    pub fn new(store: S) -> Self {
        Self {
            store,
            codec: EntryCodec::new(Config::default().compression_level),
            config: Config::default(),
        }
    }

    /// Create a cache with explicit limits
    pub fn with_config(store: S, config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            codec: EntryCodec::new(config.compression_level),
            config,
        })
    }

    /// Write `value` under `key`, paging it if needed
    ///
    /// Returns `Ok(false)` when the store refused any entry; no cleanup is
    /// attempted for pages already written.
    pub fn write<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        options: &WriteOptions,
    ) -> Result<bool> {
        let payload = self.codec.encode(value, options.compress)?;
        self.write_payload(key, &payload, &options.store_options())
    }

    /// Read the value under `key`
    ///
    /// Missing manifest or any missing page is a miss (`Ok(None)`).
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_payload(key)? {
            Some(payload) => Ok(Some(self.codec.decode(&payload)?)),
            None => Ok(None),
        }
    }

    /// Read `key`, or produce, write and return a value on miss
    ///
    /// The producer runs at most once and never on a hit. A failed write is
    /// not reported; the produced value is returned regardless.
    pub fn fetch<T, F>(&self, key: &str, options: &WriteOptions, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(value) = self.read(key)? {
            return Ok(value);
        }

        let value = producer();
        match self.write(key, &value, options) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("fetch: write of {} was refused", key),
            Err(e) => tracing::warn!("fetch: write of {} failed: {}", key, e),
        }

        Ok(value)
    }

    /// Delete the manifest of `key`
    ///
    /// Payload pages are left for the backend to evict.
    pub fn delete(&self, key: &str) -> Result<bool> {
        self.store.delete(&manifest_key(key))
    }

    /// Delete the manifest and every payload page it refers to
    ///
    /// Pages are removed before the manifest; the result is the manifest
    /// delete's. An unreadable manifest is still deleted.
    pub fn delete_all(&self, key: &str) -> Result<bool> {
        let head = manifest_key(key);

        let page_count = match self.store.read(&head)? {
            Some(bytes) => match Manifest::decode(&bytes).and_then(|manifest| match manifest {
                Manifest::Raw(_) => Ok(0),
                Manifest::Paged {
                    page_count,
                    payload_len,
                    ..
                } => self
                    .check_layout(key, page_count as usize, payload_len)
                    .map(|()| page_count as usize),
            }) {
                Ok(page_count) => page_count,
                Err(e) => {
                    tracing::warn!("delete_all: unreadable manifest for {}: {}", key, e);
                    0
                }
            },
            None => 0,
        };

        for page_key in payload_keys(key, page_count) {
            self.store.delete(&page_key)?;
        }
        tracing::debug!("delete_all: removed {} payload pages of {}", page_count, key);

        self.store.delete(&head)
    }

    /// Describe how `key` is stored without decoding the value
    pub fn inspect(&self, key: &str) -> Result<Option<PageInfo>> {
        let Some(bytes) = self.store.read(&manifest_key(key))? else {
            return Ok(None);
        };

        Ok(Some(match Manifest::decode(&bytes)? {
            Manifest::Raw(payload) => PageInfo {
                mode: PageMode::Raw,
                page_count: 0,
                payload_len: payload.len() as u64,
            },
            Manifest::Paged {
                page_count,
                payload_len,
                ..
            } => PageInfo {
                mode: PageMode::Paged,
                page_count: page_count as usize,
                payload_len,
            },
        }))
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The codec used for values
    pub fn codec(&self) -> &EntryCodec {
        &self.codec
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
