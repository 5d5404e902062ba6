//! Configuration for slabpage
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, SlabError};

/// Smallest usable header overhead: the longest page-key suffix
/// (`_` plus the ten digits of a `u32` page number). Also covers the
/// manifest's tag byte and `_0` suffix.
pub const MIN_HEADER_OVERHEAD: usize = 1 + 10;

/// Main configuration for a paged cache and its server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Slab Limits
    // -------------------------------------------------------------------------
    /// Largest single entry (key + value + header) the backend accepts
    pub max_entry_size: usize,

    /// Fixed per-entry overhead reserved out of every page.
    /// Must cover the backend's item header, the manifest tag byte and the
    /// `_N` suffix appended to page keys. At least `MIN_HEADER_OVERHEAD`.
    pub header_overhead: usize,

    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Deflate level used for compressed envelopes (0-9)
    pub compression_level: u32,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max queued client connections waiting for a worker
    pub max_connections: usize,

    /// Number of connection worker threads
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entry_size: 1024 * 1024, // 1 MB slab
            header_overhead: 100,
            compression_level: 6,
            listen_addr: "127.0.0.1:11311".to_string(),
            max_connections: 1024,
            worker_threads: 8,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the limits leave room for at least one byte of data
    pub fn validate(&self) -> Result<()> {
        if self.header_overhead < MIN_HEADER_OVERHEAD {
            return Err(SlabError::Config(format!(
                "header overhead {} leaves no room for page key suffixes (minimum {})",
                self.header_overhead, MIN_HEADER_OVERHEAD
            )));
        }
        if self.header_overhead >= self.max_entry_size {
            return Err(SlabError::Config(format!(
                "header overhead {} must be smaller than max entry size {}",
                self.header_overhead, self.max_entry_size
            )));
        }
        if self.compression_level > 9 {
            return Err(SlabError::Config(format!(
                "compression level {} out of range (0-9)",
                self.compression_level
            )));
        }
        if self.worker_threads == 0 {
            return Err(SlabError::Config("worker_threads must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Bytes of payload that fit in one page for a base key of `key_len` bytes
    pub fn slice_size(&self, key_len: usize) -> Result<usize> {
        crate::paging::slice_size(key_len, self.max_entry_size, self.header_overhead)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the backend's maximum entry size (in bytes)
    pub fn max_entry_size(mut self, size: usize) -> Self {
        self.config.max_entry_size = size;
        self
    }

    /// Set the per-entry header overhead (in bytes)
    pub fn header_overhead(mut self, size: usize) -> Self {
        self.config.header_overhead = size;
        self
    }

    /// Set the deflate compression level
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of queued connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
