//! Error types for slabpage
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SlabError
pub type Result<T> = std::result::Result<T, SlabError>;

/// Unified error type for slabpage operations
#[derive(Debug, Error)]
pub enum SlabError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Backend Errors
    // -------------------------------------------------------------------------
    #[error("Backend failure: {0}")]
    Backend(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Compression error: {0}")]
    Compression(String),

    // -------------------------------------------------------------------------
    // Paging Errors
    // -------------------------------------------------------------------------
    #[error(
        "Key too long: {key_len} bytes leaves no room for data \
         (max entry size {max_entry_size}, header overhead {header_overhead})"
    )]
    KeyTooLong {
        key_len: usize,
        max_entry_size: usize,
        header_overhead: usize,
    },

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for SlabError {
    fn from(err: bincode::Error) -> Self {
        SlabError::Decode(err.to_string())
    }
}
