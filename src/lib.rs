//! # slabpage
//!
//! Stores values of any size in a key-value cache whose entries are capped
//! at a fixed size (a memcached-style slab limit):
//! - Values are serialized with bincode, optionally deflate-compressed
//! - Payloads larger than one entry are split into pages `{key}_1..{key}_N`
//! - A manifest at `{key}_0` holds either the payload itself or the page count
//! - Reads fetch all pages in one batched call and reassemble them
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       PagedCache                             │
//! │          write / read / fetch / delete / delete_all          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ EntryCodec  │          │   Paging    │
//!   │ (envelope)  │          │ (manifest)  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │    Store    │
//!                           │ Memory/TCP  │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod paging;
pub mod cache;
pub mod store;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SlabError, Result};
pub use config::Config;
pub use cache::{PageInfo, PageMode, PagedCache, WriteOptions};
pub use store::{MemoryStore, RemoteStore, Store, StoreOptions};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of slabpage
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
