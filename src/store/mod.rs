//! Store Module
//!
//! The narrow capability the paged cache needs from a slab-limited backend.
//!
//! ## Implementations
//! - `MemoryStore`: in-process map with an entry size limit, expiry and
//!   failure injection. Backs the server binary and the tests.
//! - `RemoteStore`: speaks the wire protocol to a `slabpage-server`.

mod memory;
mod remote;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

pub use memory::MemoryStore;
pub use remote::RemoteStore;

/// Options passed through to a single backend write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Store the value as an opaque byte blob, no backend-side reinterpretation
    pub raw: bool,

    /// Expire the entry after this long
    pub expires_in: Option<Duration>,
}

impl StoreOptions {
    /// Same options with the raw hint set
    pub fn as_raw(self) -> Self {
        Self { raw: true, ..self }
    }
}

/// Key-value backend with a fixed maximum entry size
///
/// `write` reports rejection (e.g. an oversized entry) as `Ok(false)`;
/// `Err` is reserved for transport or backend failures.
pub trait Store {
    /// Store `value` under `key`
    fn write(&self, key: &str, value: &[u8], options: &StoreOptions) -> Result<bool>;

    /// Read the value under `key`
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Read several keys at once
    ///
    /// Every requested key appears in the result; `None` marks an absent key.
    fn read_multi(&self, keys: &[String]) -> Result<HashMap<String, Option<Vec<u8>>>>;

    /// Remove `key`, returning whether it existed
    fn delete(&self, key: &str) -> Result<bool>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn write(&self, key: &str, value: &[u8], options: &StoreOptions) -> Result<bool> {
        (**self).write(key, value, options)
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn read_multi(&self, keys: &[String]) -> Result<HashMap<String, Option<Vec<u8>>>> {
        (**self).read_multi(keys)
    }

    fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key)
    }
}

/// A store shared between threads (server side)
pub type SharedStore = Arc<dyn Store + Send + Sync>;
