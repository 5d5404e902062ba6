//! In-memory store
//!
//! HashMap behind a parking_lot RwLock, enforcing a slab-style entry limit.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::{Mutex, RwLock};

use crate::error::{Result, SlabError};

use super::{Store, StoreOptions};

/// A stored entry
#[derive(Debug, Clone)]
struct Slot {
    value: Vec<u8>,
    raw: bool,
    expires_at: Option<Instant>,
}

impl Slot {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Injected write failures
#[derive(Debug, Default)]
struct FailurePlan {
    /// Writes remaining until the injected failure (1 = next write fails)
    countdown: Option<u64>,

    /// Keys whose writes always fail
    keys: Vec<String>,

    /// Report failures as `Err(Backend)` instead of `Ok(false)`
    as_error: bool,
}

/// Operation counters
#[derive(Debug, Default)]
struct Counters {
    reads: AtomicU64,
    multi_reads: AtomicU64,
    writes: AtomicU64,
    deletes: AtomicU64,
}

/// In-memory slab-limited store
///
/// ## Limits
/// An entry is refused (`Ok(false)`) when `key.len() + value.len()` exceeds
/// `max_entry_size`, the way a slab allocator refuses oversized items.
pub struct MemoryStore {
    /// Largest key + value accepted
    max_entry_size: usize,

    /// Live entries (expired ones are dropped lazily)
    entries: RwLock<HashMap<String, Slot>>,

    /// Injected failures for tests
    failures: Mutex<FailurePlan>,

    counters: Counters,
}

impl MemoryStore {
    /// Create a store accepting entries up to `max_entry_size` bytes
    pub fn new(max_entry_size: usize) -> Self {
        Self {
            max_entry_size,
            entries: RwLock::new(HashMap::new()),
            failures: Mutex::new(FailurePlan::default()),
            counters: Counters::default(),
        }
    }

    /// Maximum accepted key + value length
    pub fn max_entry_size(&self) -> usize {
        self.max_entry_size
    }

    // =========================================================================
    // Failure Injection
    // =========================================================================

    /// Make the `n`th write from now fail (1 = the next write)
    pub fn fail_nth_write(&self, n: u64) {
        self.failures.lock().countdown = Some(n.max(1));
    }

    /// Make every write to `key` fail
    pub fn fail_writes_to(&self, key: impl Into<String>) {
        self.failures.lock().keys.push(key.into());
    }

    /// Report injected failures as backend errors rather than `false`
    pub fn fail_with_error(&self, as_error: bool) {
        self.failures.lock().as_error = as_error;
    }

    /// Clear all injected failures
    pub fn clear_failures(&self) {
        *self.failures.lock() = FailurePlan::default();
    }

    /// Decide whether this write hits an injected failure
    fn injected_failure(&self, key: &str) -> Option<bool> {
        let mut plan = self.failures.lock();

        let mut fail = plan.keys.iter().any(|k| k == key);
        if let Some(remaining) = plan.countdown {
            if remaining <= 1 {
                plan.countdown = None;
                fail = true;
            } else {
                plan.countdown = Some(remaining - 1);
            }
        }

        fail.then_some(plan.as_error)
    }

    // =========================================================================
    // Inspection (for testing and debugging)
    // =========================================================================

    /// Remove a key behind the cache's back
    pub fn remove_out_of_band(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Overwrite a key behind the cache's back
    pub fn put_out_of_band(&self, key: impl Into<String>, value: Vec<u8>) {
        self.entries.write().insert(
            key.into(),
            Slot {
                value,
                raw: true,
                expires_at: None,
            },
        );
    }

    /// Whether a live entry exists for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        self.entries
            .read()
            .get(key)
            .is_some_and(|slot| !slot.is_expired(now))
    }

    /// Whether the last write to `key` carried the raw hint
    pub fn is_raw(&self, key: &str) -> Option<bool> {
        self.entries.read().get(key).map(|slot| slot.raw)
    }

    /// Number of stored entries (including not yet reaped expired ones)
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of single-key reads served
    pub fn read_count(&self) -> u64 {
        self.counters.reads.load(Ordering::Relaxed)
    }

    /// Number of multi-key reads served
    pub fn multi_read_count(&self) -> u64 {
        self.counters.multi_reads.load(Ordering::Relaxed)
    }

    /// Number of write attempts
    pub fn write_count(&self) -> u64 {
        self.counters.writes.load(Ordering::Relaxed)
    }

    /// Number of deletes
    pub fn delete_count(&self) -> u64 {
        self.counters.deletes.load(Ordering::Relaxed)
    }

    fn lookup(&self, key: &str, now: Instant) -> Option<Vec<u8>> {
        self.entries
            .read()
            .get(key)
            .filter(|slot| !slot.is_expired(now))
            .map(|slot| slot.value.clone())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(crate::config::Config::default().max_entry_size)
    }
}

impl Store for MemoryStore {
    fn write(&self, key: &str, value: &[u8], options: &StoreOptions) -> Result<bool> {
        self.counters.writes.fetch_add(1, Ordering::Relaxed);

        if let Some(as_error) = self.injected_failure(key) {
            tracing::trace!("Injected write failure for {}", key);
            if as_error {
                return Err(SlabError::Backend(format!("injected failure writing {}", key)));
            }
            return Ok(false);
        }

        if key.len() + value.len() > self.max_entry_size {
            tracing::debug!(
                "Refusing {}: {} bytes exceeds entry limit {}",
                key,
                key.len() + value.len(),
                self.max_entry_size
            );
            return Ok(false);
        }

        let slot = Slot {
            value: value.to_vec(),
            raw: options.raw,
            expires_at: options.expires_in.map(|ttl| Instant::now() + ttl),
        };
        self.entries.write().insert(key.to_string(), slot);

        Ok(true)
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.counters.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.lookup(key, Instant::now()))
    }

    fn read_multi(&self, keys: &[String]) -> Result<HashMap<String, Option<Vec<u8>>>> {
        self.counters.multi_reads.fetch_add(1, Ordering::Relaxed);

        let now = Instant::now();
        Ok(keys
            .iter()
            .map(|key| (key.clone(), self.lookup(key, now)))
            .collect())
    }

    fn delete(&self, key: &str) -> Result<bool> {
        self.counters.deletes.fetch_add(1, Ordering::Relaxed);

        let now = Instant::now();
        Ok(self
            .entries
            .write()
            .remove(key)
            .is_some_and(|slot| !slot.is_expired(now)))
    }
}
