//! Core FrameCache implementation with LRU eviction.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use linked_hash_map::LinkedHashMap;
use parking_lot::RwLock;
use tracing::{debug, error, trace, warn};

use crate::cache::types::{CacheEntry, CacheKey};
use crate::config::CacheConfig;
use crate::error::{FrameError, FrameResult};

use super::gate::{Claim, GateTable};
use super::metrics::{CacheMetrics, CacheStats};

/// LRU cache of encoded batches.
///
/// # Thread Safety
///
/// Entries sit behind one `RwLock`. `get` takes the write lock because a hit
/// moves the entry to the back of the LRU order; `contains`, `len` and
/// persistence snapshots take the read lock. Every mutation of the byte
/// counter happens under the write lock, so counters never drift from the
/// map.
///
/// # Eviction Strategy
///
/// 1. TTL: an expired entry is removed when it is next looked up.
/// 2. Entries: inserting into a full cache evicts exactly one entry, the
///    least recently used, first.
/// 3. Bytes: further LRU entries are evicted until the new entry fits
///    `max_bytes`.
///
/// A disabled cache stores nothing: `get` always misses silently and `put`
/// is a no-op.
pub struct FrameCache {
    pub(super) entries: RwLock<LinkedHashMap<CacheKey, CacheEntry>>,
    pub(super) config: CacheConfig,
    pub(super) metrics: CacheMetrics,
    pub(super) gates: GateTable,
}

impl FrameCache {
    /// Create a cache from validated configuration.
    ///
    /// # Errors
    /// `FrameError::Config` when `config.validate()` fails.
    pub fn new(config: CacheConfig) -> FrameResult<Self> {
        if let Err(e) = config.validate() {
            error!("FrameCache config error: {}", e);
            return Err(e);
        }

        Ok(Self {
            entries: RwLock::new(LinkedHashMap::new()),
            config,
            metrics: CacheMetrics::new(),
            gates: GateTable::default(),
        })
    }

    /// Cache bounded to `max_entries`, defaults otherwise.
    pub fn with_capacity(max_entries: usize) -> FrameResult<Self> {
        Self::new(CacheConfig::with_max_entries(max_entries))
    }

    /// Look up a key, refreshing its LRU position on a hit.
    ///
    /// A miss is a normal outcome and never an error.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<Arc<[u8]>> {
        if !self.config.enabled {
            return None;
        }
        let found = self.lookup(key);
        match found {
            Some(_) => self.metrics.record_hit(),
            None => self.metrics.record_miss(),
        }
        found
    }

    /// Lookup without touching hit/miss counters. Still refreshes LRU order
    /// and drops expired entries.
    fn lookup(&self, key: &CacheKey) -> Option<Arc<[u8]>> {
        let mut entries = self.entries.write();

        let expired = {
            let entry = entries.get_refresh(key)?;
            match self.config.ttl_seconds {
                Some(ttl) if entry.is_expired(Duration::from_secs(ttl)) => true,
                _ => {
                    entry.touch();
                    return Some(entry.bytes());
                }
            }
        };

        if expired {
            if let Some(entry) = entries.remove(key) {
                self.metrics.subtract_bytes(entry.memory_size());
                debug!("FrameCache: {} expired after {:?}", key, entry.age());
            }
        }
        None
    }

    /// Insert a payload, evicting LRU entries as needed.
    ///
    /// Re-inserting an existing key replaces it and makes it most recent.
    ///
    /// # Errors
    /// `FrameError::Cache` if the payload alone exceeds `max_bytes`.
    pub fn put(&self, key: CacheKey, bytes: impl Into<Arc<[u8]>>) -> FrameResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        let entry = CacheEntry::new(bytes.into());
        let entry_size = entry.memory_size();

        if entry_size > self.config.max_bytes {
            error!(
                "FrameCache put error: entry size {} exceeds max_bytes {}",
                entry_size, self.config.max_bytes
            );
            return Err(FrameError::Cache {
                message: format!(
                    "Entry size {} bytes exceeds max_bytes {} bytes",
                    entry_size, self.config.max_bytes
                ),
            });
        }

        let mut entries = self.entries.write();
        self.insert_locked(&mut entries, key, entry);
        Ok(())
    }

    /// Insert under an already-held write lock. The caller has checked the
    /// entry against `max_bytes`.
    pub(super) fn insert_locked(
        &self,
        entries: &mut LinkedHashMap<CacheKey, CacheEntry>,
        key: CacheKey,
        entry: CacheEntry,
    ) {
        let entry_size = entry.memory_size();

        if let Some(old) = entries.remove(&key) {
            self.metrics.subtract_bytes(old.memory_size());
        }

        while entries.len() >= self.config.max_entries {
            if self.evict_oldest(entries).is_none() {
                break;
            }
        }

        let mut projected = self.metrics.bytes_used.load(Ordering::Relaxed) + entry_size;
        while projected > self.config.max_bytes {
            match self.evict_oldest(entries) {
                Some(freed) => projected = projected.saturating_sub(freed),
                None => break,
            }
        }

        entries.insert(key, entry);
        self.metrics.add_bytes(entry_size);
    }

    /// Evict the front (least recently used) entry; returns its size.
    fn evict_oldest(&self, entries: &mut LinkedHashMap<CacheKey, CacheEntry>) -> Option<usize> {
        let (key, entry) = entries.pop_front()?;
        let size = entry.memory_size();
        self.metrics.subtract_bytes(size);
        self.metrics.record_eviction();
        trace!("FrameCache: evicted {} ({} bytes)", key, size);
        Some(size)
    }

    /// Return the cached payload for `key`, or run `encode` and cache its
    /// output.
    ///
    /// At most one `encode` runs per key at a time. Concurrent callers that
    /// miss on a key already being encoded wait for that encode and then read
    /// its result from the cache. If the leader fails, one waiter takes over.
    ///
    /// A payload too large to cache is still returned; it is just not stored.
    pub fn get_or_encode<F>(&self, key: CacheKey, encode: F) -> FrameResult<Arc<[u8]>>
    where
        F: FnOnce() -> FrameResult<Vec<u8>>,
    {
        if !self.config.enabled {
            return encode().map(Arc::from);
        }

        if let Some(bytes) = self.get(&key) {
            return Ok(bytes);
        }

        loop {
            match self.gates.claim(key) {
                Claim::Leader(ticket) => {
                    // A previous leader may have finished between our miss and
                    // the claim.
                    if let Some(bytes) = self.lookup(&key) {
                        return Ok(bytes);
                    }

                    let bytes: Arc<[u8]> = encode()?.into();
                    if let Err(e) = self.put(key, Arc::clone(&bytes)) {
                        warn!("FrameCache: returning {} uncached: {}", key, e);
                    }
                    drop(ticket);
                    return Ok(bytes);
                }
                Claim::Follower(gate) => {
                    gate.wait();
                    self.metrics.record_coalesced();
                    if let Some(bytes) = self.lookup(&key) {
                        return Ok(bytes);
                    }
                    debug!("FrameCache: leader for {} left no entry, retrying", key);
                }
            }
        }
    }

    /// Check for a key without touching LRU order or counters.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Remove an entry, returning its payload.
    pub fn remove(&self, key: &CacheKey) -> Option<Arc<[u8]>> {
        let mut entries = self.entries.write();
        let entry = entries.remove(key)?;
        self.metrics.subtract_bytes(entry.memory_size());
        Some(entry.bytes())
    }

    /// Drop every entry and reset all counters.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.metrics.reset();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `hits / (hits + misses)`; `0.0` before any lookup, never NaN.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        self.metrics.hit_rate()
    }

    /// Bytes currently charged against `max_bytes`.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.metrics.bytes_used.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Snapshot of counters plus current entry count.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Keys currently being encoded through `get_or_encode`.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.gates.in_flight()
    }
}

impl std::fmt::Debug for FrameCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameCache")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
