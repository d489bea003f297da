//! Cache entry type for the frame cache.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;

/// Process start instant; last-access times are stored as nanos since this.
pub(crate) static START_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// Bookkeeping charged against `max_bytes` on top of the payload
/// (Instant + AtomicU64 + AtomicU32 + Arc pointer and length).
pub const CACHE_ENTRY_METADATA_SIZE: usize = 16 + 8 + 4 + 16;

/// An encoded batch held by the cache.
///
/// The payload is shared: `get` hands out clones of the `Arc`, so a caller
/// may keep using bytes after the entry is evicted.
#[derive(Debug)]
pub struct CacheEntry {
    bytes: Arc<[u8]>,
    created_at: Instant,
    last_accessed: AtomicU64,
    access_count: AtomicU32,
}

impl CacheEntry {
    /// New entry stamped now, with `access_count` 1.
    #[must_use]
    pub fn new(bytes: Arc<[u8]>) -> Self {
        Self {
            bytes,
            created_at: Instant::now(),
            last_accessed: AtomicU64::new(nanos_since_start()),
            access_count: AtomicU32::new(1),
        }
    }

    /// Shared handle to the payload.
    #[must_use]
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub(crate) fn payload(&self) -> &[u8] {
        &self.bytes
    }

    /// Record an access.
    pub fn touch(&self) {
        self.last_accessed
            .store(nanos_since_start(), Ordering::Relaxed);
        self.access_count.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn access_count(&self) -> u32 {
        self.access_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    #[must_use]
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Bytes charged against the cache budget.
    #[must_use]
    pub fn memory_size(&self) -> usize {
        self.bytes.len() + CACHE_ENTRY_METADATA_SIZE
    }

    /// Last access as a duration since process start.
    #[must_use]
    pub fn last_accessed(&self) -> Duration {
        Duration::from_nanos(self.last_accessed.load(Ordering::Relaxed))
    }
}

fn nanos_since_start() -> u64 {
    u64::try_from(START_INSTANT.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "entry_tests.rs"]
mod tests;
