//! On-disk form of a cache entry.

use serde::{Deserialize, Serialize};

use crate::cache::types::CacheKey;

/// Magic bytes for the cache file format.
pub const CACHE_MAGIC: [u8; 4] = *b"LGFC";

/// Cache file format version.
pub const CACHE_VERSION: u8 = 1;

/// magic(4) + version(1) + entry_count(8)
pub(super) const CACHE_HEADER_SIZE: usize = 13;

/// xxHash64 footer.
pub(super) const CACHE_FOOTER_SIZE: usize = 8;

/// A key and its payload. Timestamps and access counts are process-local
/// and are not persisted.
#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableCacheEntry {
    pub key: CacheKey,
    pub bytes: Vec<u8>,
}
