//! Key and entry types for the frame cache.
//!
//! - [`CacheKey`]: identifier-set key, independent of input order
//! - [`CacheEntry`]: shared encoded payload with LRU metadata

mod entry;
mod key;

pub use entry::{CacheEntry, CACHE_ENTRY_METADATA_SIZE};
pub use key::{CacheKey, KeyScope};
