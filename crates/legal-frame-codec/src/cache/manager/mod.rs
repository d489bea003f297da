//! FrameCache: bounded LRU store of encoded batches.
//!
//! # Architecture
//!
//! - `LinkedHashMap` keeps LRU order; the front is evicted first
//! - `parking_lot::RwLock` guards the map; counters are atomics
//! - Per-key gates serialize concurrent misses in `get_or_encode`
//! - Optional disk persistence uses bincode with an xxHash64 footer

mod core;
mod gate;
mod metrics;
mod persistence;
mod serializable;

#[cfg(test)]
mod tests_persistence;

pub use self::core::FrameCache;
pub use metrics::{CacheMetrics, CacheStats};
pub use serializable::{CACHE_MAGIC, CACHE_VERSION};
