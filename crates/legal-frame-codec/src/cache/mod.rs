//! Binary frame cache.
//!
//! Sits in front of the encoders so that re-encoding the same logical set of
//! records returns the bytes produced last time. Keys come from the sorted
//! identifier set, never from the order records were supplied in.
//!
//! # Types
//!
//! - [`CacheKey`]: order-independent key over an identifier set
//! - [`CacheEntry`]: shared payload with LRU metadata
//! - [`FrameCache`]: LRU cache with entry, byte and TTL bounds
//! - [`CacheMetrics`]: atomic hit/miss/eviction counters
//!
//! # Example
//!
//! ```rust,ignore
//! use legal_frame_codec::cache::{CacheKey, FrameCache};
//! use legal_frame_codec::config::CacheConfig;
//!
//! let cache = FrameCache::new(CacheConfig::default())?;
//! let key = CacheKey::from_node_ids([3, 1, 2]);
//!
//! let bytes = cache.get_or_encode(key, || codec.encode(&nodes).map_err(Into::into))?;
//! println!("Hit rate: {:.1}%", cache.hit_rate() * 100.0);
//! ```

pub mod manager;
mod types;

pub use manager::{CacheMetrics, CacheStats, FrameCache};
pub use types::{CacheEntry, CacheKey, KeyScope, CACHE_ENTRY_METADATA_SIZE};
