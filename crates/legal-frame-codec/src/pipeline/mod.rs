//! Encoders composed behind the frame cache.
//!
//! [`CachedEncoder`] canonicalizes record order, derives the cache key from
//! the sorted identifier set and only runs the encoder on a miss.

mod cached_encoder;


pub use cached_encoder::CachedEncoder;
