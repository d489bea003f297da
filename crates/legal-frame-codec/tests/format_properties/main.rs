//! End-to-end format properties.
//!
//! Exercises the public API only:
//! 1. Record and batch round trips, including the lossy truncation limits
//! 2. Checksum sensitivity of document and node batches
//! 3. LRU eviction, hit rate and key canonicalization of the frame cache
//! 4. At-most-one encode per key under concurrent callers
//! 5. The four worked scenarios (A-D)

mod helpers;

mod cache;
mod concurrency;
mod integrity;
mod roundtrip;
mod scenarios;
