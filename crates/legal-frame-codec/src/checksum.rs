//! Content identity hashes and integrity checksums.
//!
//! Two different functions serve two different jobs:
//!
//! - [`content_hash`] / [`hash_text`]: xxHash32 (seed 0). Identity and
//!   change detection for per-field hashes (title, body, case id, ...).
//! - [`checksum`]: CRC-32 (IEEE polynomial). Integrity of a frame or batch
//!   payload. CRC-32 detects every single-byte error and every burst up to
//!   32 bits, so flipping any one byte of a payload always fails verification.
//!
//! Neither is cryptographic. Two distinct inputs collide on a content hash
//! with probability about 2^-32, which is acceptable for change detection but
//! means a hash match is never proof of equal content. Neither function
//! protects against deliberate tampering.
//!
//! Cache keys use the 64-bit [`key_hash`] to keep collisions negligible across
//! large working sets.

use xxhash_rust::xxh32::xxh32;
use xxhash_rust::xxh64::xxh64;

/// Seed shared by every hash in this module. Changing it changes the format.
pub const HASH_SEED: u32 = 0;

/// Deterministic 32-bit content hash (xxHash32).
#[inline]
#[must_use]
pub fn content_hash(bytes: &[u8]) -> u32 {
    xxh32(bytes, HASH_SEED)
}

/// Hash a text field. Empty text hashes to `0`, which the format reads as
/// "field absent".
#[inline]
#[must_use]
pub fn hash_text(text: &str) -> u32 {
    if text.is_empty() {
        0
    } else {
        content_hash(text.as_bytes())
    }
}

/// Hash an optional text field; `None` and `Some("")` both map to `0`.
#[inline]
#[must_use]
pub fn hash_optional_text(text: Option<&str>) -> u32 {
    text.map(hash_text).unwrap_or(0)
}

/// Integrity checksum (CRC-32) over a payload region.
#[inline]
#[must_use]
pub fn checksum(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// CRC-32 over several regions, as if they were one contiguous payload.
#[must_use]
pub fn checksum_parts<'a, I>(parts: I) -> u32
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = crc32fast::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize()
}

/// 64-bit hash used for cache keys (xxHash64).
#[inline]
#[must_use]
pub fn key_hash(bytes: &[u8]) -> u64 {
    xxh64(bytes, u64::from(HASH_SEED))
}
