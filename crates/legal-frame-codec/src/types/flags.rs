//! Feature flag bitset stored in the record header.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bitset describing which optional parts of a record carry data.
///
/// Unknown bits are preserved on decode so newer writers can add flags
/// without older readers dropping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureFlags(u32);

impl FeatureFlags {
    pub const NONE: FeatureFlags = FeatureFlags(0);
    pub const HAS_EMBEDDING: FeatureFlags = FeatureFlags(1 << 0);
    /// Upstream embedding was longer than the frame capacity.
    pub const EMBEDDING_TRUNCATED: FeatureFlags = FeatureFlags(1 << 1);
    pub const HAS_NEIGHBORS: FeatureFlags = FeatureFlags(1 << 2);
    /// Upstream adjacency list was longer than the frame capacity.
    pub const NEIGHBORS_TRUNCATED: FeatureFlags = FeatureFlags(1 << 3);
    pub const HAS_METADATA: FeatureFlags = FeatureFlags(1 << 4);
    pub const GPU_ACCELERATED: FeatureFlags = FeatureFlags(1 << 5);
    pub const SIMD_ACCELERATED: FeatureFlags = FeatureFlags(1 << 6);
    /// At least one variable-length directory slot points into a sidecar.
    pub const HAS_VAR_REGIONS: FeatureFlags = FeatureFlags(1 << 7);

    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: FeatureFlags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: FeatureFlags) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: FeatureFlags) {
        self.0 &= !other.0;
    }

    /// Set or clear `other` depending on `enabled`.
    #[inline]
    pub fn set(&mut self, other: FeatureFlags, enabled: bool) {
        if enabled {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for FeatureFlags {
    type Output = FeatureFlags;

    fn bitor(self, rhs: FeatureFlags) -> FeatureFlags {
        FeatureFlags(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for FeatureFlags {
    fn bitor_assign(&mut self, rhs: FeatureFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for FeatureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
