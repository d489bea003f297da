//! Frame cache configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

// ============================================================================
// DEFAULT FUNCTIONS
// ============================================================================

fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> usize {
    100
}

fn default_max_bytes() -> usize {
    64 * 1024 * 1024
}

// ============================================================================
// CACHE CONFIG
// ============================================================================

/// Configuration for the encoded-batch cache.
///
/// Entries are whole encoded batches, so `max_entries` counts batches and
/// `max_bytes` bounds their summed payload length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether the cache is consulted at all.
    /// Default: true
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum number of cached batches before LRU eviction.
    /// Default: 100
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Maximum total payload bytes across all entries.
    /// Default: 64 MiB
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Time-to-live in seconds. `None` keeps entries until evicted.
    /// `Some(0)` expires every entry on its next access.
    /// Default: None
    #[serde(default)]
    pub ttl_seconds: Option<u64>,

    /// Persist the cache to `disk_path` on request.
    /// Default: false
    #[serde(default)]
    pub persist_to_disk: bool,

    /// Cache file location. Required when `persist_to_disk` is set.
    #[serde(default)]
    pub disk_path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries: default_max_entries(),
            max_bytes: default_max_bytes(),
            ttl_seconds: None,
            persist_to_disk: false,
            disk_path: None,
        }
    }
}

impl CacheConfig {
    /// Validate cache configuration.
    ///
    /// # Errors
    /// Returns `FrameError::Config` if:
    /// - enabled && max_entries == 0
    /// - enabled && max_bytes == 0
    /// - persist_to_disk && disk_path.is_none()
    pub fn validate(&self) -> FrameResult<()> {
        if self.enabled && self.max_entries == 0 {
            return Err(FrameError::Config {
                message: "max_entries must be > 0 when cache is enabled".to_string(),
            });
        }
        if self.enabled && self.max_bytes == 0 {
            return Err(FrameError::Config {
                message: "max_bytes must be > 0 when cache is enabled".to_string(),
            });
        }
        if self.persist_to_disk && self.disk_path.is_none() {
            return Err(FrameError::Config {
                message: "disk_path required when persist_to_disk is true".to_string(),
            });
        }
        Ok(())
    }

    /// Cache disabled entirely.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Cache with a custom entry bound and default everything else.
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            max_entries,
            ..Self::default()
        }
    }
}
