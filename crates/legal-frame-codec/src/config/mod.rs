//! Root configuration for the frame pipeline.
//!
//! # Loading Configuration
//!
//! ```rust,ignore
//! use legal_frame_codec::FrameConfig;
//!
//! let config = FrameConfig::from_file("legal-frame.toml")?.with_env_overrides();
//! config.validate()?;
//! ```
//!
//! # TOML Structure
//!
//! ```toml
//! [codec]
//! version = 1
//! verify_record_checksums = true
//!
//! [cache]
//! enabled = true
//! max_entries = 100
//! max_bytes = 67108864
//! ttl_seconds = 600
//!
//! [projector]
//! embedding_width = 384
//! metadata_stride = 256
//! parallel_threshold = 1024
//! ```
//!
//! Every section and key is optional. A missing key takes its documented
//! default; an invalid value is reported by [`FrameConfig::validate`].

mod cache;
mod codec;
mod projector;


pub use cache::CacheConfig;
pub use codec::CodecConfig;
pub use projector::ProjectorConfig;

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};

/// Root configuration: codec, cache and projector sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Frame version and record checksum policy.
    #[serde(default)]
    pub codec: CodecConfig,

    /// Encoded-batch cache.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Structure-of-arrays projector.
    #[serde(default)]
    pub projector: ProjectorConfig,
}

impl FrameConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - `FrameError::Config` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> FrameResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| FrameError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        toml::from_str(&contents).map_err(|e| FrameError::Config {
            message: format!("Failed to parse TOML in '{}': {}", path.display(), e),
        })
    }

    /// Validate every section, returning the first error found.
    ///
    /// The message is prefixed with the failing section, e.g. `[cache] ...`.
    pub fn validate(&self) -> FrameResult<()> {
        scoped("codec", self.codec.validate())?;
        scoped("cache", self.cache.validate())?;
        scoped("projector", self.projector.validate())?;
        Ok(())
    }

    /// Apply environment variable overrides. Prefix: `LEGAL_FRAME_`
    ///
    /// | Variable | Config Path | Type |
    /// |----------|-------------|------|
    /// | `LEGAL_FRAME_CODEC_VERSION` | `codec.version` | u32 |
    /// | `LEGAL_FRAME_CACHE_ENABLED` | `cache.enabled` | bool |
    /// | `LEGAL_FRAME_CACHE_MAX_ENTRIES` | `cache.max_entries` | usize |
    /// | `LEGAL_FRAME_CACHE_TTL_SECONDS` | `cache.ttl_seconds` | u64 |
    /// | `LEGAL_FRAME_PROJECTOR_EMBEDDING_WIDTH` | `projector.embedding_width` | usize |
    /// | `LEGAL_FRAME_PROJECTOR_METADATA_STRIDE` | `projector.metadata_stride` | usize |
    ///
    /// Values that fail to parse are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var("LEGAL_FRAME_CODEC_VERSION") {
            if let Ok(n) = val.parse::<u32>() {
                self.codec.version = n;
            }
        }

        if let Ok(val) = env::var("LEGAL_FRAME_CACHE_ENABLED") {
            if let Ok(b) = val.parse::<bool>() {
                self.cache.enabled = b;
            }
        }
        if let Ok(val) = env::var("LEGAL_FRAME_CACHE_MAX_ENTRIES") {
            if let Ok(n) = val.parse::<usize>() {
                self.cache.max_entries = n;
            }
        }
        if let Ok(val) = env::var("LEGAL_FRAME_CACHE_TTL_SECONDS") {
            if let Ok(n) = val.parse::<u64>() {
                self.cache.ttl_seconds = Some(n);
            }
        }

        if let Ok(val) = env::var("LEGAL_FRAME_PROJECTOR_EMBEDDING_WIDTH") {
            if let Ok(n) = val.parse::<usize>() {
                self.projector.embedding_width = n;
            }
        }
        if let Ok(val) = env::var("LEGAL_FRAME_PROJECTOR_METADATA_STRIDE") {
            if let Ok(n) = val.parse::<usize>() {
                self.projector.metadata_stride = n;
            }
        }

        self
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> FrameResult<Self> {
        toml::from_str(toml).map_err(|e| FrameError::Config {
            message: format!("Failed to parse TOML: {}", e),
        })
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> FrameResult<String> {
        toml::to_string_pretty(self).map_err(|e| FrameError::Config {
            message: format!("Failed to serialize to TOML: {}", e),
        })
    }
}

fn scoped(section: &str, result: FrameResult<()>) -> FrameResult<()> {
    result.map_err(|e| match e {
        FrameError::Config { message } => FrameError::Config {
            message: format!("[{}] {}", section, message),
        },
        other => other,
    })
}
