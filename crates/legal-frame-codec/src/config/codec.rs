//! Record codec configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};
use crate::layout::{CURRENT_DOCUMENT_VERSION, SUPPORTED_DOCUMENT_VERSIONS};

fn default_version() -> u32 {
    CURRENT_DOCUMENT_VERSION
}

fn default_verify_record_checksums() -> bool {
    true
}

/// Which document frame version to write and how strictly to read single records.
///
/// Batches always verify their outer checksum. `verify_record_checksums`
/// only controls standalone record decodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Document frame version written by encoders.
    /// Default: 1
    #[serde(default = "default_version")]
    pub version: u32,

    /// Verify the per-record CRC when decoding a standalone frame.
    /// Default: true
    #[serde(default = "default_verify_record_checksums")]
    pub verify_record_checksums: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            verify_record_checksums: default_verify_record_checksums(),
        }
    }
}

impl CodecConfig {
    /// Validate codec configuration.
    ///
    /// # Errors
    /// Returns `FrameError::Config` if `version` is not a known frame version.
    pub fn validate(&self) -> FrameResult<()> {
        if !SUPPORTED_DOCUMENT_VERSIONS.contains(&self.version) {
            return Err(FrameError::Config {
                message: format!(
                    "version {} is not supported (known: {:?})",
                    self.version, SUPPORTED_DOCUMENT_VERSIONS
                ),
            });
        }
        Ok(())
    }
}
