//! GPU projector configuration.

use serde::{Deserialize, Serialize};

use crate::error::{FrameError, FrameResult};
use crate::layout::EMBEDDING_DIM;

fn default_embedding_width() -> usize {
    EMBEDDING_DIM
}

fn default_metadata_stride() -> usize {
    256
}

fn default_parallel_threshold() -> usize {
    1024
}

/// Strides of the structure-of-arrays buffers produced by the projector.
///
/// The widths are fixed per projector and independent of the source records,
/// so every buffer is exactly `count * stride` long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectorConfig {
    /// f32 slots per record in the embedding buffer.
    /// Default: 384
    #[serde(default = "default_embedding_width")]
    pub embedding_width: usize,

    /// Bytes per record in the metadata buffer.
    /// Default: 256
    #[serde(default = "default_metadata_stride")]
    pub metadata_stride: usize,

    /// Record count at which the fill switches to rayon.
    /// Default: 1024
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

impl Default for ProjectorConfig {
    fn default() -> Self {
        Self {
            embedding_width: default_embedding_width(),
            metadata_stride: default_metadata_stride(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl ProjectorConfig {
    /// Validate projector configuration.
    ///
    /// # Errors
    /// Returns `FrameError::Config` if `embedding_width` is 0.
    /// A zero `metadata_stride` is allowed and drops metadata.
    pub fn validate(&self) -> FrameResult<()> {
        if self.embedding_width == 0 {
            return Err(FrameError::Config {
                message: "embedding_width must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
