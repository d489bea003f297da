//! Error types for frame encoding/decoding.

/// Errors during encoding.
///
/// Oversized embeddings and adjacency lists are not errors: they are
/// truncated and logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    #[error("Region '{region}' of {size} bytes does not fit a 32-bit offset")]
    RegionOverflow { region: &'static str, size: usize },

    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Errors during decoding. Every variant is fatal to the call that produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Invalid format: {reason}")]
    InvalidFormat { reason: String },

    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(u32),

    #[error("Integrity error: stored checksum {stored:#010x}, computed {computed:#010x}")]
    IntegrityError { stored: u32, computed: u32 },

    #[error("Truncated buffer: need {needed} bytes, have {available}")]
    TruncatedBuffer { needed: usize, available: usize },
}

impl DecodeError {
    pub(crate) fn invalid_format(reason: impl Into<String>) -> Self {
        DecodeError::InvalidFormat {
            reason: reason.into(),
        }
    }

    /// Every decode failure means the bytes themselves are bad.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            DecodeError::InvalidFormat { .. }
                | DecodeError::UnsupportedVersion(_)
                | DecodeError::IntegrityError { .. }
                | DecodeError::TruncatedBuffer { .. }
        )
    }

    #[inline]
    pub(crate) fn ensure_len(bytes: &[u8], needed: usize) -> Result<(), DecodeError> {
        if bytes.len() < needed {
            return Err(DecodeError::TruncatedBuffer {
                needed,
                available: bytes.len(),
            });
        }
        Ok(())
    }
}
