//! Core error types for the frame pipeline.

use thiserror::Error;

use crate::storage::{DecodeError, EncodeError};

/// Error type for every fallible operation outside the pure codecs.
///
/// # Error Categories
///
/// | Category | Variants | Recovery Strategy |
/// |----------|----------|-------------------|
/// | Format | Encode, Decode | Skip or retry the batch upstream |
/// | Infrastructure | Cache, Io | Retry or run uncached |
/// | Configuration | Config | Fix configuration |
/// | Serialization | Serialization | Fix data format |
///
/// Corrupted input is never repaired: a `Decode` error means the whole
/// buffer was rejected and no partial records were produced.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Encoding a record, batch or node batch failed.
    #[error("Encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Decoding a record, batch or node batch failed.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Frame cache operation failed (oversized entry, disk persistence).
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// Configuration file invalid or missing required fields.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Serialization/deserialization of side files failed (JSON, bincode).
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// True when the error signals corrupted or foreign bytes rather than a
    /// local failure. Callers should drop the batch instead of retrying it.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        match self {
            FrameError::Decode(e) => e.is_corruption(),
            _ => false,
        }
    }
}

/// Result type alias for frame pipeline operations.
pub type FrameResult<T> = Result<T, FrameError>;
