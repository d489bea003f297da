//! CLI errors and their exit codes.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Recoverable error (missing file, bad JSON, bad config)
//! - 2: Corruption only: the batch bytes themselves are bad
//!
//! Exit 2 tells the caller to drop the batch rather than retry it.

use std::path::PathBuf;
use std::process::ExitCode;

use legal_frame_codec::{DecodeError, EncodeError, FrameError};
use thiserror::Error;

/// Exit codes for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    Success = 0,
    /// Recoverable error, worth a retry after fixing the input.
    Warning = 1,
    /// Corrupted, truncated or foreign batch bytes.
    Blocking = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<CliExitCode> for i32 {
    fn from(code: CliExitCode) -> Self {
        code as i32
    }
}

impl From<&FrameError> for CliExitCode {
    fn from(err: &FrameError) -> Self {
        if err.is_corruption() {
            CliExitCode::Blocking
        } else {
            CliExitCode::Warning
        }
    }
}

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to render output: {0}")]
    Render(#[source] serde_json::Error),

    /// The batch was read but failed verification; the report was printed.
    #[error("Batch checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    ChecksumMismatch { stored: u32, computed: u32 },

    #[error("{0}")]
    Input(String),
}

impl From<DecodeError> for CliError {
    fn from(err: DecodeError) -> Self {
        CliError::Frame(err.into())
    }
}

impl From<EncodeError> for CliError {
    fn from(err: EncodeError) -> Self {
        CliError::Frame(err.into())
    }
}

impl CliError {
    #[must_use]
    pub fn exit_code(&self) -> CliExitCode {
        match self {
            CliError::Frame(e) => CliExitCode::from(e),
            CliError::ChecksumMismatch { .. } => CliExitCode::Blocking,
            CliError::Read { .. }
            | CliError::Write { .. }
            | CliError::Json { .. }
            | CliError::Render(_)
            | CliError::Input(_) => CliExitCode::Warning,
        }
    }
}
