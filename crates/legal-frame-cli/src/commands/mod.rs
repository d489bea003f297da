//! CLI command handlers
//!
//! # Modules
//!
//! - `pack`: JSON inputs to a document or node batch
//! - `unpack`: batch to JSON records
//! - `inspect`: header and checksum report
//! - `project`: GPU buffer shapes

pub mod inspect;
pub mod pack;
pub mod project;
pub mod unpack;

use std::future::Future;
use std::path::{Path, PathBuf};

use legal_frame_codec::layout::{BATCH_MAGIC, NODE_BATCH_MAGIC};
use legal_frame_codec::{DecodeError, FrameConfig};
use serde::Serialize;
use tracing::{debug, error};

use crate::error::{CliError, CliExitCode};

/// Await a command and map its outcome to an exit code.
///
/// Errors are logged and also written to stderr, so they show up without `-v`.
pub async fn run<F>(name: &str, command: F) -> CliExitCode
where
    F: Future<Output = Result<(), CliError>>,
{
    match command.await {
        Ok(()) => CliExitCode::Success,
        Err(e) => {
            let code = e.exit_code();
            error!("{}: {} (exit {})", name, e, code as u8);
            eprintln!("legal-frame {name}: {e}");
            code
        }
    }
}

/// Load the config file if one was given, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<FrameConfig, CliError> {
    let config = match path {
        Some(path) => FrameConfig::from_file(path)?,
        None => FrameConfig::default(),
    }
    .with_env_overrides();
    config.validate()?;
    debug!("config: {:?}", config);
    Ok(config)
}

/// Which batch format a buffer holds, by magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchFormat {
    Documents,
    Nodes,
}

impl BatchFormat {
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if there is no room for a magic
    /// - `DecodeError::InvalidFormat` if the magic is neither batch magic
    pub fn detect(bytes: &[u8]) -> Result<Self, DecodeError> {
        let magic = bytes.get(..4).ok_or(DecodeError::TruncatedBuffer {
            needed: 4,
            available: bytes.len(),
        })?;
        if magic == BATCH_MAGIC {
            Ok(BatchFormat::Documents)
        } else if magic == NODE_BATCH_MAGIC {
            Ok(BatchFormat::Nodes)
        } else {
            Err(DecodeError::InvalidFormat {
                reason: format!("unrecognized batch magic {magic:02x?}"),
            })
        }
    }
}

pub async fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    tokio::fs::read(path).await.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub async fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| CliError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Pretty JSON to `output`, or to stdout when there is none.
pub async fn emit_json<T: Serialize>(value: &T, output: Option<&PathBuf>) -> Result<(), CliError> {
    let mut text = serde_json::to_string_pretty(value).map_err(CliError::Render)?;
    text.push('\n');
    match output {
        Some(path) => write_bytes(path, text.as_bytes()).await,
        None => {
            print!("{text}");
            Ok(())
        }
    }
}
