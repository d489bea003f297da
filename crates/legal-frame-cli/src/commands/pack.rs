//! `legal-frame pack`
//!
//! Reads a JSON array of upstream inputs and writes one binary batch.
//!
//! ```json
//! [
//!   {"id": "doc-1", "title": "Contract A", "type": "contract", "confidenceLevel": 0.95},
//!   {"id": "doc-2", "type": "brief", "risk": "high", "neighbors": [3, 4]}
//! ]
//! ```
//!
//! With `--kind nodes` the array holds node inputs instead
//! (`{"id": 7, "type": "person", "embedding": [...], "metadata": {...}}`).
//!
//! `--canonical` sorts records by identifier and routes the encode through the
//! frame cache, persisting it when the config enables `persist_to_disk`.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use legal_frame_codec::storage::{BatchFramer, NodeBatchCodec};
use legal_frame_codec::types::{DocumentInput, DocumentRecord, NodeInput, NodeRecord};
use legal_frame_codec::{CachedEncoder, FrameConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{emit_json, load_config, read_bytes, write_bytes, BatchFormat};
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputKind {
    Documents,
    Nodes,
}

/// Arguments for `pack`
#[derive(Args, Debug)]
pub struct PackArgs {
    /// JSON array of document (or node) inputs
    #[arg(short, long)]
    pub input: PathBuf,

    /// Destination batch file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Document frame version; defaults to the configured codec version
    #[arg(long = "frame-version")]
    pub frame_version: Option<u32>,

    /// What the input array holds
    #[arg(long, value_enum, default_value = "documents")]
    pub kind: InputKind,

    /// Sort by identifier and encode through the frame cache
    #[arg(long)]
    pub canonical: bool,
}

/// Printed to stdout after a successful pack.
#[derive(Debug, Serialize)]
struct PackSummary {
    output: PathBuf,
    format: BatchFormat,
    count: usize,
    bytes: usize,
    canonical: bool,
}

pub async fn pack_command(args: PackArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    debug!("pack_command: args={:?}", args);
    let mut config = load_config(config_path)?;
    if let Some(version) = args.frame_version {
        if args.kind == InputKind::Nodes {
            return Err(CliError::Input(
                "--frame-version applies to document batches only".to_string(),
            ));
        }
        config.codec.version = version;
    }

    let raw = read_bytes(&args.input).await?;
    let (format, count, bytes) = match args.kind {
        InputKind::Documents => {
            let inputs: Vec<DocumentInput> = parse_inputs(&args.input, &raw)?;
            let records: Vec<DocumentRecord> = inputs.iter().map(DocumentRecord::from_input).collect();
            let bytes = if args.canonical {
                let encoder = cached_encoder(&config).await?;
                let bytes = encoder.encode_documents(&records)?;
                persist_cache(&encoder, &config).await;
                bytes.to_vec()
            } else {
                BatchFramer::new().pack(&records, config.codec.version)?
            };
            (BatchFormat::Documents, records.len(), bytes)
        }
        InputKind::Nodes => {
            let inputs: Vec<NodeInput> = parse_inputs(&args.input, &raw)?;
            let nodes: Vec<NodeRecord> = inputs.iter().map(NodeRecord::from_input).collect();
            let bytes = if args.canonical {
                let encoder = cached_encoder(&config).await?;
                let bytes = encoder.encode_nodes(&nodes)?;
                persist_cache(&encoder, &config).await;
                bytes.to_vec()
            } else {
                NodeBatchCodec::new().encode(&nodes)?
            };
            (BatchFormat::Nodes, nodes.len(), bytes)
        }
    };

    write_bytes(&args.output, &bytes).await?;
    info!(
        "pack: wrote {} {:?} records ({} bytes) to {}",
        count,
        format,
        bytes.len(),
        args.output.display()
    );

    emit_json(
        &PackSummary {
            output: args.output,
            format,
            count,
            bytes: bytes.len(),
            canonical: args.canonical,
        },
        None,
    )
    .await
}

fn parse_inputs<T: DeserializeOwned>(path: &Path, raw: &[u8]) -> Result<Vec<T>, CliError> {
    serde_json::from_slice(raw).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Encoder over a fresh cache, warmed from disk when persistence is on.
///
/// A missing or unreadable cache file only costs a cold start.
async fn cached_encoder(config: &FrameConfig) -> Result<CachedEncoder, CliError> {
    let encoder = CachedEncoder::from_config(config)?;
    if persistence_enabled(config) {
        if let Err(e) = encoder.cache().load().await {
            warn!("pack: starting with a cold cache: {}", e);
        }
    }
    Ok(encoder)
}

async fn persist_cache(encoder: &CachedEncoder, config: &FrameConfig) {
    if !persistence_enabled(config) {
        return;
    }
    let stats = encoder.cache().stats();
    debug!("pack: cache stats {:?}", stats);
    if let Err(e) = encoder.cache().persist().await {
        warn!("pack: cache not persisted: {}", e);
    }
}

fn persistence_enabled(config: &FrameConfig) -> bool {
    config.cache.enabled && config.cache.persist_to_disk
}
