//! `legal-frame unpack`
//!
//! Decodes a document or node batch, chosen by its magic, into a JSON array.
//! Node metadata that holds JSON is emitted as JSON; anything else as a byte
//! array.

use std::path::PathBuf;

use clap::Args;
use legal_frame_codec::storage::{BatchFramer, NodeBatchCodec};
use legal_frame_codec::types::{NodeRecord, NodeType, RiskLevel};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{emit_json, read_bytes, BatchFormat};
use crate::error::CliError;

/// Arguments for `unpack`
#[derive(Args, Debug)]
pub struct UnpackArgs {
    /// Batch file to decode
    #[arg(short, long)]
    pub input: PathBuf,

    /// JSON destination; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct NodeOutput {
    id: u32,
    node_type: NodeType,
    priority: u8,
    bank_id: u8,
    flags: u8,
    confidence: f32,
    risk_level: RiskLevel,
    position: [f32; 3],
    embedding: Vec<f32>,
    metadata: Value,
}

impl From<NodeRecord> for NodeOutput {
    fn from(node: NodeRecord) -> Self {
        let metadata = if node.metadata.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&node.metadata)
                .unwrap_or_else(|_| Value::from(node.metadata.clone()))
        };
        Self {
            id: node.id,
            node_type: node.node_type,
            priority: node.priority,
            bank_id: node.bank_id,
            flags: node.flags,
            confidence: node.confidence,
            risk_level: node.risk_level,
            position: node.position,
            embedding: node.embedding,
            metadata,
        }
    }
}

pub async fn unpack_command(args: UnpackArgs) -> Result<(), CliError> {
    debug!("unpack_command: args={:?}", args);
    let bytes = read_bytes(&args.input).await?;

    match BatchFormat::detect(&bytes)? {
        BatchFormat::Documents => {
            let records = BatchFramer::new().unpack(&bytes)?;
            info!("unpack: {} documents from {}", records.len(), args.input.display());
            emit_json(&records, args.output.as_ref()).await
        }
        BatchFormat::Nodes => {
            let nodes: Vec<NodeOutput> = NodeBatchCodec::new()
                .decode(&bytes)?
                .into_iter()
                .map(NodeOutput::from)
                .collect();
            info!("unpack: {} nodes from {}", nodes.len(), args.input.display());
            emit_json(&nodes, args.output.as_ref()).await
        }
    }
}
