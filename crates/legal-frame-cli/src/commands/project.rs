//! `legal-frame project`
//!
//! Decodes a batch zero-copy, projects it into structure-of-arrays GPU
//! buffers and prints their shapes. Nothing is uploaded.

use std::path::{Path, PathBuf};

use clap::Args;
use legal_frame_codec::gpu::{BufferShapes, GpuProjector};
use legal_frame_codec::storage::{BatchFramer, NodeBatchCodec};
use serde::Serialize;
use tracing::{debug, info};

use super::{emit_json, load_config, read_bytes, BatchFormat};
use crate::error::CliError;

/// Arguments for `project`
#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Batch file to project
    #[arg(short, long)]
    pub input: PathBuf,

    /// Embedding slot width; defaults to the configured projector width
    #[arg(long)]
    pub embedding_width: Option<usize>,

    /// Metadata slot size in bytes; defaults to the configured stride
    #[arg(long)]
    pub metadata_stride: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ProjectReport {
    format: BatchFormat,
    shapes: BufferShapes,
}

pub async fn project_command(args: ProjectArgs, config_path: Option<&Path>) -> Result<(), CliError> {
    debug!("project_command: args={:?}", args);
    let mut config = load_config(config_path)?.projector;
    if let Some(width) = args.embedding_width {
        config.embedding_width = width;
    }
    if let Some(stride) = args.metadata_stride {
        config.metadata_stride = stride;
    }
    let projector = GpuProjector::new(config)?;

    let bytes = read_bytes(&args.input).await?;
    let format = BatchFormat::detect(&bytes)?;
    let buffers = match format {
        BatchFormat::Documents => {
            let records = BatchFramer::new().unpack_refs(&bytes)?;
            projector.project(&records)
        }
        BatchFormat::Nodes => {
            let batch = NodeBatchCodec::new().decode_zero_copy(&bytes)?;
            projector.project(batch.as_slice())
        }
    };

    let shapes = buffers.shapes();
    info!(
        "project: {} records -> {} bytes of GPU buffers",
        shapes.count, shapes.total_bytes
    );
    emit_json(&ProjectReport { format, shapes }, None).await
}
