//! `legal-frame inspect`
//!
//! Prints a batch header as JSON and verifies the payload checksum without
//! decoding any record. A mismatch is still reported, then exits with 2.

use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use clap::Args;
use legal_frame_codec::checksum::checksum;
use legal_frame_codec::layout::{frame_size, BATCH_HEADER_SIZE, NODE_BATCH_HEADER_SIZE};
use legal_frame_codec::storage::{BatchFramer, NodeBatchCodec, RecordCodec};
use serde::Serialize;
use tracing::{debug, warn};

use super::{emit_json, read_bytes, BatchFormat};
use crate::error::CliError;

/// Arguments for `inspect`
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Batch file to inspect
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    file: PathBuf,
    format: BatchFormat,
    size: usize,
    count: u32,
    /// Node batch version, or the first record's frame version.
    version: Option<u32>,
    /// Bytes the header's count implies, for document batches.
    expected_size: Option<usize>,
    timestamp: u64,
    timestamp_utc: Option<String>,
    stored_checksum: String,
    computed_checksum: String,
    checksum_ok: bool,
}

pub async fn inspect_command(args: InspectArgs) -> Result<(), CliError> {
    debug!("inspect_command: args={:?}", args);
    let bytes = read_bytes(&args.file).await?;
    let format = BatchFormat::detect(&bytes)?;

    let (count, version, expected_size, timestamp, stored, computed) = match format {
        BatchFormat::Documents => {
            let header = BatchFramer::new().read_header(&bytes)?;
            let payload = &bytes[BATCH_HEADER_SIZE..];
            let version = if header.record_count > 0 {
                RecordCodec::new()
                    .decode_header(payload)
                    .ok()
                    .map(|h| h.version)
            } else {
                None
            };
            let expected = version
                .and_then(frame_size)
                .and_then(|size| header.expected_len(size))
                .or_else(|| (header.record_count == 0).then_some(BATCH_HEADER_SIZE));
            (
                header.record_count,
                version,
                expected,
                header.timestamp,
                header.checksum,
                checksum(payload),
            )
        }
        BatchFormat::Nodes => {
            let header = NodeBatchCodec::new().read_header(&bytes)?;
            (
                header.node_count,
                Some(u32::from(header.version)),
                None,
                header.timestamp,
                header.checksum,
                checksum(&bytes[NODE_BATCH_HEADER_SIZE..]),
            )
        }
    };

    let report = InspectReport {
        file: args.file,
        format,
        size: bytes.len(),
        count,
        version,
        expected_size,
        timestamp,
        timestamp_utc: i64::try_from(timestamp)
            .ok()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|t| t.to_rfc3339()),
        stored_checksum: format!("{stored:#010x}"),
        computed_checksum: format!("{computed:#010x}"),
        checksum_ok: stored == computed,
    };
    emit_json(&report, None).await?;

    if stored != computed {
        warn!("inspect: checksum mismatch in {}", report.file.display());
        return Err(CliError::ChecksumMismatch { stored, computed });
    }
    Ok(())
}
