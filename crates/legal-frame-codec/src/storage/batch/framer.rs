//! Batch packer/unpacker.

use tracing::{debug, warn};

use crate::checksum::checksum;
use crate::layout::{frame_size, BATCH_HEADER_SIZE, SUPPORTED_DOCUMENT_VERSIONS};
use crate::storage::record::{parse_header, validate_frame, RecordCodec};
use crate::storage::{DecodeError, DocumentRecordRef, EncodeError};
use crate::types::DocumentRecord;

use super::header::BatchHeader;

/// Packs document records into checksummed batches and splits them back.
///
/// Record checksums are not verified on unpack: the batch CRC already
/// covers every record byte.
#[derive(Debug, Clone)]
pub struct BatchFramer {
    codec: RecordCodec,
}

impl BatchFramer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            codec: RecordCodec::without_checksum_verification(),
        }
    }

    /// Pack records stamped with the current time.
    ///
    /// # Errors
    /// - `EncodeError::UnsupportedVersion` if the version has no layout
    /// - `EncodeError::RegionOverflow` if the record count does not fit a u32
    pub fn pack(&self, records: &[DocumentRecord], version: u32) -> Result<Vec<u8>, EncodeError> {
        self.pack_at(records, version, now_millis())
    }

    /// Pack records with an explicit timestamp. Output is deterministic.
    ///
    /// # Errors
    /// Same as [`BatchFramer::pack`].
    pub fn pack_at(
        &self,
        records: &[DocumentRecord],
        version: u32,
        timestamp_ms: u64,
    ) -> Result<Vec<u8>, EncodeError> {
        self.pack_iter(records.iter(), version, timestamp_ms)
    }

    /// Pack borrowed records in iteration order.
    ///
    /// # Errors
    /// Same as [`BatchFramer::pack`].
    pub fn pack_iter<'r, I>(
        &self,
        records: I,
        version: u32,
        timestamp_ms: u64,
    ) -> Result<Vec<u8>, EncodeError>
    where
        I: ExactSizeIterator<Item = &'r DocumentRecord>,
    {
        let frame_size = RecordCodec::frame_size(version)?;
        let count = records.len();
        let record_count = u32::try_from(count).map_err(|_| EncodeError::RegionOverflow {
            region: "batch record count",
            size: count,
        })?;

        let mut buffer = vec![0u8; BATCH_HEADER_SIZE + count * frame_size];
        for (record, frame) in records.zip(buffer[BATCH_HEADER_SIZE..].chunks_exact_mut(frame_size)) {
            self.codec.encode_into(record, version, frame)?;
        }

        let header = BatchHeader {
            record_count,
            timestamp: timestamp_ms,
            checksum: checksum(&buffer[BATCH_HEADER_SIZE..]),
        };
        header.write(&mut buffer);

        debug!(count, version, bytes = buffer.len(), "packed document batch");
        Ok(buffer)
    }

    /// Parse the header without verifying or decoding the payload.
    ///
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if bytes < 20
    /// - `DecodeError::InvalidFormat` on bad magic
    pub fn read_header(&self, bytes: &[u8]) -> Result<BatchHeader, DecodeError> {
        BatchHeader::parse(bytes)
    }

    /// Parse the header and verify the payload checksum.
    ///
    /// # Errors
    /// - Same as [`BatchFramer::read_header`]
    /// - `DecodeError::IntegrityError` on checksum mismatch
    pub fn verify(&self, bytes: &[u8]) -> Result<BatchHeader, DecodeError> {
        let header = BatchHeader::parse(bytes)?;
        let computed = checksum(&bytes[BATCH_HEADER_SIZE..]);
        if computed != header.checksum {
            warn!(
                stored = header.checksum,
                computed, "batch checksum mismatch, rejecting batch"
            );
            return Err(DecodeError::IntegrityError {
                stored: header.checksum,
                computed,
            });
        }
        Ok(header)
    }

    /// Unpack a batch into owned records.
    ///
    /// Either every record is returned or none: any failure rejects the batch.
    /// Checks run in order: header, length floor, checksum, record version,
    /// exact length, then each frame.
    ///
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if the header or payload is short
    /// - `DecodeError::InvalidFormat` on bad magic, mixed versions or trailing bytes
    /// - `DecodeError::IntegrityError` on batch checksum mismatch
    /// - `DecodeError::UnsupportedVersion` if the record version is unknown
    pub fn unpack(&self, bytes: &[u8]) -> Result<Vec<DocumentRecord>, DecodeError> {
        Ok(self
            .unpack_refs(bytes)?
            .iter()
            .map(DocumentRecordRef::to_owned_record)
            .collect())
    }

    /// Unpack a batch into views borrowing `bytes`.
    ///
    /// # Errors
    /// Same as [`BatchFramer::unpack`].
    pub fn unpack_refs<'a>(&self, bytes: &'a [u8]) -> Result<Vec<DocumentRecordRef<'a>>, DecodeError> {
        let header = BatchHeader::parse(bytes)?;
        let count = header.record_count as usize;

        // Length floor first: a short buffer is truncation, not corruption.
        let floor = header
            .expected_len(smallest_frame_size())
            .unwrap_or(usize::MAX);
        if bytes.len() < floor {
            return Err(DecodeError::TruncatedBuffer {
                needed: floor,
                available: bytes.len(),
            });
        }

        self.verify(bytes)?;
        let payload = &bytes[BATCH_HEADER_SIZE..];

        if count == 0 {
            if !payload.is_empty() {
                return Err(DecodeError::invalid_format(format!(
                    "empty batch carries {} trailing bytes",
                    payload.len()
                )));
            }
            return Ok(Vec::new());
        }

        // The first frame fixes the version, and the version fixes the frame size.
        let version = parse_header(payload)?.version;
        let frame_size = RecordCodec::frame_size(version)
            .map_err(|_| DecodeError::UnsupportedVersion(version))?;

        let expected = header.expected_len(frame_size).unwrap_or(usize::MAX);
        if bytes.len() < expected {
            return Err(DecodeError::TruncatedBuffer {
                needed: expected,
                available: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(DecodeError::invalid_format(format!(
                "{} trailing bytes after {} records",
                bytes.len() - expected,
                count
            )));
        }

        let mut records = Vec::with_capacity(count);
        for (index, frame) in payload.chunks_exact(frame_size).enumerate() {
            let view = validate_frame(frame, self.codec.verifies_checksum())?;
            if view.version() != version {
                return Err(DecodeError::invalid_format(format!(
                    "record {} has version {}, batch started with version {}",
                    index,
                    view.version(),
                    version
                )));
            }
            records.push(view);
        }

        debug!(count, version, "unpacked document batch");
        Ok(records)
    }
}

impl Default for BatchFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest frame any supported version produces.
fn smallest_frame_size() -> usize {
    SUPPORTED_DOCUMENT_VERSIONS
        .iter()
        .filter_map(|&v| frame_size(v))
        .min()
        .unwrap_or(0)
}

pub(crate) fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}
