//! Encoding of document records into fixed frames.

use tracing::debug;

use crate::config::CodecConfig;
use crate::layout::{
    document_layout, v1, DOCUMENT_LAYOUT_V1, DOCUMENT_MAGIC, EMBEDDING_DIM, FRAME_SIZE_V1,
    MAX_NEIGHBORS, VAR_REGION_SLOTS,
};
use crate::types::DocumentRecord;

use crate::storage::EncodeError;

/// Encoder/decoder for single document frames.
///
/// Stateless apart from the checksum policy, so one instance can be shared
/// across threads.
#[derive(Debug, Clone, Copy)]
pub struct RecordCodec {
    /// Verify the record CRC on decode.
    pub(crate) verify_checksum: bool,
}

impl RecordCodec {
    /// Codec that verifies record checksums on decode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            verify_checksum: true,
        }
    }

    /// Codec that skips record checksum verification.
    ///
    /// Used by the batch framer after the batch CRC has already covered
    /// every record byte.
    #[must_use]
    pub fn without_checksum_verification() -> Self {
        Self {
            verify_checksum: false,
        }
    }

    #[must_use]
    pub fn from_config(config: &CodecConfig) -> Self {
        Self {
            verify_checksum: config.verify_record_checksums,
        }
    }

    #[inline]
    #[must_use]
    pub fn verifies_checksum(&self) -> bool {
        self.verify_checksum
    }

    /// Frame size for `version`.
    ///
    /// # Errors
    /// - `EncodeError::UnsupportedVersion` if the version has no layout
    pub fn frame_size(version: u32) -> Result<usize, EncodeError> {
        document_layout(version)
            .map(|layout| layout.frame_size)
            .ok_or(EncodeError::UnsupportedVersion(version))
    }

    /// Encode a record into a freshly allocated frame.
    ///
    /// Never fails for oversized embeddings or adjacency lists; those are
    /// truncated to the frame capacity.
    ///
    /// # Errors
    /// - `EncodeError::UnsupportedVersion` if the version has no layout
    pub fn encode(&self, record: &DocumentRecord, version: u32) -> Result<Vec<u8>, EncodeError> {
        let size = Self::frame_size(version)?;
        let mut buffer = vec![0u8; size];
        self.encode_into(record, version, &mut buffer)?;
        Ok(buffer)
    }

    /// Encode directly into a pre-allocated buffer. Returns bytes written.
    ///
    /// Only the first `frame_size(version)` bytes of `buffer` are touched.
    ///
    /// # Errors
    /// - `EncodeError::UnsupportedVersion` if the version has no layout
    /// - `EncodeError::BufferTooSmall` if `buffer` cannot hold one frame
    pub fn encode_into(
        &self,
        record: &DocumentRecord,
        version: u32,
        buffer: &mut [u8],
    ) -> Result<usize, EncodeError> {
        let size = Self::frame_size(version)?;
        if buffer.len() < size {
            return Err(EncodeError::BufferTooSmall {
                needed: size,
                available: buffer.len(),
            });
        }
        let frame = &mut buffer[..size];
        frame.fill(0);

        match version {
            1 => write_v1(record, frame),
            other => return Err(EncodeError::UnsupportedVersion(other)),
        }
        Ok(size)
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Write every v1 field into a zeroed frame and seal it with the CRC.
fn write_v1(record: &DocumentRecord, buf: &mut [u8]) {
    debug_assert_eq!(buf.len(), FRAME_SIZE_V1);

    // Header
    v1::MAGIC.write_bytes(buf, &DOCUMENT_MAGIC);
    v1::VERSION.write_u32(buf, 1);
    v1::CONTENT_ID.write_u32(buf, record.content_id);
    v1::DECLARED_SIZE.write_u32(buf, FRAME_SIZE_V1 as u32);
    v1::FEATURE_FLAGS.write_u32(buf, record.flags.bits());
    v1::CREATED_AT.write_u64(buf, record.created_at);

    // Core
    v1::DOCUMENT_TYPE.write_u8(buf, record.document_type.code());
    v1::RISK_LEVEL.write_u8(buf, record.risk_level.code());
    v1::PRIORITY.write_u8(buf, record.priority);
    v1::CONFIDENCE.write_u8(buf, record.confidence.raw());
    v1::MEMORY_BANK.write_u8(buf, record.memory_bank);
    v1::LAST_ACCESSED.write_u64(buf, record.last_accessed);
    v1::CASE_ID_HASH.write_u32(buf, record.case_id_hash);
    v1::USER_ID_HASH.write_u32(buf, record.user_id_hash);
    v1::JURISDICTION_HASH.write_u32(buf, record.jurisdiction_hash);

    // Spatial / ranking
    v1::POSITION.write_f32_slice(buf, &record.position);
    v1::RANKING_MATRIX.write_f32_slice(buf, &record.ranking_matrix);

    // Embedding (lossy at capacity)
    let written = v1::EMBEDDING.write_f32_slice(buf, &record.embedding);
    if written < record.embedding.len() {
        debug!(
            content_id = record.content_id,
            len = record.embedding.len(),
            capacity = EMBEDDING_DIM,
            "embedding truncated on encode"
        );
    }

    // Content hashes
    v1::TITLE_HASH.write_u32(buf, record.hashes.title);
    v1::BODY_HASH.write_u32(buf, record.hashes.body);
    v1::METADATA_HASH.write_u32(buf, record.hashes.metadata);
    v1::TAGS_HASH.write_u32(buf, record.hashes.tags);
    v1::SUMMARY_HASH.write_u32(buf, record.hashes.summary);
    v1::ANALYSIS_HASH.write_u32(buf, record.hashes.analysis);

    // Variable-length directory
    let mut directory = [0u32; VAR_REGION_SLOTS * 2];
    for (pair, region) in directory.chunks_exact_mut(2).zip(&record.var_regions) {
        pair[0] = region.offset;
        pair[1] = region.length;
    }
    v1::VAR_DIRECTORY.write_u32_slice(buf, &directory);

    // Adjacency (lossy at capacity)
    let neighbor_count = v1::NEIGHBORS.write_u32_slice(buf, &record.neighbors);
    if neighbor_count < record.neighbors.len() {
        debug!(
            content_id = record.content_id,
            len = record.neighbors.len(),
            capacity = MAX_NEIGHBORS,
            "adjacency list truncated on encode"
        );
    }

    // Performance
    let perf = &record.performance;
    v1::ACCESS_COUNT.write_u32(buf, perf.access_count);
    v1::CACHE_HITS.write_u32(buf, perf.cache_hits);
    v1::LAST_QUERY_AT.write_u64(buf, perf.last_query_at);
    v1::AVG_PROCESSING_MS.write_f32(buf, perf.avg_processing_ms);
    v1::GPU_ACCELERATED.write_u8(buf, u8::from(perf.gpu_accelerated));
    v1::SIMD_ACCELERATED.write_u8(buf, u8::from(perf.simd_accelerated));
    v1::COMPRESSION_RATIO.write_u16(buf, perf.compression_ratio_x100);
    v1::NEIGHBOR_COUNT.write_u8(buf, neighbor_count as u8);

    // Legal
    let legal = &record.legal;
    v1::PRACTICE_AREA.write_u8(buf, legal.practice_area.code());
    v1::COURT_LEVEL.write_u8(buf, legal.court_level.code());
    v1::EVIDENCE_TYPE.write_u8(buf, legal.evidence_type.code());
    v1::DOCUMENT_CLASS.write_u8(buf, legal.document_class.code());
    v1::PARTY_COUNT.write_u16(buf, legal.party_count);
    v1::CITATION_COUNT.write_u16(buf, legal.citation_count);
    v1::RISK_FACTORS.write_u32(buf, legal.risk_factors);
    v1::COMPLIANCE_FLAGS.write_u32(buf, legal.compliance_flags);
    v1::CONFIDENTIALITY.write_u8(buf, legal.confidentiality.code());
    v1::FILING_DATE.write_u64(buf, legal.filing_date);
    v1::DEADLINE_DATE.write_u64(buf, legal.deadline_date);
    v1::RETENTION_DAYS.write_u32(buf, legal.retention_days);

    // Seal
    let crc = DOCUMENT_LAYOUT_V1.frame_checksum(buf);
    v1::CHECKSUM.write_u32(buf, crc);
}
