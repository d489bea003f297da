//! Document record layout, version 1 (2048 bytes).
//!
//! | Offset | Size | Region |
//! |--------|------|--------|
//! | 0 | 32 | Header: magic, version, content id, declared size, checksum, flags, created_at |
//! | 32 | 32 | Core: type, risk, priority, confidence, bank, last_accessed, id hashes |
//! | 64 | 80 | Spatial: position [f32; 3], ranking matrix [f32; 16] |
//! | 144 | 1536 | Embedding [f32; 384] |
//! | 1680 | 24 | Content hashes: title, body, metadata, tags, summary, analysis |
//! | 1704 | 64 | Variable-length directory: 8 x (offset, length) |
//! | 1768 | 64 | Adjacency: 16 x u32 neighbor ids |
//! | 1832 | 28 | Performance counters |
//! | 1860 | 40 | Legal attributes |
//! | 1920 | 128 | Reserved |
//!
//! The record checksum is CRC-32 over the whole frame minus its own field:
//! `[0, 16)` followed by `[20, frame_size)`.

use std::ops::Range;

use crate::checksum::checksum_parts;

use super::field::{fields_are_packed, FieldEncoding, FieldSpec};

/// Magic bytes: "LGDR" = Legal Graph Document Record.
pub const DOCUMENT_MAGIC: [u8; 4] = *b"LGDR";

/// Version written by default.
pub const CURRENT_DOCUMENT_VERSION: u32 = 1;

/// Versions the decoder understands. No partial-compatibility guessing.
pub const SUPPORTED_DOCUMENT_VERSIONS: &[u32] = &[1];

pub const FRAME_SIZE_V1: usize = 2048;
pub const RECORD_HEADER_SIZE: usize = 32;

/// Fixed embedding capacity. Longer vectors are truncated, shorter zero-padded.
pub const EMBEDDING_DIM: usize = 384;

/// Fixed adjacency capacity. Excess neighbors are dropped.
pub const MAX_NEIGHBORS: usize = 16;

pub const VAR_REGION_SLOTS: usize = 8;
pub const RANKING_MATRIX_LEN: usize = 16;
pub const RESERVED_SIZE: usize = 128;

/// Field table for version 1.
pub mod v1 {
    use super::*;
    use FieldEncoding::*;

    // Header
    pub const MAGIC: FieldSpec = FieldSpec::new("magic", 0, Bytes(4));
    pub const VERSION: FieldSpec = FieldSpec::new("version", 4, U32);
    pub const CONTENT_ID: FieldSpec = FieldSpec::new("content_id", 8, U32);
    pub const DECLARED_SIZE: FieldSpec = FieldSpec::new("declared_size", 12, U32);
    pub const CHECKSUM: FieldSpec = FieldSpec::new("checksum", 16, U32);
    pub const FEATURE_FLAGS: FieldSpec = FieldSpec::new("feature_flags", 20, U32);
    pub const CREATED_AT: FieldSpec = FieldSpec::new("created_at", 24, U64);

    // Core
    pub const DOCUMENT_TYPE: FieldSpec = FieldSpec::new("document_type", 32, U8);
    pub const RISK_LEVEL: FieldSpec = FieldSpec::new("risk_level", 33, U8);
    pub const PRIORITY: FieldSpec = FieldSpec::new("priority", 34, U8);
    pub const CONFIDENCE: FieldSpec = FieldSpec::new("confidence", 35, U8);
    pub const MEMORY_BANK: FieldSpec = FieldSpec::new("memory_bank", 36, U8);
    pub const CORE_PADDING: FieldSpec = FieldSpec::new("core_padding", 37, Bytes(3));
    pub const LAST_ACCESSED: FieldSpec = FieldSpec::new("last_accessed", 40, U64);
    pub const CASE_ID_HASH: FieldSpec = FieldSpec::new("case_id_hash", 48, U32);
    pub const USER_ID_HASH: FieldSpec = FieldSpec::new("user_id_hash", 52, U32);
    pub const JURISDICTION_HASH: FieldSpec = FieldSpec::new("jurisdiction_hash", 56, U32);

    // Spatial / ranking
    pub const POSITION: FieldSpec = FieldSpec::new("position", 64, F32Array(3));
    pub const RANKING_MATRIX: FieldSpec =
        FieldSpec::new("ranking_matrix", 76, F32Array(RANKING_MATRIX_LEN));

    // Embedding
    pub const EMBEDDING: FieldSpec = FieldSpec::new("embedding", 144, F32Array(EMBEDDING_DIM));

    // Content hashes
    pub const TITLE_HASH: FieldSpec = FieldSpec::new("title_hash", 1680, U32);
    pub const BODY_HASH: FieldSpec = FieldSpec::new("body_hash", 1684, U32);
    pub const METADATA_HASH: FieldSpec = FieldSpec::new("metadata_hash", 1688, U32);
    pub const TAGS_HASH: FieldSpec = FieldSpec::new("tags_hash", 1692, U32);
    pub const SUMMARY_HASH: FieldSpec = FieldSpec::new("summary_hash", 1696, U32);
    pub const ANALYSIS_HASH: FieldSpec = FieldSpec::new("analysis_hash", 1700, U32);

    // Variable-length directory: (offset, length) pairs, flattened
    pub const VAR_DIRECTORY: FieldSpec =
        FieldSpec::new("var_directory", 1704, U32Array(VAR_REGION_SLOTS * 2));

    // Adjacency
    pub const NEIGHBORS: FieldSpec = FieldSpec::new("neighbors", 1768, U32Array(MAX_NEIGHBORS));

    // Performance counters
    pub const ACCESS_COUNT: FieldSpec = FieldSpec::new("access_count", 1832, U32);
    pub const CACHE_HITS: FieldSpec = FieldSpec::new("cache_hits", 1836, U32);
    pub const LAST_QUERY_AT: FieldSpec = FieldSpec::new("last_query_at", 1840, U64);
    pub const AVG_PROCESSING_MS: FieldSpec = FieldSpec::new("avg_processing_ms", 1848, F32);
    pub const GPU_ACCELERATED: FieldSpec = FieldSpec::new("gpu_accelerated", 1852, U8);
    pub const SIMD_ACCELERATED: FieldSpec = FieldSpec::new("simd_accelerated", 1853, U8);
    pub const COMPRESSION_RATIO: FieldSpec = FieldSpec::new("compression_ratio_x100", 1854, U16);
    pub const NEIGHBOR_COUNT: FieldSpec = FieldSpec::new("neighbor_count", 1856, U8);
    pub const PERF_PADDING: FieldSpec = FieldSpec::new("perf_padding", 1857, Bytes(3));

    // Legal attributes
    pub const PRACTICE_AREA: FieldSpec = FieldSpec::new("practice_area", 1860, U8);
    pub const COURT_LEVEL: FieldSpec = FieldSpec::new("court_level", 1861, U8);
    pub const EVIDENCE_TYPE: FieldSpec = FieldSpec::new("evidence_type", 1862, U8);
    pub const DOCUMENT_CLASS: FieldSpec = FieldSpec::new("document_class", 1863, U8);
    pub const PARTY_COUNT: FieldSpec = FieldSpec::new("party_count", 1864, U16);
    pub const CITATION_COUNT: FieldSpec = FieldSpec::new("citation_count", 1866, U16);
    pub const RISK_FACTORS: FieldSpec = FieldSpec::new("risk_factors", 1868, U32);
    pub const COMPLIANCE_FLAGS: FieldSpec = FieldSpec::new("compliance_flags", 1872, U32);
    pub const CONFIDENTIALITY: FieldSpec = FieldSpec::new("confidentiality", 1876, U8);
    pub const LEGAL_PADDING: FieldSpec = FieldSpec::new("legal_padding", 1877, Bytes(3));
    pub const FILING_DATE: FieldSpec = FieldSpec::new("filing_date", 1880, U64);
    pub const DEADLINE_DATE: FieldSpec = FieldSpec::new("deadline_date", 1888, U64);
    pub const RETENTION_DAYS: FieldSpec = FieldSpec::new("retention_days", 1896, U32);

    // Forward-compatible growth
    pub const RESERVED: FieldSpec = FieldSpec::new("reserved", 1920, Bytes(RESERVED_SIZE));

    /// Every v1 field in offset order.
    pub const FIELDS: &[FieldSpec] = &[
        MAGIC,
        VERSION,
        CONTENT_ID,
        DECLARED_SIZE,
        CHECKSUM,
        FEATURE_FLAGS,
        CREATED_AT,
        DOCUMENT_TYPE,
        RISK_LEVEL,
        PRIORITY,
        CONFIDENCE,
        MEMORY_BANK,
        CORE_PADDING,
        LAST_ACCESSED,
        CASE_ID_HASH,
        USER_ID_HASH,
        JURISDICTION_HASH,
        POSITION,
        RANKING_MATRIX,
        EMBEDDING,
        TITLE_HASH,
        BODY_HASH,
        METADATA_HASH,
        TAGS_HASH,
        SUMMARY_HASH,
        ANALYSIS_HASH,
        VAR_DIRECTORY,
        NEIGHBORS,
        ACCESS_COUNT,
        CACHE_HITS,
        LAST_QUERY_AT,
        AVG_PROCESSING_MS,
        GPU_ACCELERATED,
        SIMD_ACCELERATED,
        COMPRESSION_RATIO,
        NEIGHBOR_COUNT,
        PERF_PADDING,
        PRACTICE_AREA,
        COURT_LEVEL,
        EVIDENCE_TYPE,
        DOCUMENT_CLASS,
        PARTY_COUNT,
        CITATION_COUNT,
        RISK_FACTORS,
        COMPLIANCE_FLAGS,
        CONFIDENTIALITY,
        LEGAL_PADDING,
        FILING_DATE,
        DEADLINE_DATE,
        RETENTION_DAYS,
        RESERVED,
    ];
}

// Compile-time layout checks
const _V1_FIELDS_PACKED: () = assert!(
    fields_are_packed(v1::FIELDS, FRAME_SIZE_V1),
    "v1 document fields overlap or overflow the frame"
);
const _V1_RESERVED_ENDS_FRAME: () = assert!(
    v1::RESERVED.end() == FRAME_SIZE_V1,
    "reserved region must close the v1 frame"
);
const _V1_HEADER_SIZE: () = assert!(
    v1::CREATED_AT.end() == RECORD_HEADER_SIZE,
    "v1 header must be exactly 32 bytes"
);
const _V1_EMBEDDING_ALIGNED: () = assert!(
    v1::EMBEDDING.offset % 16 == 0,
    "embedding must start on a 16-byte boundary"
);

/// Complete description of one document record version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLayout {
    pub version: u32,
    pub frame_size: usize,
    pub fields: &'static [FieldSpec],
}

impl DocumentLayout {
    /// Regions covered by the record checksum: everything except the
    /// checksum field itself.
    #[inline]
    #[must_use]
    pub fn checksum_regions(&self) -> [Range<usize>; 2] {
        [0..v1::CHECKSUM.offset, v1::CHECKSUM.end()..self.frame_size]
    }

    /// CRC-32 of `frame` over [`Self::checksum_regions`].
    ///
    /// `frame` must hold at least `frame_size` bytes.
    #[must_use]
    pub fn frame_checksum(&self, frame: &[u8]) -> u32 {
        let [head, body] = self.checksum_regions();
        checksum_parts([&frame[head], &frame[body]])
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

pub static DOCUMENT_LAYOUT_V1: DocumentLayout = DocumentLayout {
    version: 1,
    frame_size: FRAME_SIZE_V1,
    fields: v1::FIELDS,
};

/// Layout for `version`, or `None` when the version is not understood.
#[must_use]
pub fn document_layout(version: u32) -> Option<&'static DocumentLayout> {
    match version {
        1 => Some(&DOCUMENT_LAYOUT_V1),
        _ => None,
    }
}

/// Frame size is a function of the version alone.
#[inline]
#[must_use]
pub fn frame_size(version: u32) -> Option<usize> {
    document_layout(version).map(|layout| layout.frame_size)
}

#[inline]
#[must_use]
pub fn is_supported_document_version(version: u32) -> bool {
    SUPPORTED_DOCUMENT_VERSIONS.contains(&version)
}
