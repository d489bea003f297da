//! Zero-copy view of a document frame.

use crate::layout::{v1, EMBEDDING_DIM, MAX_NEIGHBORS, RANKING_MATRIX_LEN, VAR_REGION_SLOTS};
use crate::types::{
    Confidence, Confidentiality, ContentHashes, CourtLevel, DocumentClass, DocumentRecord,
    DocumentType, EvidenceType, FeatureFlags, LegalAttributes, PerformanceCounters,
    PracticeArea, RiskLevel, VarRegion,
};

/// Borrowed view of one validated document frame.
///
/// All data stays in the source buffer. Scalar accessors decode on read;
/// [`DocumentRecordRef::embedding`] hands out the embedding itself as a
/// `&[f32]` when the host byte order and buffer alignment allow it.
#[derive(Debug, Clone, Copy)]
pub struct DocumentRecordRef<'a> {
    bytes: &'a [u8],
    version: u32,
}

impl<'a> DocumentRecordRef<'a> {
    /// Wrap a frame that has already passed header and size validation.
    pub(crate) fn new_unchecked(bytes: &'a [u8], version: u32) -> Self {
        Self { bytes, version }
    }

    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Raw frame bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    #[inline]
    pub fn content_id(&self) -> u32 {
        v1::CONTENT_ID.read_u32(self.bytes)
    }

    #[inline]
    pub fn checksum(&self) -> u32 {
        v1::CHECKSUM.read_u32(self.bytes)
    }

    #[inline]
    pub fn flags(&self) -> FeatureFlags {
        FeatureFlags::from_bits(v1::FEATURE_FLAGS.read_u32(self.bytes))
    }

    #[inline]
    pub fn created_at(&self) -> u64 {
        v1::CREATED_AT.read_u64(self.bytes)
    }

    #[inline]
    pub fn document_type(&self) -> DocumentType {
        DocumentType::from_code(v1::DOCUMENT_TYPE.read_u8(self.bytes))
    }

    #[inline]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_code(v1::RISK_LEVEL.read_u8(self.bytes))
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        v1::PRIORITY.read_u8(self.bytes)
    }

    #[inline]
    pub fn confidence(&self) -> Confidence {
        Confidence::from_raw(v1::CONFIDENCE.read_u8(self.bytes))
    }

    #[inline]
    pub fn memory_bank(&self) -> u8 {
        v1::MEMORY_BANK.read_u8(self.bytes)
    }

    #[inline]
    pub fn last_accessed(&self) -> u64 {
        v1::LAST_ACCESSED.read_u64(self.bytes)
    }

    #[inline]
    pub fn case_id_hash(&self) -> u32 {
        v1::CASE_ID_HASH.read_u32(self.bytes)
    }

    #[inline]
    pub fn user_id_hash(&self) -> u32 {
        v1::USER_ID_HASH.read_u32(self.bytes)
    }

    #[inline]
    pub fn jurisdiction_hash(&self) -> u32 {
        v1::JURISDICTION_HASH.read_u32(self.bytes)
    }

    pub fn position(&self) -> [f32; 3] {
        let mut out = [0.0f32; 3];
        v1::POSITION.read_f32_into(self.bytes, &mut out);
        out
    }

    pub fn ranking_matrix(&self) -> [f32; RANKING_MATRIX_LEN] {
        let mut out = [0.0f32; RANKING_MATRIX_LEN];
        v1::RANKING_MATRIX.read_f32_into(self.bytes, &mut out);
        out
    }

    /// Raw little-endian embedding bytes.
    #[inline]
    pub fn embedding_bytes(&self) -> &'a [u8] {
        v1::EMBEDDING.slice(self.bytes)
    }

    /// The embedding as a borrowed float slice, without copying.
    ///
    /// Returns `None` on big-endian hosts or when the source buffer is not
    /// 4-byte aligned; use [`Self::embedding_iter`] in that case.
    pub fn embedding(&self) -> Option<&'a [f32]> {
        if cfg!(target_endian = "little") {
            bytemuck::try_cast_slice(self.embedding_bytes()).ok()
        } else {
            None
        }
    }

    /// Decode the embedding value by value. Works for any alignment.
    pub fn embedding_iter(&self) -> impl ExactSizeIterator<Item = f32> + 'a {
        self.embedding_bytes()
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    /// Copy the embedding into `dst`, truncating or zero-padding to its length.
    pub fn copy_embedding_into(&self, dst: &mut [f32]) {
        match self.embedding() {
            Some(src) => {
                let n = src.len().min(dst.len());
                dst[..n].copy_from_slice(&src[..n]);
                dst[n..].fill(0.0);
            }
            None => {
                dst.fill(0.0);
                for (d, s) in dst.iter_mut().zip(self.embedding_iter()) {
                    *d = s;
                }
            }
        }
    }

    pub fn content_hashes(&self) -> ContentHashes {
        ContentHashes {
            title: v1::TITLE_HASH.read_u32(self.bytes),
            body: v1::BODY_HASH.read_u32(self.bytes),
            metadata: v1::METADATA_HASH.read_u32(self.bytes),
            tags: v1::TAGS_HASH.read_u32(self.bytes),
            summary: v1::SUMMARY_HASH.read_u32(self.bytes),
            analysis: v1::ANALYSIS_HASH.read_u32(self.bytes),
        }
    }

    pub fn var_regions(&self) -> [VarRegion; VAR_REGION_SLOTS] {
        let mut raw = [0u32; VAR_REGION_SLOTS * 2];
        v1::VAR_DIRECTORY.read_u32_into(self.bytes, &mut raw);
        let mut out = [VarRegion::default(); VAR_REGION_SLOTS];
        for (region, pair) in out.iter_mut().zip(raw.chunks_exact(2)) {
            *region = VarRegion {
                offset: pair[0],
                length: pair[1],
            };
        }
        out
    }

    /// Stored neighbor count, clamped to the adjacency capacity.
    #[inline]
    pub fn neighbor_count(&self) -> usize {
        usize::from(v1::NEIGHBOR_COUNT.read_u8(self.bytes)).min(MAX_NEIGHBORS)
    }

    pub fn neighbors(&self) -> Vec<u32> {
        let mut all = [0u32; MAX_NEIGHBORS];
        v1::NEIGHBORS.read_u32_into(self.bytes, &mut all);
        all[..self.neighbor_count()].to_vec()
    }

    pub fn performance(&self) -> PerformanceCounters {
        PerformanceCounters {
            access_count: v1::ACCESS_COUNT.read_u32(self.bytes),
            cache_hits: v1::CACHE_HITS.read_u32(self.bytes),
            last_query_at: v1::LAST_QUERY_AT.read_u64(self.bytes),
            avg_processing_ms: v1::AVG_PROCESSING_MS.read_f32(self.bytes),
            gpu_accelerated: v1::GPU_ACCELERATED.read_u8(self.bytes) != 0,
            simd_accelerated: v1::SIMD_ACCELERATED.read_u8(self.bytes) != 0,
            compression_ratio_x100: v1::COMPRESSION_RATIO.read_u16(self.bytes),
        }
    }

    pub fn legal(&self) -> LegalAttributes {
        LegalAttributes {
            practice_area: PracticeArea::from_code(v1::PRACTICE_AREA.read_u8(self.bytes)),
            court_level: CourtLevel::from_code(v1::COURT_LEVEL.read_u8(self.bytes)),
            evidence_type: EvidenceType::from_code(v1::EVIDENCE_TYPE.read_u8(self.bytes)),
            document_class: DocumentClass::from_code(v1::DOCUMENT_CLASS.read_u8(self.bytes)),
            party_count: v1::PARTY_COUNT.read_u16(self.bytes),
            citation_count: v1::CITATION_COUNT.read_u16(self.bytes),
            risk_factors: v1::RISK_FACTORS.read_u32(self.bytes),
            compliance_flags: v1::COMPLIANCE_FLAGS.read_u32(self.bytes),
            confidentiality: Confidentiality::from_code(v1::CONFIDENTIALITY.read_u8(self.bytes)),
            filing_date: v1::FILING_DATE.read_u64(self.bytes),
            deadline_date: v1::DEADLINE_DATE.read_u64(self.bytes),
            retention_days: v1::RETENTION_DAYS.read_u32(self.bytes),
        }
    }

    /// Convert to an owned record (allocates).
    pub fn to_owned_record(&self) -> DocumentRecord {
        let mut embedding = Vec::with_capacity(EMBEDDING_DIM);
        embedding.extend(self.embedding_iter());

        DocumentRecord {
            content_id: self.content_id(),
            flags: self.flags(),
            created_at: self.created_at(),
            document_type: self.document_type(),
            risk_level: self.risk_level(),
            priority: self.priority(),
            confidence: self.confidence(),
            memory_bank: self.memory_bank(),
            last_accessed: self.last_accessed(),
            case_id_hash: self.case_id_hash(),
            user_id_hash: self.user_id_hash(),
            jurisdiction_hash: self.jurisdiction_hash(),
            position: self.position(),
            ranking_matrix: self.ranking_matrix(),
            embedding,
            hashes: self.content_hashes(),
            var_regions: self.var_regions(),
            neighbors: self.neighbors(),
            performance: self.performance(),
            legal: self.legal(),
        }
    }
}
