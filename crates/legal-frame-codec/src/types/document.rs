//! Frame-level document record.

use serde::{Deserialize, Serialize};

use crate::layout::{EMBEDDING_DIM, MAX_NEIGHBORS, RANKING_MATRIX_LEN, VAR_REGION_SLOTS};

use super::confidence::Confidence;
use super::enums::{
    Confidentiality, CourtLevel, DocumentClass, DocumentType, EvidenceType, PracticeArea,
    RiskLevel,
};
use super::flags::FeatureFlags;

/// Default priority on the 0-255 scale.
pub const DEFAULT_PRIORITY: u8 = 128;

/// Default retention period (seven years).
pub const DEFAULT_RETENTION_DAYS: u32 = 2555;

/// Default compression ratio, fixed point x100 (1.00).
pub const DEFAULT_COMPRESSION_RATIO_X100: u16 = 100;

/// 4x4 identity, row major.
pub const IDENTITY_RANKING_MATRIX: [f32; RANKING_MATRIX_LEN] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// Per-field content hashes. Zero means the field was absent or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentHashes {
    pub title: u32,
    pub body: u32,
    pub metadata: u32,
    pub tags: u32,
    pub summary: u32,
    pub analysis: u32,
}

/// One `(offset, length)` entry of the variable-length directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VarRegion {
    pub offset: u32,
    pub length: u32,
}

impl VarRegion {
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Named directory slots. Slots 6 and 7 are unassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionSlot {
    Title = 0,
    Body = 1,
    Metadata = 2,
    Tags = 3,
    Summary = 4,
    Analysis = 5,
}

impl RegionSlot {
    pub const ALL: [RegionSlot; 6] = [
        RegionSlot::Title,
        RegionSlot::Body,
        RegionSlot::Metadata,
        RegionSlot::Tags,
        RegionSlot::Summary,
        RegionSlot::Analysis,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceCounters {
    pub access_count: u32,
    pub cache_hits: u32,
    pub last_query_at: u64,
    pub avg_processing_ms: f32,
    pub gpu_accelerated: bool,
    pub simd_accelerated: bool,
    /// Fixed point, ratio x 100.
    pub compression_ratio_x100: u16,
}

impl Default for PerformanceCounters {
    fn default() -> Self {
        Self {
            access_count: 0,
            cache_hits: 0,
            last_query_at: 0,
            avg_processing_ms: 0.0,
            gpu_accelerated: false,
            simd_accelerated: false,
            compression_ratio_x100: DEFAULT_COMPRESSION_RATIO_X100,
        }
    }
}

impl PerformanceCounters {
    #[must_use]
    pub fn compression_ratio(&self) -> f32 {
        f32::from(self.compression_ratio_x100) / 100.0
    }
}

/// Legal-domain attributes. Dates are milliseconds since the Unix epoch, 0 when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalAttributes {
    pub practice_area: PracticeArea,
    pub court_level: CourtLevel,
    pub evidence_type: EvidenceType,
    pub document_class: DocumentClass,
    pub party_count: u16,
    pub citation_count: u16,
    pub risk_factors: u32,
    pub compliance_flags: u32,
    pub confidentiality: Confidentiality,
    pub filing_date: u64,
    pub deadline_date: u64,
    pub retention_days: u32,
}

impl Default for LegalAttributes {
    fn default() -> Self {
        Self {
            practice_area: PracticeArea::default(),
            court_level: CourtLevel::default(),
            evidence_type: EvidenceType::default(),
            document_class: DocumentClass::default(),
            party_count: 0,
            citation_count: 0,
            risk_factors: 0,
            compliance_flags: 0,
            confidentiality: Confidentiality::default(),
            filing_date: 0,
            deadline_date: 0,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

/// Fully resolved document record: exactly what a v1 frame carries.
///
/// Text fields are not stored, only their hashes. The embedding and the
/// adjacency list are the two documented lossy fields: the encoder writes at
/// most [`EMBEDDING_DIM`] floats (zero padded) and [`MAX_NEIGHBORS`] ids.
/// Compare a decoded record against [`DocumentRecord::normalized`] when the
/// source record exceeds either capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Hash of the upstream document id.
    pub content_id: u32,
    pub flags: FeatureFlags,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    pub document_type: DocumentType,
    pub risk_level: RiskLevel,
    pub priority: u8,
    pub confidence: Confidence,
    pub memory_bank: u8,
    pub last_accessed: u64,
    pub case_id_hash: u32,
    pub user_id_hash: u32,
    pub jurisdiction_hash: u32,
    pub position: [f32; 3],
    pub ranking_matrix: [f32; RANKING_MATRIX_LEN],
    pub embedding: Vec<f32>,
    pub hashes: ContentHashes,
    pub var_regions: [VarRegion; VAR_REGION_SLOTS],
    pub neighbors: Vec<u32>,
    pub performance: PerformanceCounters,
    pub legal: LegalAttributes,
}

impl Default for DocumentRecord {
    fn default() -> Self {
        Self {
            content_id: 0,
            flags: FeatureFlags::NONE,
            created_at: 0,
            document_type: DocumentType::default(),
            risk_level: RiskLevel::default(),
            priority: DEFAULT_PRIORITY,
            confidence: Confidence::DEFAULT,
            memory_bank: 0,
            last_accessed: 0,
            case_id_hash: 0,
            user_id_hash: 0,
            jurisdiction_hash: 0,
            position: [0.0; 3],
            ranking_matrix: IDENTITY_RANKING_MATRIX,
            embedding: vec![0.0; EMBEDDING_DIM],
            hashes: ContentHashes::default(),
            var_regions: [VarRegion::default(); VAR_REGION_SLOTS],
            neighbors: Vec::new(),
            performance: PerformanceCounters::default(),
            legal: LegalAttributes::default(),
        }
    }
}

impl DocumentRecord {
    /// Copy with the embedding resized to the frame capacity and the
    /// adjacency list cut to [`MAX_NEIGHBORS`]. This is what a decode returns.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        out.embedding.resize(EMBEDDING_DIM, 0.0);
        out.neighbors.truncate(MAX_NEIGHBORS);
        out
    }

    /// Directory entry for a named slot.
    #[inline]
    #[must_use]
    pub fn region(&self, slot: RegionSlot) -> VarRegion {
        self.var_regions[slot.index()]
    }

    #[must_use]
    pub fn has_var_regions(&self) -> bool {
        self.var_regions.iter().any(|r| !r.is_empty())
    }
}
