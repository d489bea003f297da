//! Upstream key/value inputs and their resolution into frame records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::checksum::{hash_optional_text, hash_text};
use crate::layout::{EMBEDDING_DIM, MAX_NEIGHBORS};

use super::confidence::Confidence;
use super::document::{
    ContentHashes, DocumentRecord, LegalAttributes, PerformanceCounters, DEFAULT_PRIORITY,
    DEFAULT_RETENTION_DAYS,
};
use super::enums::{
    Confidentiality, CourtLevel, DocumentClass, DocumentType, EvidenceType, NodeType,
    PracticeArea, RiskLevel,
};
use super::flags::FeatureFlags;
use super::node::NodeRecord;

/// Separator used when hashing a tag list.
pub const TAG_SEPARATOR: &str = "\u{1f}";

/// Document as supplied by the upstream pipeline.
///
/// Every field is optional. Missing fields take the documented defaults when
/// resolved through [`DocumentRecord::from_input`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentInput {
    pub id: String,
    pub title: Option<String>,
    #[serde(alias = "content")]
    pub body: Option<String>,
    #[serde(alias = "type")]
    pub document_type: Option<String>,
    #[serde(alias = "risk")]
    pub risk_level: Option<String>,
    pub priority: Option<u8>,
    #[serde(alias = "confidence")]
    pub confidence_level: Option<f32>,
    pub memory_bank: Option<u8>,
    pub case_id: Option<String>,
    pub user_id: Option<String>,
    pub jurisdiction: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub analysis: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub position: Option<[f32; 3]>,
    pub neighbors: Vec<u32>,
    pub practice_area: Option<String>,
    pub court_level: Option<String>,
    pub evidence_type: Option<String>,
    pub document_class: Option<String>,
    pub confidentiality: Option<String>,
    pub party_count: Option<u16>,
    pub citation_count: Option<u16>,
    pub risk_factors: Option<u32>,
    pub compliance_flags: Option<u32>,
    pub filing_date: Option<u64>,
    pub deadline_date: Option<u64>,
    pub retention_days: Option<u32>,
    pub created_at: Option<u64>,
    pub last_accessed: Option<u64>,
    pub gpu_accelerated: Option<bool>,
    pub simd_accelerated: Option<bool>,
}

/// Resolve an optional label through a closed enum table.
fn label_or_default<T: Default>(label: Option<&str>, parse: fn(&str) -> T) -> T {
    label.map(parse).unwrap_or_default()
}

impl DocumentRecord {
    /// Resolve an upstream input, stamping `created_at` with the current time
    /// when the input does not carry one.
    #[must_use]
    pub fn from_input(input: &DocumentInput) -> Self {
        Self::from_input_at(input, chrono::Utc::now().timestamp_millis().max(0) as u64)
    }

    /// Resolve an upstream input with an explicit clock, for deterministic output.
    #[must_use]
    pub fn from_input_at(input: &DocumentInput, now_ms: u64) -> Self {
        let mut flags = FeatureFlags::NONE;

        let source_embedding = input.embedding.as_deref().unwrap_or(&[]);
        flags.set(FeatureFlags::HAS_EMBEDDING, !source_embedding.is_empty());
        flags.set(
            FeatureFlags::EMBEDDING_TRUNCATED,
            source_embedding.len() > EMBEDDING_DIM,
        );
        if source_embedding.len() > EMBEDDING_DIM {
            debug!(
                id = %input.id,
                len = source_embedding.len(),
                capacity = EMBEDDING_DIM,
                "embedding truncated to frame capacity"
            );
        }
        let mut embedding = source_embedding[..source_embedding.len().min(EMBEDDING_DIM)].to_vec();
        embedding.resize(EMBEDDING_DIM, 0.0);

        flags.set(FeatureFlags::HAS_NEIGHBORS, !input.neighbors.is_empty());
        flags.set(
            FeatureFlags::NEIGHBORS_TRUNCATED,
            input.neighbors.len() > MAX_NEIGHBORS,
        );
        if input.neighbors.len() > MAX_NEIGHBORS {
            debug!(
                id = %input.id,
                len = input.neighbors.len(),
                capacity = MAX_NEIGHBORS,
                "adjacency list truncated to frame capacity"
            );
        }
        let neighbors: Vec<u32> = input.neighbors.iter().take(MAX_NEIGHBORS).copied().collect();

        let metadata_hash = match &input.metadata {
            Some(map) if !map.is_empty() => {
                flags.insert(FeatureFlags::HAS_METADATA);
                hash_text(&Value::Object(map.clone()).to_string())
            }
            _ => 0,
        };

        let tags_hash = if input.tags.is_empty() {
            0
        } else {
            hash_text(&input.tags.join(TAG_SEPARATOR))
        };

        let gpu = input.gpu_accelerated.unwrap_or(false);
        let simd = input.simd_accelerated.unwrap_or(false);
        flags.set(FeatureFlags::GPU_ACCELERATED, gpu);
        flags.set(FeatureFlags::SIMD_ACCELERATED, simd);

        let created_at = input.created_at.unwrap_or(now_ms);

        Self {
            content_id: hash_text(&input.id),
            flags,
            created_at,
            document_type: label_or_default(input.document_type.as_deref(), DocumentType::from_label),
            risk_level: label_or_default(input.risk_level.as_deref(), RiskLevel::from_label),
            priority: input.priority.unwrap_or(DEFAULT_PRIORITY),
            confidence: input
                .confidence_level
                .map(Confidence::from_f32)
                .unwrap_or_default(),
            memory_bank: input.memory_bank.unwrap_or(0),
            last_accessed: input.last_accessed.unwrap_or(created_at),
            case_id_hash: hash_optional_text(input.case_id.as_deref()),
            user_id_hash: hash_optional_text(input.user_id.as_deref()),
            jurisdiction_hash: hash_optional_text(input.jurisdiction.as_deref()),
            position: input.position.unwrap_or([0.0; 3]),
            embedding,
            hashes: ContentHashes {
                title: hash_optional_text(input.title.as_deref()),
                body: hash_optional_text(input.body.as_deref()),
                metadata: metadata_hash,
                tags: tags_hash,
                summary: hash_optional_text(input.summary.as_deref()),
                analysis: hash_optional_text(input.analysis.as_deref()),
            },
            neighbors,
            performance: PerformanceCounters {
                gpu_accelerated: gpu,
                simd_accelerated: simd,
                ..PerformanceCounters::default()
            },
            legal: LegalAttributes {
                practice_area: label_or_default(input.practice_area.as_deref(), PracticeArea::from_label),
                court_level: label_or_default(input.court_level.as_deref(), CourtLevel::from_label),
                evidence_type: label_or_default(input.evidence_type.as_deref(), EvidenceType::from_label),
                document_class: label_or_default(
                    input.document_class.as_deref(),
                    DocumentClass::from_label,
                ),
                party_count: input.party_count.unwrap_or(0),
                citation_count: input.citation_count.unwrap_or(0),
                risk_factors: input.risk_factors.unwrap_or(0),
                compliance_flags: input.compliance_flags.unwrap_or(0),
                confidentiality: label_or_default(
                    input.confidentiality.as_deref(),
                    Confidentiality::from_label,
                ),
                filing_date: input.filing_date.unwrap_or(0),
                deadline_date: input.deadline_date.unwrap_or(0),
                retention_days: input.retention_days.unwrap_or(DEFAULT_RETENTION_DAYS),
            },
            ..Self::default()
        }
    }
}

/// Graph node as supplied by the upstream pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeInput {
    pub id: u32,
    #[serde(alias = "type")]
    pub node_type: Option<String>,
    pub priority: Option<u8>,
    pub bank_id: Option<u8>,
    pub flags: Option<u8>,
    pub confidence: Option<f32>,
    #[serde(alias = "risk")]
    pub risk_level: Option<String>,
    pub position: Option<[f32; 3]>,
    pub embedding: Vec<f32>,
    pub metadata: Option<Map<String, Value>>,
}

impl NodeRecord {
    /// Resolve an upstream node. Metadata is stored as compact JSON bytes.
    #[must_use]
    pub fn from_input(input: &NodeInput) -> Self {
        let metadata = match &input.metadata {
            Some(map) if !map.is_empty() => Value::Object(map.clone()).to_string().into_bytes(),
            _ => Vec::new(),
        };

        Self {
            id: input.id,
            node_type: label_or_default(input.node_type.as_deref(), NodeType::from_label),
            priority: input.priority.unwrap_or(DEFAULT_PRIORITY),
            bank_id: input.bank_id.unwrap_or(0),
            flags: input.flags.unwrap_or(0),
            confidence: input.confidence.map(|c| c.clamp(0.0, 1.0)).unwrap_or(0.5),
            risk_level: label_or_default(input.risk_level.as_deref(), RiskLevel::from_label),
            position: input.position.unwrap_or([0.0; 3]),
            embedding: input.embedding.clone(),
            metadata,
        }
    }
}
