//! Logical records and the closed value tables they use.
//!
//! [`DocumentInput`] and [`NodeInput`] are what upstream producers hand over:
//! loose, every field optional. [`DocumentRecord`] and [`NodeRecord`] are the
//! resolved forms the codecs read and write.

mod confidence;
mod document;
mod enums;
mod flags;
mod input;
mod node;


pub use confidence::Confidence;
pub use document::{
    ContentHashes, DocumentRecord, LegalAttributes, PerformanceCounters, RegionSlot, VarRegion,
    DEFAULT_COMPRESSION_RATIO_X100, DEFAULT_PRIORITY, DEFAULT_RETENTION_DAYS,
    IDENTITY_RANKING_MATRIX,
};
pub use enums::{
    Confidentiality, CourtLevel, DocumentClass, DocumentType, EvidenceType, NodeType,
    PracticeArea, RiskLevel,
};
pub use flags::FeatureFlags;
pub use input::{DocumentInput, NodeInput, TAG_SEPARATOR};
pub use node::NodeRecord;
