//! Records the projector can read from, owned or borrowed.

use crate::storage::{DocumentRecordRef, NodeRecordRef};
use crate::types::{
    Confidence, DocumentRecord, DocumentType, LegalAttributes, NodeRecord, RiskLevel,
};

/// Size of the metadata descriptor a document contributes to the metadata
/// buffer.
pub const DOCUMENT_DESCRIPTOR_SIZE: usize = 32;

/// A decoded record that can fill one slot of every projected buffer.
///
/// Implementations must fully overwrite the `out` slices they are given.
pub trait ProjectionSource {
    fn projection_id(&self) -> u32;

    fn projection_position(&self) -> [f32; 3];

    fn projection_priority(&self) -> u8;

    fn projection_bank(&self) -> u8;

    fn projection_flags(&self) -> u32;

    /// Write the embedding into `out`, truncating or zero-padding.
    fn copy_embedding(&self, out: &mut [f32]);

    /// Write as much metadata as fits into `out`, zero-filling the rest.
    /// Returns the full source length, which may exceed `out.len()`.
    fn copy_metadata(&self, out: &mut [u8]) -> usize;
}

fn copy_padded<T: Copy + Default>(src: &[T], out: &mut [T]) -> usize {
    let n = src.len().min(out.len());
    out[..n].copy_from_slice(&src[..n]);
    out[n..].fill(T::default());
    src.len()
}

/// Fixed descriptor for a document, little-endian:
///
/// | Offset | Field |
/// |--------|-------|
/// | 0 | document type code |
/// | 1 | risk level code |
/// | 2 | confidence (0-255) |
/// | 3 | confidentiality code |
/// | 4..8 | practice area, court level, evidence type, document class codes |
/// | 8 | party count u16 |
/// | 10 | citation count u16 |
/// | 12 | risk factors u32 |
/// | 16 | compliance flags u32 |
/// | 20 | case id hash u32 |
/// | 24 | jurisdiction hash u32 |
/// | 28 | retention days u32 |
pub fn document_descriptor(
    document_type: DocumentType,
    risk_level: RiskLevel,
    confidence: Confidence,
    legal: &LegalAttributes,
    case_id_hash: u32,
    jurisdiction_hash: u32,
) -> [u8; DOCUMENT_DESCRIPTOR_SIZE] {
    let mut out = [0u8; DOCUMENT_DESCRIPTOR_SIZE];
    out[0] = document_type.code();
    out[1] = risk_level.code();
    out[2] = confidence.raw();
    out[3] = legal.confidentiality.code();
    out[4] = legal.practice_area.code();
    out[5] = legal.court_level.code();
    out[6] = legal.evidence_type.code();
    out[7] = legal.document_class.code();
    out[8..10].copy_from_slice(&legal.party_count.to_le_bytes());
    out[10..12].copy_from_slice(&legal.citation_count.to_le_bytes());
    out[12..16].copy_from_slice(&legal.risk_factors.to_le_bytes());
    out[16..20].copy_from_slice(&legal.compliance_flags.to_le_bytes());
    out[20..24].copy_from_slice(&case_id_hash.to_le_bytes());
    out[24..28].copy_from_slice(&jurisdiction_hash.to_le_bytes());
    out[28..32].copy_from_slice(&legal.retention_days.to_le_bytes());
    out
}

impl ProjectionSource for DocumentRecord {
    fn projection_id(&self) -> u32 {
        self.content_id
    }

    fn projection_position(&self) -> [f32; 3] {
        self.position
    }

    fn projection_priority(&self) -> u8 {
        self.priority
    }

    fn projection_bank(&self) -> u8 {
        self.memory_bank
    }

    fn projection_flags(&self) -> u32 {
        self.flags.bits()
    }

    fn copy_embedding(&self, out: &mut [f32]) {
        copy_padded(&self.embedding, out);
    }

    fn copy_metadata(&self, out: &mut [u8]) -> usize {
        let descriptor = document_descriptor(
            self.document_type,
            self.risk_level,
            self.confidence,
            &self.legal,
            self.case_id_hash,
            self.jurisdiction_hash,
        );
        copy_padded(&descriptor, out)
    }
}

impl ProjectionSource for DocumentRecordRef<'_> {
    fn projection_id(&self) -> u32 {
        self.content_id()
    }

    fn projection_position(&self) -> [f32; 3] {
        self.position()
    }

    fn projection_priority(&self) -> u8 {
        self.priority()
    }

    fn projection_bank(&self) -> u8 {
        self.memory_bank()
    }

    fn projection_flags(&self) -> u32 {
        self.flags().bits()
    }

    fn copy_embedding(&self, out: &mut [f32]) {
        self.copy_embedding_into(out);
    }

    fn copy_metadata(&self, out: &mut [u8]) -> usize {
        let descriptor = document_descriptor(
            self.document_type(),
            self.risk_level(),
            self.confidence(),
            &self.legal(),
            self.case_id_hash(),
            self.jurisdiction_hash(),
        );
        copy_padded(&descriptor, out)
    }
}

impl ProjectionSource for NodeRecord {
    fn projection_id(&self) -> u32 {
        self.id
    }

    fn projection_position(&self) -> [f32; 3] {
        self.position
    }

    fn projection_priority(&self) -> u8 {
        self.priority
    }

    fn projection_bank(&self) -> u8 {
        self.bank_id
    }

    fn projection_flags(&self) -> u32 {
        u32::from(self.flags)
    }

    fn copy_embedding(&self, out: &mut [f32]) {
        copy_padded(&self.embedding, out);
    }

    fn copy_metadata(&self, out: &mut [u8]) -> usize {
        copy_padded(&self.metadata, out)
    }
}

impl ProjectionSource for NodeRecordRef<'_> {
    fn projection_id(&self) -> u32 {
        self.id()
    }

    fn projection_position(&self) -> [f32; 3] {
        self.position()
    }

    fn projection_priority(&self) -> u8 {
        self.priority()
    }

    fn projection_bank(&self) -> u8 {
        self.bank_id()
    }

    fn projection_flags(&self) -> u32 {
        u32::from(self.flags())
    }

    fn copy_embedding(&self, out: &mut [f32]) {
        match self.embedding() {
            Some(src) => {
                copy_padded(src, out);
            }
            None => {
                out.fill(0.0);
                for (dst, value) in out.iter_mut().zip(self.embedding_iter()) {
                    *dst = value;
                }
            }
        }
    }

    fn copy_metadata(&self, out: &mut [u8]) -> usize {
        copy_padded(self.metadata(), out)
    }
}
