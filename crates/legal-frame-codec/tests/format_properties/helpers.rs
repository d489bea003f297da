//! Deterministic records for the property tests.

use legal_frame_codec::types::{DocumentInput, DocumentRecord, NodeRecord, NodeType};

pub const TS: u64 = 1_700_000_000_000;

/// A fully populated document whose fields all depend on `seed`.
pub fn document(seed: u32) -> DocumentRecord {
    let mut metadata = serde_json::Map::new();
    metadata.insert("docket".into(), serde_json::json!(format!("CV-{seed:04}")));

    let input = DocumentInput {
        id: format!("doc-{seed}"),
        title: Some(format!("Exhibit {seed}")),
        body: Some(format!("Body of exhibit {seed}")),
        document_type: Some("evidence".into()),
        risk_level: Some("high".into()),
        priority: Some((seed % 255) as u8),
        confidence_level: Some(0.25 + (seed % 4) as f32 * 0.2),
        memory_bank: Some((seed % 8) as u8),
        case_id: Some(format!("case-{}", seed / 3)),
        jurisdiction: Some("CA".into()),
        metadata: Some(metadata),
        tags: vec!["privileged".into(), format!("t{seed}")],
        embedding: Some((0..384).map(|i| (seed as f32) + i as f32 * 0.001).collect()),
        position: Some([seed as f32, -(seed as f32), 0.5]),
        neighbors: (1..=(seed % 5)).map(|n| seed + n).collect(),
        practice_area: Some("civil".into()),
        party_count: Some(2),
        citation_count: Some(seed as u16),
        filing_date: Some(TS - 86_400_000),
        ..DocumentInput::default()
    };
    DocumentRecord::from_input_at(&input, TS)
}

pub fn documents(n: u32) -> Vec<DocumentRecord> {
    (0..n).map(document).collect()
}

pub fn node(id: u32) -> NodeRecord {
    NodeRecord::new(id, NodeType::Evidence)
        .with_embedding((0..(id % 9)).map(|i| i as f32 * 0.5).collect())
        .with_metadata(format!("{{\"node\":{id}}}").into_bytes())
        .with_position([id as f32, 1.0, 2.0])
}

pub fn nodes(n: u32) -> Vec<NodeRecord> {
    (0..n).map(node).collect()
}

/// Copy of `bytes` with one byte inverted.
pub fn flipped(bytes: &[u8], offset: usize) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out[offset] ^= 0xFF;
    out
}
