//! Tests for the GPU projector.

use super::*;
use crate::config::ProjectorConfig;
use crate::storage::{BatchFramer, NodeBatchCodec};
use crate::types::{
    DocumentInput, DocumentRecord, DocumentType, NodeRecord, NodeType, RiskLevel,
};

const TS: u64 = 1_700_000_000_000;

fn projector(width: usize, stride: usize, threshold: usize) -> GpuProjector {
    GpuProjector::new(ProjectorConfig {
        embedding_width: width,
        metadata_stride: stride,
        parallel_threshold: threshold,
    })
    .unwrap()
}

fn node(id: u32, dim: usize, meta_len: usize) -> NodeRecord {
    NodeRecord::new(id, NodeType::Evidence)
        .with_embedding((0..dim).map(|i| id as f32 + i as f32 / 100.0).collect())
        .with_metadata(vec![id as u8; meta_len])
        .with_position([id as f32, 2.0 * id as f32, -1.0])
}

fn assert_shapes(buffers: &GpuBuffers, count: usize, width: usize, stride: usize) {
    assert_eq!(buffers.count, count);
    assert_eq!(buffers.ids.len(), count);
    assert_eq!(buffers.positions.len(), count * POSITION_STRIDE);
    assert_eq!(buffers.embeddings.len(), count * width);
    assert_eq!(buffers.metadata.len(), count * stride);
    assert_eq!(buffers.metadata_lengths.len(), count);
    assert_eq!(buffers.priorities.len(), count);
    assert_eq!(buffers.bank_ids.len(), count);
    assert_eq!(buffers.flags.len(), count);
}

#[test]
fn test_shapes_fixed_regardless_of_source_widths() {
    let nodes = vec![node(1, 2, 0), node(2, 10, 50), node(3, 0, 3)];
    let buffers = projector(4, 8, 1024).project(&nodes);

    println!("AFTER: shapes = {:?}", buffers.shapes());
    assert_shapes(&buffers, 3, 4, 8);
}

#[test]
fn test_embeddings_truncated_and_padded_per_slot() {
    let nodes = vec![node(1, 2, 0), node(2, 10, 0)];
    let buffers = projector(4, 0, 1024).project(&nodes);

    assert_eq!(buffers.embedding(0).unwrap(), &[1.0, 1.01, 0.0, 0.0]);
    assert_eq!(buffers.embedding(1).unwrap(), &[2.0, 2.01, 2.02, 2.03]);
    assert!(buffers.embedding(2).is_none());
}

#[test]
fn test_metadata_truncated_to_stride() {
    let nodes = vec![node(7, 1, 3), node(8, 1, 20)];
    let buffers = projector(1, 8, 1024).project(&nodes);

    assert_eq!(buffers.metadata_lengths, vec![3, 8]);
    assert_eq!(buffers.metadata(0).unwrap(), &[7, 7, 7]);
    assert_eq!(buffers.metadata(1).unwrap(), &[8; 8]);
    assert_eq!(&buffers.metadata[3..8], &[0; 5], "unused slot bytes are zero");
}

#[test]
fn test_zero_metadata_stride_drops_metadata() {
    let nodes = vec![node(1, 1, 12)];
    let buffers = projector(1, 0, 1024).project(&nodes);

    assert!(buffers.metadata.is_empty());
    assert_eq!(buffers.metadata_lengths, vec![0]);
    assert_eq!(buffers.metadata(0).unwrap(), &[] as &[u8]);
}

#[test]
fn test_scalar_arrays_follow_input_order() {
    let mut nodes = vec![node(30, 1, 0), node(10, 1, 0), node(20, 1, 0)];
    nodes[1].priority = 9;
    nodes[1].bank_id = 4;
    nodes[1].flags = 0b101;

    let buffers = projector(1, 0, 1024).project(&nodes);

    assert_eq!(buffers.ids, vec![30, 10, 20]);
    assert_eq!(buffers.priorities[1], 9);
    assert_eq!(buffers.bank_ids[1], 4);
    assert_eq!(buffers.flags[1], 0b101);
    assert_eq!(buffers.position(1), Some([10.0, 20.0, -1.0]));
    assert_eq!(buffers.positions[POSITION_STRIDE + 3], 1.0);
}

#[test]
fn test_parallel_matches_sequential() {
    let nodes: Vec<NodeRecord> = (0..64).map(|i| node(i, (i % 7) as usize, (i % 13) as usize)).collect();

    let sequential = projector(5, 6, usize::MAX).project(&nodes);
    let parallel = projector(5, 6, 1).project(&nodes);

    assert_eq!(sequential, parallel);
}

#[test]
fn test_empty_input() {
    let buffers = projector(384, 256, 1024).project::<NodeRecord>(&[]);
    assert!(buffers.is_empty());
    assert_shapes(&buffers, 0, 384, 256);
    assert_eq!(buffers.total_bytes(), 0);
}

#[test]
fn test_byte_views_cover_arrays() {
    let nodes = vec![node(1, 3, 2), node(2, 3, 2)];
    let buffers = projector(3, 4, 1024).project(&nodes);

    assert_eq!(buffers.ids_bytes().len(), 2 * 4);
    assert_eq!(buffers.positions_bytes().len(), 2 * 4 * 4);
    assert_eq!(buffers.embeddings_bytes().len(), 2 * 3 * 4);
    assert_eq!(buffers.metadata_bytes().len(), 2 * 4);
    assert_eq!(buffers.flags_bytes().len(), 2 * 4);
    assert_eq!(
        buffers.total_bytes(),
        8 + 32 + 24 + 8 + 8 + 2 + 2 + 8
    );
}

#[test]
fn test_zero_width_config_rejected() {
    let result = GpuProjector::new(ProjectorConfig {
        embedding_width: 0,
        ..ProjectorConfig::default()
    });
    assert!(result.is_err());
}

#[test]
fn test_zero_copy_nodes_match_owned_nodes() {
    let nodes = vec![node(1, 6, 40), node(2, 0, 0), node(3, 20, 300)];
    let bytes = NodeBatchCodec::new().encode_at(&nodes, TS).unwrap();
    let batch = NodeBatchCodec::new().decode_zero_copy(&bytes).unwrap();

    let projector = GpuProjector::default();
    let from_refs = projector.project(batch.as_slice());
    let from_owned = projector.project(&nodes);

    assert_eq!(from_refs, from_owned);
    assert_eq!(from_refs.metadata_lengths, vec![40, 0, 256]);
}

fn document(id: &str, kind: &str) -> DocumentRecord {
    let input = DocumentInput {
        id: id.to_string(),
        document_type: Some(kind.to_string()),
        risk_level: Some("high".to_string()),
        confidence_level: Some(0.95),
        embedding: Some(vec![0.25; 384]),
        position: Some([1.0, 2.0, 3.0]),
        priority: Some(200),
        memory_bank: Some(3),
        ..DocumentInput::default()
    };
    DocumentRecord::from_input_at(&input, TS)
}

#[test]
fn test_documents_project_descriptor_and_embedding() {
    let docs = vec![document("a", "contract"), document("b", "brief")];
    let buffers = GpuProjector::default().project(&docs);

    assert_shapes(&buffers, 2, 384, 256);
    assert_eq!(buffers.ids[0], docs[0].content_id);
    assert_eq!(buffers.priorities, vec![200, 200]);
    assert_eq!(buffers.bank_ids, vec![3, 3]);
    assert!(buffers.embedding(1).unwrap().iter().all(|&v| v == 0.25));
    assert_eq!(buffers.metadata_lengths, vec![DOCUMENT_DESCRIPTOR_SIZE as u32; 2]);

    let descriptor = buffers.metadata(0).unwrap();
    assert_eq!(descriptor[0], DocumentType::Contract.code());
    assert_eq!(descriptor[1], RiskLevel::High.code());
    assert_eq!(descriptor[2], docs[0].confidence.raw());
}

#[test]
fn test_document_refs_match_owned_documents() {
    let docs = vec![document("x", "motion"), document("y", "memo"), document("z", "unknown")];
    let bytes = BatchFramer::new().pack_at(&docs, 1, TS).unwrap();
    let refs = BatchFramer::new().unpack_refs(&bytes).unwrap();

    let projector = projector(128, 64, 2);
    assert_eq!(projector.project(&refs), projector.project(&docs));
}
