//! Round-trip properties of records, document batches and node batches.

use super::helpers::*;
use legal_frame_codec::layout::{EMBEDDING_DIM, MAX_NEIGHBORS};
use legal_frame_codec::storage::{BatchFramer, NodeBatchCodec, RecordCodec};
use legal_frame_codec::types::{DocumentInput, DocumentRecord, DocumentType, FeatureFlags};

#[test]
fn test_record_round_trip_for_many_seeds() {
    let codec = RecordCodec::new();
    for seed in 0..32 {
        let record = document(seed);
        let bytes = codec.encode(&record, 1).expect("encode");
        assert_eq!(bytes.len(), 2048);
        assert_eq!(codec.decode(&bytes).expect("decode"), record, "seed {seed}");
    }
    println!("[PASS] 32 records round trip");
}

#[test]
fn test_oversized_fields_round_trip_to_truncated_record() {
    let mut record = document(7);
    record.embedding = (0..EMBEDDING_DIM + 50).map(|i| i as f32).collect();
    record.neighbors = (100..100 + MAX_NEIGHBORS as u32 + 4).collect();

    let codec = RecordCodec::new();
    let decoded = codec.decode(&codec.encode(&record, 1).expect("encode")).expect("decode");

    println!("BEFORE: embedding {} neighbors {}", record.embedding.len(), record.neighbors.len());
    println!("AFTER: embedding {} neighbors {}", decoded.embedding.len(), decoded.neighbors.len());
    assert_eq!(decoded, record.normalized());
    assert_eq!(decoded.embedding.len(), EMBEDDING_DIM);
    assert_eq!(decoded.neighbors.len(), MAX_NEIGHBORS);
    assert_eq!(decoded.neighbors[MAX_NEIGHBORS - 1], 100 + MAX_NEIGHBORS as u32 - 1);
}

#[test]
fn test_short_embedding_is_zero_padded() {
    let mut record = document(3);
    record.embedding = vec![1.5; 10];

    let codec = RecordCodec::new();
    let decoded = codec.decode(&codec.encode(&record, 1).expect("encode")).expect("decode");

    assert_eq!(&decoded.embedding[..10], &[1.5; 10]);
    assert!(decoded.embedding[10..].iter().all(|&v| v == 0.0));
}

#[test]
fn test_input_truncation_sets_flags() {
    let input = DocumentInput {
        id: "long".into(),
        embedding: Some(vec![0.1; 500]),
        neighbors: (0..40).collect(),
        ..DocumentInput::default()
    };
    let record = DocumentRecord::from_input_at(&input, TS);

    assert!(record.flags.contains(FeatureFlags::EMBEDDING_TRUNCATED));
    assert!(record.flags.contains(FeatureFlags::NEIGHBORS_TRUNCATED));
    assert_eq!(record.neighbors.len(), MAX_NEIGHBORS);
}

#[test]
fn test_unknown_document_type_falls_back_to_evidence() {
    let input = DocumentInput {
        id: "odd".into(),
        document_type: Some("affidavit-of-something".into()),
        ..DocumentInput::default()
    };
    let record = DocumentRecord::from_input_at(&input, TS);

    let codec = RecordCodec::new();
    let decoded = codec.decode(&codec.encode(&record, 1).expect("encode")).expect("decode");
    assert_eq!(decoded.document_type, DocumentType::Evidence);
    assert_eq!(decoded.document_type.as_str(), "evidence");
}

#[test]
fn test_batch_pack_unpack_is_identity() {
    let framer = BatchFramer::new();
    for n in [0u32, 1, 2, 5, 17] {
        let records = documents(n);
        let bytes = framer.pack_at(&records, 1, TS).expect("pack");
        assert_eq!(framer.unpack(&bytes).expect("unpack"), records, "n = {n}");
    }
}

#[test]
fn test_zero_copy_views_match_owned_decode() {
    let framer = BatchFramer::new();
    let records = documents(4);
    let bytes = framer.pack_at(&records, 1, TS).expect("pack");

    let refs = framer.unpack_refs(&bytes).expect("unpack_refs");
    assert_eq!(refs.len(), 4);
    for (view, record) in refs.iter().zip(&records) {
        assert_eq!(view.content_id(), record.content_id);
        assert!(view.embedding_iter().eq(record.embedding.iter().copied()));
        assert_eq!(&view.to_owned_record(), record);
    }
}

#[test]
fn test_node_batch_round_trip() {
    let codec = NodeBatchCodec::new();
    for n in [0u32, 1, 3, 12] {
        let input = nodes(n);
        let bytes = codec.encode_at(&input, TS).expect("encode");
        assert_eq!(bytes.len() % 8, 0, "node batches end on a region boundary");
        assert_eq!(codec.decode(&bytes).expect("decode"), input, "n = {n}");
    }
}

#[test]
fn test_node_zero_copy_exposes_metadata_in_place() {
    let codec = NodeBatchCodec::new();
    let input = nodes(5);
    let bytes = codec.encode_at(&input, TS).expect("encode");

    let batch = codec.decode_zero_copy(&bytes).expect("decode");
    let range = bytes.as_ptr_range();
    for (view, node) in batch.iter().zip(&input) {
        assert_eq!(view.metadata(), node.metadata.as_slice());
        assert!(range.contains(&view.metadata().as_ptr()) || node.metadata.is_empty());
    }
}
