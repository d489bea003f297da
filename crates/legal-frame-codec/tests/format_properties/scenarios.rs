//! Worked scenarios A-D.

use super::helpers::*;
use legal_frame_codec::cache::{CacheKey, FrameCache};
use legal_frame_codec::checksum::hash_text;
use legal_frame_codec::layout::BATCH_HEADER_SIZE;
use legal_frame_codec::storage::{BatchFramer, DecodeError, RecordCodec};
use legal_frame_codec::types::{DocumentInput, DocumentRecord, DocumentType};

#[test]
fn scenario_a_contract_record_round_trip() {
    let embedding: Vec<f32> = (0..384).map(|i| (i as f32 * 0.37).sin()).collect();
    let input = DocumentInput {
        id: "contract-a".into(),
        title: Some("Contract A".into()),
        document_type: Some("contract".into()),
        confidence_level: Some(0.95),
        embedding: Some(embedding.clone()),
        ..DocumentInput::default()
    };
    let record = DocumentRecord::from_input_at(&input, TS);

    let codec = RecordCodec::new();
    let bytes = codec.encode(&record, 1).expect("encode");
    let decoded = codec.decode(&bytes).expect("decode");

    println!("BEFORE: confidence = 0.95");
    println!("AFTER: confidence = {}", decoded.confidence);
    assert_eq!(decoded.document_type, DocumentType::Contract);
    assert_eq!(decoded.document_type.as_str(), "contract");
    assert!((decoded.confidence.value() - 0.95).abs() <= 1.0 / 255.0);
    assert_eq!(decoded.embedding, embedding);
    assert_eq!(decoded.hashes.title, hash_text("Contract A"));
    println!("[PASS] scenario A");
}

#[test]
fn scenario_b_corrupted_batch_yields_no_records() {
    let framer = BatchFramer::new();
    let bytes = framer.pack_at(&documents(3), 1, TS).expect("pack");

    // Offset 40 lies in the payload; the second offset is inside record 2.
    for offset in [40, BATCH_HEADER_SIZE + 2048 + 40] {
        let corrupted = flipped(&bytes, offset);
        let result = framer.unpack(&corrupted);
        println!("AFTER: flip @{offset} -> {:?}", result.as_ref().map(Vec::len));
        assert!(
            matches!(result, Err(DecodeError::IntegrityError { .. })),
            "flip at {offset} must be an integrity error"
        );
    }
    println!("[PASS] scenario B");
}

#[test]
fn scenario_c_empty_batch() {
    let framer = BatchFramer::new();
    let bytes = framer.pack_at(&[], 1, TS).expect("pack");

    assert_eq!(bytes.len(), BATCH_HEADER_SIZE);
    let records = framer.unpack(&bytes).expect("empty batch is valid");
    assert!(records.is_empty());
    println!("[PASS] scenario C");
}

#[test]
fn scenario_d_cache_holds_at_most_max_entries() {
    let cache = FrameCache::with_capacity(100).expect("cache");
    let keys: Vec<CacheKey> = (0..101u32).map(|i| CacheKey::from_node_ids([i])).collect();

    for key in &keys {
        cache.put(*key, vec![0u8; 8]).expect("put");
    }

    println!("AFTER: len = {}, evictions = {}", cache.len(), cache.stats().evictions);
    assert_eq!(cache.len(), 100);
    assert!(!cache.contains(&keys[0]), "first-inserted key must be evicted");
    assert!(keys[1..].iter().all(|k| cache.contains(k)));
    println!("[PASS] scenario D");
}
