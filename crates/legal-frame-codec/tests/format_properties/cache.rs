//! Frame cache behavior through the public API.

use std::sync::Arc;

use super::helpers::*;
use legal_frame_codec::cache::{CacheKey, FrameCache};
use legal_frame_codec::pipeline::CachedEncoder;
use legal_frame_codec::storage::BatchFramer;

#[test]
fn test_least_recently_accessed_key_is_evicted_first() {
    let cache = FrameCache::with_capacity(4).expect("cache");
    let keys: Vec<CacheKey> = (0..5u32).map(|i| CacheKey::from_node_ids([i, i + 100])).collect();

    for key in &keys[..4] {
        cache.put(*key, vec![1u8; 4]).expect("put");
    }
    // Touch keys 0 and 1 so key 2 becomes the least recently accessed.
    assert!(cache.get(&keys[0]).is_some());
    assert!(cache.get(&keys[1]).is_some());

    cache.put(keys[4], vec![2u8; 4]).expect("put");

    assert_eq!(cache.len(), 4);
    assert!(!cache.contains(&keys[2]));
    for i in [0, 1, 3, 4] {
        assert!(cache.contains(&keys[i]), "key {i} should survive");
    }
    assert_eq!(cache.stats().evictions, 1);
}

#[test]
fn test_one_eviction_per_insert_at_capacity() {
    let cache = FrameCache::with_capacity(3).expect("cache");
    for i in 0..10u32 {
        cache.put(CacheKey::from_node_ids([i]), vec![0u8; 2]).expect("put");
        assert!(cache.len() <= 3);
    }
    assert_eq!(cache.stats().evictions, 7);
}

#[test]
fn test_hit_rate_is_hits_over_lookups() {
    let cache = FrameCache::with_capacity(8).expect("cache");
    assert_eq!(cache.hit_rate(), 0.0, "no lookups means a zero rate, not NaN");

    let present = CacheKey::from_content("present");
    let absent = CacheKey::from_content("absent");
    cache.put(present, vec![9u8; 3]).expect("put");

    for _ in 0..3 {
        assert!(cache.get(&present).is_some());
    }
    for _ in 0..2 {
        assert!(cache.get(&absent).is_none());
    }

    let stats = cache.stats();
    println!("AFTER: {stats:?}");
    assert_eq!((stats.hits, stats.misses), (3, 2));
    assert!((cache.hit_rate() - 0.6).abs() < f64::EPSILON);
}

#[test]
fn test_key_ignores_input_order() {
    let forward = CacheKey::from_node_ids([5, 1, 9, 3]);
    let backward = CacheKey::from_node_ids([3, 9, 1, 5]);
    assert_eq!(forward, backward);
    assert_eq!(forward.label(), backward.label());

    assert_ne!(forward, CacheKey::from_node_ids([1, 3, 5, 10]));
    assert_ne!(
        CacheKey::from_document_ids([1, 2], 1),
        CacheKey::from_node_ids([1, 2]),
        "document and node keys never collide"
    );
}

#[test]
fn test_label_names_count_and_bounds() {
    let key = CacheKey::from_node_ids([42, 7, 19]);
    let label = key.label();
    println!("AFTER: label = {label}");
    assert!(label.starts_with("nodes_3_7_42_"), "{label}");
}

#[test]
fn test_cached_encoder_reuses_bytes_across_orderings() {
    let cache = Arc::new(FrameCache::with_capacity(16).expect("cache"));
    let encoder = CachedEncoder::with_cache(Arc::clone(&cache));

    let records = documents(5);
    let mut shuffled = records.clone();
    shuffled.swap(0, 4);
    shuffled.swap(1, 3);

    let first = encoder.encode_documents(&records).expect("encode");
    let second = encoder.encode_documents(&shuffled).expect("encode");

    assert_eq!(first, second);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().hits, 1);

    let unpacked = BatchFramer::new().unpack(&first).expect("unpack");
    let ids: Vec<u32> = unpacked.iter().map(|r| r.content_id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}
