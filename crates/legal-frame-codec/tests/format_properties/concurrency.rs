//! Concurrent callers sharing one frame cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use super::helpers::*;
use legal_frame_codec::cache::{CacheKey, FrameCache};
use legal_frame_codec::storage::NodeBatchCodec;
use legal_frame_codec::FrameError;

#[test]
fn test_concurrent_misses_encode_once() {
    const THREADS: usize = 16;
    let cache = Arc::new(FrameCache::with_capacity(8).expect("cache"));
    let encodes = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(THREADS));
    let input = Arc::new(nodes(6));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let encodes = Arc::clone(&encodes);
            let barrier = Arc::clone(&barrier);
            let input = Arc::clone(&input);
            thread::spawn(move || {
                let key = CacheKey::from_node_ids(input.iter().map(|n| n.id));
                barrier.wait();
                cache
                    .get_or_encode(key, || {
                        encodes.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(20));
                        NodeBatchCodec::new()
                            .encode_at(&input, TS)
                            .map_err(FrameError::from)
                    })
                    .expect("encode")
            })
        })
        .collect();

    let results: Vec<Arc<[u8]>> = handles.into_iter().map(|h| h.join().expect("join")).collect();

    println!("AFTER: encodes = {}, stats = {:?}", encodes.load(Ordering::SeqCst), cache.stats());
    assert_eq!(encodes.load(Ordering::SeqCst), 1);
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.in_flight(), 0);
}

#[test]
fn test_bookkeeping_stays_consistent_under_contention() {
    const THREADS: u32 = 8;
    const ROUNDS: u32 = 200;
    let cache = Arc::new(FrameCache::with_capacity(10).expect("cache"));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let key = CacheKey::from_node_ids([(t * 7 + round) % 25]);
                    if round % 3 == 0 {
                        cache.put(key, vec![t as u8; 32]).expect("put");
                    } else {
                        let _ = cache.get(&key);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    let stats = cache.stats();
    println!("AFTER: {stats:?}");
    assert!(cache.len() <= 10);
    assert_eq!(stats.entries, cache.len());
    assert_eq!(
        cache.memory_usage(),
        cache.len() * (32 + legal_frame_codec::cache::CACHE_ENTRY_METADATA_SIZE)
    );
    assert_eq!(
        stats.hits + stats.misses,
        u64::from(THREADS * ROUNDS) - u64::from(THREADS) * u64::from(ROUNDS.div_ceil(3))
    );
}
