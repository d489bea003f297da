//! Tests for FrameCache disk persistence.

use std::path::PathBuf;

use tempfile::TempDir;

use crate::cache::types::CacheKey;
use crate::checksum::key_hash;
use crate::config::CacheConfig;
use crate::error::FrameError;

use super::core::FrameCache;
use super::persistence::{CACHE_MAGIC, CACHE_VERSION};

fn config_with_persistence(path: PathBuf) -> CacheConfig {
    CacheConfig {
        max_entries: 100,
        max_bytes: 1_000_000,
        persist_to_disk: true,
        disk_path: Some(path),
        ..CacheConfig::default()
    }
}

fn payload(seed: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_add(i as u8)).collect()
}

#[tokio::test]
async fn test_persist_load_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("frames.lgfc");
    let cache = FrameCache::new(config_with_persistence(cache_path.clone())).unwrap();

    let key1 = CacheKey::from_node_ids([1, 2, 3]);
    let key2 = CacheKey::from_document_ids([9, 8], 1);
    cache.put(key1, payload(1, 100)).unwrap();
    cache.put(key2, payload(2, 2048)).unwrap();
    let usage_before = cache.memory_usage();

    println!("BEFORE: {} entries, {} bytes", cache.len(), usage_before);
    cache.persist().await.unwrap();
    assert!(cache_path.exists());
    assert!(!cache_path.with_extension("tmp").exists());

    cache.clear();
    assert!(cache.is_empty());

    cache.load().await.unwrap();
    println!("AFTER: {} entries, {} bytes", cache.len(), cache.memory_usage());

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.memory_usage(), usage_before);
    assert_eq!(&cache.get(&key1).unwrap()[..], &payload(1, 100)[..]);
    assert_eq!(&cache.get(&key2).unwrap()[..], &payload(2, 2048)[..]);
}

#[tokio::test]
async fn test_load_restores_lru_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lru.lgfc");
    let config = CacheConfig {
        max_entries: 3,
        ..config_with_persistence(path)
    };
    let cache = FrameCache::new(config).unwrap();

    for i in 1..=3u64 {
        cache.put(CacheKey::from(i), payload(i as u8, 8)).unwrap();
    }
    // 1 becomes most recent; 2 is now the eviction candidate.
    let _ = cache.get(&CacheKey::from(1u64));

    cache.persist().await.unwrap();
    cache.clear();
    cache.load().await.unwrap();

    cache.put(CacheKey::from(4u64), payload(4, 8)).unwrap();
    assert!(!cache.contains(&CacheKey::from(2u64)));
    assert!(cache.contains(&CacheKey::from(1u64)));
}

#[tokio::test]
async fn test_load_into_smaller_cache_applies_budget() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("big.lgfc");

    let big = FrameCache::new(config_with_persistence(path.clone())).unwrap();
    for i in 0..10u64 {
        big.put(CacheKey::from(i), payload(i as u8, 16)).unwrap();
    }
    big.persist().await.unwrap();

    let small = FrameCache::new(CacheConfig {
        max_entries: 4,
        ..config_with_persistence(path)
    })
    .unwrap();
    small.load().await.unwrap();

    assert_eq!(small.len(), 4);
    assert!(small.contains(&CacheKey::from(9u64)));
    assert!(!small.contains(&CacheKey::from(0u64)));
}

#[tokio::test]
async fn test_persist_without_path_fails() {
    let cache = FrameCache::new(CacheConfig::default()).unwrap();
    assert!(matches!(
        cache.persist().await,
        Err(FrameError::Config { .. })
    ));
    assert!(cache.load().await.is_err());
}

#[tokio::test]
async fn test_load_detects_checksum_mismatch() {
    let temp_dir = TempDir::new().unwrap();
    let cache_path = temp_dir.path().join("corrupt.lgfc");

    let mut data = Vec::new();
    data.extend_from_slice(&CACHE_MAGIC);
    data.push(CACHE_VERSION);
    data.extend_from_slice(&0u64.to_le_bytes());
    data.extend_from_slice(&0u64.to_le_bytes()); // wrong footer
    tokio::fs::write(&cache_path, &data).await.unwrap();

    let cache = FrameCache::new(config_with_persistence(cache_path)).unwrap();
    let err = cache.load().await.unwrap_err();
    println!("AFTER: {}", err);
    assert!(err.to_string().contains("Checksum mismatch"));
}

#[tokio::test]
async fn test_load_detects_flipped_body_byte() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("flip.lgfc");
    let cache = FrameCache::new(config_with_persistence(path.clone())).unwrap();
    cache.put(CacheKey::from(1u64), payload(1, 64)).unwrap();
    cache.persist().await.unwrap();

    let mut data = tokio::fs::read(&path).await.unwrap();
    data[20] ^= 0x01;
    tokio::fs::write(&path, &data).await.unwrap();

    assert!(cache.load().await.is_err());
    assert_eq!(cache.len(), 1, "failed load leaves current entries alone");
}

#[tokio::test]
async fn test_load_rejects_foreign_magic_and_version() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("foreign.lgfc");
    let cache = FrameCache::new(config_with_persistence(path.clone())).unwrap();

    for (magic, version, expected) in [
        (*b"XXXX", CACHE_VERSION, "magic"),
        (CACHE_MAGIC, CACHE_VERSION + 1, "version"),
    ] {
        let mut data = Vec::new();
        data.extend_from_slice(&magic);
        data.push(version);
        data.extend_from_slice(&0u64.to_le_bytes());
        data.extend_from_slice(&bincode::serialize(&Vec::<u8>::new()).unwrap());
        let footer = key_hash(&data);
        data.extend_from_slice(&footer.to_le_bytes());
        tokio::fs::write(&path, &data).await.unwrap();

        let err = cache.load().await.unwrap_err();
        println!("AFTER: {}", err);
        assert!(err.to_string().contains(expected));
    }
}

#[tokio::test]
async fn test_load_too_small_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("tiny.lgfc");
    tokio::fs::write(&path, b"LGFC").await.unwrap();

    let cache = FrameCache::new(config_with_persistence(path)).unwrap();
    assert!(cache.load().await.is_err());
}
