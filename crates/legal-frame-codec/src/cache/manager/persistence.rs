//! Disk persistence for the frame cache.
//!
//! Atomic persist/load using bincode with an xxHash64 footer.

use std::path::Path;

use tracing::{error, info, warn};

use crate::cache::types::CacheEntry;
use crate::checksum::key_hash;
use crate::error::{FrameError, FrameResult};

use super::core::FrameCache;
use super::serializable::{SerializableCacheEntry, CACHE_FOOTER_SIZE, CACHE_HEADER_SIZE};

pub use super::serializable::{CACHE_MAGIC, CACHE_VERSION};

impl FrameCache {
    /// Persist the cache to `disk_path`.
    ///
    /// File format:
    /// - Header: magic `LGFC`, version u8, entry_count u64 LE
    /// - Entries: bincode `Vec<SerializableCacheEntry>`, least recently used first
    /// - Footer: xxHash64 of all preceding bytes, LE
    ///
    /// The file is written to a sibling `.tmp` and renamed into place.
    ///
    /// # Errors
    /// - `FrameError::Config` if `disk_path` is not configured
    /// - `FrameError::Serialization` if bincode fails
    /// - `FrameError::Cache` on I/O failure
    pub async fn persist(&self) -> FrameResult<()> {
        let path = self.config.disk_path.as_ref().ok_or_else(|| {
            error!("FrameCache persist error: disk_path not configured");
            FrameError::Config {
                message: "disk_path not configured for persistence".to_string(),
            }
        })?;

        let entries_data: Vec<SerializableCacheEntry> = {
            let entries = self.entries.read();
            entries
                .iter()
                .map(|(key, entry)| SerializableCacheEntry {
                    key: *key,
                    bytes: entry.payload().to_vec(),
                })
                .collect()
        };

        let entry_count = entries_data.len() as u64;

        let mut data = Vec::new();
        data.extend_from_slice(&CACHE_MAGIC);
        data.push(CACHE_VERSION);
        data.extend_from_slice(&entry_count.to_le_bytes());

        let body = bincode::serialize(&entries_data).map_err(|e| {
            error!("FrameCache persist error: serialization failed: {}", e);
            FrameError::Serialization {
                message: format!("bincode serialization failed: {}", e),
            }
        })?;
        data.extend_from_slice(&body);

        let footer = key_hash(&data);
        data.extend_from_slice(&footer.to_le_bytes());

        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|e: std::io::Error| {
                error!("FrameCache persist error: write failed: {}", e);
                FrameError::Cache {
                    message: format!("Failed to write cache file: {}", e),
                }
            })?;

        tokio::fs::rename(&temp_path, path)
            .await
            .map_err(|e: std::io::Error| {
                error!("FrameCache persist error: rename failed: {}", e);
                FrameError::Cache {
                    message: format!("Failed to rename temp cache file: {}", e),
                }
            })?;

        info!(
            "FrameCache: persisted {} entries ({} bytes) to {}",
            entry_count,
            data.len(),
            path.display()
        );
        Ok(())
    }

    /// Load the cache from `disk_path`, replacing current entries and
    /// resetting counters.
    ///
    /// # Errors
    /// - `FrameError::Config` if `disk_path` is not configured
    /// - `FrameError::Cache` on I/O, size, footer, magic, version or count failure
    /// - `FrameError::Serialization` if the body does not deserialize
    pub async fn load(&self) -> FrameResult<()> {
        let path = self.config.disk_path.as_ref().ok_or_else(|| {
            error!("FrameCache load error: disk_path not configured");
            FrameError::Config {
                message: "disk_path not configured for persistence".to_string(),
            }
        })?;

        self.load_from_path(path).await
    }

    pub(crate) async fn load_from_path(&self, path: &Path) -> FrameResult<()> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            error!("FrameCache load error: read failed: {}", e);
            FrameError::Cache {
                message: format!("Failed to read cache file: {}", e),
            }
        })?;

        if data.len() < CACHE_HEADER_SIZE + CACHE_FOOTER_SIZE {
            error!("FrameCache load error: file too small ({} bytes)", data.len());
            return Err(FrameError::Cache {
                message: "Cache file too small".to_string(),
            });
        }

        let footer_offset = data.len() - CACHE_FOOTER_SIZE;
        let stored = read_u64(&data[footer_offset..]);
        let computed = key_hash(&data[..footer_offset]);
        if stored != computed {
            error!(
                "FrameCache load error: checksum mismatch (stored={:#x}, computed={:#x})",
                stored, computed
            );
            return Err(FrameError::Cache {
                message: format!(
                    "Checksum mismatch: stored={:#x}, computed={:#x}",
                    stored, computed
                ),
            });
        }

        if data[0..4] != CACHE_MAGIC {
            error!("FrameCache load error: invalid magic bytes");
            return Err(FrameError::Cache {
                message: "Invalid cache file magic bytes".to_string(),
            });
        }

        let version = data[4];
        if version != CACHE_VERSION {
            error!(
                "FrameCache load error: unsupported version {} (expected {})",
                version, CACHE_VERSION
            );
            return Err(FrameError::Cache {
                message: format!(
                    "Unsupported cache version {} (expected {})",
                    version, CACHE_VERSION
                ),
            });
        }

        let entry_count = read_u64(&data[5..CACHE_HEADER_SIZE]);

        let entries_data: Vec<SerializableCacheEntry> =
            bincode::deserialize(&data[CACHE_HEADER_SIZE..footer_offset]).map_err(|e| {
                error!("FrameCache load error: deserialization failed: {}", e);
                FrameError::Serialization {
                    message: format!("bincode deserialization failed: {}", e),
                }
            })?;

        if entries_data.len() as u64 != entry_count {
            error!(
                "FrameCache load error: entry count mismatch (header={}, actual={})",
                entry_count,
                entries_data.len()
            );
            return Err(FrameError::Cache {
                message: format!(
                    "Entry count mismatch: header={}, actual={}",
                    entry_count,
                    entries_data.len()
                ),
            });
        }

        let mut entries = self.entries.write();
        entries.clear();
        self.metrics.reset();

        // File order is LRU order, so inserting front to back restores it.
        // Budgets still apply if the file came from a larger cache.
        for serialized in entries_data {
            let entry = CacheEntry::new(serialized.bytes.into());
            if entry.memory_size() > self.config.max_bytes {
                warn!(
                    "FrameCache load: skipping {} ({} bytes exceeds max_bytes)",
                    serialized.key,
                    entry.memory_size()
                );
                continue;
            }
            self.insert_locked(&mut entries, serialized.key, entry);
        }

        info!(
            "FrameCache: loaded {} of {} entries from {}",
            entries.len(),
            entry_count,
            path.display()
        );
        Ok(())
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(raw)
}
