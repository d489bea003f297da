//! Batch framer and node codec behind a shared [`FrameCache`].

use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheKey, FrameCache};
use crate::config::FrameConfig;
use crate::error::{FrameError, FrameResult};
use crate::layout::{frame_size, CURRENT_DOCUMENT_VERSION};
use crate::storage::batch::now_millis;
use crate::storage::{BatchFramer, NodeBatchCodec};
use crate::types::{DocumentRecord, NodeRecord};

/// Encodes document and node batches at most once per identifier set.
///
/// Records are sorted by identifier before keying and framing, so the same
/// set in any input order maps to one cache entry and one byte layout.
/// Records sharing an identifier keep their relative input order.
///
/// Cached batches keep the header timestamp of the encode that produced them.
#[derive(Debug, Clone)]
pub struct CachedEncoder {
    cache: Arc<FrameCache>,
    version: u32,
    framer: BatchFramer,
    nodes: NodeBatchCodec,
}

impl CachedEncoder {
    /// # Errors
    /// `FrameError::Config` if `version` has no document layout.
    pub fn new(cache: Arc<FrameCache>, version: u32) -> FrameResult<Self> {
        if frame_size(version).is_none() {
            return Err(FrameError::Config {
                message: format!("Unsupported document version {version}"),
            });
        }
        Ok(Self {
            cache,
            version,
            framer: BatchFramer::new(),
            nodes: NodeBatchCodec::new(),
        })
    }

    /// Encoder for the current document version over `cache`.
    pub fn with_cache(cache: Arc<FrameCache>) -> Self {
        Self {
            cache,
            version: CURRENT_DOCUMENT_VERSION,
            framer: BatchFramer::new(),
            nodes: NodeBatchCodec::new(),
        }
    }

    /// Build a fresh cache and encoder from a validated config.
    ///
    /// # Errors
    /// `FrameError::Config` if any section fails validation.
    pub fn from_config(config: &FrameConfig) -> FrameResult<Self> {
        config.validate()?;
        let cache = Arc::new(FrameCache::new(config.cache.clone())?);
        Self::new(cache, config.codec.version)
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<FrameCache> {
        &self.cache
    }

    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Pack `records` as one document batch, sorted by content id.
    ///
    /// A batch too large for the cache is still returned, just not stored.
    ///
    /// # Errors
    /// `FrameError::Encode` if framing fails.
    pub fn encode_documents(&self, records: &[DocumentRecord]) -> FrameResult<Arc<[u8]>> {
        let mut sorted: Vec<&DocumentRecord> = records.iter().collect();
        sorted.sort_by_key(|r| r.content_id);

        let key = CacheKey::from_document_ids(sorted.iter().map(|r| r.content_id), self.version);
        self.cache.get_or_encode(key, || {
            debug!(
                "CachedEncoder: packing {} documents for {}",
                sorted.len(),
                key.label()
            );
            self.framer
                .pack_iter(sorted.iter().copied(), self.version, now_millis())
                .map_err(FrameError::from)
        })
    }

    /// Encode `nodes` as one node batch, sorted by node id.
    ///
    /// # Errors
    /// `FrameError::Encode` if a variable-length region overflows.
    pub fn encode_nodes(&self, nodes: &[NodeRecord]) -> FrameResult<Arc<[u8]>> {
        let mut sorted: Vec<&NodeRecord> = nodes.iter().collect();
        sorted.sort_by_key(|n| n.id);

        let key = CacheKey::from_node_ids(sorted.iter().map(|n| n.id));
        self.cache.get_or_encode(key, || {
            debug!(
                "CachedEncoder: encoding {} nodes for {}",
                sorted.len(),
                key.label()
            );
            self.nodes
                .encode_iter(sorted.iter().copied(), now_millis())
                .map_err(FrameError::from)
        })
    }
}
