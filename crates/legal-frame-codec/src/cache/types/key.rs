//! Cache key type for the frame cache.
//!
//! A key identifies *what was encoded*, not the bytes that came out. Batch
//! keys are built from the sorted identifier list, so the same logical set
//! supplied in any order maps to the same key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::checksum::key_hash;

/// What kind of payload a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyScope {
    /// Arbitrary content, keyed by its xxHash64.
    Content,
    /// A node batch, keyed by its node ids.
    Nodes,
    /// A document batch, keyed by content ids and frame version.
    Documents,
}

impl KeyScope {
    fn prefix(self) -> &'static str {
        match self {
            KeyScope::Content => "content",
            KeyScope::Nodes => "nodes",
            KeyScope::Documents => "docs",
        }
    }
}

/// Cache key derived from an identifier set.
///
/// `count`, `first` and `last` keep the key readable in logs; `digest` is
/// the xxHash64 of the full sorted list and is what keeps two sets with the
/// same bounds apart.
///
/// Duplicates are kept: `[1, 1, 2]` and `[1, 2]` encode to different
/// batches and therefore get different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub scope: KeyScope,
    pub count: u32,
    pub first: u32,
    pub last: u32,
    pub digest: u64,
}

impl CacheKey {
    /// Key for raw text content.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        Self::from(key_hash(content.as_bytes()))
    }

    /// Key for a node batch containing these node ids, in any order.
    #[must_use]
    pub fn from_node_ids<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self::from_sorted(KeyScope::Nodes, None, sorted(ids))
    }

    /// Key for a document batch of these content ids at a frame version.
    ///
    /// The version is part of the key because the same records encode to
    /// different bytes under different versions.
    #[must_use]
    pub fn from_document_ids<I>(ids: I, version: u32) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        Self::from_sorted(KeyScope::Documents, Some(version), sorted(ids))
    }

    fn from_sorted(scope: KeyScope, version: Option<u32>, ids: Vec<u32>) -> Self {
        let mut material = Vec::with_capacity(4 + ids.len() * 4);
        if let Some(version) = version {
            material.extend_from_slice(&version.to_le_bytes());
        }
        for id in &ids {
            material.extend_from_slice(&id.to_le_bytes());
        }

        Self {
            scope,
            count: u32::try_from(ids.len()).unwrap_or(u32::MAX),
            first: ids.first().copied().unwrap_or(0),
            last: ids.last().copied().unwrap_or(0),
            digest: key_hash(&material),
        }
    }

    /// Canonical text form, e.g. `nodes_3_10_42_9f2c...`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.scope {
            KeyScope::Content => format!("content_{:016x}", self.digest),
            scope => format!(
                "{}_{}_{}_{}_{:016x}",
                scope.prefix(),
                self.count,
                self.first,
                self.last,
                self.digest
            ),
        }
    }
}

fn sorted<I: IntoIterator<Item = u32>>(ids: I) -> Vec<u32> {
    let mut ids: Vec<u32> = ids.into_iter().collect();
    ids.sort_unstable();
    ids
}

impl From<u64> for CacheKey {
    fn from(hash: u64) -> Self {
        Self {
            scope: KeyScope::Content,
            count: 0,
            first: 0,
            last: 0,
            digest: hash,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
