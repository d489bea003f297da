//! Zero-copy views into a node batch.

use crate::types::{NodeRecord, NodeType, RiskLevel};

use super::header::{NodeBatchHeader, NodeHeader};

/// Borrowed view of one node. Embedding and metadata stay in the batch buffer.
#[derive(Debug, Clone, Copy)]
pub struct NodeRecordRef<'a> {
    header: NodeHeader,
    embedding_bytes: &'a [u8],
    metadata: &'a [u8],
}

impl<'a> NodeRecordRef<'a> {
    pub(crate) fn new(header: NodeHeader, embedding_bytes: &'a [u8], metadata: &'a [u8]) -> Self {
        Self {
            header,
            embedding_bytes,
            metadata,
        }
    }

    #[inline]
    pub fn header(&self) -> &NodeHeader {
        &self.header
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.header.id()
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        self.header.node_type()
    }

    #[inline]
    pub fn priority(&self) -> u8 {
        self.header.priority
    }

    #[inline]
    pub fn bank_id(&self) -> u8 {
        self.header.bank_id
    }

    #[inline]
    pub fn flags(&self) -> u8 {
        self.header.flags
    }

    #[inline]
    pub fn confidence(&self) -> f32 {
        self.header.confidence()
    }

    #[inline]
    pub fn risk_level(&self) -> RiskLevel {
        self.header.risk_level()
    }

    #[inline]
    pub fn position(&self) -> [f32; 3] {
        self.header.position()
    }

    /// Number of embedding values.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.embedding_bytes.len() / 4
    }

    /// Raw little-endian embedding bytes.
    #[inline]
    pub fn embedding_bytes(&self) -> &'a [u8] {
        self.embedding_bytes
    }

    /// The embedding as a borrowed float slice, without copying.
    ///
    /// Returns `None` on big-endian hosts or when the batch buffer is not
    /// 4-byte aligned.
    pub fn embedding(&self) -> Option<&'a [f32]> {
        if cfg!(target_endian = "little") {
            bytemuck::try_cast_slice(self.embedding_bytes).ok()
        } else {
            None
        }
    }

    pub fn embedding_iter(&self) -> impl ExactSizeIterator<Item = f32> + 'a {
        self.embedding_bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
    }

    #[inline]
    pub fn metadata(&self) -> &'a [u8] {
        self.metadata
    }

    /// Convert to an owned record (allocates).
    pub fn to_owned_record(&self) -> NodeRecord {
        NodeRecord {
            id: self.id(),
            node_type: self.node_type(),
            priority: self.priority(),
            bank_id: self.bank_id(),
            flags: self.flags(),
            confidence: self.confidence(),
            risk_level: self.risk_level(),
            position: self.position(),
            embedding: self.embedding_iter().collect(),
            metadata: self.metadata.to_vec(),
        }
    }
}

/// Validated node batch borrowing its source buffer.
#[derive(Debug, Clone)]
pub struct NodeBatchRef<'a> {
    header: NodeBatchHeader,
    nodes: Vec<NodeRecordRef<'a>>,
}

impl<'a> NodeBatchRef<'a> {
    pub(crate) fn new(header: NodeBatchHeader, nodes: Vec<NodeRecordRef<'a>>) -> Self {
        Self { header, nodes }
    }

    #[inline]
    pub fn header(&self) -> &NodeBatchHeader {
        &self.header
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&NodeRecordRef<'a>> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeRecordRef<'a>> {
        self.nodes.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[NodeRecordRef<'a>] {
        &self.nodes
    }
}

impl<'s, 'a> IntoIterator for &'s NodeBatchRef<'a> {
    type Item = &'s NodeRecordRef<'a>;
    type IntoIter = std::slice::Iter<'s, NodeRecordRef<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
