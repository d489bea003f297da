//! Node batch header and per-node header.

use bytemuck::{Pod, Zeroable};

use crate::layout::{
    node_batch_v1, NODE_BATCH_HEADER_SIZE, NODE_BATCH_MAGIC, NODE_HEADER_SIZE,
    SUPPORTED_NODE_BATCH_VERSIONS,
};
use crate::storage::DecodeError;
use crate::types::{NodeRecord, NodeType, RiskLevel};

/// Fixed 48-byte per-node header.
///
/// Layout (all values stored little-endian in the encoded stream):
/// - [0..4] id: u32
/// - [4] node_type, [5] priority, [6] bank_id, [7] flags
/// - [8..12] confidence: f32 bits
/// - [12..16] risk code: u32
/// - [16..28] position: [f32; 3] bits
/// - [28..32] embedding offset, [32..36] embedding length (bytes)
/// - [36..40] metadata offset, [40..44] metadata length (bytes)
/// - [44..48] reserved
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct NodeHeader {
    pub id: u32,
    pub node_type: u8,
    pub priority: u8,
    pub bank_id: u8,
    pub flags: u8,
    /// Confidence as raw f32 bits (little-endian)
    pub confidence_bits: u32,
    pub risk_code: u32,
    /// Position x/y/z as raw f32 bits (little-endian)
    pub position_bits: [u32; 3],
    /// Absolute offset of the embedding region from batch start
    pub embedding_offset: u32,
    /// Embedding region length in bytes (4 x dimension)
    pub embedding_len: u32,
    /// Absolute offset of the metadata region from batch start
    pub metadata_offset: u32,
    /// Metadata region length in bytes
    pub metadata_len: u32,
    pub _reserved: u32,
}

// Compile-time assertion: header must be exactly 48 bytes
const _NODE_HEADER_SIZE_CHECK: () = assert!(
    std::mem::size_of::<NodeHeader>() == NODE_HEADER_SIZE,
    "NodeHeader must be exactly 48 bytes"
);

impl NodeHeader {
    /// Header for `node` with the given region placement, in wire byte order.
    pub(crate) fn for_node(
        node: &NodeRecord,
        embedding_offset: u32,
        embedding_len: u32,
        metadata_offset: u32,
        metadata_len: u32,
    ) -> Self {
        Self {
            id: node.id.to_le(),
            node_type: node.node_type.code(),
            priority: node.priority,
            bank_id: node.bank_id,
            flags: node.flags,
            confidence_bits: node.confidence.to_bits().to_le(),
            risk_code: u32::from(node.risk_level.code()).to_le(),
            position_bits: node.position.map(|v| v.to_bits().to_le()),
            embedding_offset: embedding_offset.to_le(),
            embedding_len: embedding_len.to_le(),
            metadata_offset: metadata_offset.to_le(),
            metadata_len: metadata_len.to_le(),
            _reserved: 0,
        }
    }

    /// Read a header from the wire at any alignment.
    pub(crate) fn read(bytes: &[u8]) -> Self {
        bytemuck::pod_read_unaligned(&bytes[..NODE_HEADER_SIZE])
    }

    #[inline]
    pub fn id(&self) -> u32 {
        u32::from_le(self.id)
    }

    #[inline]
    pub fn node_type(&self) -> NodeType {
        NodeType::from_code(self.node_type)
    }

    #[inline]
    pub fn confidence(&self) -> f32 {
        f32::from_bits(u32::from_le(self.confidence_bits))
    }

    /// Risk level; codes outside the table resolve to the fallback.
    #[inline]
    pub fn risk_level(&self) -> RiskLevel {
        u8::try_from(u32::from_le(self.risk_code))
            .map(RiskLevel::from_code)
            .unwrap_or(RiskLevel::FALLBACK)
    }

    #[inline]
    pub fn position(&self) -> [f32; 3] {
        self.position_bits.map(|b| f32::from_bits(u32::from_le(b)))
    }

    #[inline]
    pub fn embedding_region(&self) -> (usize, usize) {
        (
            u32::from_le(self.embedding_offset) as usize,
            u32::from_le(self.embedding_len) as usize,
        )
    }

    #[inline]
    pub fn metadata_region(&self) -> (usize, usize) {
        (
            u32::from_le(self.metadata_offset) as usize,
            u32::from_le(self.metadata_len) as usize,
        )
    }
}

/// Node batch header (32 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeBatchHeader {
    pub version: u16,
    pub node_count: u32,
    /// Milliseconds since the Unix epoch, stamped at encode time.
    pub timestamp: u64,
    /// CRC-32 of every byte after the header.
    pub checksum: u32,
}

impl NodeBatchHeader {
    /// Parse and validate magic and version.
    ///
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if bytes < 32
    /// - `DecodeError::InvalidFormat` on bad magic
    /// - `DecodeError::UnsupportedVersion` for unknown versions
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        DecodeError::ensure_len(bytes, NODE_BATCH_HEADER_SIZE)?;

        let magic = node_batch_v1::MAGIC.slice(bytes);
        if magic != NODE_BATCH_MAGIC {
            return Err(DecodeError::invalid_format(format!(
                "bad node batch magic {:02x?}, expected {:02x?}",
                magic, NODE_BATCH_MAGIC
            )));
        }

        let version = node_batch_v1::VERSION.read_u16(bytes);
        if !SUPPORTED_NODE_BATCH_VERSIONS.contains(&version) {
            return Err(DecodeError::UnsupportedVersion(u32::from(version)));
        }

        Ok(Self {
            version,
            node_count: node_batch_v1::NODE_COUNT.read_u32(bytes),
            timestamp: node_batch_v1::TIMESTAMP.read_u64(bytes),
            checksum: node_batch_v1::CHECKSUM.read_u32(bytes),
        })
    }

    pub(crate) fn write(&self, buf: &mut [u8]) {
        node_batch_v1::MAGIC.write_bytes(buf, &NODE_BATCH_MAGIC);
        node_batch_v1::VERSION.write_u16(buf, self.version);
        node_batch_v1::NODE_COUNT.write_u32(buf, self.node_count);
        node_batch_v1::TIMESTAMP.write_u64(buf, self.timestamp);
        node_batch_v1::CHECKSUM.write_u32(buf, self.checksum);
        node_batch_v1::RESERVED.write_bytes(buf, &[0u8; 10]);
    }
}
