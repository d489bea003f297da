//! Node batch encoder/decoder.

use bytemuck::bytes_of;
use tracing::{debug, warn};

use crate::checksum::checksum;
use crate::layout::{
    align_to_region, NODE_BATCH_HEADER_SIZE, NODE_BATCH_VERSION, NODE_HEADER_SIZE,
    NODE_REGION_ALIGN,
};
use crate::storage::batch::now_millis;
use crate::storage::{DecodeError, EncodeError};
use crate::types::NodeRecord;

use super::header::{NodeBatchHeader, NodeHeader};
use super::reference::{NodeBatchRef, NodeRecordRef};

/// Placement of one node inside the batch buffer.
struct NodePlacement {
    header_offset: usize,
    embedding_offset: usize,
    embedding_len: usize,
    metadata_offset: usize,
    metadata_len: usize,
}

/// Encoder/decoder for node batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeBatchCodec;

impl NodeBatchCodec {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Encode nodes stamped with the current time.
    ///
    /// # Errors
    /// - `EncodeError::RegionOverflow` if a region offset or the node count
    ///   does not fit a u32
    pub fn encode(&self, nodes: &[NodeRecord]) -> Result<Vec<u8>, EncodeError> {
        self.encode_at(nodes, now_millis())
    }

    /// Encode nodes with an explicit timestamp. Output is deterministic.
    ///
    /// # Errors
    /// Same as [`NodeBatchCodec::encode`].
    pub fn encode_at(&self, nodes: &[NodeRecord], timestamp_ms: u64) -> Result<Vec<u8>, EncodeError> {
        self.encode_iter(nodes.iter(), timestamp_ms)
    }

    /// Encode borrowed nodes in iteration order.
    ///
    /// # Errors
    /// Same as [`NodeBatchCodec::encode`].
    pub fn encode_iter<'r, I>(&self, nodes: I, timestamp_ms: u64) -> Result<Vec<u8>, EncodeError>
    where
        I: ExactSizeIterator<Item = &'r NodeRecord> + Clone,
    {
        let count = nodes.len();
        let node_count = u32::try_from(count).map_err(|_| EncodeError::RegionOverflow {
            region: "node count",
            size: count,
        })?;

        // Pass 1: place every region.
        let mut placements = Vec::with_capacity(count);
        let mut cursor = NODE_BATCH_HEADER_SIZE;
        for node in nodes.clone() {
            let embedding_offset = cursor + NODE_HEADER_SIZE;
            let embedding_len = node.embedding.len() * 4;
            let metadata_offset = align_to_region(embedding_offset + embedding_len);
            let metadata_len = node.metadata.len();
            let end = align_to_region(metadata_offset + metadata_len);

            placements.push(NodePlacement {
                header_offset: cursor,
                embedding_offset,
                embedding_len,
                metadata_offset,
                metadata_len,
            });
            cursor = end;
        }
        let total = cursor;
        if u32::try_from(total).is_err() {
            return Err(EncodeError::RegionOverflow {
                region: "node batch",
                size: total,
            });
        }

        // Pass 2: write headers and regions.
        let mut buffer = vec![0u8; total];
        for (node, place) in nodes.zip(&placements) {
            let header = NodeHeader::for_node(
                node,
                place.embedding_offset as u32,
                place.embedding_len as u32,
                place.metadata_offset as u32,
                place.metadata_len as u32,
            );
            buffer[place.header_offset..place.header_offset + NODE_HEADER_SIZE]
                .copy_from_slice(bytes_of(&header));

            let embedding =
                &mut buffer[place.embedding_offset..place.embedding_offset + place.embedding_len];
            for (chunk, value) in embedding.chunks_exact_mut(4).zip(&node.embedding) {
                chunk.copy_from_slice(&value.to_le_bytes());
            }

            buffer[place.metadata_offset..place.metadata_offset + place.metadata_len]
                .copy_from_slice(&node.metadata);
        }

        let header = NodeBatchHeader {
            version: NODE_BATCH_VERSION,
            node_count,
            timestamp: timestamp_ms,
            checksum: checksum(&buffer[NODE_BATCH_HEADER_SIZE..]),
        };
        header.write(&mut buffer);

        debug!(count, bytes = total, "encoded node batch");
        Ok(buffer)
    }

    /// Parse the batch header without touching node data.
    ///
    /// # Errors
    /// See [`NodeBatchHeader::parse`].
    pub fn read_header(&self, bytes: &[u8]) -> Result<NodeBatchHeader, DecodeError> {
        NodeBatchHeader::parse(bytes)
    }

    /// Decode into owned records.
    ///
    /// # Errors
    /// Same as [`NodeBatchCodec::decode_zero_copy`].
    pub fn decode(&self, bytes: &[u8]) -> Result<Vec<NodeRecord>, DecodeError> {
        Ok(self
            .decode_zero_copy(bytes)?
            .iter()
            .map(NodeRecordRef::to_owned_record)
            .collect())
    }

    /// Validate the batch and return views borrowing `bytes`.
    ///
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if the header, a node header or a
    ///   region runs past the end of the buffer
    /// - `DecodeError::InvalidFormat` on bad magic, misaligned or overlapping
    ///   regions, a ragged embedding length, or trailing bytes
    /// - `DecodeError::UnsupportedVersion` for unknown versions
    /// - `DecodeError::IntegrityError` on checksum mismatch
    pub fn decode_zero_copy<'a>(&self, bytes: &'a [u8]) -> Result<NodeBatchRef<'a>, DecodeError> {
        let header = NodeBatchHeader::parse(bytes)?;
        let count = header.node_count as usize;

        // Every node needs at least its header.
        let floor = count
            .checked_mul(NODE_HEADER_SIZE)
            .and_then(|n| n.checked_add(NODE_BATCH_HEADER_SIZE))
            .unwrap_or(usize::MAX);
        DecodeError::ensure_len(bytes, floor)?;

        let computed = checksum(&bytes[NODE_BATCH_HEADER_SIZE..]);
        if computed != header.checksum {
            warn!(
                stored = header.checksum,
                computed, "node batch checksum mismatch, rejecting batch"
            );
            return Err(DecodeError::IntegrityError {
                stored: header.checksum,
                computed,
            });
        }

        let mut nodes = Vec::with_capacity(count);
        let mut cursor = NODE_BATCH_HEADER_SIZE;
        for index in 0..count {
            let header_end = cursor + NODE_HEADER_SIZE;
            DecodeError::ensure_len(bytes, header_end)?;
            let node = NodeHeader::read(&bytes[cursor..header_end]);

            let (emb_offset, emb_len) = node.embedding_region();
            let (meta_offset, meta_len) = node.metadata_region();

            check_region(index, "embedding", emb_offset, header_end)?;
            if emb_len % 4 != 0 {
                return Err(DecodeError::invalid_format(format!(
                    "node {index}: embedding length {emb_len} is not a whole number of f32"
                )));
            }
            let emb_end = emb_offset + emb_len;
            DecodeError::ensure_len(bytes, emb_end)?;

            check_region(index, "metadata", meta_offset, emb_end)?;
            let meta_end = meta_offset + meta_len;
            DecodeError::ensure_len(bytes, meta_end)?;

            nodes.push(NodeRecordRef::new(
                node,
                &bytes[emb_offset..emb_end],
                &bytes[meta_offset..meta_end],
            ));
            cursor = align_to_region(meta_end);
        }

        if cursor != bytes.len() {
            return Err(DecodeError::invalid_format(format!(
                "node batch length {} does not match the {} bytes its {} nodes occupy",
                bytes.len(),
                cursor,
                count
            )));
        }

        Ok(NodeBatchRef::new(header, nodes))
    }
}

/// A region must be aligned and must not start before `min_start`.
fn check_region(
    index: usize,
    region: &str,
    offset: usize,
    min_start: usize,
) -> Result<(), DecodeError> {
    if offset % NODE_REGION_ALIGN != 0 {
        return Err(DecodeError::invalid_format(format!(
            "node {index}: {region} offset {offset} is not {NODE_REGION_ALIGN}-byte aligned"
        )));
    }
    if offset < min_start {
        return Err(DecodeError::invalid_format(format!(
            "node {index}: {region} offset {offset} overlaps preceding data ending at {min_start}"
        )));
    }
    Ok(())
}
