//! Structure-of-arrays output of the projector.

use serde::Serialize;

/// One slot per record in every array, in input order.
///
/// | Array | Element | Stride |
/// |-------|---------|--------|
/// | `ids` | u32 | 1 |
/// | `positions` | f32 | 4 (x, y, z, 1.0) |
/// | `embeddings` | f32 | `embedding_width` |
/// | `metadata` | u8 | `metadata_stride` |
/// | `metadata_lengths` | u32 | 1 |
/// | `priorities` | u8 | 1 |
/// | `bank_ids` | u8 | 1 |
/// | `flags` | u32 | 1 |
///
/// The `*_bytes` views are in host byte order, which is what a GPU upload
/// from this process expects.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GpuBuffers {
    pub count: usize,
    pub embedding_width: usize,
    pub metadata_stride: usize,
    pub ids: Vec<u32>,
    pub positions: Vec<f32>,
    pub embeddings: Vec<f32>,
    pub metadata: Vec<u8>,
    /// Bytes of each metadata slot actually used, never above the stride.
    pub metadata_lengths: Vec<u32>,
    pub priorities: Vec<u8>,
    pub bank_ids: Vec<u8>,
    pub flags: Vec<u32>,
}

/// Floats per record in `positions`.
pub const POSITION_STRIDE: usize = 4;

/// Array shapes, for logging and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BufferShapes {
    pub count: usize,
    pub embedding_width: usize,
    pub metadata_stride: usize,
    pub ids: usize,
    pub positions: usize,
    pub embeddings: usize,
    pub metadata: usize,
    pub priorities: usize,
    pub bank_ids: usize,
    pub flags: usize,
    pub total_bytes: usize,
}

impl GpuBuffers {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Embedding slot of record `index`.
    #[must_use]
    pub fn embedding(&self, index: usize) -> Option<&[f32]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.embedding_width;
        self.embeddings.get(start..start + self.embedding_width)
    }

    /// Used part of the metadata slot of record `index`.
    #[must_use]
    pub fn metadata(&self, index: usize) -> Option<&[u8]> {
        let used = *self.metadata_lengths.get(index)? as usize;
        let start = index * self.metadata_stride;
        self.metadata.get(start..start + used)
    }

    #[must_use]
    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        let start = index * POSITION_STRIDE;
        let p = self.positions.get(start..start + 3)?;
        Some([p[0], p[1], p[2]])
    }

    pub fn ids_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.ids)
    }

    pub fn positions_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn embeddings_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.embeddings)
    }

    pub fn metadata_bytes(&self) -> &[u8] {
        &self.metadata
    }

    pub fn metadata_lengths_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.metadata_lengths)
    }

    pub fn flags_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.flags)
    }

    /// Sum of every array's byte length.
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.ids_bytes().len()
            + self.positions_bytes().len()
            + self.embeddings_bytes().len()
            + self.metadata.len()
            + self.metadata_lengths_bytes().len()
            + self.priorities.len()
            + self.bank_ids.len()
            + self.flags_bytes().len()
    }

    #[must_use]
    pub fn shapes(&self) -> BufferShapes {
        BufferShapes {
            count: self.count,
            embedding_width: self.embedding_width,
            metadata_stride: self.metadata_stride,
            ids: self.ids.len(),
            positions: self.positions.len(),
            embeddings: self.embeddings.len(),
            metadata: self.metadata.len(),
            priorities: self.priorities.len(),
            bank_ids: self.bank_ids.len(),
            flags: self.flags.len(),
            total_bytes: self.total_bytes(),
        }
    }
}
