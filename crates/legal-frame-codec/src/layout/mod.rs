//! Layout registry: the single source of truth for every byte offset.
//!
//! Encoders and decoders never hard-code offsets. They address fields through
//! the [`FieldSpec`] constants declared here, so a layout change is made once
//! and both directions follow.
//!
//! # Frames
//!
//! | Frame | Size | Magic |
//! |-------|------|-------|
//! | Document record v1 | 2048 | `LGDR` |
//! | Document batch header | 20 | `LGDB` |
//! | Node batch header | 32 | `LGNB` |
//! | Node header | 48 | - |
//!
//! All multi-byte integers and floats are little-endian.

mod batch;
mod document;
mod field;
mod node;


pub use batch::{batch_v1, BATCH_HEADER_SIZE, BATCH_MAGIC};
pub use document::{
    document_layout, frame_size, is_supported_document_version, v1, DocumentLayout,
    CURRENT_DOCUMENT_VERSION, DOCUMENT_LAYOUT_V1, DOCUMENT_MAGIC, EMBEDDING_DIM, FRAME_SIZE_V1,
    MAX_NEIGHBORS, RANKING_MATRIX_LEN, RECORD_HEADER_SIZE, RESERVED_SIZE,
    SUPPORTED_DOCUMENT_VERSIONS, VAR_REGION_SLOTS,
};
pub use field::{fields_are_packed, FieldEncoding, FieldSpec};
pub use node::{
    align_to_region, node_batch_v1, node_header_v1, NODE_BATCH_HEADER_SIZE, NODE_BATCH_MAGIC,
    NODE_BATCH_VERSION, NODE_HEADER_SIZE, NODE_REGION_ALIGN, SUPPORTED_NODE_BATCH_VERSIONS,
};
