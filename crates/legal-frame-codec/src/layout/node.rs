//! Node batch layout.
//!
//! Unlike document records, node embeddings and metadata are variable length.
//! Each node is a fixed 48-byte header followed by its embedding and metadata
//! regions, each padded to an 8-byte boundary. Region offsets in the header are
//! absolute from the start of the batch buffer, so a decoder can hand out views
//! without copying.
//!
//! ```text
//! [0..32]  batch header: magic "LGNB", version u16, node count u32,
//!          timestamp u64, CRC-32 u32, 10 reserved bytes
//! [32..]   node 0: header(48) | embedding (pad 8) | metadata (pad 8)
//!          node 1: ...
//! ```

use super::field::{fields_are_packed, FieldEncoding, FieldSpec};

/// Magic bytes: "LGNB" = Legal Graph Node Batch.
pub const NODE_BATCH_MAGIC: [u8; 4] = *b"LGNB";

pub const NODE_BATCH_VERSION: u16 = 1;
pub const SUPPORTED_NODE_BATCH_VERSIONS: &[u16] = &[1];

pub const NODE_BATCH_HEADER_SIZE: usize = 32;
pub const NODE_HEADER_SIZE: usize = 48;

/// Alignment of every node header and variable region.
pub const NODE_REGION_ALIGN: usize = 8;

pub mod node_batch_v1 {
    use super::*;
    use FieldEncoding::*;

    pub const MAGIC: FieldSpec = FieldSpec::new("node_batch_magic", 0, Bytes(4));
    pub const VERSION: FieldSpec = FieldSpec::new("node_batch_version", 4, U16);
    pub const NODE_COUNT: FieldSpec = FieldSpec::new("node_count", 6, U32);
    pub const TIMESTAMP: FieldSpec = FieldSpec::new("node_batch_timestamp", 10, U64);
    pub const CHECKSUM: FieldSpec = FieldSpec::new("node_batch_checksum", 18, U32);
    pub const RESERVED: FieldSpec = FieldSpec::new("node_batch_reserved", 22, Bytes(10));

    pub const FIELDS: &[FieldSpec] = &[MAGIC, VERSION, NODE_COUNT, TIMESTAMP, CHECKSUM, RESERVED];
}

pub mod node_header_v1 {
    use super::*;
    use FieldEncoding::*;

    pub const ID: FieldSpec = FieldSpec::new("id", 0, U32);
    pub const NODE_TYPE: FieldSpec = FieldSpec::new("node_type", 4, U8);
    pub const PRIORITY: FieldSpec = FieldSpec::new("priority", 5, U8);
    pub const BANK_ID: FieldSpec = FieldSpec::new("bank_id", 6, U8);
    pub const FLAGS: FieldSpec = FieldSpec::new("flags", 7, U8);
    pub const CONFIDENCE: FieldSpec = FieldSpec::new("confidence", 8, F32);
    pub const RISK_CODE: FieldSpec = FieldSpec::new("risk_code", 12, U32);
    pub const POSITION: FieldSpec = FieldSpec::new("position", 16, F32Array(3));
    pub const EMBEDDING_OFFSET: FieldSpec = FieldSpec::new("embedding_offset", 28, U32);
    pub const EMBEDDING_SIZE: FieldSpec = FieldSpec::new("embedding_size", 32, U32);
    pub const METADATA_OFFSET: FieldSpec = FieldSpec::new("metadata_offset", 36, U32);
    pub const METADATA_SIZE: FieldSpec = FieldSpec::new("metadata_size", 40, U32);
    pub const RESERVED: FieldSpec = FieldSpec::new("reserved", 44, Bytes(4));

    pub const FIELDS: &[FieldSpec] = &[
        ID,
        NODE_TYPE,
        PRIORITY,
        BANK_ID,
        FLAGS,
        CONFIDENCE,
        RISK_CODE,
        POSITION,
        EMBEDDING_OFFSET,
        EMBEDDING_SIZE,
        METADATA_OFFSET,
        METADATA_SIZE,
        RESERVED,
    ];
}

const _NODE_BATCH_HEADER_CHECK: () = assert!(
    fields_are_packed(node_batch_v1::FIELDS, NODE_BATCH_HEADER_SIZE)
        && node_batch_v1::RESERVED.end() == NODE_BATCH_HEADER_SIZE,
    "node batch header must be exactly 32 bytes"
);
const _NODE_HEADER_CHECK: () = assert!(
    fields_are_packed(node_header_v1::FIELDS, NODE_HEADER_SIZE)
        && node_header_v1::RESERVED.end() == NODE_HEADER_SIZE,
    "node header must be exactly 48 bytes"
);
const _NODE_ALIGNMENT_CHECK: () = assert!(
    NODE_BATCH_HEADER_SIZE % NODE_REGION_ALIGN == 0 && NODE_HEADER_SIZE % NODE_REGION_ALIGN == 0,
    "node headers must keep 8-byte alignment"
);

/// Round `offset` up to the next region boundary.
#[inline]
#[must_use]
pub const fn align_to_region(offset: usize) -> usize {
    (offset + NODE_REGION_ALIGN - 1) & !(NODE_REGION_ALIGN - 1)
}
