//! Document batch header layout (20 bytes).
//!
//! ```text
//! [0..4]   magic "LGDB"
//! [4..8]   record count: u32
//! [8..16]  batch timestamp (ms since epoch): u64
//! [16..20] CRC-32 of every byte after the header
//! ```
//!
//! Records follow back to back. There is no per-record length: every record
//! shares one version, and the version fixes the frame size.

use super::field::{fields_are_packed, FieldEncoding, FieldSpec};

/// Magic bytes: "LGDB" = Legal Graph Document Batch.
pub const BATCH_MAGIC: [u8; 4] = *b"LGDB";

pub const BATCH_HEADER_SIZE: usize = 20;

pub mod batch_v1 {
    use super::*;

    pub const MAGIC: FieldSpec = FieldSpec::new("batch_magic", 0, FieldEncoding::Bytes(4));
    pub const RECORD_COUNT: FieldSpec = FieldSpec::new("record_count", 4, FieldEncoding::U32);
    pub const TIMESTAMP: FieldSpec = FieldSpec::new("batch_timestamp", 8, FieldEncoding::U64);
    pub const CHECKSUM: FieldSpec = FieldSpec::new("batch_checksum", 16, FieldEncoding::U32);

    pub const FIELDS: &[FieldSpec] = &[MAGIC, RECORD_COUNT, TIMESTAMP, CHECKSUM];
}

const _BATCH_HEADER_CHECK: () = assert!(
    fields_are_packed(batch_v1::FIELDS, BATCH_HEADER_SIZE)
        && batch_v1::CHECKSUM.end() == BATCH_HEADER_SIZE,
    "batch header must be exactly 20 bytes"
);
