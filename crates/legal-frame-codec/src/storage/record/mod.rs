//! Fixed-frame codec for document records.
//!
//! # Binary Layout (v1, 2048 bytes)
//!
//! See [`crate::layout::v1`] for the field table. The frame starts with a
//! 32-byte header (magic `LGDR`, version, content id, declared size, CRC-32,
//! feature flags, created_at) and the CRC covers every byte after it.
//!
//! # Example
//!
//! ```rust,ignore
//! use legal_frame_codec::storage::RecordCodec;
//! use legal_frame_codec::layout::DOCUMENT_MAGIC;
//!
//! let codec = RecordCodec::new();
//! let bytes = codec.encode(&record, 1)?;
//! assert_eq!(&bytes[0..4], &DOCUMENT_MAGIC);
//!
//! let decoded = codec.decode(&bytes)?;
//! assert_eq!(decoded, record.normalized());
//! ```

mod codec;
mod decode;
mod reference;


pub use codec::RecordCodec;
pub use decode::RecordHeader;
pub use reference::DocumentRecordRef;

pub(crate) use decode::{parse_header, validate_frame};
