//! Batch framing for document records.
//!
//! A batch is a 20-byte header followed by `count` frames of one shared
//! version. The header CRC covers every byte after the header, so a single
//! corrupted byte anywhere in any record fails the whole batch before any
//! record is parsed.
//!
//! # Example
//!
//! ```rust,ignore
//! use legal_frame_codec::storage::BatchFramer;
//!
//! let framer = BatchFramer::new();
//! let bytes = framer.pack(&records, 1)?;
//! let header = framer.read_header(&bytes)?;
//! assert_eq!(header.record_count as usize, records.len());
//!
//! let decoded = framer.unpack(&bytes)?;
//! ```

mod framer;
mod header;


pub use framer::BatchFramer;
pub(crate) use framer::now_millis;
pub use header::BatchHeader;
