//! Variable-length node batch format.
//!
//! Each node is a 48-byte [`NodeHeader`] followed by its embedding and
//! metadata regions. Offsets in the header are absolute from the batch start
//! and 8-byte aligned, so [`NodeBatchCodec::decode_zero_copy`] can hand out
//! embedding slices that point straight into the source buffer.
//!
//! # Example
//!
//! ```rust,ignore
//! use legal_frame_codec::storage::NodeBatchCodec;
//!
//! let codec = NodeBatchCodec::new();
//! let bytes = codec.encode(&nodes)?;
//!
//! let batch = codec.decode_zero_copy(&bytes)?;
//! for node in batch.iter() {
//!     upload(node.id(), node.embedding_bytes());
//! }
//! ```

mod codec;
mod header;
mod reference;


pub use codec::NodeBatchCodec;
pub use header::{NodeBatchHeader, NodeHeader};
pub use reference::{NodeBatchRef, NodeRecordRef};
