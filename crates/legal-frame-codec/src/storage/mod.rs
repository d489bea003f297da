//! Binary storage formats.
//!
//! | Format | Module | Magic |
//! |--------|--------|-------|
//! | Document record (fixed 2048-byte frame) | [`record`] | `LGDR` |
//! | Document batch | [`batch`] | `LGDB` |
//! | Node batch (variable-length regions) | [`node`] | `LGNB` |
//! | Text sidecar for the variable-length directory | [`sidecar`] | - |

pub mod batch;
mod error;
pub mod node;
pub mod record;
pub mod sidecar;

pub use batch::{BatchFramer, BatchHeader};
pub use error::{DecodeError, EncodeError};
pub use node::{NodeBatchCodec, NodeBatchHeader, NodeBatchRef, NodeHeader, NodeRecordRef};
pub use record::{DocumentRecordRef, RecordCodec, RecordHeader};
pub use sidecar::SidecarBuilder;
