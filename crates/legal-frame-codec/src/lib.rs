//! Fixed-layout binary frames for legal documents and graph nodes.
//!
//! This crate turns upstream document/node records into byte-exact frames that
//! can be shipped to storage, transport or GPU upload without JSON parsing on
//! the hot path.
//!
//! # Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | Field offsets, sizes and encodings for every frame and header |
//! | [`checksum`] | Content identity hash and integrity checksum |
//! | [`types`] | Logical records, closed enums and upstream inputs |
//! | [`storage`] | Record codec, batch framer, node batches, text sidecars |
//! | [`cache`] | Bounded LRU cache of encoded batches |
//! | [`pipeline`] | Encoder and framer composed behind the cache |
//! | [`gpu`] | Structure-of-arrays projection for bulk upload |
//! | [`config`] | TOML configuration with environment overrides |
//!
//! # Example
//!
//! ```rust,ignore
//! use legal_frame_codec::storage::BatchFramer;
//! use legal_frame_codec::types::{DocumentInput, DocumentRecord};
//!
//! let input: DocumentInput = serde_json::from_str(r#"{"id": "doc-1", "type": "contract"}"#)?;
//! let record = DocumentRecord::from_input(&input);
//!
//! let framer = BatchFramer::new();
//! let bytes = framer.pack(&[record.clone()], 1)?;
//! let decoded = framer.unpack(&bytes)?;
//! assert_eq!(decoded, vec![record]);
//! ```

pub mod cache;
pub mod checksum;
pub mod config;
pub mod error;
pub mod gpu;
pub mod layout;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use cache::{CacheKey, CacheMetrics, FrameCache};
pub use config::{CacheConfig, CodecConfig, FrameConfig, ProjectorConfig};
pub use error::{FrameError, FrameResult};
pub use gpu::{GpuBuffers, GpuProjector, ProjectionSource};
pub use pipeline::CachedEncoder;
pub use storage::{
    BatchFramer, BatchHeader, DecodeError, DocumentRecordRef, EncodeError, NodeBatchCodec,
    NodeBatchRef, NodeRecordRef, RecordCodec,
};
pub use types::{DocumentInput, DocumentRecord, NodeInput, NodeRecord};
