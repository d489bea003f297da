//! Structure-of-arrays projection for bulk GPU upload.
//!
//! The projector reads decoded records, owned or zero-copy, and writes one
//! fixed-stride slot per record into contiguous arrays. Uploading and drawing
//! are left to the caller.
//!
//! ```rust,ignore
//! let refs = BatchFramer::new().unpack_refs(&bytes)?;
//! let buffers = GpuProjector::default().project(&refs);
//! queue.write_buffer(&embedding_buffer, 0, buffers.embeddings_bytes());
//! ```

mod buffers;
mod projector;
mod source;

#[cfg(test)]
mod tests;

pub use buffers::{BufferShapes, GpuBuffers, POSITION_STRIDE};
pub use projector::GpuProjector;
pub use source::{document_descriptor, ProjectionSource, DOCUMENT_DESCRIPTOR_SIZE};
