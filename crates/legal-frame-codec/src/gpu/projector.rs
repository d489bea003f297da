//! Repacks decoded records into fixed-stride arrays.

use rayon::prelude::*;
use tracing::debug;

use crate::config::ProjectorConfig;
use crate::error::FrameResult;

use super::buffers::{GpuBuffers, POSITION_STRIDE};
use super::source::ProjectionSource;

/// Projects records into [`GpuBuffers`] with the strides from its config.
///
/// Every output array is exactly `count * stride` long whatever the
/// sources look like: embeddings are truncated or zero-padded to
/// `embedding_width` and metadata is truncated to `metadata_stride`.
#[derive(Debug, Clone, Default)]
pub struct GpuProjector {
    config: ProjectorConfig,
}

impl GpuProjector {
    /// # Errors
    /// `FrameError::Config` if the config does not validate.
    pub fn new(config: ProjectorConfig) -> FrameResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Project `sources` in order. Large inputs fill the embedding and
    /// metadata arrays on the rayon pool.
    pub fn project<T>(&self, sources: &[T]) -> GpuBuffers
    where
        T: ProjectionSource + Sync,
    {
        let count = sources.len();
        let width = self.config.embedding_width;
        let stride = self.config.metadata_stride;
        let parallel = count >= self.config.parallel_threshold;

        let mut ids = Vec::with_capacity(count);
        let mut positions = Vec::with_capacity(count * POSITION_STRIDE);
        let mut priorities = Vec::with_capacity(count);
        let mut bank_ids = Vec::with_capacity(count);
        let mut flags = Vec::with_capacity(count);
        for source in sources {
            ids.push(source.projection_id());
            let [x, y, z] = source.projection_position();
            positions.extend_from_slice(&[x, y, z, 1.0]);
            priorities.push(source.projection_priority());
            bank_ids.push(source.projection_bank());
            flags.push(source.projection_flags());
        }

        let mut embeddings = vec![0.0f32; count * width];
        fill_embeddings(sources, &mut embeddings, width, parallel);

        let mut metadata = vec![0u8; count * stride];
        let source_lengths = fill_metadata(sources, &mut metadata, stride, parallel);

        let mut truncated = 0usize;
        let metadata_lengths = source_lengths
            .into_iter()
            .map(|len| {
                if len > stride {
                    truncated += 1;
                }
                u32::try_from(len.min(stride)).unwrap_or(u32::MAX)
            })
            .collect();

        if truncated > 0 {
            debug!(
                "GpuProjector: {} of {} metadata blobs truncated to {} bytes",
                truncated, count, stride
            );
        }

        let buffers = GpuBuffers {
            count,
            embedding_width: width,
            metadata_stride: stride,
            ids,
            positions,
            embeddings,
            metadata,
            metadata_lengths,
            priorities,
            bank_ids,
            flags,
        };

        debug!(
            "GpuProjector: projected {} records into {} bytes (parallel={})",
            count,
            buffers.total_bytes(),
            parallel
        );
        buffers
    }
}

fn fill_embeddings<T>(sources: &[T], out: &mut [f32], width: usize, parallel: bool)
where
    T: ProjectionSource + Sync,
{
    if parallel {
        out.par_chunks_mut(width)
            .zip(sources.par_iter())
            .for_each(|(slot, source)| source.copy_embedding(slot));
    } else {
        out.chunks_mut(width)
            .zip(sources)
            .for_each(|(slot, source)| source.copy_embedding(slot));
    }
}

/// Returns each source's full metadata length.
fn fill_metadata<T>(sources: &[T], out: &mut [u8], stride: usize, parallel: bool) -> Vec<usize>
where
    T: ProjectionSource + Sync,
{
    if stride == 0 {
        return sources.iter().map(|s| s.copy_metadata(&mut [])).collect();
    }
    if parallel {
        out.par_chunks_mut(stride)
            .zip(sources.par_iter())
            .map(|(slot, source)| source.copy_metadata(slot))
            .collect()
    } else {
        out.chunks_mut(stride)
            .zip(sources)
            .map(|(slot, source)| source.copy_metadata(slot))
            .collect()
    }
}
