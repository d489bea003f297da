//! Parsed batch header.

use crate::layout::{batch_v1, BATCH_HEADER_SIZE, BATCH_MAGIC};
use crate::storage::DecodeError;

/// Document batch header, as read from the first 20 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchHeader {
    pub record_count: u32,
    /// Milliseconds since the Unix epoch, stamped at pack time.
    pub timestamp: u64,
    /// CRC-32 of every byte after the header.
    pub checksum: u32,
}

impl BatchHeader {
    /// Parse and validate the magic.
    ///
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if bytes < 20
    /// - `DecodeError::InvalidFormat` on bad magic
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        DecodeError::ensure_len(bytes, BATCH_HEADER_SIZE)?;

        let magic = batch_v1::MAGIC.slice(bytes);
        if magic != BATCH_MAGIC {
            return Err(DecodeError::invalid_format(format!(
                "bad batch magic {:02x?}, expected {:02x?}",
                magic, BATCH_MAGIC
            )));
        }

        Ok(Self {
            record_count: batch_v1::RECORD_COUNT.read_u32(bytes),
            timestamp: batch_v1::TIMESTAMP.read_u64(bytes),
            checksum: batch_v1::CHECKSUM.read_u32(bytes),
        })
    }

    /// Write this header into the first 20 bytes of `buf`.
    pub(crate) fn write(&self, buf: &mut [u8]) {
        batch_v1::MAGIC.write_bytes(buf, &BATCH_MAGIC);
        batch_v1::RECORD_COUNT.write_u32(buf, self.record_count);
        batch_v1::TIMESTAMP.write_u64(buf, self.timestamp);
        batch_v1::CHECKSUM.write_u32(buf, self.checksum);
    }

    /// Total batch length for a given frame size, or `None` on overflow.
    #[must_use]
    pub fn expected_len(&self, frame_size: usize) -> Option<usize> {
        (self.record_count as usize)
            .checked_mul(frame_size)?
            .checked_add(BATCH_HEADER_SIZE)
    }
}
