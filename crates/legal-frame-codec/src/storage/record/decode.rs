//! Decoding of fixed frames back into document records.

use crate::layout::{
    document_layout, is_supported_document_version, v1, DOCUMENT_MAGIC, RECORD_HEADER_SIZE,
};
use crate::storage::DecodeError;
use crate::types::{DocumentRecord, FeatureFlags};

use super::codec::RecordCodec;
use super::reference::DocumentRecordRef;

/// The 32-byte record header, parsed without touching the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub version: u32,
    pub content_id: u32,
    pub declared_size: u32,
    pub checksum: u32,
    pub flags: FeatureFlags,
    pub created_at: u64,
}

impl RecordCodec {
    /// Decode a record, verifying its checksum when the codec is configured to.
    ///
    /// Bytes past the first frame are ignored.
    ///
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if bytes are shorter than the header or frame
    /// - `DecodeError::InvalidFormat` on bad magic or a declared size that
    ///   disagrees with the version
    /// - `DecodeError::UnsupportedVersion` for unknown versions
    /// - `DecodeError::IntegrityError` on checksum mismatch
    pub fn decode(&self, bytes: &[u8]) -> Result<DocumentRecord, DecodeError> {
        self.decode_with(bytes, self.verify_checksum)
    }

    /// Decode a record with an explicit checksum policy.
    ///
    /// # Errors
    /// Same as [`RecordCodec::decode`].
    pub fn decode_with(
        &self,
        bytes: &[u8],
        verify_checksum: bool,
    ) -> Result<DocumentRecord, DecodeError> {
        let view = validate_frame(bytes, verify_checksum)?;
        Ok(view.to_owned_record())
    }

    /// Parse only the header (magic and version validated, body untouched).
    ///
    /// # Errors
    /// - `DecodeError::TruncatedBuffer` if bytes < 32
    /// - `DecodeError::InvalidFormat` on bad magic
    /// - `DecodeError::UnsupportedVersion` for unknown versions
    pub fn decode_header(&self, bytes: &[u8]) -> Result<RecordHeader, DecodeError> {
        parse_header(bytes)
    }

    /// Validate a frame and return a borrowed view into it.
    ///
    /// The view borrows `bytes`; the borrow checker keeps the buffer alive and
    /// unmodified for as long as the view (or any slice taken from it) exists.
    ///
    /// # Errors
    /// Same as [`RecordCodec::decode`].
    pub fn decode_zero_copy<'a>(
        &self,
        bytes: &'a [u8],
    ) -> Result<DocumentRecordRef<'a>, DecodeError> {
        validate_frame(bytes, self.verify_checksum)
    }
}

pub(crate) fn parse_header(bytes: &[u8]) -> Result<RecordHeader, DecodeError> {
    DecodeError::ensure_len(bytes, RECORD_HEADER_SIZE)?;

    // Validate magic - FAIL FAST
    let magic = v1::MAGIC.slice(bytes);
    if magic != DOCUMENT_MAGIC {
        return Err(DecodeError::invalid_format(format!(
            "bad record magic {:02x?}, expected {:02x?}",
            magic, DOCUMENT_MAGIC
        )));
    }

    // Validate version - FAIL FAST
    let version = v1::VERSION.read_u32(bytes);
    if !is_supported_document_version(version) {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    Ok(RecordHeader {
        version,
        content_id: v1::CONTENT_ID.read_u32(bytes),
        declared_size: v1::DECLARED_SIZE.read_u32(bytes),
        checksum: v1::CHECKSUM.read_u32(bytes),
        flags: FeatureFlags::from_bits(v1::FEATURE_FLAGS.read_u32(bytes)),
        created_at: v1::CREATED_AT.read_u64(bytes),
    })
}

/// Run the decode checks in order: header, size, declared size, checksum.
pub(crate) fn validate_frame(
    bytes: &[u8],
    verify_checksum: bool,
) -> Result<DocumentRecordRef<'_>, DecodeError> {
    let header = parse_header(bytes)?;
    let layout = document_layout(header.version)
        .ok_or(DecodeError::UnsupportedVersion(header.version))?;

    DecodeError::ensure_len(bytes, layout.frame_size)?;
    if header.declared_size as usize != layout.frame_size {
        return Err(DecodeError::invalid_format(format!(
            "declared size {} does not match v{} frame size {}",
            header.declared_size, header.version, layout.frame_size
        )));
    }

    let frame = &bytes[..layout.frame_size];
    if verify_checksum {
        let computed = layout.frame_checksum(frame);
        if computed != header.checksum {
            return Err(DecodeError::IntegrityError {
                stored: header.checksum,
                computed,
            });
        }
    }

    Ok(DocumentRecordRef::new_unchecked(frame, header.version))
}
