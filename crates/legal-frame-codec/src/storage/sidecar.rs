//! Text sidecar for the variable-length directory.
//!
//! Frames never store text, only hashes. When the full text has to travel
//! with a record, it goes into a sidecar blob next to the frame, and the
//! frame's directory slots record `(offset, length)` pairs into that blob.
//! [`resolve_verified`] checks the bytes against the frame's content hash.

use serde_json::Value;

use crate::checksum::hash_text;
use crate::layout::VAR_REGION_SLOTS;
use crate::storage::{DecodeError, EncodeError};
use crate::types::{
    DocumentInput, DocumentRecord, FeatureFlags, RegionSlot, VarRegion, TAG_SEPARATOR,
};

/// Accumulates text regions and assigns their directory entries.
#[derive(Debug, Default)]
pub struct SidecarBuilder {
    blob: Vec<u8>,
    regions: [Option<VarRegion>; VAR_REGION_SLOTS],
}

impl SidecarBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every text field of an upstream input, in slot order.
    ///
    /// # Errors
    /// - `EncodeError::RegionOverflow` if the sidecar outgrows 32-bit offsets
    pub fn from_input(input: &DocumentInput) -> Result<Self, EncodeError> {
        let mut builder = Self::new();
        if let Some(title) = &input.title {
            builder.push_text(RegionSlot::Title, title)?;
        }
        if let Some(body) = &input.body {
            builder.push_text(RegionSlot::Body, body)?;
        }
        if let Some(map) = input.metadata.as_ref().filter(|m| !m.is_empty()) {
            builder.push_text(RegionSlot::Metadata, &Value::Object(map.clone()).to_string())?;
        }
        if !input.tags.is_empty() {
            builder.push_text(RegionSlot::Tags, &input.tags.join(TAG_SEPARATOR))?;
        }
        if let Some(summary) = &input.summary {
            builder.push_text(RegionSlot::Summary, summary)?;
        }
        if let Some(analysis) = &input.analysis {
            builder.push_text(RegionSlot::Analysis, analysis)?;
        }
        Ok(builder)
    }

    /// Append raw bytes for `slot`. A later push to the same slot replaces the
    /// directory entry; the earlier bytes stay in the blob.
    ///
    /// # Errors
    /// - `EncodeError::RegionOverflow` if the sidecar outgrows 32-bit offsets
    pub fn push(&mut self, slot: RegionSlot, bytes: &[u8]) -> Result<VarRegion, EncodeError> {
        let overflow = || EncodeError::RegionOverflow {
            region: "sidecar",
            size: self.blob.len() + bytes.len(),
        };
        let offset = u32::try_from(self.blob.len()).map_err(|_| overflow())?;
        let length = u32::try_from(bytes.len()).map_err(|_| overflow())?;
        offset.checked_add(length).ok_or_else(overflow)?;

        let region = VarRegion { offset, length };
        self.blob.extend_from_slice(bytes);
        self.regions[slot.index()] = Some(region);
        Ok(region)
    }

    /// Append UTF-8 text for `slot`. Empty text leaves the slot unset.
    ///
    /// # Errors
    /// - `EncodeError::RegionOverflow` if the sidecar outgrows 32-bit offsets
    pub fn push_text(&mut self, slot: RegionSlot, text: &str) -> Result<Option<VarRegion>, EncodeError> {
        if text.is_empty() {
            return Ok(None);
        }
        self.push(slot, text.as_bytes()).map(Some)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blob.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blob.is_empty()
    }

    /// Write the directory into `record` and return the sidecar blob.
    pub fn finish(self, record: &mut DocumentRecord) -> Vec<u8> {
        for (dst, src) in record.var_regions.iter_mut().zip(self.regions) {
            *dst = src.unwrap_or_default();
        }
        record
            .flags
            .set(FeatureFlags::HAS_VAR_REGIONS, record.has_var_regions());
        self.blob
    }
}

/// Bytes of one directory entry. An empty region resolves to an empty slice.
///
/// # Errors
/// - `DecodeError::TruncatedBuffer` if the region runs past the sidecar
pub fn resolve(sidecar: &[u8], region: VarRegion) -> Result<&[u8], DecodeError> {
    if region.is_empty() {
        return Ok(&[]);
    }
    let start = region.offset as usize;
    let end = start + region.length as usize;
    DecodeError::ensure_len(sidecar, end)?;
    Ok(&sidecar[start..end])
}

/// Text of one directory entry.
///
/// # Errors
/// - Same as [`resolve`]
/// - `DecodeError::InvalidFormat` if the bytes are not UTF-8
pub fn resolve_text(sidecar: &[u8], region: VarRegion) -> Result<&str, DecodeError> {
    let bytes = resolve(sidecar, region)?;
    std::str::from_utf8(bytes)
        .map_err(|e| DecodeError::invalid_format(format!("sidecar text is not UTF-8: {e}")))
}

/// Text for `slot`, checked against the record's content hash.
///
/// # Errors
/// - Same as [`resolve_text`]
/// - `DecodeError::IntegrityError` if the text does not hash to the stored value
pub fn resolve_verified<'s>(
    record: &DocumentRecord,
    slot: RegionSlot,
    sidecar: &'s [u8],
) -> Result<&'s str, DecodeError> {
    let text = resolve_text(sidecar, record.region(slot))?;
    let stored = match slot {
        RegionSlot::Title => record.hashes.title,
        RegionSlot::Body => record.hashes.body,
        RegionSlot::Metadata => record.hashes.metadata,
        RegionSlot::Tags => record.hashes.tags,
        RegionSlot::Summary => record.hashes.summary,
        RegionSlot::Analysis => record.hashes.analysis,
    };
    let computed = hash_text(text);
    if computed != stored {
        return Err(DecodeError::IntegrityError { stored, computed });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> DocumentInput {
        DocumentInput {
            id: "doc-9".into(),
            title: Some("Motion to Compel".into()),
            body: Some("Plaintiff moves the court...".into()),
            tags: vec!["discovery".into(), "urgent".into()],
            ..DocumentInput::default()
        }
    }

    #[test]
    fn test_sidecar_round_trip_with_hash_check() {
        let input = input();
        let mut record = DocumentRecord::from_input_at(&input, 0);
        let sidecar = SidecarBuilder::from_input(&input).expect("build").finish(&mut record);

        println!("AFTER: sidecar = {} bytes, regions = {:?}", sidecar.len(), &record.var_regions[..4]);
        assert!(record.flags.contains(FeatureFlags::HAS_VAR_REGIONS));
        assert_eq!(
            resolve_verified(&record, RegionSlot::Title, &sidecar).expect("title"),
            "Motion to Compel"
        );
        assert_eq!(
            resolve_verified(&record, RegionSlot::Tags, &sidecar).expect("tags"),
            "discovery\u{1f}urgent"
        );
        assert!(record.region(RegionSlot::Summary).is_empty());
        assert_eq!(resolve_text(&sidecar, record.region(RegionSlot::Summary)).expect("empty"), "");
    }

    #[test]
    fn test_sidecar_survives_frame_encoding() {
        let input = input();
        let mut record = DocumentRecord::from_input_at(&input, 0);
        let sidecar = SidecarBuilder::from_input(&input).expect("build").finish(&mut record);

        let codec = crate::storage::RecordCodec::new();
        let decoded = codec
            .decode(&codec.encode(&record, 1).expect("encode"))
            .expect("decode");
        assert_eq!(
            resolve_verified(&decoded, RegionSlot::Body, &sidecar).expect("body"),
            "Plaintiff moves the court..."
        );
    }

    #[test]
    fn test_tampered_sidecar_fails_hash_check() {
        let input = input();
        let mut record = DocumentRecord::from_input_at(&input, 0);
        let mut sidecar = SidecarBuilder::from_input(&input).expect("build").finish(&mut record);
        sidecar[0] = b'N';

        assert!(matches!(
            resolve_verified(&record, RegionSlot::Title, &sidecar),
            Err(DecodeError::IntegrityError { .. })
        ));
    }

    #[test]
    fn test_region_past_end_is_truncated() {
        let region = VarRegion {
            offset: 4,
            length: 10,
        };
        assert_eq!(
            resolve(b"short", region).unwrap_err(),
            DecodeError::TruncatedBuffer {
                needed: 14,
                available: 5
            }
        );
    }
}
