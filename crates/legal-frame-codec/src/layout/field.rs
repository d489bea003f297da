//! Field descriptors and little-endian accessors.
//!
//! Accessors index the buffer directly. Callers validate the buffer length
//! against the frame size before touching any field; an out-of-range access
//! here is a programming error, not a runtime condition.

use std::ops::Range;

/// Wire encoding of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    U8,
    U16,
    U32,
    U64,
    F32,
    /// `n` consecutive little-endian f32 values.
    F32Array(usize),
    /// `n` consecutive little-endian u32 values.
    U32Array(usize),
    /// `n` opaque bytes (magic, padding, reserved space).
    Bytes(usize),
}

impl FieldEncoding {
    /// Encoded size in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            FieldEncoding::U8 => 1,
            FieldEncoding::U16 => 2,
            FieldEncoding::U32 | FieldEncoding::F32 => 4,
            FieldEncoding::U64 => 8,
            FieldEncoding::F32Array(n) | FieldEncoding::U32Array(n) => n * 4,
            FieldEncoding::Bytes(n) => n,
        }
    }
}

/// A named field at a fixed byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub encoding: FieldEncoding,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(name: &'static str, offset: usize, encoding: FieldEncoding) -> Self {
        Self {
            name,
            offset,
            encoding,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.encoding.size()
    }

    /// First byte past the field.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.size()
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Borrow the raw bytes of this field.
    #[inline]
    pub fn slice<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.range()]
    }

    // ---- readers ----

    #[inline]
    pub fn read_u8(&self, buf: &[u8]) -> u8 {
        debug_assert_eq!(self.encoding, FieldEncoding::U8, "{}", self.name);
        buf[self.offset]
    }

    #[inline]
    pub fn read_u16(&self, buf: &[u8]) -> u16 {
        debug_assert_eq!(self.encoding, FieldEncoding::U16, "{}", self.name);
        u16::from_le_bytes([buf[self.offset], buf[self.offset + 1]])
    }

    #[inline]
    pub fn read_u32(&self, buf: &[u8]) -> u32 {
        debug_assert_eq!(self.encoding, FieldEncoding::U32, "{}", self.name);
        read_u32_at(buf, self.offset)
    }

    #[inline]
    pub fn read_u64(&self, buf: &[u8]) -> u64 {
        debug_assert_eq!(self.encoding, FieldEncoding::U64, "{}", self.name);
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&buf[self.offset..self.offset + 8]);
        u64::from_le_bytes(raw)
    }

    #[inline]
    pub fn read_f32(&self, buf: &[u8]) -> f32 {
        debug_assert_eq!(self.encoding, FieldEncoding::F32, "{}", self.name);
        f32::from_bits(read_u32_at(buf, self.offset))
    }

    /// Fill `out` from an array field. `out` must match the field length.
    pub fn read_f32_into(&self, buf: &[u8], out: &mut [f32]) {
        debug_assert_eq!(self.encoding, FieldEncoding::F32Array(out.len()), "{}", self.name);
        for (i, value) in out.iter_mut().enumerate() {
            *value = f32::from_bits(read_u32_at(buf, self.offset + i * 4));
        }
    }

    /// Fill `out` from a u32 array field. `out` must match the field length.
    pub fn read_u32_into(&self, buf: &[u8], out: &mut [u32]) {
        debug_assert_eq!(self.encoding, FieldEncoding::U32Array(out.len()), "{}", self.name);
        for (i, value) in out.iter_mut().enumerate() {
            *value = read_u32_at(buf, self.offset + i * 4);
        }
    }

    // ---- writers ----

    #[inline]
    pub fn write_u8(&self, buf: &mut [u8], value: u8) {
        debug_assert_eq!(self.encoding, FieldEncoding::U8, "{}", self.name);
        buf[self.offset] = value;
    }

    #[inline]
    pub fn write_u16(&self, buf: &mut [u8], value: u16) {
        debug_assert_eq!(self.encoding, FieldEncoding::U16, "{}", self.name);
        buf[self.offset..self.offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u32(&self, buf: &mut [u8], value: u32) {
        debug_assert_eq!(self.encoding, FieldEncoding::U32, "{}", self.name);
        buf[self.offset..self.offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_u64(&self, buf: &mut [u8], value: u64) {
        debug_assert_eq!(self.encoding, FieldEncoding::U64, "{}", self.name);
        buf[self.offset..self.offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    #[inline]
    pub fn write_f32(&self, buf: &mut [u8], value: f32) {
        debug_assert_eq!(self.encoding, FieldEncoding::F32, "{}", self.name);
        buf[self.offset..self.offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Write up to the field capacity from `values`, zero-filling the tail.
    /// Returns how many values were written (the rest were dropped).
    pub fn write_f32_slice(&self, buf: &mut [u8], values: &[f32]) -> usize {
        let FieldEncoding::F32Array(capacity) = self.encoding else {
            debug_assert!(false, "{} is not an f32 array", self.name);
            return 0;
        };
        let region = &mut buf[self.range()];
        region.fill(0);
        let written = values.len().min(capacity);
        for (chunk, value) in region.chunks_exact_mut(4).zip(&values[..written]) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        written
    }

    /// Write up to the field capacity from `values`, zero-filling the tail.
    /// Returns how many values were written (the rest were dropped).
    pub fn write_u32_slice(&self, buf: &mut [u8], values: &[u32]) -> usize {
        let FieldEncoding::U32Array(capacity) = self.encoding else {
            debug_assert!(false, "{} is not a u32 array", self.name);
            return 0;
        };
        let region = &mut buf[self.range()];
        region.fill(0);
        let written = values.len().min(capacity);
        for (chunk, value) in region.chunks_exact_mut(4).zip(&values[..written]) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
        written
    }

    /// Copy raw bytes into a `Bytes(n)` field; `value` must be exactly `n` long.
    #[inline]
    pub fn write_bytes(&self, buf: &mut [u8], value: &[u8]) {
        debug_assert_eq!(self.encoding, FieldEncoding::Bytes(value.len()), "{}", self.name);
        buf[self.range()].copy_from_slice(value);
    }
}

#[inline]
fn read_u32_at(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// True when `fields` are sorted by offset, never overlap, and all end within
/// `frame_size`. Usable in const context for compile-time layout checks.
#[must_use]
pub const fn fields_are_packed(fields: &[FieldSpec], frame_size: usize) -> bool {
    let mut i = 0;
    while i < fields.len() {
        if fields[i].end() > frame_size {
            return false;
        }
        if i > 0 && fields[i - 1].end() > fields[i].offset {
            return false;
        }
        i += 1;
    }
    true
}
