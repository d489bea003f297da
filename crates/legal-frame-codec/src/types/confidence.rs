//! One-byte confidence scale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Confidence in `[0.0, 1.0]` stored as `round(value * 255)`.
///
/// The record keeps the scaled byte, not the float, so a record compares
/// equal to its own decode. Conversions back to `f32` are within `1/255`
/// of the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(u8);

impl Confidence {
    pub const MIN: Confidence = Confidence(0);
    pub const MAX: Confidence = Confidence(u8::MAX);
    /// 0.5 on the byte scale.
    pub const DEFAULT: Confidence = Confidence(128);

    /// Scale a float, clamping to `[0.0, 1.0]`. NaN maps to the default.
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        if value.is_nan() {
            return Self::DEFAULT;
        }
        let scaled = (value.clamp(0.0, 1.0) * 255.0).round();
        Self(scaled as u8)
    }

    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> f32 {
        f32::from(self.0) / 255.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.value())
    }
}
