//! Crate-level error type.
//!
//! Format-level failures live in [`crate::storage::DecodeError`] and
//! [`crate::storage::EncodeError`]; this module wraps them together with
//! cache, configuration and I/O failures for callers that compose the
//! whole pipeline.

mod types;


pub use types::{FrameError, FrameResult};
