//! Integration tests for the `legal-frame` binary.
//!
//! Every test runs the real binary against files in a temp dir.
//!
//! # Test Categories
//! - `round_trip_test`: pack then unpack/inspect/project
//! - `exit_code_test`: recoverable errors exit 1, corruption exits 2

mod helpers;

mod exit_code_test;
mod round_trip_test;
