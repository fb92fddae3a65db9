//! This crate is a grab-bag of small numeric helpers shared by the crates in this repo.
//!
//! Helpers that are only useful to tests live behind the `test-utils` feature.

pub mod pitch;
pub mod window;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
