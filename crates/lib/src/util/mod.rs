//! Shared utilities.
//!
//! Filesystem helpers used by the run.

pub mod fs;
