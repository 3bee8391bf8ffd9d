//! Shared utilities for licrawl.
//!
//! This crate provides cross-cutting concerns used by all other licrawl crates:
//! the error type, filesystem helpers, external process spawning (git),
//! and terminal progress indicators.

pub mod errors;
pub mod fs;
pub mod process;
pub mod progress;
