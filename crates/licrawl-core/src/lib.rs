//! Core data types for licrawl.
//!
//! This crate defines what a Go project looks like to the crawler: module
//! identities and their cache-safe escaping, the `go.mod` manifest (direct
//! requirements plus replace directives), the flattened `go.sum` lock file,
//! and the global user configuration.
//!
//! This crate is intentionally free of async code and network I/O.

pub mod config;
pub mod lockfile;
pub mod manifest;
pub mod module;
