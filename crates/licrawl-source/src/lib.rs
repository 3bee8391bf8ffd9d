//! Source acquisition for modules missing from the local module cache:
//! mapping module paths to clone URLs, cloning (or reopening) repositories
//! into a scratch directory, and discovering the real repository of vanity
//! import paths through `go-import` / `go-source` meta tags.

pub mod download;
pub mod git;
pub mod meta;
pub mod repository;
