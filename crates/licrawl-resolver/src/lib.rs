//! Dependency closure engine: effective-version resolution through replace
//! directives, the module registry, and the fixed-point traversal that walks
//! module manifests in the local Go module cache.

pub mod cache;
pub mod registry;
pub mod resolver;
pub mod version;
