//! Read-only view of the Go module cache (`$GOMODCACHE`).

use std::path::{Path, PathBuf};

use licrawl_core::manifest::Manifest;
use licrawl_core::module::escape_path;
use licrawl_util::errors::LicrawlError;

/// The module cache, laid out as `<root>/<escaped path>@<version>/`.
#[derive(Debug, Clone)]
pub struct ModuleCache {
    root: PathBuf,
}

impl ModuleCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory a module version would be extracted to.
    ///
    /// Fails if the module path cannot be escaped.
    pub fn module_dir(&self, path: &str, version: &str) -> Result<PathBuf, LicrawlError> {
        let escaped = escape_path(path)?;
        Ok(self.root.join(format!("{escaped}@{version}")))
    }

    /// The cached source directory for a module version, if it is present.
    pub fn get_module(&self, path: &str, version: &str) -> Result<Option<PathBuf>, LicrawlError> {
        let dir = self.module_dir(path, version)?;
        Ok(dir.is_dir().then_some(dir))
    }

    /// Read the module's own `go.mod` from the cache.
    ///
    /// `Ok(None)` when the module or its manifest is not cached.
    pub fn get_manifest(&self, path: &str, version: &str) -> miette::Result<Option<Manifest>> {
        let dir = self.module_dir(path, version)?;
        Manifest::load(&dir)
    }
}
