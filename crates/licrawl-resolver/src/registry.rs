//! The module registry: every `(path, effective version)` seen during a run.

use std::collections::{BTreeMap, BTreeSet};

use licrawl_core::module::ModuleKey;
use licrawl_util::errors::LicrawlError;

/// What is known about one registered module version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleDetails {
    /// How many times this exact pair was encountered, the first time included.
    pub use_count: u32,
    /// The module's own `go.mod` was located and read.
    pub has_manifest: bool,
}

/// A grow-only set of module versions with usage bookkeeping.
///
/// Iteration is ordered by `(path, version)`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<ModuleKey, ModuleDetails>,
    domains: BTreeSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether exactly this `(path, version)` pair is registered.
    pub fn exists(&self, path: &str, version: &str) -> bool {
        self.entries.contains_key(&ModuleKey::new(path, version))
    }

    /// Register one encounter of `(path, version)`.
    ///
    /// Returns whether the pair was already present before this call.
    pub fn record_encounter(&mut self, path: &str, version: &str) -> bool {
        let key = ModuleKey::new(path, version);
        let already_present = self.entries.contains_key(&key);
        if !already_present {
            self.domains.insert(key.domain().to_string());
        }
        self.entries.entry(key).or_default().use_count += 1;
        already_present
    }

    /// Record that the module's own manifest was found.
    ///
    /// Marking an unregistered pair means the traversal lost track of its
    /// own state, so it is reported as an error.
    pub fn mark_manifest_found(&mut self, path: &str, version: &str) -> Result<(), LicrawlError> {
        match self.entries.get_mut(&ModuleKey::new(path, version)) {
            Some(details) => {
                details.has_manifest = true;
                Ok(())
            }
            None => Err(LicrawlError::Resolution {
                message: format!("manifest found for unregistered module {path} {version}"),
            }),
        }
    }

    pub fn get(&self, key: &ModuleKey) -> Option<&ModuleDetails> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleKey, &ModuleDetails)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ModuleKey> {
        self.entries.keys()
    }

    /// Distinct first path segments across all registered modules.
    pub fn domains(&self) -> &BTreeSet<String> {
        &self.domains
    }

    /// Fold `other` into this registry, summing use counts.
    ///
    /// Returns the number of pairs that were new to this registry.
    pub fn merge(&mut self, other: Registry) -> usize {
        let mut added = 0;
        for (key, incoming) in other.entries {
            let details = self.entries.entry(key).or_insert_with(|| {
                added += 1;
                ModuleDetails::default()
            });
            details.use_count += incoming.use_count;
            details.has_manifest |= incoming.has_manifest;
        }
        self.domains.extend(other.domains);
        added
    }
}
