//! Fixed-point closure traversal over module manifests.
//!
//! The traversal starts from the root project's direct requirements and keeps
//! reading the `go.mod` of every registered module version found in the
//! module cache, registering their requirements in turn, until a full pass
//! discovers nothing new. Modules whose manifest is not cached are leaves.

use std::collections::BTreeSet;

use licrawl_core::lockfile::Lockfile;
use licrawl_core::manifest::Manifest;
use licrawl_core::module::ModuleKey;

use crate::cache::ModuleCache;
use crate::registry::Registry;
use crate::version;

/// The frozen outcome of a closure traversal.
#[derive(Debug, Clone)]
pub struct Closure {
    pub registry: Registry,
    /// Module versions whose own manifest could not be located.
    pub missing: BTreeSet<ModuleKey>,
    /// Number of passes run before the fixed point was reached.
    pub passes: usize,
}

impl Closure {
    /// Registered module versions whose manifest was never read.
    pub fn without_manifest(&self) -> usize {
        self.registry.iter().filter(|(_, d)| !d.has_manifest).count()
    }
}

/// Traversal state for a single run.
pub struct ClosureTraversal<'a> {
    cache: &'a ModuleCache,
    registry: Registry,
    missing: BTreeSet<ModuleKey>,
    passes: usize,
}

impl<'a> ClosureTraversal<'a> {
    pub fn new(cache: &'a ModuleCache) -> Self {
        Self {
            cache,
            registry: Registry::new(),
            missing: BTreeSet::new(),
            passes: 0,
        }
    }

    /// Register the root project's direct requirements.
    pub fn seed(&mut self, root: &Manifest) -> miette::Result<()> {
        root.validate_replacements()?;
        for req in &root.requires {
            let effective = version::resolve(&req.path, &req.version, &root.replaces)?;
            self.registry.record_encounter(&req.path, &effective);
        }
        tracing::info!("seeded {} direct dependencies", self.registry.len());
        Ok(())
    }

    /// Run passes until one discovers no new module version, then freeze.
    ///
    /// Each module version's manifest is read at most once, so the loop ends
    /// once every reachable module version has been visited.
    pub fn run(mut self) -> miette::Result<Closure> {
        loop {
            self.passes += 1;
            let any_new = self.pass()?;
            tracing::info!(
                "pass {}: {} modules, {} without manifest",
                self.passes,
                self.registry.len(),
                self.missing.len()
            );
            if !any_new {
                break;
            }
        }
        Ok(Closure {
            registry: self.registry,
            missing: self.missing,
            passes: self.passes,
        })
    }

    /// One pass over every registered module version not visited yet.
    fn pass(&mut self) -> miette::Result<bool> {
        let pending: Vec<ModuleKey> = self
            .registry
            .iter()
            .filter(|(key, details)| !details.has_manifest && !self.missing.contains(*key))
            .map(|(key, _)| key.clone())
            .collect();

        let mut discovered = Registry::new();
        let mut any_new = false;

        for key in pending {
            let Some(manifest) = self.cache.get_manifest(&key.path, &key.version)? else {
                tracing::debug!("no go.mod for {key}");
                self.missing.insert(key);
                continue;
            };
            manifest.validate_replacements()?;
            self.registry.mark_manifest_found(&key.path, &key.version)?;

            for req in &manifest.requires {
                let effective = version::resolve(&req.path, &req.version, &manifest.replaces)?;
                let already_present = discovered.record_encounter(&req.path, &effective);
                if !already_present && !self.registry.exists(&req.path, &effective) {
                    tracing::debug!("Adding {} {}", req.path, effective);
                    any_new = true;
                }
            }
        }

        self.registry.merge(discovered);
        Ok(any_new)
    }
}

/// Resolve the full dependency closure of a root manifest.
pub fn resolve_closure(root: &Manifest, cache: &ModuleCache) -> miette::Result<Closure> {
    let mut traversal = ClosureTraversal::new(cache);
    traversal.seed(root)?;
    traversal.run()
}

/// Build a registry straight from a lock file, one encounter per line.
pub fn registry_from_lockfile(lockfile: &Lockfile) -> miette::Result<Registry> {
    let mut registry = Registry::new();
    for (name, version) in lockfile.modules()? {
        registry.record_encounter(&name, &version);
    }
    Ok(registry)
}
