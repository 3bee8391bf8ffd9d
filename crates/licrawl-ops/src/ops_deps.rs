//! Operation: resolve the dependency closure and print a traversal report.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use licrawl_resolver::cache::ModuleCache;
use licrawl_resolver::resolver::{self, Closure};
use licrawl_util::progress::{spinner, status};

/// Options for `licrawl deps`.
pub struct DepsOptions {
    /// Root of the Go module cache.
    pub module_cache: PathBuf,
}

/// Resolve the closure of the project's `go.mod` against the module cache.
pub fn resolve(project_root: &Path, opts: &DepsOptions) -> miette::Result<Closure> {
    let manifest = crate::load_root_manifest(project_root)?;
    let cache = ModuleCache::new(opts.module_cache.clone());
    let sp = spinner("Resolving dependency closure...");
    let closure = resolver::resolve_closure(&manifest, &cache);
    sp.finish_and_clear();
    closure
}

/// Resolve and print the report to stdout.
pub fn deps(project_root: &Path, opts: &DepsOptions) -> miette::Result<()> {
    let closure = resolve(project_root, opts)?;
    print!("{}", render_report(&closure));
    status(
        "Resolved",
        &format!(
            "{} modules in {} passes, {} without go.mod",
            closure.registry.len(),
            closure.passes,
            closure.without_manifest()
        ),
    );
    Ok(())
}

/// Every module version with its use count and manifest flag, followed by
/// the modules whose `go.mod` is not cached and the domains seen.
pub fn render_report(closure: &Closure) -> String {
    let mut out = String::new();
    for (key, details) in closure.registry.iter() {
        let _ = writeln!(
            out,
            "{} {} {} {}",
            key.path, key.version, details.use_count, details.has_manifest
        );
    }
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "#modules: {}", closure.registry.len());
    let _ = writeln!(out, "#missing: {}", closure.without_manifest());
    let _ = writeln!(out);

    let _ = writeln!(out, "Missing go.mod");
    for key in &closure.missing {
        let _ = writeln!(out, "{key}");
    }
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "#modules: {}", closure.missing.len());
    let _ = writeln!(out);

    let domains = closure.registry.domains();
    let _ = writeln!(out, "Domains");
    for domain in domains {
        let _ = writeln!(out, "{domain}");
    }
    let _ = writeln!(out, "---");
    let _ = writeln!(out, "#domains: {}", domains.len());
    out
}
