use std::path::Path;

use licrawl_core::manifest::Manifest;
use licrawl_core::module::ModuleKey;
use licrawl_resolver::cache::ModuleCache;
use licrawl_resolver::resolver::{resolve_closure, ClosureTraversal};
use licrawl_util::errors::LicrawlError;
use tempfile::TempDir;

/// Write `<cache>/<path>@<version>/go.mod` with the given requirements.
fn cache_module(root: &Path, path: &str, version: &str, go_mod: Option<&str>) {
    let dir = root.join(format!("{path}@{version}"));
    std::fs::create_dir_all(&dir).unwrap();
    if let Some(content) = go_mod {
        std::fs::write(dir.join("go.mod"), content).unwrap();
    }
}

fn root(content: &str) -> Manifest {
    Manifest::parse(content, "go.mod").unwrap()
}

#[test]
fn test_direct_dependency_with_sub_dependency() {
    let tmp = TempDir::new().unwrap();
    cache_module(
        tmp.path(),
        "example.com/a",
        "v1.0.0",
        Some("module example.com/a\nrequire example.com/b v2.0.0\n"),
    );
    let cache = ModuleCache::new(tmp.path());

    let closure = resolve_closure(&root("require example.com/a v1.0.0\n"), &cache).unwrap();

    let keys: Vec<String> = closure.registry.keys().map(|k| k.to_string()).collect();
    assert_eq!(keys, vec!["example.com/a v1.0.0", "example.com/b v2.0.0"]);
    let a = closure
        .registry
        .get(&ModuleKey::new("example.com/a", "v1.0.0"))
        .unwrap();
    assert!(a.has_manifest);
    let b = closure
        .registry
        .get(&ModuleKey::new("example.com/b", "v2.0.0"))
        .unwrap();
    assert!(!b.has_manifest);
    assert!(closure
        .missing
        .contains(&ModuleKey::new("example.com/b", "v2.0.0")));
    assert_eq!(closure.without_manifest(), 1);
}

#[test]
fn test_shared_sub_dependency_registered_once_with_use_count() {
    let tmp = TempDir::new().unwrap();
    cache_module(
        tmp.path(),
        "example.com/a",
        "v1.0.0",
        Some("module example.com/a\nrequire example.com/shared v1.0.0\n"),
    );
    cache_module(
        tmp.path(),
        "example.com/b",
        "v1.0.0",
        Some("module example.com/b\nrequire example.com/shared v1.0.0\n"),
    );
    let cache = ModuleCache::new(tmp.path());

    let closure = resolve_closure(
        &root("require (\n\texample.com/a v1.0.0\n\texample.com/b v1.0.0\n)\n"),
        &cache,
    )
    .unwrap();

    assert_eq!(closure.registry.len(), 3);
    let shared = closure
        .registry
        .get(&ModuleKey::new("example.com/shared", "v1.0.0"))
        .unwrap();
    assert_eq!(shared.use_count, 2);
}

#[test]
fn test_chain_terminates_within_depth_bound() {
    let tmp = TempDir::new().unwrap();
    cache_module(
        tmp.path(),
        "example.com/a",
        "v1.0.0",
        Some("require example.com/b v1.0.0\n"),
    );
    cache_module(
        tmp.path(),
        "example.com/b",
        "v1.0.0",
        Some("require example.com/c v1.0.0\n"),
    );
    cache_module(tmp.path(), "example.com/c", "v1.0.0", Some("module example.com/c\n"));
    let cache = ModuleCache::new(tmp.path());

    let closure = resolve_closure(&root("require example.com/a v1.0.0\n"), &cache).unwrap();

    assert_eq!(closure.registry.len(), 3);
    assert!(closure.missing.is_empty());
    // depth 3 chain: passes discovering b, c, then one quiet pass
    assert!(closure.passes <= 4, "passes = {}", closure.passes);
}

#[test]
fn test_cycle_terminates() {
    let tmp = TempDir::new().unwrap();
    cache_module(
        tmp.path(),
        "example.com/a",
        "v1.0.0",
        Some("require example.com/b v1.0.0\n"),
    );
    cache_module(
        tmp.path(),
        "example.com/b",
        "v1.0.0",
        Some("require example.com/a v1.0.0\n"),
    );
    let cache = ModuleCache::new(tmp.path());

    let closure = resolve_closure(&root("require example.com/a v1.0.0\n"), &cache).unwrap();
    assert_eq!(closure.registry.len(), 2);
}

#[test]
fn test_sub_manifest_replacement_applies() {
    let tmp = TempDir::new().unwrap();
    cache_module(
        tmp.path(),
        "example.com/a",
        "v1.0.0",
        Some("require example.com/b v1.0.0\nreplace example.com/b => example.com/b v1.5.0\n"),
    );
    let cache = ModuleCache::new(tmp.path());

    let closure = resolve_closure(&root("require example.com/a v1.0.0\n"), &cache).unwrap();
    assert!(closure.registry.exists("example.com/b", "v1.5.0"));
    assert!(!closure.registry.exists("example.com/b", "v1.0.0"));
}

#[test]
fn test_root_replacement_applies_to_direct_dependency() {
    let tmp = TempDir::new().unwrap();
    let cache = ModuleCache::new(tmp.path());
    let mut traversal = ClosureTraversal::new(&cache);
    traversal
        .seed(&root(
            "require example.com/a v1.0.0\nreplace example.com/a => example.com/fork v1.0.1\n",
        ))
        .unwrap();
    let closure = traversal.run().unwrap();
    assert!(closure.registry.exists("example.com/a", "v1.0.1"));
}

#[test]
fn test_version_specific_replacement_in_sub_manifest_aborts() {
    let tmp = TempDir::new().unwrap();
    cache_module(
        tmp.path(),
        "example.com/a",
        "v1.0.0",
        Some("require example.com/b v1.0.0\nreplace example.com/z v0.1.0 => example.com/y v0.2.0\n"),
    );
    let cache = ModuleCache::new(tmp.path());

    let err = resolve_closure(&root("require example.com/a v1.0.0\n"), &cache).unwrap_err();
    let err = err.downcast::<LicrawlError>().unwrap();
    assert!(matches!(err, LicrawlError::UnsupportedReplacement { .. }));
}

#[test]
fn test_malformed_sub_manifest_aborts() {
    let tmp = TempDir::new().unwrap();
    cache_module(tmp.path(), "example.com/a", "v1.0.0", Some("require (\n"));
    let cache = ModuleCache::new(tmp.path());
    assert!(resolve_closure(&root("require example.com/a v1.0.0\n"), &cache).is_err());
}

#[test]
fn test_unescapable_module_path_aborts() {
    let tmp = TempDir::new().unwrap();
    let cache = ModuleCache::new(tmp.path());
    let err = resolve_closure(&root("require nodot/pkg v1.0.0\n"), &cache).unwrap_err();
    assert!(err.to_string().contains("Issues with escape path of nodot/pkg"));
}

#[test]
fn test_uppercase_module_found_via_escaped_dir() {
    let tmp = TempDir::new().unwrap();
    cache_module(
        tmp.path(),
        "github.com/!burnt!sushi/toml",
        "v1.3.2",
        Some("module github.com/BurntSushi/toml\nrequire example.com/leaf v1.0.0\n"),
    );
    let cache = ModuleCache::new(tmp.path());
    let closure =
        resolve_closure(&root("require github.com/BurntSushi/toml v1.3.2\n"), &cache).unwrap();
    assert!(closure.registry.exists("example.com/leaf", "v1.0.0"));
}
