//! Module path to repository URL mapping.

use std::collections::BTreeMap;

/// Vanity domains whose repositories live on a known forge.
pub const DEFAULT_REWRITES: &[(&str, &str)] = &[
    ("golang.org/x", "github.com/golang"),
    ("honnef.co/go", "github.com/dominikh"),
    ("cloud.google.com/go", "github.com/googleapis/google-cloud-go"),
    ("k8s.io", "github.com/kubernetes"),
    ("modernc.org", "gitlab.com/cznic"),
    ("sigs.k8s.io", "github.com/kubernetes-sigs"),
    ("go.mongodb.org", "github.com/mongodb"),
    ("mvdan.cc", "github.com/mvdan"),
];

/// Forges where a repository is always `host/owner/repo`.
const FORGE_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// A clone URL derived for a module path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUrl {
    pub url: String,
    /// A rewrite-table entry was applied.
    pub rewritten: bool,
}

/// Maps module paths to clone URLs through the rewrite table.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    rewrites: BTreeMap<String, String>,
}

impl Default for SourceLocator {
    fn default() -> Self {
        Self::new(&BTreeMap::new())
    }
}

impl SourceLocator {
    /// The built-in table with `extra` entries layered on top.
    pub fn new(extra: &BTreeMap<String, String>) -> Self {
        let mut rewrites: BTreeMap<String, String> = DEFAULT_REWRITES
            .iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        for (from, to) in extra {
            rewrites.insert(
                from.trim_end_matches('/').to_string(),
                to.trim_end_matches('/').to_string(),
            );
        }
        Self { rewrites }
    }

    /// Apply the longest rewrite prefix matching whole path segments.
    pub fn rewrite(&self, module_path: &str) -> Option<String> {
        self.rewrites
            .iter()
            .filter(|(from, _)| {
                module_path
                    .strip_prefix(from.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .max_by_key(|(from, _)| from.len())
            .map(|(from, to)| format!("{to}{}", &module_path[from.len()..]))
    }

    /// The `https://` clone URL for a module path.
    pub fn source_url(&self, module_path: &str) -> SourceUrl {
        let (location, rewritten) = match self.rewrite(module_path) {
            Some(rewritten) => (rewritten, true),
            None => (module_path.to_string(), false),
        };
        SourceUrl {
            url: format!("https://{}", repo_root(&location)),
            rewritten,
        }
    }
}

/// Trim forge-hosted locations to `host/owner/repo`.
///
/// Module paths such as `github.com/o/r/v2` or `github.com/o/r/sub` live in
/// the repository `github.com/o/r`.
pub fn repo_root(location: &str) -> &str {
    let host = location.split('/').next().unwrap_or_default();
    if !FORGE_HOSTS.contains(&host) {
        return location;
    }
    match location.match_indices('/').nth(2) {
        Some((idx, _)) => &location[..idx],
        None => location,
    }
}
