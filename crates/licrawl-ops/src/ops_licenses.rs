//! Operation: determine the license of every module in the dependency set.
//!
//! Each module version is served from the module cache when it is there,
//! otherwise cloned into a scratch directory. Failures to acquire or inspect
//! one module are reported in that module's row and never stop the batch.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use licrawl_core::module::{escape_path, ModuleKey};
use licrawl_license::detect::{pick_best, LicenseDetector};
use licrawl_license::filer::{DirectoryFiler, GitFiler};
use licrawl_resolver::cache::ModuleCache;
use licrawl_resolver::registry::Registry;
use licrawl_resolver::resolver;
use licrawl_source::repository::{SourceLocator, SourceUrl};
use licrawl_source::{download, git, meta};
use licrawl_util::errors::LicrawlError;
use licrawl_util::progress::{spinner, status_info, LicenseProgress};

/// Where the set of modules to license comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModuleSet {
    /// Every module listed in `go.sum`.
    #[default]
    Lockfile,
    /// The closure resolved from `go.mod` through the module cache.
    Manifest,
}

/// Options for `licrawl licenses`.
#[derive(Debug, Clone)]
pub struct LicensesOptions {
    pub from: ModuleSet,
    /// Root of the Go module cache.
    pub module_cache: PathBuf,
    /// Scratch directory for clones of uncached modules.
    pub repos_dir: PathBuf,
    /// Upper bound on modules processed at once.
    pub jobs: usize,
    /// Time budget for acquiring one module, fallback included.
    pub timeout: Duration,
    /// Consult `go-import` meta tags when cloning the derived URL fails.
    pub meta_fallback: bool,
    /// Base URL to fetch `go-get=1` pages from instead of each module's host.
    pub meta_mirror: Option<String>,
    /// Extra module-path rewrites layered over the built-in table.
    pub rewrites: BTreeMap<String, String>,
}

/// One output row of the license report.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseRow {
    /// Served from the module cache rather than a clone.
    pub cached: bool,
    pub path: String,
    pub version: String,
    pub confidence: f32,
    /// The chosen license identifier, or the error text when `failed`.
    pub license: String,
    pub failed: bool,
}

impl LicenseRow {
    pub fn marker(&self) -> &'static str {
        if self.cached {
            "[ ]"
        } else {
            "[-]"
        }
    }
}

impl fmt::Display for LicenseRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{:.6}\t{}",
            self.marker(),
            self.path,
            self.version,
            self.confidence,
            self.license
        )
    }
}

/// A module version ready for dispatch.
struct Job {
    key: ModuleKey,
    escaped: String,
    cached_dir: Option<PathBuf>,
}

/// Read-only state shared by every worker.
struct Pipeline {
    detector: Arc<LicenseDetector>,
    locator: SourceLocator,
    client: Client,
    repos_dir: PathBuf,
    timeout: Duration,
    meta_fallback: bool,
    meta_mirror: Option<String>,
}

/// The file tree a module's license is read from.
enum SourceTree {
    Directory(PathBuf),
    Git(PathBuf),
}

/// Load the module set, license it, and print one row per module.
pub async fn licenses(project_root: &Path, opts: &LicensesOptions) -> miette::Result<()> {
    let registry = load_module_set(project_root, opts)?;
    status_info(
        "Found",
        &format!(
            "{} module versions across {} domains",
            registry.len(),
            registry.domains().len()
        ),
    );
    let progress = Arc::new(LicenseProgress::new(registry.len()));
    let rows = license_registry(&registry, opts, progress.clone()).await;
    let tally = progress.finish();

    for row in &rows? {
        println!("{row}");
    }
    tally.report();
    Ok(())
}

/// The registry of modules to license for the chosen [`ModuleSet`].
pub fn load_module_set(project_root: &Path, opts: &LicensesOptions) -> miette::Result<Registry> {
    match opts.from {
        ModuleSet::Lockfile => {
            let lockfile = crate::load_lockfile(project_root)?;
            resolver::registry_from_lockfile(&lockfile)
        }
        ModuleSet::Manifest => {
            let manifest = crate::load_root_manifest(project_root)?;
            let cache = ModuleCache::new(opts.module_cache.clone());
            let sp = spinner("Resolving dependency closure...");
            let closure = resolver::resolve_closure(&manifest, &cache);
            sp.finish_and_clear();
            Ok(closure?.registry)
        }
    }
}

/// License every entry of a frozen registry, sorted by path then version.
///
/// Only unescapable module paths fail the whole call; they are checked
/// before any work is dispatched.
pub async fn resolve_licenses(
    registry: &Registry,
    opts: &LicensesOptions,
) -> miette::Result<Vec<LicenseRow>> {
    let progress = Arc::new(LicenseProgress::new(registry.len()));
    let rows = license_registry(registry, opts, progress.clone()).await;
    progress.finish();
    rows
}

async fn license_registry(
    registry: &Registry,
    opts: &LicensesOptions,
    progress: Arc<LicenseProgress>,
) -> miette::Result<Vec<LicenseRow>> {
    let cache = ModuleCache::new(opts.module_cache.clone());
    let mut jobs = Vec::with_capacity(registry.len());
    for key in registry.keys() {
        jobs.push(Job {
            escaped: escape_path(&key.path)?,
            cached_dir: cache.get_module(&key.path, &key.version)?,
            key: key.clone(),
        });
    }

    let pipeline = Arc::new(Pipeline {
        detector: Arc::new(LicenseDetector::new()?),
        locator: SourceLocator::new(&opts.rewrites),
        client: download::build_client()?,
        repos_dir: opts.repos_dir.clone(),
        timeout: opts.timeout,
        meta_fallback: opts.meta_fallback,
        meta_mirror: opts.meta_mirror.clone(),
    });

    let semaphore = Arc::new(Semaphore::new(opts.jobs.max(1)));
    let mut join_set = JoinSet::new();

    for job in jobs {
        let pipeline = pipeline.clone();
        let sem = semaphore.clone();
        let progress = progress.clone();

        join_set.spawn(async move {
            let _permit = sem.acquire_owned().await;
            let row = pipeline.license_row(job).await;
            progress.record(&format!("{}@{}", row.path, row.version), row.cached, row.failed);
            row
        });
    }

    let mut rows = Vec::new();
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                return Err(LicrawlError::Generic {
                    message: format!("Background task failed: {e}"),
                }
                .into())
            }
        }
    }
    rows.sort_by(|a, b| (&a.path, &a.version).cmp(&(&b.path, &b.version)));
    Ok(rows)
}

impl Pipeline {
    async fn license_row(&self, job: Job) -> LicenseRow {
        let cached = job.cached_dir.is_some();
        let tree = match job.cached_dir {
            Some(dir) => Ok(SourceTree::Directory(dir)),
            None => self
                .acquire(&job.key.path, &job.key.version, &job.escaped)
                .await
                .map(SourceTree::Git),
        };
        let outcome = match tree {
            Ok(tree) => self.detect(tree).await,
            Err(text) => Err(text),
        };

        let (confidence, license, failed) = match outcome {
            Ok(matches) => match pick_best(&matches) {
                Some((id, confidence)) => (confidence, id.to_string(), false),
                None => (0.0, String::new(), true),
            },
            Err(text) => {
                tracing::warn!("{} {}: {text}", job.key.path, job.key.version);
                (0.0, text, true)
            }
        };

        LicenseRow {
            cached,
            path: job.key.path,
            version: job.key.version,
            confidence,
            license,
            failed,
        }
    }

    /// Clone (or reopen) the module's repository, returning the clone directory.
    ///
    /// The whole acquisition, meta-tag fallback included, shares one timeout.
    async fn acquire(&self, path: &str, version: &str, escaped: &str) -> Result<PathBuf, String> {
        let source = self.locator.source_url(path);
        let dir = self.repos_dir.join(format!("{escaped}@{version}"));
        let existed = dir.exists();

        match tokio::time::timeout(self.timeout, self.acquire_from(path, &source, &dir)).await {
            Ok(result) => result,
            Err(_) => {
                if !existed {
                    remove_partial(&dir);
                }
                Err(format!(
                    "Error with cloning from git url {}: timed out after {}s",
                    source.url,
                    self.timeout.as_secs()
                ))
            }
        }
    }

    async fn acquire_from(
        &self,
        path: &str,
        source: &SourceUrl,
        dir: &Path,
    ) -> Result<PathBuf, String> {
        let err = match self.clone_into(&source.url, dir).await {
            Ok(dir) => return Ok(dir),
            Err(err) => err,
        };
        let reported = format!("Error with cloning from git url {}: {err}", source.url);

        if self.meta_fallback && !source.rewritten {
            if let Some(root) = self.discover(path, &source.url).await {
                tracing::debug!("{path}: retrying with go-import root {root}");
                match self.clone_into(&root, dir).await {
                    Ok(dir) => return Ok(dir),
                    Err(e) => tracing::debug!("{path}: clone of {root} failed: {e}"),
                }
            }
        }
        Err(reported)
    }

    /// Clone-or-open, clearing a partial clone left by a failed attempt.
    async fn clone_into(&self, url: &str, dir: &Path) -> Result<PathBuf, String> {
        let existed = dir.exists();
        match git::clone_or_open(url, dir, self.timeout).await {
            Ok(checkout) => {
                if checkout.fresh {
                    tracing::debug!("cloned {url} into {}", checkout.dir.display());
                } else {
                    tracing::debug!("reusing clone at {}", checkout.dir.display());
                }
                Ok(checkout.dir)
            }
            Err(e) => {
                if !existed {
                    remove_partial(dir);
                }
                Err(e.to_string())
            }
        }
    }

    /// The git repository root advertised by the module's `go-import` tag,
    /// when it differs from the URL already tried.
    async fn discover(&self, path: &str, tried: &str) -> Option<String> {
        match meta::discover_git_root(&self.client, path, self.meta_mirror.as_deref()).await {
            Ok(Some(root)) if same_repo(&root, tried) => None,
            Ok(root) => root,
            Err(e) => {
                tracing::debug!("{path}: go-import lookup failed: {e}");
                None
            }
        }
    }

    /// Detection reads files and runs git synchronously, so it runs on the
    /// blocking pool.
    async fn detect(&self, tree: SourceTree) -> Result<BTreeMap<String, f32>, String> {
        let detector = self.detector.clone();
        let result = tokio::task::spawn_blocking(move || match tree {
            SourceTree::Directory(dir) => detector.detect(&DirectoryFiler::new(dir)),
            SourceTree::Git(dir) => detector.detect(&GitFiler::new(dir)),
        })
        .await;
        match result {
            Ok(matches) => matches.map_err(|e| e.to_string()),
            Err(e) => Err(format!("License detection task failed: {e}")),
        }
    }
}

fn remove_partial(dir: &Path) {
    if dir.exists() {
        if let Err(e) = std::fs::remove_dir_all(dir) {
            tracing::warn!("could not remove partial clone {}: {e}", dir.display());
        }
    }
}

fn same_repo(a: &str, b: &str) -> bool {
    let trim = |url: &str| url.trim_end_matches('/').trim_end_matches(".git").to_string();
    trim(a) == trim(b)
}
