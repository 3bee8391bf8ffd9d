//! Handler for `licrawl licenses`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use miette::Result;

use licrawl_core::config::GlobalConfig;
use licrawl_ops::ops_licenses::{self, LicensesOptions, ModuleSet};
use licrawl_util::fs::{expand_home, resolve_against};

use crate::cli::DepSource;

pub async fn exec(
    project: &Path,
    from: DepSource,
    jobs: Option<usize>,
    timeout: Option<u64>,
    modcache: Option<PathBuf>,
    repos_dir: Option<PathBuf>,
    no_meta: bool,
) -> Result<()> {
    let config = GlobalConfig::load()?;
    let repos_dir = repos_dir.unwrap_or_else(|| expand_home(&config.clone.dir));

    let opts = LicensesOptions {
        from: match from {
            DepSource::Sum => ModuleSet::Lockfile,
            DepSource::Mod => ModuleSet::Manifest,
        },
        module_cache: modcache.unwrap_or_else(|| config.module_cache_dir()),
        repos_dir: resolve_against(project, &repos_dir),
        jobs: jobs.unwrap_or(config.resolve.jobs),
        timeout: Duration::from_secs(timeout.unwrap_or(config.clone.timeout_secs)),
        meta_fallback: config.resolve.meta_fallback && !no_meta,
        meta_mirror: config.resolve.meta_mirror,
        rewrites: config.rewrites,
    };
    tracing::debug!("licenses options: {opts:?}");

    ops_licenses::licenses(project, &opts).await
}
