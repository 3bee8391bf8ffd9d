//! Command dispatch and handler modules.

mod deps;
mod licenses;
mod meta;

use std::path::{Path, PathBuf};

use licrawl_core::lockfile::LOCK_FILE;
use licrawl_core::manifest::MANIFEST_FILE;
use licrawl_util::errors::LicrawlError;
use licrawl_util::fs::{find_ancestor_with, resolve_against};
use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Licenses {
            from,
            jobs,
            timeout,
            modcache,
            repos_dir,
            no_meta,
        } => {
            let project = project_root(cli.project.as_deref())?;
            licenses::exec(&project, from, jobs, timeout, modcache, repos_dir, no_meta).await
        }
        Command::Deps { modcache } => {
            let project = project_root(cli.project.as_deref())?;
            deps::exec(&project, modcache)
        }
        Command::Meta { url } => meta::exec(&url).await,
    }
}

/// The directory holding the project's `go.mod` (or `go.sum`).
///
/// Searches upward from `--project` or the working directory and falls back
/// to the start directory, leaving missing-file errors to the operation.
fn project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(LicrawlError::Io)?;
    let start = match explicit {
        Some(dir) => resolve_against(&cwd, dir),
        None => cwd,
    };
    Ok(find_ancestor_with(&start, MANIFEST_FILE)
        .or_else(|| find_ancestor_with(&start, LOCK_FILE))
        .unwrap_or(start))
}
