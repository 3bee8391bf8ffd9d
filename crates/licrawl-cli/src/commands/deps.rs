//! Handler for `licrawl deps`.

use std::path::{Path, PathBuf};

use miette::Result;

use licrawl_core::config::GlobalConfig;
use licrawl_ops::ops_deps::{self, DepsOptions};

pub fn exec(project: &Path, modcache: Option<PathBuf>) -> Result<()> {
    let module_cache = match modcache {
        Some(dir) => dir,
        None => GlobalConfig::load()?.module_cache_dir(),
    };
    ops_deps::deps(project, &DepsOptions { module_cache })
}
