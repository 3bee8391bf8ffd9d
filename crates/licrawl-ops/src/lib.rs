pub mod ops_deps;
pub mod ops_licenses;
pub mod ops_meta;

use std::path::Path;

use licrawl_core::lockfile::{Lockfile, LOCK_FILE};
use licrawl_core::manifest::{Manifest, MANIFEST_FILE};
use licrawl_util::errors::{LicrawlError, LicrawlResult};

/// Load the project's `go.mod`, failing when it is absent.
pub fn load_root_manifest(project_root: &Path) -> LicrawlResult<Manifest> {
    let path = project_root.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(LicrawlError::Manifest {
            message: format!("No {MANIFEST_FILE} found in {}", project_root.display()),
        }
        .into());
    }
    Manifest::from_path(&path)
}

/// Load the project's `go.sum`, failing when it is absent.
pub fn load_lockfile(project_root: &Path) -> LicrawlResult<Lockfile> {
    let path = project_root.join(LOCK_FILE);
    if !path.is_file() {
        return Err(LicrawlError::Lockfile {
            message: format!("No {LOCK_FILE} found in {}", project_root.display()),
        }
        .into());
    }
    Lockfile::from_path(&path)
}
