//! Clone-or-open of module repositories through the `git` executable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use licrawl_util::errors::LicrawlError;
use licrawl_util::fs::ensure_dir;
use licrawl_util::process::CommandBuilder;

/// A local clone ready for inspection.
#[derive(Debug, Clone)]
pub struct Checkout {
    pub dir: PathBuf,
    /// Cloned by this call rather than reopened.
    pub fresh: bool,
}

/// Shallow-clone `url` into `dir`, or reopen the clone already there.
///
/// Re-running against the same scratch directory is idempotent. The clone
/// is killed if it runs longer than `timeout`.
pub async fn clone_or_open(
    url: &str,
    dir: &Path,
    timeout: Duration,
) -> Result<Checkout, LicrawlError> {
    if dir.join(".git").exists() {
        open(dir)?;
        return Ok(Checkout {
            dir: dir.to_path_buf(),
            fresh: false,
        });
    }

    if let Some(parent) = dir.parent() {
        ensure_dir(parent)?;
    }
    tracing::debug!("cloning {url} into {}", dir.display());
    let output = CommandBuilder::new("git")
        .args(["clone", "--depth", "1", "--quiet", "--", url])
        .arg(dir.to_string_lossy())
        .env("GIT_TERMINAL_PROMPT", "0")
        .exec_with_timeout(timeout)
        .await?;

    if !output.status.success() {
        return Err(LicrawlError::Source {
            message: failure_reason(&output.stderr, "git clone", output.status.code()),
        });
    }
    Ok(Checkout {
        dir: dir.to_path_buf(),
        fresh: true,
    })
}

/// Verify an existing clone has a readable `HEAD` commit.
///
/// The repository is addressed explicitly so an enclosing repository is
/// never picked up instead.
pub fn open(dir: &Path) -> Result<(), LicrawlError> {
    let output = CommandBuilder::new("git")
        .arg("--git-dir")
        .arg(dir.join(".git").to_string_lossy())
        .args(["rev-parse", "--verify", "--quiet", "HEAD"])
        .exec()?;
    if output.status.success() {
        Ok(())
    } else {
        Err(LicrawlError::Source {
            message: failure_reason(&output.stderr, "git rev-parse", output.status.code()),
        })
    }
}

/// The last non-empty stderr line, or a generic exit-status message.
fn failure_reason(stderr: &[u8], what: &str, code: Option<i32>) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| match code {
            Some(code) => format!("{what} exited with status {code}"),
            None => format!("{what} was terminated"),
        })
}
