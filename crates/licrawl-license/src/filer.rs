//! Read-only access to the root level of a source tree.

use std::path::PathBuf;

use licrawl_util::errors::LicrawlError;
use licrawl_util::process::CommandBuilder;

/// A file tree that license detection can list and read.
pub trait Filer {
    /// Human readable location, used in error messages.
    fn describe(&self) -> String;

    /// Names of the regular files at the root of the tree, sorted.
    fn root_files(&self) -> Result<Vec<String>, LicrawlError>;

    /// Contents of a root-level file.
    fn read_file(&self, name: &str) -> Result<Vec<u8>, LicrawlError>;
}

/// A plain directory on disk, such as a module-cache entry.
#[derive(Debug, Clone)]
pub struct DirectoryFiler {
    root: PathBuf,
}

impl DirectoryFiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Filer for DirectoryFiler {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    fn root_files(&self) -> Result<Vec<String>, LicrawlError> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| LicrawlError::License {
            message: format!("Cannot list {}: {e}", self.root.display()),
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, LicrawlError> {
        let path = self.root.join(name);
        std::fs::read(&path).map_err(|e| LicrawlError::License {
            message: format!("Cannot read {}: {e}", path.display()),
        })
    }
}

/// The committed `HEAD` tree of a local git clone.
///
/// Reads go through the object database, so the working tree state does
/// not matter.
#[derive(Debug, Clone)]
pub struct GitFiler {
    repo: PathBuf,
}

impl GitFiler {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self { repo: repo.into() }
    }

    fn git(&self, args: &[&str]) -> Result<Vec<u8>, LicrawlError> {
        let output = CommandBuilder::new("git")
            .arg("--git-dir")
            .arg(self.repo.join(".git").to_string_lossy())
            .args(args.iter().copied())
            .exec()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LicrawlError::License {
                message: format!(
                    "`git {}` failed in {}: {}",
                    args.join(" "),
                    self.repo.display(),
                    stderr.trim()
                ),
            });
        }
        Ok(output.stdout)
    }
}

impl Filer for GitFiler {
    fn describe(&self) -> String {
        format!("{} (HEAD)", self.repo.display())
    }

    fn root_files(&self) -> Result<Vec<String>, LicrawlError> {
        let listing = self.git(&["ls-tree", "-z", "HEAD"])?;
        let mut names: Vec<String> = listing
            .split(|b| *b == 0)
            .filter_map(|record| {
                let record = std::str::from_utf8(record).ok()?;
                let (meta, name) = record.split_once('\t')?;
                (meta.split_whitespace().nth(1) == Some("blob")).then(|| name.to_string())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, LicrawlError> {
        self.git(&["cat-file", "blob", &format!("HEAD:{name}")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_filer_lists_only_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join("LICENSE"), "x").unwrap();
        std::fs::write(tmp.path().join("go.mod"), "module a").unwrap();
        std::fs::create_dir(tmp.path().join("LICENSES")).unwrap();

        let filer = DirectoryFiler::new(tmp.path());
        assert_eq!(filer.root_files().unwrap(), vec!["LICENSE", "go.mod"]);
        assert_eq!(filer.read_file("LICENSE").unwrap(), b"x");
    }

    #[test]
    fn directory_filer_missing_root_is_license_error() {
        let filer = DirectoryFiler::new("/nonexistent/licrawl/tree");
        let err = filer.root_files().unwrap_err();
        assert!(matches!(err, LicrawlError::License { .. }));
    }
}
