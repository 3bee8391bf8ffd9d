//! `go.sum` parsing: the flattened list of every module version in use.

use std::path::Path;

use licrawl_util::errors::LicrawlError;

/// File name of the lock file next to the project manifest.
pub const LOCK_FILE: &str = "go.sum";

/// Trailing version segment marking a manifest-only checksum line.
const MANIFEST_ONLY_MARKER: &str = "go.mod";

/// A parsed `go.sum` file.
#[derive(Debug, Clone, Default)]
pub struct Lockfile {
    pub entries: Vec<LockedModule>,
}

/// One checksum line: module name and the raw version string as written.
/// The hash itself is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedModule {
    pub name: String,
    /// May carry a `/go.mod` suffix.
    pub version: String,
}

impl LockedModule {
    /// The version with the `/go.mod` marker stripped.
    ///
    /// Any other trailing segment is a shape this crawler does not understand.
    pub fn effective_version(&self) -> Result<&str, LicrawlError> {
        let mut segments = self.version.split('/');
        let version = segments.next().unwrap_or_default();
        match (segments.next(), segments.next()) {
            (None, _) => Ok(version),
            (Some(MANIFEST_ONLY_MARKER), None) => Ok(version),
            _ => Err(LicrawlError::Lockfile {
                message: format!("Unknown version format for {}@{}", self.name, self.version),
            }),
        }
    }
}

impl Lockfile {
    /// Parse `go.sum` content. `source` names the file in error messages.
    pub fn parse(content: &str, source: &str) -> miette::Result<Self> {
        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            match fields.as_slice() {
                [] => continue,
                [name, version, _hash] => entries.push(LockedModule {
                    name: name.to_string(),
                    version: version.to_string(),
                }),
                _ => {
                    return Err(LicrawlError::Lockfile {
                        message: format!(
                            "{source}:{}: expected `<module> <version> <hash>`, found {line:?}",
                            idx + 1
                        ),
                    }
                    .into())
                }
            }
        }
        Ok(Self { entries })
    }

    /// Load and parse a `go.sum` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LicrawlError::Lockfile {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Every `(name, version)` pair in file order, markers stripped.
    ///
    /// Modules listed both with and without the marker appear twice.
    pub fn modules(&self) -> miette::Result<Vec<(String, String)>> {
        self.entries
            .iter()
            .map(|e| Ok((e.name.clone(), e.effective_version()?.to_string())))
            .collect()
    }
}
