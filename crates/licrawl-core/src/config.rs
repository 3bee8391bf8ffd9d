use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use licrawl_util::errors::LicrawlError;
use licrawl_util::fs::{expand_home, home_dir};

/// Global user configuration loaded from `~/.licrawl/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub clone: CloneConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    /// Extra module-path prefix rewrites, merged over the built-in table.
    #[serde(default)]
    pub rewrites: BTreeMap<String, String>,
}

/// Module cache settings from `[cache]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default, rename = "module-dir")]
    pub module_dir: Option<String>,
}

/// Scratch clone settings from `[clone]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloneConfig {
    #[serde(default = "default_clone_dir")]
    pub dir: String,
    #[serde(default = "default_timeout_secs", rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            dir: default_clone_dir(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_clone_dir() -> String {
    "repos".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

/// License pipeline settings from `[resolve]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    #[serde(default = "default_meta_fallback", rename = "meta-fallback")]
    pub meta_fallback: bool,
    /// Base URL serving `go-get=1` pages in place of each module's own host.
    #[serde(default, rename = "meta-mirror")]
    pub meta_mirror: Option<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            meta_fallback: default_meta_fallback(),
            meta_mirror: None,
        }
    }
}

fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_meta_fallback() -> bool {
    true
}

impl GlobalConfig {
    /// Load the global configuration from `~/.licrawl/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path, defaulting when it doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| LicrawlError::Config {
            message: format!("Failed to read global config: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| {
            LicrawlError::Config {
                message: format!("Failed to parse global config: {e}"),
            }
            .into()
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// The Go module cache root.
    ///
    /// Resolution order: `[cache] module-dir`, `$GOMODCACHE`, the first
    /// `$GOPATH` entry joined with `pkg/mod`, then `~/go/pkg/mod`.
    pub fn module_cache_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.cache.module_dir {
            return expand_home(dir);
        }
        if let Some(dir) = std::env::var_os("GOMODCACHE").filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(gopath) = std::env::var_os("GOPATH") {
            if let Some(first) = std::env::split_paths(&gopath).find(|p| !p.as_os_str().is_empty()) {
                return first.join("pkg").join("mod");
            }
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("go")
            .join("pkg")
            .join("mod")
    }
}

/// Returns the path to the licrawl data directory (`~/.licrawl/`).
pub fn dirs_path() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".licrawl")
}
