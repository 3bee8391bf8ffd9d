use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all licrawl operations.
#[derive(Debug, Error, Diagnostic)]
pub enum LicrawlError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `go.mod` file exists but could not be parsed.
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check the go.mod file for syntax errors"))]
    Manifest { message: String },

    /// A `go.sum` file could not be read or has an unexpected shape.
    #[error("Lock file error: {message}")]
    #[diagnostic(help("Regenerate go.sum with `go mod tidy`"))]
    Lockfile { message: String },

    /// A module path cannot be escaped into a cache directory name.
    #[error("Issues with escape path of {path}: {reason}")]
    InvalidModulePath { path: String, reason: String },

    /// A replace directive pins the old version, which resolution does not handle.
    #[error("Unsupported replace directive: {old_path} {old_version} => {new_path} {new_version}")]
    #[diagnostic(help(
        "Only replace directives without an old version (`old => new vX`) are supported"
    ))]
    UnsupportedReplacement {
        old_path: String,
        old_version: String,
        new_path: String,
        new_version: String,
    },

    /// Dependency closure traversal hit an inconsistent state.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Network request failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// Cloning or opening a source repository failed.
    #[error("Source error: {message}")]
    Source { message: String },

    /// License detection could not inspect a file tree.
    #[error("License detection error: {message}")]
    License { message: String },

    /// An operation exceeded its time budget.
    #[error("Timed out: {message}")]
    Timeout { message: String },

    /// Global configuration could not be read or parsed.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check ~/.licrawl/config.toml"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type LicrawlResult<T> = miette::Result<T>;
