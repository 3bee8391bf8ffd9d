//! Module identities and the module-cache path escaping convention.

use std::fmt;

use licrawl_util::errors::LicrawlError;

/// A module identity pinned to its effective version.
///
/// Ordering is lexicographic on `(path, version)`, which is the order every
/// report and output row is printed in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleKey {
    pub path: String,
    pub version: String,
}

impl ModuleKey {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }

    /// The first path segment, usually the hosting domain.
    pub fn domain(&self) -> &str {
        domain_of(&self.path)
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.path, self.version)
    }
}

/// The top-level segment of a module path (`golang.org` for `golang.org/x/mod`).
pub fn domain_of(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

/// Escape a module path into the form used for module-cache directory names.
///
/// The path is validated first; every upper-case ASCII letter is then written
/// as `!` followed by its lower-case form, so `github.com/BurntSushi/toml`
/// becomes `github.com/!burnt!sushi/toml`.
pub fn escape_path(path: &str) -> Result<String, LicrawlError> {
    check_module_path(path).map_err(|reason| LicrawlError::InvalidModulePath {
        path: path.to_string(),
        reason,
    })?;

    let mut escaped = String::with_capacity(path.len() + 4);
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    Ok(escaped)
}

/// Validate a module path, returning the reason it is rejected.
pub fn check_module_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("empty string".to_string());
    }
    if path.starts_with('-') {
        return Err("leading dash".to_string());
    }
    if path.starts_with('/') {
        return Err("leading slash".to_string());
    }
    if path.contains("//") {
        return Err("double slash".to_string());
    }
    if path.ends_with('/') {
        return Err("trailing slash".to_string());
    }
    for elem in path.split('/') {
        check_element(elem)?;
    }

    let first = domain_of(path);
    if !first.contains('.') {
        return Err("missing dot in first path element".to_string());
    }
    if let Some(c) = first
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
    {
        return Err(format!("invalid char {c:?} in first path element"));
    }
    Ok(())
}

fn check_element(elem: &str) -> Result<(), String> {
    if elem.is_empty() {
        return Err("empty path element".to_string());
    }
    if elem == "." || elem == ".." {
        return Err(format!("invalid path element {elem:?}"));
    }
    if elem.starts_with('.') {
        return Err("leading dot in path element".to_string());
    }
    if elem.ends_with('.') {
        return Err("trailing dot in path element".to_string());
    }
    if let Some(c) = elem.chars().find(|c| !is_module_path_char(*c)) {
        return Err(format!("invalid char {c:?}"));
    }
    Ok(())
}

fn is_module_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}
