//! Effective-version resolution through `replace` directives.

use licrawl_core::manifest::Replacement;
use licrawl_util::errors::LicrawlError;

/// Compute the version of `path` actually used, given the declaring
/// manifest's replace directives.
///
/// The last directive whose old path matches wins. A matching directive that
/// pins an old version is rejected rather than guessed at. A directive
/// pointing at a local directory carries no version and yields an empty one.
pub fn resolve(
    path: &str,
    declared_version: &str,
    replaces: &[Replacement],
) -> Result<String, LicrawlError> {
    let mut effective = declared_version;
    for replacement in replaces.iter().filter(|r| r.old_path == path) {
        if replacement.is_version_specific() {
            return Err(replacement.unsupported());
        }
        effective = replacement.new_version.as_deref().unwrap_or_default();
    }
    Ok(effective.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replace(old: &str, old_version: Option<&str>, new_version: Option<&str>) -> Replacement {
        Replacement {
            old_path: old.to_string(),
            old_version: old_version.map(String::from),
            new_path: format!("{old}-fork"),
            new_version: new_version.map(String::from),
        }
    }

    #[test]
    fn no_matching_replacement_keeps_declared() {
        let replaces = vec![replace("example.com/other", None, Some("v9.0.0"))];
        assert_eq!(resolve("example.com/a", "v1.0.0", &replaces).unwrap(), "v1.0.0");
        assert_eq!(resolve("example.com/a", "v1.0.0", &[]).unwrap(), "v1.0.0");
    }

    #[test]
    fn matching_replacement_uses_new_version() {
        let replaces = vec![replace("example.com/a", None, Some("v1.2.0"))];
        assert_eq!(resolve("example.com/a", "v1.0.0", &replaces).unwrap(), "v1.2.0");
    }

    #[test]
    fn last_matching_replacement_wins() {
        let replaces = vec![
            replace("example.com/a", None, Some("v1.2.0")),
            replace("example.com/a", None, Some("v1.3.0")),
        ];
        assert_eq!(resolve("example.com/a", "v1.0.0", &replaces).unwrap(), "v1.3.0");
    }

    #[test]
    fn local_directory_replacement_yields_empty_version() {
        let replaces = vec![replace("example.com/a", None, None)];
        assert_eq!(resolve("example.com/a", "v1.0.0", &replaces).unwrap(), "");
    }

    #[test]
    fn version_specific_replacement_fails() {
        let replaces = vec![replace("example.com/a", Some("v1.0.0"), Some("v1.1.0"))];
        let err = resolve("example.com/a", "v1.0.0", &replaces).unwrap_err();
        assert!(matches!(err, LicrawlError::UnsupportedReplacement { .. }));
    }

    #[test]
    fn resolution_is_deterministic() {
        let replaces = vec![replace("example.com/a", None, Some("v1.2.0"))];
        let first = resolve("example.com/a", "v1.0.0", &replaces).unwrap();
        let second = resolve("example.com/a", "v1.0.0", &replaces).unwrap();
        assert_eq!(first, second);
    }
}
