use licrawl_core::lockfile::{LockedModule, Lockfile};
use tempfile::TempDir;

const GO_SUM: &str = "\
github.com/spf13/cobra v1.8.0 h1:7aJaZx1B85qltLMc546zn58BxxfZdR/W22ej9CFoEf0=
github.com/spf13/cobra v1.8.0/go.mod h1:WXLWApfZ71AjXPya3WOlMsY9yMs7YeiHhFVlvLyhcho=

golang.org/x/mod v0.14.0/go.mod h1:hTbmBsO62+eylJbnUtE2MGJUyE7QWk4xUqPFrRgJ+7c=
";

#[test]
fn test_parse_and_strip_markers() {
    let lock = Lockfile::parse(GO_SUM, "go.sum").unwrap();
    assert_eq!(lock.entries.len(), 3);
    assert_eq!(lock.entries[1].version, "v1.8.0/go.mod");

    let modules = lock.modules().unwrap();
    assert_eq!(
        modules,
        vec![
            ("github.com/spf13/cobra".to_string(), "v1.8.0".to_string()),
            ("github.com/spf13/cobra".to_string(), "v1.8.0".to_string()),
            ("golang.org/x/mod".to_string(), "v0.14.0".to_string()),
        ]
    );
}

#[test]
fn test_unknown_version_marker_is_fatal() {
    let entry = LockedModule {
        name: "example.com/a".to_string(),
        version: "v1.0.0/info".to_string(),
    };
    let err = entry.effective_version().unwrap_err();
    assert!(err.to_string().contains("Unknown version format for example.com/a@v1.0.0/info"));

    let lock = Lockfile::parse("example.com/a v1.0.0/info h1:x\n", "go.sum").unwrap();
    assert!(lock.modules().is_err());
}

#[test]
fn test_malformed_line_is_fatal() {
    let err = Lockfile::parse("example.com/a v1.0.0\n", "go.sum").unwrap_err();
    assert!(err.to_string().contains("go.sum:1"));
}

#[test]
fn test_from_path_missing_file() {
    let tmp = TempDir::new().unwrap();
    assert!(Lockfile::from_path(&tmp.path().join("go.sum")).is_err());
}
