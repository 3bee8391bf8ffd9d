use std::path::Path;
use std::process::Command;
use std::time::Duration;

use licrawl_source::git::clone_or_open;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(["-c", "user.name=test", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {args:?} failed");
}

#[tokio::test]
async fn test_clone_then_reopen() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    let upstream = tmp.path().join("upstream");
    std::fs::create_dir(&upstream).unwrap();
    std::fs::write(upstream.join("LICENSE"), "MIT").unwrap();
    git(&upstream, &["init", "--quiet"]);
    git(&upstream, &["add", "."]);
    git(&upstream, &["commit", "--quiet", "-m", "init"]);

    let url = format!("file://{}", upstream.display());
    let dir = tmp.path().join("repos").join("example.com/a@v1.0.0");

    let first = clone_or_open(&url, &dir, Duration::from_secs(60)).await.unwrap();
    assert!(first.fresh);
    assert!(dir.join("LICENSE").is_file());

    let second = clone_or_open(&url, &dir, Duration::from_secs(60)).await.unwrap();
    assert!(!second.fresh);
    assert_eq!(second.dir, dir);
}

#[tokio::test]
async fn test_clone_failure_is_source_error() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("no-such-repo");
    let url = format!("file://{}", missing.display());
    let err = clone_or_open(&url, &tmp.path().join("out"), Duration::from_secs(60))
        .await
        .unwrap_err();
    assert!(err.to_string().starts_with("Source error: "), "{err}");
}

#[test]
fn test_open_rejects_non_repository() {
    if !git_available() {
        return;
    }
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join(".git")).unwrap();
    assert!(licrawl_source::git::open(tmp.path()).is_err());
}
