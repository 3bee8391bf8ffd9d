use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn licrawl_cmd() -> Command {
    Command::cargo_bin("licrawl").unwrap()
}

#[test]
fn test_deps_without_go_mod_fails() {
    let tmp = TempDir::new().unwrap();

    licrawl_cmd()
        .env("HOME", tmp.path())
        .current_dir(tmp.path())
        .args(["deps", "--modcache"])
        .arg(tmp.path().join("modcache"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No go.mod found"));
}

#[test]
fn test_deps_prints_report() {
    let tmp = TempDir::new().unwrap();
    let project_dir = tmp.path().join("project");
    fs::create_dir_all(&project_dir).unwrap();
    fs::write(
        project_dir.join("go.mod"),
        "module example.com/root\n\nrequire (\n\texample.com/a v1.0.0\n\texample.com/b v1.1.0 // indirect\n)\n",
    )
    .unwrap();
    let modcache = tmp.path().join("modcache");
    let a = modcache.join("example.com/a@v1.0.0");
    fs::create_dir_all(&a).unwrap();
    fs::write(a.join("go.mod"), "module example.com/a\n\nrequire example.com/c v0.1.0\n").unwrap();

    licrawl_cmd()
        .env("HOME", tmp.path())
        .current_dir(&project_dir)
        .args(["deps", "--modcache"])
        .arg(&modcache)
        .assert()
        .success()
        .stdout(predicate::str::contains("example.com/a v1.0.0 1 true"))
        .stdout(predicate::str::contains("example.com/c v0.1.0 1 false"))
        .stdout(predicate::str::contains("#modules: 3"))
        .stdout(predicate::str::contains("#missing: 2"));
}

#[test]
fn test_deps_version_specific_replace_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("go.mod"),
        "module example.com/root\n\nrequire example.com/a v1.0.0\n\nreplace example.com/a v1.0.0 => example.com/fork v1.0.1\n",
    )
    .unwrap();

    licrawl_cmd()
        .env("HOME", tmp.path())
        .current_dir(tmp.path())
        .args(["deps", "--modcache"])
        .arg(tmp.path().join("modcache"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported replace directive"));
}

#[test]
fn test_help_lists_commands() {
    licrawl_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("licenses"))
        .stdout(predicate::str::contains("deps"))
        .stdout(predicate::str::contains("meta"));
}

#[test]
fn test_meta_unreachable_url_fails() {
    licrawl_cmd()
        .args(["meta", "http://127.0.0.1:9/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error"));
}
