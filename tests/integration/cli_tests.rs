//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("docresourcechecker").unwrap()
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("docs/img/old")).unwrap();
    fs::write(
        root.join("docs/index.md"),
        "![b](img/b.png)\n<img src=\"img/a.png\">\n",
    )
    .unwrap();
    fs::write(root.join("docs/img/a.png"), "").unwrap();
    fs::write(root.join("docs/img/b.png"), "").unwrap();
    fs::write(root.join("docs/img/old/unused.jpeg"), "").unwrap();
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("docresourcechecker"))
        .stdout(predicate::str::contains("--policy"))
        .stdout(predicate::str::contains("--parallel"));
}

#[test]
fn test_cli_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("docresourcechecker"));
}

// ============================================================================
// Check Tests
// ============================================================================

#[test]
fn test_cli_writes_three_lists() {
    let dir = fixture();
    let out = dir.path().join("report");

    cli()
        .current_dir(dir.path())
        .args(["docs", "docs/img", "report"])
        .assert()
        .success()
        .stdout(predicate::str::contains("old/unused.jpeg"));

    assert_eq!(read(&out.join("used_resources.txt")), "a.png\nb.png\n");
    assert_eq!(read(&out.join("all_images.txt")), "a.png\nb.png\nold/unused.jpeg\n");
    assert_eq!(read(&out.join("unused_images.txt")), "old/unused.jpeg\n");
}

#[test]
fn test_cli_uses_defaults_and_config_file() {
    let dir = fixture();
    fs::write(
        dir.path().join(".docresources.toml"),
        "output_dir = \"from-config\"\n",
    )
    .unwrap();

    cli().current_dir(dir.path()).arg("-q").assert().success();

    assert_eq!(
        read(&dir.path().join("from-config/unused_images.txt")),
        "old/unused.jpeg\n"
    );
}

#[test]
fn test_cli_no_unused_images() {
    let dir = fixture();
    fs::remove_dir_all(dir.path().join("docs/img/old")).unwrap();

    cli()
        .current_dir(dir.path())
        .args(["docs", "docs/img", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No unused images found."));

    assert_eq!(read(&dir.path().join("out/unused_images.txt")), "");
}

#[test]
fn test_cli_json_format() {
    let dir = fixture();

    let output = cli()
        .current_dir(dir.path())
        .args(["docs", "docs/img", "out", "--format", "json", "-q"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["summary"]["unused"], 1);
    assert_eq!(value["unused"][0], "old/unused.jpeg");
}

#[test]
fn test_cli_fail_on_unused() {
    let dir = fixture();

    cli()
        .current_dir(dir.path())
        .args(["docs", "docs/img", "out", "--fail-on-unused"])
        .assert()
        .code(1);
}

#[test]
fn test_cli_missing_root_is_fatal() {
    let dir = fixture();

    cli()
        .current_dir(dir.path())
        .args(["nope", "docs/img", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));

    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_cli_folder_and_file_policy() {
    let dir = fixture();

    cli()
        .current_dir(dir.path())
        .args(["docs", "docs/img", "out", "--policy", "folder-and-file", "-q"])
        .assert()
        .success();

    assert_eq!(read(&dir.path().join("out/unused_images.txt")), "old/unused.jpeg\n");
    assert_eq!(read(&dir.path().join("out/all_images.txt")), "img/a.png\nimg/b.png\nold/unused.jpeg\n");
}
