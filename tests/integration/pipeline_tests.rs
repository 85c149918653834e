//! Integration tests for the documentation resource check
//!
//! These tests build small documentation trees in temporary directories and
//! run the complete pipeline against them.

use docresourcechecker::analysis::SkippedDocument;
use docresourcechecker::{CheckReport, Config, KeyPolicy, ResourceChecker};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A docs site with guides, a shared image folder and an unused screenshot
fn docs_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "docs/intro.md", br#"# Intro

![Logo](img/logo.png)
<img alt="arch" src="./img/architecture.SVG" width="600">
"#);
    write(root, "docs/guides/setup.mdx", br#"import Image from '@theme/Image';

![Step one](../img/guides/step1.png "First step")
<Image src='/img/guides/step2.jpg' alt='Second step' />
![Remote](https://example.com/remote.png)
![Missing](../img/guides/step3.png)
"#);
    write(root, "docs/img/logo.png", b"");
    write(root, "docs/img/architecture.SVG", b"");
    write(root, "docs/img/guides/step1.png", b"");
    write(root, "docs/img/guides/step2.jpg", b"");
    write(root, "docs/img/guides/old-screenshot.gif", b"");
    write(root, "docs/img/notes.txt", b"");
    dir
}

fn run(root: &Path, config: Config) -> CheckReport {
    ResourceChecker::with_base_dir(&config, root).run().unwrap()
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn out_config() -> Config {
    Config {
        output_dir: PathBuf::from("out"),
        ..Config::default()
    }
}

#[test]
fn test_docs_site_results() {
    let dir = docs_site();
    let report = run(dir.path(), out_config());
    let out = dir.path().join("out");

    assert_eq!(
        lines(&out.join("used_resources.txt")),
        vec!["architecture.SVG", "guides/step1.png", "guides/step2.jpg", "guides/step3.png", "logo.png"]
    );
    assert_eq!(
        lines(&out.join("all_images.txt")),
        vec!["architecture.SVG", "guides/old-screenshot.gif", "guides/step1.png", "guides/step2.jpg", "logo.png"]
    );
    assert_eq!(lines(&out.join("unused_images.txt")), vec!["guides/old-screenshot.gif"]);

    assert_eq!(report.documents_scanned, 2);
    assert!(report.skipped.is_empty());
    assert!(report.reconciliation.missing.contains("guides/step3.png"));
}

#[test]
fn test_set_laws_hold_on_written_lists() {
    let dir = docs_site();
    run(dir.path(), out_config());
    let out = dir.path().join("out");

    let used: BTreeSet<String> = lines(&out.join("used_resources.txt")).into_iter().collect();
    let all: BTreeSet<String> = lines(&out.join("all_images.txt")).into_iter().collect();
    let unused: BTreeSet<String> = lines(&out.join("unused_images.txt")).into_iter().collect();

    let expected: BTreeSet<String> = all.difference(&used).cloned().collect();
    assert_eq!(unused, expected);
    assert!(unused.iter().all(|k| all.contains(k) && !used.contains(k)));
}

#[test]
fn test_idempotent_output() {
    let dir = docs_site();
    run(dir.path(), out_config());
    let out = dir.path().join("out");
    let first: Vec<Vec<u8>> = ["used_resources.txt", "all_images.txt", "unused_images.txt"]
        .iter()
        .map(|f| fs::read(out.join(f)).unwrap())
        .collect();

    run(dir.path(), out_config());
    let second: Vec<Vec<u8>> = ["used_resources.txt", "all_images.txt", "unused_images.txt"]
        .iter()
        .map(|f| fs::read(out.join(f)).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_unreadable_document_does_not_abort() {
    let dir = docs_site();
    write(dir.path(), "docs/broken.md", &[0xc3, 0x28, 0xff, 0xfe]);

    let report = run(dir.path(), out_config());

    assert_eq!(
        report.skipped.iter().map(|s| s.path.clone()).collect::<Vec<_>>(),
        vec![dir.path().join("docs/broken.md")]
    );
    assert!(matches!(report.skipped.first(), Some(SkippedDocument { reason, .. }) if !reason.is_empty()));
    assert!(report.reconciliation.referenced.contains("logo.png"));
    assert!(dir.path().join("out/unused_images.txt").exists());
}

#[test]
fn test_empty_image_root() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "docs/a.md", b"![a](img/a.png) ![b](img/b.png)");
    fs::create_dir_all(dir.path().join("docs/img")).unwrap();

    run(dir.path(), out_config());
    let out = dir.path().join("out");

    assert_eq!(fs::read_to_string(out.join("all_images.txt")).unwrap(), "");
    assert_eq!(fs::read_to_string(out.join("unused_images.txt")).unwrap(), "");
    assert_eq!(lines(&out.join("used_resources.txt")), vec!["a.png", "b.png"]);
}

#[test]
fn test_folder_and_file_policy_end_to_end() {
    let dir = docs_site();
    let config = Config {
        key_policy: KeyPolicy::FolderAndFile,
        ..out_config()
    };
    let report = run(dir.path(), config);

    assert_eq!(
        report.reconciliation.unused.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
        vec!["guides/old-screenshot.gif"]
    );
    assert!(report.reconciliation.present.contains("img/logo.png"));
}

#[test]
fn test_site_root_for_absolute_references() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "website/docs/page.md", b"![a](/img/a.png)");
    write(dir.path(), "website/static/img/a.png", b"");
    write(dir.path(), "website/static/img/b.png", b"");

    let config = Config {
        docs_root: PathBuf::from("website/docs"),
        images_root: PathBuf::from("website/static/img"),
        site_root: Some(PathBuf::from("website/static")),
        ..out_config()
    };
    let report = run(dir.path(), config);

    assert_eq!(
        report.reconciliation.unused.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
        vec!["b.png"]
    );
}

#[test]
fn test_missing_docs_root_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        docs_root: PathBuf::from("nowhere"),
        ..out_config()
    };

    let result = ResourceChecker::with_base_dir(&config, dir.path()).run();
    assert!(result.is_err());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_tricky_file_names_match() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "docs/page.md", br#"![a](img/my pic.png "Shot")
<img src="img/C#logo.png">
"#);
    write(root, "docs/img/my pic.png", b"");
    write(root, "docs/img/C#logo.png", b"");

    let report = run(root, out_config());
    assert_eq!(report.reconciliation.referenced, report.reconciliation.present);
    assert!(report.reconciliation.unused.is_empty());
    assert_eq!(lines(&root.join("out/used_resources.txt")), vec!["C#logo.png", "my pic.png"]);
}

#[cfg(unix)]
#[test]
fn test_symlinked_files_are_scanned() {
    use std::os::unix::fs::symlink;

    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(root, "shared/logo.png", b"");
    write(root, "shared/page.md", b"![Logo](img/logo.png)\n");
    fs::create_dir_all(root.join("docs/img")).unwrap();
    symlink(root.join("shared/logo.png"), root.join("docs/img/logo.png")).unwrap();
    symlink(root.join("shared/page.md"), root.join("docs/page.md")).unwrap();

    let report = run(root, out_config());
    assert_eq!(report.documents_scanned, 1);
    assert_eq!(lines(&root.join("out/all_images.txt")), vec!["logo.png"]);
    assert_eq!(lines(&root.join("out/used_resources.txt")), vec!["logo.png"]);
    assert!(report.reconciliation.unused.is_empty());
}
