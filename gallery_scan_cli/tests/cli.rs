//! End-to-end tests of the `gallery-scan` binary

use assert_cmd::Command;
use gallery_scan_test_utils::TempTree;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Binary isolated from the user's configuration and environment
fn gallery_scan(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gallery-scan").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn lines(tree: &TempTree, relative: &[&str]) -> String {
    relative
        .iter()
        .map(|path| format!("{}\n", tree.join(path).display()))
        .collect()
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    gallery_scan(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_scan_prints_one_path_per_line_depth_first() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .arg("scan")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(lines(
            &tree,
            &["a.txt", "other.png", "sub/b.jpg", "sub/sub2/c.png"],
        ));
}

#[test]
fn test_scan_json_document() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    let output = gallery_scan(&home)
        .args(["scan", "--format", "json", "--concurrency", "4"])
        .arg(tree.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "completed");
    assert_eq!(json["files"].as_array().unwrap().len(), 4);
    assert_eq!(json["directories_listed"], 3);
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[test]
fn test_scan_grid_output() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .args(["scan", "--format", "grid", "--columns", "2"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout("a.txt      other.png\nb.jpg      c.png\n");
}

#[test]
fn test_images_only_and_exclude_filters() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .args(["scan", "--images-only", "-e", "sub/sub2/**"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(lines(&tree, &["other.png", "sub/b.jpg"]));
}

#[test]
fn test_invalid_pattern_is_misuse() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .args(["scan", "-i", "[unclosed"])
        .arg(tree.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid glob pattern"));
}

#[test]
fn test_missing_root_prints_nothing_by_default() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::new().unwrap();

    gallery_scan(&home)
        .arg("scan")
        .arg(tree.join("missing"))
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_missing_root_fails_under_fail_policy() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::new().unwrap();

    gallery_scan(&home)
        .args(["scan", "--root-failure", "fail"])
        .arg(tree.join("missing"))
        .assert()
        .code(4)
        .stdout("")
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_file_root_is_misuse() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .arg("scan")
        .arg(tree.join("a.txt"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is a file"));
}

#[test]
fn test_zero_concurrency_is_misuse() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .args(["scan", "--concurrency", "0"])
        .arg(tree.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("max_concurrency"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subtree_is_skipped_or_aborts() {
    let home = TempDir::new().unwrap();
    let mut tree = TempTree::scenario().unwrap();
    if !tree.make_unreadable("sub").unwrap() {
        // Running with privileges that ignore permission bits
        return;
    }

    gallery_scan(&home)
        .arg("scan")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(lines(&tree, &["a.txt", "other.png"]))
        .stderr(predicate::str::contains("Skipped 1 unreadable directory"));

    gallery_scan(&home)
        .args(["scan", "--on-error", "abort"])
        .arg(tree.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("aborted"));
}

#[test]
fn test_config_set_get_and_scan_uses_it() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .args(["config", "set", "output.default_format", "json"])
        .assert()
        .success();
    gallery_scan(&home)
        .args(["config", "get", "output.default_format"])
        .assert()
        .success()
        .stdout("json\n");
    assert!(home.path().join("gallery-scan/config.toml").exists());

    gallery_scan(&home)
        .arg("scan")
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));

    // Flags beat the file
    gallery_scan(&home)
        .args(["scan", "--format", "text"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(lines(
            &tree,
            &["a.txt", "other.png", "sub/b.jpg", "sub/sub2/c.png"],
        ));
}

#[test]
fn test_environment_overrides_file() {
    let home = TempDir::new().unwrap();
    let tree = TempTree::scenario().unwrap();

    gallery_scan(&home)
        .args(["config", "set", "output.default_format", "json"])
        .assert()
        .success();

    gallery_scan(&home)
        .env("GALLERY_SCAN_OUTPUT__DEFAULT_FORMAT", "text")
        .env("GALLERY_SCAN_SCAN__DEFAULT_ROOT", tree.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(lines(
            &tree,
            &["a.txt", "other.png", "sub/b.jpg", "sub/sub2/c.png"],
        ));
}

#[test]
fn test_config_rejects_unknown_key_and_bad_value() {
    let home = TempDir::new().unwrap();

    gallery_scan(&home)
        .args(["config", "set", "scan.ordr", "name"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Did you mean 'scan.order'"));

    gallery_scan(&home)
        .args(["config", "set", "scan.max_concurrency", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_config_list_and_path() {
    let home = TempDir::new().unwrap();

    gallery_scan(&home)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[scan]"))
        .stdout(predicate::str::contains("order = name"))
        .stdout(predicate::str::contains("grid_columns = 4"));

    gallery_scan(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gallery-scan"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    gallery_scan(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gallery-scan"));
}
