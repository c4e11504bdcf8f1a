use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

fn sizewalk() -> Command {
    let mut cmd = Command::cargo_bin("sizewalk").unwrap();
    cmd.env_remove("SIZEWALK_CONFIG");
    cmd
}

fn create_test_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();

    File::create(root.join("src/main.rs"))
        .unwrap()
        .write_all(&vec![b'x'; 1024])
        .unwrap();
    File::create(root.join("node_modules/pkg/index.js"))
        .unwrap()
        .write_all(&vec![b'y'; 4096])
        .unwrap();

    dir
}

/// Config file pointing the cache into a temp dir
fn cache_config(cache_dir: &TempDir) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[cache]\nenabled = true\nexpiry_seconds = 600\ndirectory = {:?}",
        cache_dir.path().to_string_lossy()
    )
    .unwrap();
    file
}

#[test]
fn shows_help() {
    sizewalk()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("backup packaging"));
}

#[test]
fn shows_version() {
    sizewalk()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn requires_subcommand() {
    sizewalk()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn scan_outputs_tree_and_summary() {
    let dir = create_test_project();

    sizewalk()
        .arg("scan")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("src/"))
        .stdout(predicate::str::contains("node_modules").not())
        .stdout(predicate::str::contains("Total: 1 KB in 1 files, 2 directories"));
}

#[test]
fn scan_no_filters_includes_everything() {
    let dir = create_test_project();

    sizewalk()
        .args(["scan", "--no-filters"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("node_modules/"))
        .stdout(predicate::str::contains("Total: 5 KB in 2 files, 4 directories"));
}

#[test]
fn scan_json_has_required_fields() {
    let dir = create_test_project();

    let output = sizewalk()
        .args(["scan", "--json"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["total_files"], 1);
    assert_eq!(json["total_dirs"], 2);
    assert_eq!(json["total_size"], 1024);
    assert_eq!(json["total_size_formatted"], "1 KB");
    assert!(json["scan_time"].is_number());
    assert!(json["symbolic_links"].is_array());
    assert!(json["unreadable_items"].is_array());
    assert!(json["directory_tree"]["children"].is_array());
}

#[test]
fn scan_nonexistent_path_fails() {
    sizewalk()
        .args(["scan", "/nonexistent/path/12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid path"));
}

#[test]
fn quick_prints_size_only() {
    let dir = create_test_project();

    let output = sizewalk()
        .args(["quick", "--no-cache"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 2);
    assert_eq!(json["total_size"], 1024);
    assert_eq!(json["total_size_formatted"], "1 KB");
}

#[test]
fn quick_with_cache_writes_document() {
    let dir = create_test_project();
    let cache_dir = TempDir::new().unwrap();
    let config = cache_config(&cache_dir);

    sizewalk()
        .arg("--config")
        .arg(config.path())
        .arg("quick")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_size\": 1024"));

    assert!(cache_dir.path().join("directory_sizes.json").exists());

    sizewalk()
        .arg("--config")
        .arg(config.path())
        .args(["cache", "clear"])
        .assert()
        .success();

    assert!(!cache_dir.path().join("directory_sizes.json").exists());
}

#[test]
fn cache_clear_single_path() {
    let dir = create_test_project();
    let cache_dir = TempDir::new().unwrap();
    let config = cache_config(&cache_dir);

    sizewalk()
        .arg("--config")
        .arg(config.path())
        .arg("quick")
        .arg(dir.path())
        .assert()
        .success();

    sizewalk()
        .arg("--config")
        .arg(config.path())
        .args(["cache", "clear"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
}

#[test]
fn ls_lists_files_as_json() {
    let dir = create_test_project();
    File::create(dir.path().join("README.md")).unwrap();

    let output = sizewalk().arg("ls").arg(dir.path()).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "README.md");
    assert_eq!(json[0]["is_link"], false);
}

#[test]
fn ls_missing_path_is_empty_list() {
    sizewalk()
        .args(["ls", "--dirs", "/nonexistent/path/12345"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn invalid_config_path_fails() {
    sizewalk()
        .args(["--config", "/nonexistent/path.toml", "scan"])
        .assert()
        .failure();
}

#[test]
fn completions_are_generated() {
    sizewalk()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sizewalk"));
}
