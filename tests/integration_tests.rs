//! Integration tests for the pacta CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd. They
//! never touch the network: everything runs against a fresh project whose
//! cache starts empty.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a pacta command
fn pacta() -> Command {
    Command::cargo_bin("pacta").unwrap()
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    pacta()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success();
    tmp
}

#[test]
fn test_help_displays() {
    pacta()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pacta Contract Toolkit"));
}

#[test]
fn test_init_creates_project_layout() {
    let tmp = TempDir::new().unwrap();

    pacta()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".pacta").is_dir());
    assert!(tmp.path().join(".pacta/config.yaml").is_file());
    assert!(tmp.path().join(".pacta/snapshots").is_dir());

    let gitignore = fs::read_to_string(tmp.path().join(".pacta/.gitignore")).unwrap();
    assert!(gitignore.contains("cache.db"));
}

#[test]
fn test_init_refuses_existing_project_without_force() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .failure();

    pacta()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_commands_fail_outside_a_project() {
    let tmp = TempDir::new().unwrap();

    pacta()
        .current_dir(tmp.path())
        .args(["cache", "status"])
        .assert()
        .failure();
}

#[test]
fn test_cache_status_on_fresh_project() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["cache", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total contracts: 0"));
}

#[test]
fn test_cache_query_empty_contracts() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["cache", "query", "SELECT COUNT(*) AS n FROM contracts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n"))
        .stdout(predicate::str::contains("0"));
}

#[test]
fn test_cache_clear_removes_database() {
    let tmp = setup_test_project();

    // Opening via any command creates the database file
    pacta()
        .current_dir(tmp.path())
        .args(["cache", "status"])
        .assert()
        .success();
    assert!(tmp.path().join(".pacta/cache.db").exists());

    pacta()
        .current_dir(tmp.path())
        .args(["cache", "clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cache cleared"));
    assert!(!tmp.path().join(".pacta/cache.db").exists());
}

#[test]
fn test_contract_list_empty() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["contract", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cached contracts"));
}

#[test]
fn test_contract_show_unknown_id_fails() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["contract", "show", "C-404"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not cached"));
}

#[test]
fn test_contract_delete_unknown_id_warns() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["contract", "delete", "C-404"])
        .assert()
        .success()
        .stderr(predicate::str::contains("nothing to delete"));
}

#[test]
fn test_annotate_requires_cached_contract() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["annotate", "C-404", "--status", "ACTIVE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not cached"));
}

#[test]
fn test_refresh_cached_reports_age() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["refresh", "--cached", "--group", "787000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("787000"))
        .stdout(predicate::str::contains("never refreshed"));
}

#[test]
fn test_refresh_without_url_fails() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["refresh", "--group", "787000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("catalog URL"));
}

#[test]
fn test_snapshot_export_import_round_trip() {
    let tmp = setup_test_project();
    let out = tmp.path().join("snap.json");

    pacta()
        .current_dir(tmp.path())
        .args(["snapshot", "export", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 0 annotation(s)"));
    assert!(out.is_file());

    pacta()
        .current_dir(tmp.path())
        .args(["snapshot", "import"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("0 applied"));
}

#[test]
fn test_snapshot_export_default_path_lands_in_snapshots_dir() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["snapshot", "export"])
        .assert()
        .success();

    let entries: Vec<_> = fs::read_dir(tmp.path().join(".pacta/snapshots"))
        .unwrap()
        .collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_snapshot_import_rejects_garbage() {
    let tmp = setup_test_project();
    let bad = tmp.path().join("bad.json");
    fs::write(&bad, "{ not json").unwrap();

    pacta()
        .current_dir(tmp.path())
        .args(["snapshot", "import"])
        .arg(&bad)
        .assert()
        .failure();
}

#[test]
fn test_links_import_missing_columns_fails() {
    let tmp = setup_test_project();
    let csv = tmp.path().join("links.csv");
    fs::write(&csv, "a,b\n1,2\n").unwrap();

    pacta()
        .current_dir(tmp.path())
        .args(["links", "import"])
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("key"));
}

#[test]
fn test_links_import_reports_unmatched_keys() {
    let tmp = setup_test_project();
    let csv = tmp.path().join("links.csv");
    fs::write(
        &csv,
        "key,contract_document,amendment_document\n787010/25-71/00,https://example.org/doc.pdf,XXX\n",
    )
    .unwrap();

    pacta()
        .current_dir(tmp.path())
        .args(["links", "import"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 unmatched"))
        .stderr(predicate::str::contains("787010/25-71/00"));
}

#[test]
fn test_fiscal_show_without_assignment() {
    let tmp = setup_test_project();

    pacta()
        .current_dir(tmp.path())
        .args(["fiscal", "show", "C-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No fiscal assignment"));
}

#[test]
fn test_global_project_flag() {
    let tmp = setup_test_project();
    let elsewhere = TempDir::new().unwrap();

    pacta()
        .current_dir(elsewhere.path())
        .args(["cache", "status", "--project"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total contracts: 0"));
}
