//! Smoke tests for the sinhala-probe binary
//!
//! None of these launch a browser.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("sinhala-probe").unwrap();
    cmd.env_remove("SINHALA_PROBE_URL")
        .env_remove("SINHALA_PROBE_HEADLESS")
        .env_remove("SINHALA_PROBE_CONFIG")
        .env_remove("CHROMIUM_PATH")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sinhala-probe"));
}

#[test]
fn test_help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("extract"));
}

#[test]
fn test_list_all_cases() {
    cli()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pos_Fun_0001"))
        .stdout(predicate::str::contains("38 cases"));
}

#[test]
fn test_list_ui_suite() {
    cli()
        .args(["list", "--suite", "ui"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Neg_UI_Fun_0001"))
        .stdout(predicate::str::contains("Pos_Fun_0001").not())
        .stdout(predicate::str::contains("2 cases"));
}

#[test]
fn test_list_json() {
    let output = cli()
        .args(["list", "--suite", "negative", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 10);
}

#[test]
fn test_list_unknown_case_fails() {
    cli()
        .args(["list", "--case", "Pos_Fun_9999"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown case id"));
}

#[test]
fn test_extract_from_stdin() {
    cli()
        .arg("extract")
        .write_stdin("Singlish mama gedhara yanavaa Sinhala Copy මම ගෙදර යනවා 🔁 About")
        .assert()
        .success()
        .stdout("මම ගෙදර යනවා\n");
}

#[test]
fn test_extract_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.txt");
    std::fs::write(&path, "Sinhala Clear අද 🔁").unwrap();
    cli()
        .arg("extract")
        .arg(&path)
        .args(["--strategy", "chrome-stripped"])
        .assert()
        .success()
        .stdout("අද\n");
}

#[test]
fn test_config_show() {
    cli()
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url"))
        .stdout(predicate::str::contains("swifttranslator"));
}

#[test]
fn test_config_show_with_env_override() {
    cli()
        .env("SINHALA_PROBE_URL", "http://localhost:9000/")
        .args(["config", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:9000/"));
}

#[test]
fn test_config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("probe.yaml");
    cli().arg("config").arg("--init").arg(&path).assert().success();
    assert!(std::fs::read_to_string(&path).unwrap().contains("functional"));

    cli()
        .arg("config")
        .arg("--init")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_config_file_fails() {
    cli()
        .args(["--config", "/nonexistent/probe.yaml", "config", "--show"])
        .assert()
        .failure();
}

#[test]
fn test_list_ignores_configuration() {
    cli()
        .env("SINHALA_PROBE_URL", "ftp://bad")
        .args(["--config", "/nonexistent/probe.yaml", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("38 cases"));
}

#[test]
fn test_config_init_with_broken_config() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.yaml");
    std::fs::write(&broken, "base_url: [unterminated\n").unwrap();
    let fresh = dir.path().join("fresh.yaml");
    cli()
        .arg("--config")
        .arg(&broken)
        .arg("config")
        .arg("--init")
        .arg(&fresh)
        .assert()
        .success();
    assert!(fresh.exists());
}

#[test]
fn test_unknown_suite_rejected() {
    cli()
        .args(["list", "--suite", "smoke"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_missing_subcommand() {
    cli().assert().failure();
}
