use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_handoff_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("handoff")
}

fn handoff(home: &TempDir) -> Command {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("--home").arg(home.path());
    cmd
}

#[test]
fn test_open_command_help() {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("open").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Open URLs with the browser"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_open_requires_url() {
    let home = TempDir::new().unwrap();
    handoff(&home).arg("open").assert().failure();
}

#[test]
fn test_open_rejects_malformed_url() {
    let home = TempDir::new().unwrap();
    handoff(&home)
        .args(["open", "--dry-run", "not a url"])
        .assert()
        .failure();
}

#[test]
fn test_open_dry_run_routes_to_rule_target() {
    let home = TempDir::new().unwrap();
    let browser = home.path().join("test-browser");
    fs::write(&browser, "#!/bin/sh\n").unwrap();

    handoff(&home)
        .args(["rules", "add", r"example\.com", "--app"])
        .arg(&browser)
        .assert()
        .success();

    let output = handoff(&home)
        .args(["-f", "json", "open", "--dry-run", "https://EXAMPLE.com/page"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["dry_run"], true);
    assert_eq!(outcome["decision"]["decision"], "route");
    assert_eq!(outcome["decision"]["rule_index"], 0);
    assert_eq!(outcome["decision"]["target"]["app_id"], "test-browser");
    assert_eq!(
        outcome["launch"]["urls_passed_directly"][0],
        "https://example.com/page"
    );
    assert_eq!(outcome["launch"]["force_new_instance"], false);
}

#[test]
fn test_open_dry_run_without_rule_makes_no_decision() {
    let home = TempDir::new().unwrap();

    let output = handoff(&home)
        .args(["-f", "json", "open", "--dry-run", "https://unrouted.example.org/"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["decision"]["decision"], "no_decision");
    assert_eq!(outcome["decision"]["reason"], "no_matching_rule");
    assert!(outcome["launch"].is_null());
}

#[test]
fn test_open_dry_run_with_missing_app() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["rules", "add", ".*", "--app", "/nonexistent/browser"])
        .assert()
        .success();

    handoff(&home)
        .args(["open", "--dry-run", "https://example.com/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/nonexistent/browser is not installed"));
}
