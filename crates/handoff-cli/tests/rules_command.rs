use assert_cmd::Command;
use predicates::prelude::*;
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

fn patterns(home: &TempDir) -> Vec<String> {
    let output = handoff(home)
        .args(["-f", "json", "rules", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    rows.as_array()
        .unwrap()
        .iter()
        .map(|row| row["regex"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_rules_command_help() {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("rules").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Manage routing rules"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("move"))
        .stdout(predicate::str::contains("remove"));
}

#[test]
fn test_rules_list_empty() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No rules"));
}

#[test]
fn test_rules_add_and_list() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["rules", "add", r"github\.com", "--app", "/nonexistent/firefox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rule 1 added"));

    handoff(&home)
        .args(["rules", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r"github\.com"))
        .stdout(predicate::str::contains("/nonexistent/firefox"))
        .stdout(predicate::str::contains("not installed"));

    assert!(home.path().join("settings.json").exists());
}

#[test]
fn test_rules_add_rejects_invalid_pattern() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["rules", "add", "(unclosed", "--app", "/usr/bin/firefox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));

    assert!(patterns(&home).is_empty());
}

#[test]
fn test_rules_add_explains_unsupported_syntax() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["rules", "add", r"github\.com(?!/login)", "--app", "/usr/bin/firefox"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no look-around or backreferences"));
}

#[test]
fn test_rules_add_rejects_profile_for_plain_browser() {
    let home = TempDir::new().unwrap();
    let browser = home.path().join("chrome");
    std::fs::write(&browser, "#!/bin/sh\n").unwrap();

    handoff(&home)
        .args(["rules", "add", "work", "--app"])
        .arg(&browser)
        .args(["--profile", "Default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not support profiles"));

    handoff(&home)
        .args(["rules", "add", "work", "--app", "/nonexistent/google-chrome", "--profile", "Default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not installed"));

    assert!(patterns(&home).is_empty());
}

#[test]
fn test_rules_update_rejects_profile_for_plain_browser() {
    let home = TempDir::new().unwrap();
    let browser = home.path().join("chrome");
    std::fs::write(&browser, "#!/bin/sh\n").unwrap();

    handoff(&home)
        .args(["rules", "add", "work", "--app"])
        .arg(&browser)
        .assert()
        .success();

    handoff(&home)
        .args(["rules", "update", "1", "--profile", "Default"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not support profiles"));

    let output = handoff(&home)
        .args(["-f", "json", "rules", "list"])
        .output()
        .unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(rows[0].get("chromeProfile").is_none());
}

#[test]
fn test_rules_move_and_remove() {
    let home = TempDir::new().unwrap();
    for pattern in ["first", "second", "third"] {
        handoff(&home)
            .args(["rules", "add", pattern, "--app", "/usr/bin/firefox"])
            .assert()
            .success();
    }

    handoff(&home).args(["rules", "move", "3", "1"]).assert().success();
    assert_eq!(patterns(&home), vec!["third", "first", "second"]);

    handoff(&home).args(["rules", "remove", "2"]).assert().success();
    assert_eq!(patterns(&home), vec!["third", "second"]);

    handoff(&home)
        .args(["rules", "remove", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_rules_update() {
    let home = TempDir::new().unwrap();
    handoff(&home)
        .args(["rules", "add", "old", "--app", "/usr/bin/firefox"])
        .assert()
        .success();

    handoff(&home)
        .args(["rules", "update", "1", "--pattern", "new", "--app", "/usr/bin/chromium"])
        .assert()
        .success();

    let output = handoff(&home)
        .args(["-f", "json", "rules", "list"])
        .output()
        .unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["regex"], "new");
    assert_eq!(rows[0]["app"], "/usr/bin/chromium");
    assert_eq!(rows[0]["position"], 1);
}

#[test]
fn test_rules_position_zero_is_rejected() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["rules", "remove", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Positions start at 1"));
}

#[test]
fn test_rules_test_reports_matches() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args([
            "-f",
            "json",
            "rules",
            "test",
            r"GITHUB\.com/.*/pull",
            "https://github.com/a/b/pull/1",
            "https://github.com/a/b/issues/2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://github.com/a/b/pull/1"))
        .stdout(predicate::str::contains("issues").not());
}
