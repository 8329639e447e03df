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

#[test]
fn test_config_show_defaults() {
    let home = TempDir::new().unwrap();

    let output = handoff(&home)
        .args(["-f", "json", "config", "show"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["profile_families"][0], "chrome");
    assert_eq!(config["stale_profile_policy"], "use_stored");
}

#[test]
fn test_config_init_writes_once() {
    let home = TempDir::new().unwrap();

    handoff(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join("config.json").exists());

    handoff(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    handoff(&home)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_home_from_environment() {
    let home = TempDir::new().unwrap();

    Command::new(get_handoff_bin())
        .env("HANDOFF_HOME", home.path())
        .args(["config", "init"])
        .assert()
        .success();

    assert!(home.path().join("config.json").exists());
}

#[test]
fn test_apps_add_list_remove() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["apps", "add", "open.spotify.com", "/usr/bin/spotify", "--scheme", "spotify"])
        .assert()
        .success();

    handoff(&home)
        .args(["-f", "json", "apps", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"schemeOverride\": \"spotify\""));

    handoff(&home).args(["apps", "remove", "1"]).assert().success();

    handoff(&home)
        .args(["apps", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No companion apps"));
}

#[test]
fn test_private_arg_accepts_flag_value() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["browsers", "private-arg", "google-chrome", "--incognito"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--incognito"));
}
