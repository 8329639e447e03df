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
fn test_settings_command_help() {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("settings").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn test_settings_export_import_round_trip() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let export = source.path().join("export.json");

    for pattern in ["zeta", "alpha"] {
        handoff(&source)
            .args(["rules", "add", pattern, "--app", "/usr/bin/firefox"])
            .assert()
            .success();
    }
    handoff(&source)
        .args(["browsers", "private-arg", "firefox", "--private-window"])
        .assert()
        .success();

    handoff(&source)
        .arg("settings")
        .arg("export")
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 rules"));

    let doc: serde_json::Value = serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    assert_eq!(doc["rules"][0]["regex"], "zeta");
    assert_eq!(doc["privateArgs"]["firefox"], "--private-window");
    assert!(doc["exportedAt"].is_string());
    assert!(doc.get("apps").is_none());

    handoff(&target)
        .args(["-f", "json", "settings", "import"])
        .arg(&export)
        .assert()
        .success();

    let output = handoff(&target)
        .args(["-f", "json", "rules", "list"])
        .output()
        .unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["regex"], "zeta");
    assert_eq!(rows[1]["regex"], "alpha");
}

#[test]
fn test_settings_import_skips_bad_records() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("import.json");
    fs::write(
        &file,
        r#"{"rules": [{"regex": "ok", "app": "/usr/bin/firefox"}, {"regex": "no app"}]}"#,
    )
    .unwrap();

    let output = handoff(&home)
        .args(["-f", "json", "settings", "import"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["sections"][0]["key"], "rules");
    assert_eq!(report["sections"][0]["imported"], 1);
    assert_eq!(report["sections"][0]["skipped"], 1);
}

#[test]
fn test_settings_import_rejects_non_object() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("import.json");
    fs::write(&file, "[]").unwrap();

    handoff(&home)
        .args(["settings", "import"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid settings document"));
}

#[test]
fn test_settings_reset_force() {
    let home = TempDir::new().unwrap();
    handoff(&home)
        .args(["rules", "add", "x", "--app", "/usr/bin/firefox"])
        .assert()
        .success();
    assert!(home.path().join("settings.json").exists());

    handoff(&home)
        .args(["settings", "reset", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings reset"));
    assert!(!home.path().join("settings.json").exists());
}

#[test]
fn test_settings_reset_requires_confirmation() {
    let home = TempDir::new().unwrap();

    handoff(&home)
        .args(["settings", "reset"])
        .write_stdin("no\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reset cancelled"));
}
