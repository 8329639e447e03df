use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

#[allow(deprecated)]
fn get_handoff_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("handoff")
}

#[test]
fn test_completion_command_help() {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("completion").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Generate shell completion scripts"))
        .stdout(predicate::str::contains("SUPPORTED SHELLS"))
        .stdout(predicate::str::contains("INSTALLATION"))
        .stdout(predicate::str::contains("~/.bashrc"))
        .stdout(predicate::str::contains("~/.zshrc"));
}

#[test]
fn test_completion_bash_generates_script() {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("completion").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_handoff()"))
        .stdout(predicate::str::contains("complete -F _handoff"));
}

#[test]
fn test_completion_zsh_generates_script() {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("completion").arg("zsh");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("#compdef handoff"));
}

#[test]
fn test_completion_rejects_unknown_shell() {
    let mut cmd = Command::new(get_handoff_bin());
    cmd.arg("completion").arg("tcsh");

    cmd.assert().failure();
}
