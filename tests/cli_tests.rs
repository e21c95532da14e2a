//! CLI integration tests
//!
//! Exercise argument parsing and the commands that need no audio device.

use assert_cmd::Command;
use predicates::prelude::*;

fn voicenote_bin() -> Command {
    Command::cargo_bin("voicenote").expect("binary builds")
}

#[test]
fn help_output() {
    voicenote_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("record"))
        .stdout(predicate::str::contains("recover"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn version_output() {
    voicenote_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn record_help_lists_flags() {
    voicenote_bin()
        .args(["record", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--realtime"))
        .stdout(predicate::str::contains("--translate"))
        .stdout(predicate::str::contains("--max-secs"));
}

#[test]
fn config_path_command() {
    voicenote_bin()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("voicenote"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_show_prints_toml() {
    voicenote_bin()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("autosave_secs"));
}

#[test]
fn missing_subcommand_is_usage_error() {
    voicenote_bin().assert().failure();
}

#[test]
fn unknown_flag_is_rejected() {
    voicenote_bin()
        .args(["record", "--no-such-flag"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
