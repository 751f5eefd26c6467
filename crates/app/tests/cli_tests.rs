//! CLI integration tests using assert_cmd.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn trivia() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("trivia").unwrap();
    cmd.env_remove("TRIVIA_CONFIG").env_remove("RUST_LOG");
    cmd
}

const PLAY_ALL_LEFT: &str = "1\n\n1\n\n1\n\n1\n\n1\n\nn\n";

#[test]
fn check_reports_builtin_content() {
    trivia()
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("37 locations"))
        .stdout(predicate::str::contains("6 question sets: ok"));
}

#[test]
fn full_session_ends_with_score() {
    trivia()
        .args(["play", "--seed", "7"])
        .write_stdin(PLAY_ALL_LEFT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1 of 5"))
        .stdout(predicate::str::contains("Question 5 of 5"))
        .stdout(predicate::str::contains("Score: "))
        .stdout(predicate::str::contains("out of 5"))
        .stdout(predicate::str::contains("Play again? [y/n]"));
}

#[test]
fn play_is_the_default_command() {
    trivia()
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Which has a larger"));
}

#[test]
fn end_of_input_quits_cleanly() {
    trivia().arg("play").write_stdin("").assert().success();
}

#[test]
fn out_of_phase_input_gets_a_hint() {
    trivia()
        .arg("play")
        .write_stdin("\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Answer with 1 or 2, r to restart or q to quit."));
}

#[test]
fn restart_after_finishing_starts_over() {
    let input = format!("{}y\nq\n", PLAY_ALL_LEFT.trim_end_matches("n\n"));
    let assert = trivia()
        .args(["play", "--seed", "3"])
        .write_stdin(input)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let (_, after_results) = stdout.split_once("Play again? [y/n]").unwrap();
    assert!(after_results.contains("Question 1 of 5  [.....]"), "{after_results}");
}

#[test]
fn unknown_units_fail() {
    trivia()
        .args(["play", "--units", "furlongs"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unknown unit system"));
}

#[test]
fn oversized_delay_fails_cleanly() {
    trivia()
        .args(["play", "--auto-advance", "--delay", "1e30"])
        .write_stdin("q\n")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("reveal delay must be a finite number of seconds"));
}

#[test]
fn config_file_from_environment_is_used() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trivia.toml");
    fs::write(&path, "[session]\nauto_advance = true\ndelay_seconds = 0\n").unwrap();

    trivia()
        .arg("play")
        .env("TRIVIA_CONFIG", &path)
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("auto-advance needs a reveal delay above zero"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trivia.toml");
    fs::write(&path, "[session\n").unwrap();

    trivia()
        .args(["play", "--config"])
        .arg(&path)
        .write_stdin("q\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}
