//! CLI integration tests
//!
//! Only argument handling and startup failures are exercised here.
//! Valid arguments start the server loop, which never exits on its own.

use assert_cmd::Command;
use predicates::prelude::*;

fn topic_seek_bin() -> Command {
    Command::cargo_bin("topic-seek").expect("binary builds")
}

#[test]
fn help_output() {
    topic_seek_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn version_output() {
    topic_seek_bin()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("topic-seek"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn invalid_port_error() {
    topic_seek_bin()
        .args(["--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_api_key_is_fatal() {
    // Point config lookup at an empty directory so no key can be found
    let empty_home = tempfile::tempdir().expect("temp dir");

    topic_seek_bin()
        .env_remove("GEMINI_API_KEY")
        .env("HOME", empty_home.path())
        .env("XDG_CONFIG_HOME", empty_home.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Missing API key"));
}
