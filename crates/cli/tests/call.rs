// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn echo_prints_argument() {
    syncbridge()
        .args(["call", "echo", r#"{"a": 1, "b": [1, 2, 3]}"#])
        .assert()
        .success()
        .stdout(r#"{"a":1,"b":[1,2,3]}"#.to_string() + "\n");
}

#[parameterized(
    null = { "null" },
    empty_object = { "{}" },
    array = { "[1,[2,[]]]" },
    string = { "\"hi\"" },
)]
fn echo_round_trips(value: &str) {
    syncbridge()
        .args(["call", "echo", value])
        .assert()
        .success()
        .stdout(format!("{}\n", value));
}

#[test]
fn fail_prints_remote_message() {
    syncbridge()
        .args(["call", "fail"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("error: nope"))
        .stderr(predicate::str::contains("internal bridge error").not());
}

#[test]
fn unknown_method_fails() {
    syncbridge()
        .args(["call", "docs.get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: unknown method: docs.get"));
}

#[test]
fn invalid_json_argument_fails_before_calling() {
    syncbridge()
        .args(["call", "echo", "not-json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON argument 'not-json'"));
}

#[test]
fn blob_larger_than_capacity_uses_overflow() {
    let temp = TempDir::new().unwrap();
    let config = write_config(
        &temp,
        &format!("overflow_dir = '{}'\n", temp.path().join("overflow").display()),
    );
    std::fs::create_dir(temp.path().join("overflow")).unwrap();

    let output = syncbridge()
        .arg("--config")
        .arg(&config)
        .args(["--capacity", "4096", "call", "blob", "50000"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_str().unwrap().len(), 50_000);
    assert_eq!(
        std::fs::read_dir(temp.path().join("overflow")).unwrap().count(),
        0
    );
}

#[test]
fn flaky_succeeds_after_retries() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, FAST_RETRY);

    syncbridge()
        .arg("--config")
        .arg(&config)
        .args(["call", "flaky"])
        .assert()
        .success()
        .stdout("{\"attempts\":3}\n");
}

#[test]
fn retry_warnings_are_logged_when_verbose() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, FAST_RETRY);

    syncbridge()
        .arg("--config")
        .arg(&config)
        .args(["--verbose", "call", "flaky"])
        .assert()
        .success()
        .stderr(predicate::str::contains("transient remote failure"));
}

#[test]
fn slow_call_times_out_as_bridge_error() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, "call_timeout_secs = 1\n");

    syncbridge()
        .arg("--config")
        .arg(&config)
        .args(["call", "sleep", "30000"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: internal bridge error:"));
}

#[test]
fn config_from_environment() {
    let temp = TempDir::new().unwrap();
    let config = write_config(&temp, "call_timeout_secs = 1\n");

    syncbridge()
        .env("SYNCBRIDGE_CONFIG", &config)
        .args(["call", "sleep", "30000"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no result within"));
}

#[test]
fn log_file_receives_logs() {
    let temp = TempDir::new().unwrap();
    let log = temp.path().join("bridge.log");

    syncbridge()
        .arg("--log-file")
        .arg(&log)
        .args(["--verbose", "call", "echo", "1"])
        .assert()
        .success()
        .stdout("1\n");

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("bridge ready"));
}
