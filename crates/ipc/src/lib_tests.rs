// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for protocol types and the outcome codec.

#![allow(clippy::unwrap_used)]

use serde_json::json;

use super::*;
use yare::parameterized;

#[parameterized(
    tuple = { &json!(["a", 1]), 2 },
    unit = { &Value::Null, 0 },
    object = { &json!({"a": 1}), 1 },
    scalar = { &json!(7), 1 },
)]
fn task_from_serialize_arity(args: &Value, expected: usize) {
    let task = Task::from_serialize("echo", args).unwrap();
    assert_eq!(task.args.len(), expected);
}

#[test]
fn task_from_serialize_accepts_tuples() {
    let task = Task::from_serialize("sheets.get", &("sheet-1", 3, true)).unwrap();
    assert_eq!(task.args, vec![json!("sheet-1"), json!(3), json!(true)]);
}

#[test]
fn task_from_serialize_rejects_non_string_map_keys() {
    let mut args = std::collections::HashMap::new();
    args.insert(vec![1u8], "value");
    let err = Task::from_serialize("echo", &args).unwrap_err();
    assert!(matches!(err, ProtocolError::Unserializable(_)));
}

#[test]
fn validate_rejects_empty_method() {
    let err = Task::new("  ", vec![]).validate(1024).unwrap_err();
    assert!(matches!(err, ProtocolError::EmptyMethod));
}

#[test]
fn validate_rejects_oversized_task() {
    let task = Task::new("echo", vec![json!("x".repeat(2048))]);
    let err = task.validate(1024).unwrap_err();
    assert!(matches!(err, ProtocolError::TaskTooLarge { size, max: 1024 } if size > 2048));
}

#[test]
fn validate_accepts_small_task() {
    assert!(Task::new("echo", vec![json!({"a": 1})]).validate(1024).is_ok());
}

#[test]
fn success_outcome_keeps_data_and_response() {
    let response = RemoteResponse::ok(json!([1, 2, 3]))
        .with_response(ResponseSummary::new(201, "Created").with_url("https://example.test/x"));
    let outcome = Outcome::success(response);

    assert!(!outcome.is_error);
    assert_eq!(outcome.data, json!([1, 2, 3]));
    assert_eq!(outcome.response.status, 201);
    assert!(outcome.error_descriptor().is_err());
}

#[test]
fn failure_outcome_carries_descriptor() {
    let err = RemoteError::http(404, "File not found: abc")
        .with_name("GaxiosError")
        .with_stack("at files.get\nat drive.request")
        .with_response(ResponseSummary::new(404, "Not Found"));
    let outcome = Outcome::failure(&err);

    assert!(outcome.is_error);
    assert_eq!(outcome.response.status, 404);
    let descriptor = outcome.error_descriptor().unwrap();
    assert_eq!(descriptor.name, "GaxiosError");
    assert_eq!(descriptor.message, "File not found: abc");
    assert_eq!(descriptor.stack.as_deref(), Some("at files.get\nat drive.request"));
    assert_eq!(descriptor.to_string(), "GaxiosError: File not found: abc");
}

#[test]
fn failure_without_response_has_default_summary() {
    let outcome = Outcome::failure(&RemoteError::new("nope"));
    assert_eq!(outcome.response, ResponseSummary::default());
}

#[test]
fn outcome_wire_format_is_camel_case() {
    let outcome = Outcome::success(RemoteResponse::ok(json!(null)));
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["isError"], json!(false));
    assert_eq!(value["response"]["statusText"], json!("OK"));
}

#[test]
fn decode_checks_error_flag() {
    let bytes = codec::encode_outcome(&Outcome::failure(&RemoteError::new("boom"))).unwrap();

    assert!(codec::decode_outcome(&bytes, true).is_ok());
    let err = codec::decode_outcome(&bytes, false).unwrap_err();
    assert!(err.to_string().contains("error flag mismatch"));
}

#[test]
fn decode_rejects_garbage() {
    let err = codec::decode_outcome(b"\x00\x01not json", false).unwrap_err();
    assert!(matches!(err, ProtocolError::MalformedOutcome(_)));
}
