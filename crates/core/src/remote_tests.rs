// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;
use yare::parameterized;

#[test]
fn remote_error_displays_bare_message() {
    let err = RemoteError::http(404, "File not found").with_name("GaxiosError");
    assert_eq!(err.to_string(), "File not found");
    assert_eq!(err.name, "GaxiosError");
}

#[test]
fn effective_status_falls_back_to_response() {
    let err = RemoteError::new("bad").with_response(ResponseSummary::new(503, "Unavailable"));
    assert_eq!(err.effective_status(), Some(503));

    let explicit = RemoteError::http(429, "slow down")
        .with_response(ResponseSummary::new(500, "Internal"));
    assert_eq!(explicit.effective_status(), Some(429));

    assert_eq!(RemoteError::new("none").effective_status(), None);
}

#[parameterized(
    timeout = { "ETIMEDOUT", true },
    socket_timeout = { "ESOCKETTIMEDOUT", true },
    reset = { "ECONNRESET", true },
    aborted = { "ECONNABORTED", true },
    refused = { "ECONNREFUSED", false },
)]
fn network_codes(code: &str, transient: bool) {
    let err = RemoteError::new("socket").with_code(code);
    assert_eq!(err.is_network_transient(), transient);
}

#[parameterized(
    reason_rate = { Some("rateLimitExceeded"), "Forbidden", true },
    reason_user_rate = { Some("userRateLimitExceeded"), "Forbidden", true },
    message_rate = { None, "User Rate Limit Exceeded", true },
    message_usage = { None, "Daily usage limit reached", true },
    plain_forbidden = { Some("insufficientPermissions"), "The caller does not have permission", false },
)]
fn rate_limit_detection(reason: Option<&str>, message: &str, expected: bool) {
    let mut err = RemoteError::http(403, message);
    if let Some(reason) = reason {
        err = err.with_reason(reason);
    }
    assert_eq!(err.mentions_rate_limit(), expected);
}

#[test]
fn from_error_renders_cause_chain() {
    let inner = std::io::Error::other("connection refused");
    let outer = crate::Error::Io(inner);
    let err = RemoteError::from_error(&outer);
    assert!(err.message.contains("connection refused"));
}

#[test]
fn response_summary_serializes_camel_case() {
    let summary = ResponseSummary::new(200, "OK").with_url("https://example.test/v1/files");
    let value = serde_json::to_value(&summary).unwrap();
    assert_eq!(
        value,
        json!({"status": 200, "statusText": "OK", "responseUrl": "https://example.test/v1/files"})
    );
}

#[test]
fn remote_response_ok_defaults() {
    let resp = RemoteResponse::ok(json!({"id": "abc"}));
    assert_eq!(resp.response.status, 200);
    assert_eq!(resp.response.status_text, "OK");
    assert_eq!(resp.data["id"], "abc");
}
