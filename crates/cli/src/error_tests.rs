// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_invalid_argument_names_argument() {
    let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
    let err = Error::InvalidArgument {
        arg: "{oops".to_string(),
        source,
    };
    let message = err.to_string();
    assert!(message.starts_with("invalid JSON argument '{oops'"));
    assert!(message.contains("hint:"));
}

#[test]
fn test_bridge_errors_pass_through() {
    let err = Error::from(sb_bridge::Error::from(sb_bridge::BridgeFault::Lost));
    assert_eq!(
        err.to_string(),
        "internal bridge error: background worker terminated unexpectedly"
    );
}

#[test]
fn test_core_errors_pass_through() {
    let err = Error::from(sb_core::Error::Config("bad".to_string()));
    assert_eq!(err.to_string(), "config error: bad");
}
