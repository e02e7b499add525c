// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use serde_json::json;

async fn echo(_auth: AuthContext, params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    Ok(RemoteResponse::ok(Value::Array(params)))
}

#[test]
fn register_and_list_methods() {
    let mut registry = Registry::new();
    registry
        .register("sheets.get", echo)
        .register("drive.list", echo)
        .register_with("gmail.send", echo, RetryOptions::default().with_max_retries(2));

    assert!(registry.contains("drive.list"));
    assert!(!registry.contains("docs.get"));
    assert_eq!(registry.methods(), vec!["drive.list", "gmail.send", "sheets.get"]);
    assert!(registry.get("sheets.get").unwrap().options.is_none());
    assert_eq!(
        registry.get("gmail.send").unwrap().options.as_ref().unwrap().max_retries,
        2
    );
}

#[test]
fn register_replaces_existing_entry() {
    let mut registry = Registry::new();
    registry.register_with("echo", echo, RetryOptions::default());
    registry.register("echo", echo);

    assert_eq!(registry.methods(), vec!["echo"]);
    assert!(registry.get("echo").unwrap().options.is_none());
}

#[test]
fn closures_are_remote_calls() {
    let mut registry = Registry::new();
    registry.register("const", |_auth: AuthContext, _params: Vec<Value>| async {
        Ok::<_, RemoteError>(RemoteResponse::ok(json!(42)))
    });
    assert!(registry.contains("const"));
}

#[test]
fn unknown_method_error_names_method() {
    let err = unknown_method("docs.batchUpdate");
    assert_eq!(err.name, "UnknownMethod");
    assert_eq!(err.message, "unknown method: docs.batchUpdate");
}

#[test]
fn auth_context_exposes_token() {
    let auth = AuthContext::new(AccessToken::new("abc"));
    assert_eq!(auth.token().secret(), "abc");
}
