// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Demo remote calls served by the `syncbridge` binary.
//!
//! These stand in for real remote API clients: each one is an async
//! function that may fail the way a network call does.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use sb_bridge::{AuthContext, Registry};
use sb_core::{RemoteError, RemoteResponse, ResponseSummary, RetryOptions, StaticCredentials};

/// Secret handed out by the demo credential provider.
pub const DEMO_SECRET: &str = "demo-token";

/// Failures `flaky` returns before it succeeds.
pub const FLAKY_FAILURES: u32 = 2;

/// Credentials for the demo registry.
pub fn credentials() -> Arc<StaticCredentials> {
    Arc::new(StaticCredentials::new(DEMO_SECRET).with_scopes(vec!["demo".to_string()]))
}

/// Registry of every demo call.
pub fn registry() -> Registry {
    let flaky_attempts = Arc::new(AtomicU32::new(0));

    let mut registry = Registry::new();
    registry
        .register("echo", echo)
        .register("fail", fail)
        .register("sleep", sleep)
        .register("blob", blob)
        .register("whoami", whoami)
        .register(
            "flaky",
            move |_auth: AuthContext, _params: Vec<Value>| {
                let attempt = flaky_attempts.fetch_add(1, Ordering::SeqCst) + 1;
                flaky(attempt)
            },
        )
        .register_with(
            "missing",
            missing,
            RetryOptions::default().with_skip_log(|err, _| err.status == Some(404)),
        );
    registry
}

fn first(params: Vec<Value>) -> Value {
    params.into_iter().next().unwrap_or(Value::Null)
}

/// Returns its first argument unchanged.
async fn echo(_auth: AuthContext, params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    Ok(RemoteResponse::ok(first(params)))
}

/// Always fails terminally with the given message (default "nope").
async fn fail(_auth: AuthContext, params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    let message = match first(params) {
        Value::String(message) => message,
        _ => "nope".to_string(),
    };
    Err(RemoteError::new(message).with_stack("at demo::fail"))
}

/// Sleeps for the given number of milliseconds.
async fn sleep(_auth: AuthContext, params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    let ms = first(params).as_u64().unwrap_or(0);
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Ok(RemoteResponse::ok(json!({ "sleptMs": ms })))
}

/// Returns a string of the given length.
async fn blob(_auth: AuthContext, params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    let Some(len) = first(params).as_u64() else {
        return Err(RemoteError::http(400, "blob expects a byte count"));
    };
    let len = usize::try_from(len)
        .map_err(|_| RemoteError::http(400, format!("blob too large: {}", len)))?;
    Ok(RemoteResponse::ok(Value::String("x".repeat(len))))
}

/// Reports the token the call was made with.
async fn whoami(auth: AuthContext, _params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    Ok(RemoteResponse::ok(json!({ "token": auth.token().secret() })))
}

/// Fails with 503 for the first [`FLAKY_FAILURES`] attempts.
async fn flaky(attempt: u32) -> Result<RemoteResponse, RemoteError> {
    if attempt <= FLAKY_FAILURES {
        return Err(RemoteError::http(503, "Service Unavailable")
            .with_response(ResponseSummary::new(503, "Service Unavailable")));
    }
    Ok(RemoteResponse::ok(json!({ "attempts": attempt })))
}

/// A probe that always answers 404 without logging.
async fn missing(_auth: AuthContext, params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    let id = first(params);
    Err(RemoteError::http(404, format!("File not found: {}", id))
        .with_response(ResponseSummary::new(404, "Not Found")))
}

#[cfg(test)]
#[path = "demo_tests.rs"]
mod tests;
