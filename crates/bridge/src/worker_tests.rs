// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use serde_json::{json, Value};

use sb_core::channel::{STATUS_BUSY, STATUS_FREE};
use sb_core::{Backoff, RemoteError, RemoteResponse, StaticCredentials};

fn context(registry: Registry) -> (WorkerContext, Arc<StaticCredentials>) {
    let credentials = Arc::new(StaticCredentials::new("secret"));
    let ctx = WorkerContext {
        channel: SharedChannel::reserve(4096, None),
        registry,
        engine: RetryEngine::new(credentials.clone(), Backoff::none()),
        default_options: RetryOptions::default().with_initial_delay(Duration::ZERO),
    };
    (ctx, credentials)
}

async fn echo(_auth: AuthContext, params: Vec<Value>) -> Result<RemoteResponse, RemoteError> {
    Ok(RemoteResponse::ok(params.into_iter().next().unwrap_or(Value::Null)))
}

#[tokio::test]
async fn execute_unknown_method_fails_terminally() {
    let (ctx, _) = context(Registry::new());
    let outcome = execute(&ctx, Task::new("drive.files.get", vec![])).await;

    assert!(outcome.is_error);
    let descriptor = outcome.error_descriptor().unwrap();
    assert_eq!(descriptor.name, "UnknownMethod");
    assert_eq!(descriptor.message, "unknown method: drive.files.get");
}

#[tokio::test]
async fn execute_returns_collaborator_data() {
    let mut registry = Registry::new();
    registry.register("echo", echo);
    let (ctx, _) = context(registry);

    let outcome = execute(&ctx, Task::new("echo", vec![json!({"a": 1})])).await;
    assert!(!outcome.is_error);
    assert_eq!(outcome.data, json!({"a": 1}));
    assert_eq!(outcome.response.status, 200);
}

#[tokio::test]
async fn execute_applies_per_method_options() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = Registry::new();
    registry.register_with(
        "unavailable",
        move |_auth: AuthContext, _params: Vec<Value>| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err::<RemoteResponse, _>(RemoteError::http(503, "unavailable")) }
        },
        RetryOptions::default()
            .with_max_retries(2)
            .with_initial_delay(Duration::ZERO),
    );
    let (ctx, _) = context(registry);

    let outcome = execute(&ctx, Task::new("unavailable", vec![])).await;
    assert!(outcome.is_error);
    assert_eq!(outcome.response.status, 503);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn execute_fetches_fresh_token_after_unauthorized() {
    let mut registry = Registry::new();
    registry.register("whoami", |auth: AuthContext, _params: Vec<Value>| {
        let token = auth.token().secret().to_string();
        async move {
            if token == "secret.0" {
                Err(RemoteError::http(401, "token expired"))
            } else {
                Ok(RemoteResponse::ok(json!(token)))
            }
        }
    });
    let (ctx, credentials) = context(registry);

    let outcome = execute(&ctx, Task::new("whoami", vec![])).await;
    assert_eq!(outcome.data, json!("secret.1"));
    assert_eq!(credentials.invalidations(), 1);
}

#[test]
fn publish_writes_result_and_frees_channel() {
    let channel = SharedChannel::reserve(4096, None);
    channel.mark_ready().unwrap();
    channel.mark_busy().unwrap();

    let outcome = Outcome::failure(&RemoteError::new("nope"));
    publish(&channel, &outcome).unwrap();

    assert_eq!(channel.status(), STATUS_FREE);
    let result = channel.read_result().unwrap();
    assert!(result.is_error);
    assert_eq!(codec::decode_outcome(&result.bytes, true).unwrap(), outcome);
}

#[test]
fn publish_skips_abandoned_channel() {
    let channel = SharedChannel::reserve(4096, None);
    channel.mark_ready().unwrap();
    channel.mark_busy().unwrap();
    channel.force_release();
    channel.mark_busy().unwrap();

    publish(&channel, &Outcome::success(RemoteResponse::ok(json!(1)))).unwrap();
    assert_eq!(channel.status(), STATUS_BUSY);
}

#[test]
fn armed_guard_releases_channel() {
    let channel = SharedChannel::reserve(4096, None);
    channel.mark_ready().unwrap();
    channel.mark_busy().unwrap();

    drop(ReleaseGuard::new(Arc::clone(&channel)));
    assert!(channel.is_lost());
    assert_eq!(channel.status(), STATUS_FREE);
}

#[test]
fn disarmed_guard_leaves_channel_alone() {
    let channel = SharedChannel::reserve(4096, None);
    let mut guard = ReleaseGuard::new(Arc::clone(&channel));
    guard.disarm();
    drop(guard);
    assert!(!channel.is_lost());
}
