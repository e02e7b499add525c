// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sb-bridge: blocking calls into asynchronous remote operations
//!
//! A [`SyncBridge`] pairs the calling thread with a background worker that
//! runs a tokio event loop. Calls are dispatched by name through a
//! [`Registry`], retried by the core retry engine, and their outcomes cross
//! back through the shared channel.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sb_bridge::{AuthContext, Registry, SyncBridge};
//! use sb_core::{BridgeConfig, RemoteError, RemoteResponse, StaticCredentials};
//! use serde_json::{json, Value};
//!
//! let mut registry = Registry::new();
//! registry.register("echo", |_auth: AuthContext, params: Vec<Value>| async move {
//!     Ok::<_, RemoteError>(RemoteResponse::ok(Value::Array(params)))
//! });
//! let bridge = SyncBridge::start(
//!     &BridgeConfig::default(),
//!     registry,
//!     Arc::new(StaticCredentials::new("token")),
//! )?;
//! let value = bridge.call_sync("echo", vec![json!(1)])?;
//! # Ok::<(), sb_bridge::Error>(())
//! ```

pub mod bridge;
pub mod error;
pub mod registry;
pub mod worker;

pub use bridge::SyncBridge;
pub use error::{BridgeFault, Error, RemoteFailure, Result};
pub use registry::{AuthContext, CallFuture, RemoteCall, Registry};
