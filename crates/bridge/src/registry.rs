// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of remote calls the worker can dispatch by name.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use sb_core::{AccessToken, RemoteError, RemoteResponse, RetryOptions};

/// Authentication context handed to each remote call attempt.
#[derive(Debug, Clone)]
pub struct AuthContext {
    token: AccessToken,
}

impl AuthContext {
    pub fn new(token: AccessToken) -> Self {
        Self { token }
    }

    /// Token for this attempt. Fresh after a 401 invalidation.
    pub fn token(&self) -> &AccessToken {
        &self.token
    }
}

/// Future returned by a remote call.
pub type CallFuture = BoxFuture<'static, Result<RemoteResponse, RemoteError>>;

/// A named asynchronous remote operation.
pub trait RemoteCall: Send + Sync {
    fn call(&self, auth: AuthContext, params: Vec<Value>) -> CallFuture;
}

impl<F, Fut> RemoteCall for F
where
    F: Fn(AuthContext, Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<RemoteResponse, RemoteError>> + Send + 'static,
{
    fn call(&self, auth: AuthContext, params: Vec<Value>) -> CallFuture {
        Box::pin(self(auth, params))
    }
}

/// A registered call plus its retry override.
#[derive(Clone)]
pub(crate) struct Entry {
    pub(crate) call: Arc<dyn RemoteCall>,
    pub(crate) options: Option<RetryOptions>,
}

/// Remote calls keyed by method name.
#[derive(Clone, Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a call using the bridge's default retry options.
    ///
    /// Replaces any call already registered under `name`.
    pub fn register<C>(&mut self, name: impl Into<String>, call: C) -> &mut Self
    where
        C: RemoteCall + 'static,
    {
        self.insert(name.into(), Arc::new(call), None)
    }

    /// Register a call with its own retry options.
    pub fn register_with<C>(
        &mut self,
        name: impl Into<String>,
        call: C,
        options: RetryOptions,
    ) -> &mut Self
    where
        C: RemoteCall + 'static,
    {
        self.insert(name.into(), Arc::new(call), Some(options))
    }

    fn insert(
        &mut self,
        name: String,
        call: Arc<dyn RemoteCall>,
        options: Option<RetryOptions>,
    ) -> &mut Self {
        self.entries.insert(name, Entry { call, options });
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered method names, sorted.
    pub fn methods(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("methods", &self.methods())
            .finish()
    }
}

/// Failure returned for a method nobody registered.
pub fn unknown_method(name: &str) -> RemoteError {
    RemoteError::new(format!("unknown method: {}", name)).with_name("UnknownMethod")
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
