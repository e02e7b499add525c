// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Credential provider seam used by the retry engine.
//!
//! Token acquisition lives outside this crate. The retry engine only needs
//! to fetch the current token and to invalidate it after a 401 so the next
//! attempt acquires a fresh one.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;

use crate::remote::RemoteError;

/// Bearer token handed to remote calls.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"<redacted>").finish()
    }
}

/// Introspection data about the current token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Remaining lifetime, if known.
    pub expires_in: Option<Duration>,
}

/// Source of access tokens for remote calls.
pub trait CredentialProvider: Send + Sync {
    /// Returns the cached token, acquiring one if needed.
    fn access_token(&self) -> BoxFuture<'_, Result<AccessToken, RemoteError>>;

    /// Drops the cached token so the next `access_token` call acquires a fresh one.
    fn invalidate_token(&self);

    /// Describes the current token.
    fn token_info(&self) -> Option<TokenInfo> {
        None
    }
}

/// Fixed-secret provider.
///
/// Each invalidation bumps a generation counter that is appended to the
/// secret, so callers can tell a refreshed token from the stale one.
#[derive(Debug)]
pub struct StaticCredentials {
    secret: String,
    scopes: Vec<String>,
    generation: AtomicU32,
    invalidations: AtomicU32,
}

impl StaticCredentials {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            scopes: Vec::new(),
            generation: AtomicU32::new(0),
            invalidations: AtomicU32::new(0),
        }
    }

    /// Sets the scopes reported by `token_info` (builder pattern).
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Number of times `invalidate_token` has been called.
    pub fn invalidations(&self) -> u32 {
        self.invalidations.load(Ordering::SeqCst)
    }

    fn current(&self) -> AccessToken {
        let generation = self.generation.load(Ordering::SeqCst);
        AccessToken::new(format!("{}.{}", self.secret, generation))
    }
}

impl CredentialProvider for StaticCredentials {
    fn access_token(&self) -> BoxFuture<'_, Result<AccessToken, RemoteError>> {
        let token = self.current();
        Box::pin(async move { Ok(token) })
    }

    fn invalidate_token(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    fn token_info(&self) -> Option<TokenInfo> {
        Some(TokenInfo {
            scopes: self.scopes.clone(),
            expires_in: None,
        })
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
