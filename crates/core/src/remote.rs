// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Result and failure shapes of remote calls.
//!
//! Remote-call collaborators resolve to a [`RemoteResponse`] or fail with a
//! [`RemoteError`]. Both are plain data so they can cross from the background
//! worker to the blocking caller without carrying live transport objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Network-level error codes treated as transient.
pub const TRANSIENT_NETWORK_CODES: &[&str] =
    &["ETIMEDOUT", "ESOCKETTIMEDOUT", "ECONNRESET", "ECONNABORTED"];

/// Small serializable projection of a transport response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    /// HTTP-style status code (0 when no response was received).
    pub status: u16,
    /// Reason phrase accompanying the status.
    pub status_text: String,
    /// URL the response was served from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,
}

impl ResponseSummary {
    /// Create a summary with the given status and reason phrase.
    pub fn new(status: u16, status_text: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            response_url: None,
        }
    }

    /// Sets the source URL (builder pattern).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.response_url = Some(url.into());
        self
    }
}

/// Successful result of one remote call.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteResponse {
    /// Decoded payload.
    pub data: Value,
    /// Response metadata.
    pub response: ResponseSummary,
}

impl RemoteResponse {
    /// A `200 OK` response carrying `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            response: ResponseSummary::new(200, "OK"),
        }
    }

    /// Replaces the response metadata (builder pattern).
    pub fn with_response(mut self, response: ResponseSummary) -> Self {
        self.response = response;
        self
    }
}

/// Failure reported by a remote call.
///
/// Display is the bare message so a rehydrated error reads exactly like the
/// one the collaborator raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct RemoteError {
    /// Error class name (e.g. `Error`, `GaxiosError`).
    pub name: String,
    /// Human-readable message.
    pub message: String,
    /// Stack or cause chain rendered as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    /// HTTP-style status, when the failure came with one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Transport error code (e.g. `ECONNRESET`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Machine-readable reason from the error payload (e.g. `rateLimitExceeded`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Response metadata, when a response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSummary>,
}

impl RemoteError {
    /// Create a plain `Error` with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            name: "Error".to_string(),
            message: message.into(),
            stack: None,
            status: None,
            code: None,
            reason: None,
            response: None,
        }
    }

    /// Create an error carrying an HTTP-style status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(message).with_status(status)
    }

    /// Build an error from any std error, rendering its source chain as the stack.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        let mut remote = Self::new(err.to_string());
        if !chain.is_empty() {
            remote.stack = Some(chain.join("\n"));
        }
        remote
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_response(mut self, response: ResponseSummary) -> Self {
        self.response = Some(response);
        self
    }

    /// Effective status: the explicit status, else the response's.
    pub fn effective_status(&self) -> Option<u16> {
        self.status
            .or_else(|| self.response.as_ref().map(|r| r.status))
    }

    /// True if the transport code names a timeout or reset.
    pub fn is_network_transient(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| TRANSIENT_NETWORK_CODES.contains(&code))
    }

    /// True if the reason or message names a rate or usage limit.
    pub fn mentions_rate_limit(&self) -> bool {
        let reason_hit = self.reason.as_deref().is_some_and(|reason| {
            matches!(
                reason,
                "rateLimitExceeded" | "userRateLimitExceeded" | "quotaExceeded"
            )
        });
        if reason_hit {
            return true;
        }
        let message = self.message.to_lowercase();
        message.contains("rate limit")
            || message.contains("ratelimit")
            || message.contains("usage limit")
            || message.contains("quota exceeded")
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
