// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced to callers of the bridge.
//!
//! Remote failures display exactly as the remote call reported them. Faults
//! in the bridge itself always carry the `internal bridge error:` prefix so
//! the two can be told apart.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use sb_core::ResponseSummary;
use sb_ipc::ErrorDescriptor;

/// All possible errors returned by a synchronous call.
#[derive(Debug, Error)]
pub enum Error {
    /// The remote call failed; rehydrated from its descriptor.
    #[error("{0}")]
    Remote(RemoteFailure),

    /// The bridge itself is broken. Fatal for the bridge instance.
    #[error("internal bridge error: {0}")]
    Bridge(#[from] BridgeFault),

    /// The call was rejected before dispatch.
    #[error("invalid call: {0}")]
    InvalidCall(String),

    #[error("cannot decode result of '{method}': {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Setup(#[from] sb_core::Error),
}

impl Error {
    /// True for bridge-integrity failures.
    pub fn is_bridge_fault(&self) -> bool {
        matches!(self, Error::Bridge(_))
    }

    /// The rehydrated remote failure, if this is one.
    pub fn as_remote(&self) -> Option<&RemoteFailure> {
        match self {
            Error::Remote(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Failure of the bridge machinery, as opposed to the remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeFault {
    #[error("background worker terminated unexpectedly")]
    Lost,

    #[error("background worker failed to start: {0}")]
    StartupFailed(String),

    #[error("background worker not ready after {0:?}")]
    StartupTimeout(Duration),

    #[error("no result within {0:?}; bridge abandoned")]
    CallTimeout(Duration),

    #[error("channel protocol violation: {0}")]
    Protocol(String),

    #[error("bridge has been shut down")]
    Shutdown,
}

/// Remote error rebuilt on the caller side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    name: String,
    message: String,
    stack: Option<String>,
    response: ResponseSummary,
}

impl RemoteFailure {
    pub fn new(descriptor: ErrorDescriptor, response: ResponseSummary) -> Self {
        Self {
            name: descriptor.name,
            message: descriptor.message,
            stack: descriptor.stack,
            response,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack or cause chain captured where the failure happened.
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn response(&self) -> &ResponseSummary {
        &self.response
    }

    /// HTTP-style status of the failed response (0 if none).
    pub fn status(&self) -> u16 {
        self.response.status
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RemoteFailure {}

/// A specialized Result type for bridge calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
