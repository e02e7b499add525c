// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol types for caller-worker communication.
//!
//! A [`Task`] travels from the blocking caller to the background worker over
//! a message channel. The resulting [`Outcome`] travels back through the
//! shared channel, serialized as JSON by the [`codec`] module.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sb_core::{RemoteError, RemoteResponse, ResponseSummary};

/// Error raised while building, validating, or decoding protocol messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("method name cannot be empty")]
    EmptyMethod,

    #[error("task too large: {size} bytes (max {max})")]
    TaskTooLarge { size: usize, max: usize },

    #[error("arguments are not serializable: {0}")]
    Unserializable(#[source] serde_json::Error),

    #[error("malformed outcome: {0}")]
    MalformedOutcome(String),
}

// ============================================================================
// Request
// ============================================================================

/// One request from the caller to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Registered name of the remote call.
    pub method: String,
    /// Positional arguments.
    pub args: Vec<Value>,
}

impl Task {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Build a task from any serializable argument value.
    ///
    /// Arrays and tuples become positional arguments, unit becomes no
    /// arguments, and anything else becomes a single argument.
    pub fn from_serialize<A: Serialize + ?Sized>(
        method: impl Into<String>,
        args: &A,
    ) -> Result<Self, ProtocolError> {
        let args = match serde_json::to_value(args).map_err(ProtocolError::Unserializable)? {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        Ok(Self::new(method, args))
    }

    /// Check the task before it is dispatched.
    pub fn validate(&self, max_bytes: usize) -> Result<(), ProtocolError> {
        if self.method.trim().is_empty() {
            return Err(ProtocolError::EmptyMethod);
        }
        let size = codec::encoded_len(self)?;
        if size > max_bytes {
            return Err(ProtocolError::TaskTooLarge {
                size,
                max: max_bytes,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Response
// ============================================================================

/// Plain-data form of a remote failure, rehydrated on the caller side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDescriptor {
    /// Error class name.
    pub name: String,
    /// Error message.
    pub message: String,
    /// Stack or cause chain as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl From<&RemoteError> for ErrorDescriptor {
    fn from(err: &RemoteError) -> Self {
        Self {
            name: err.name.clone(),
            message: err.message.clone(),
            stack: err.stack.clone(),
        }
    }
}

impl fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

/// Result of executing exactly one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Result value, or a serialized [`ErrorDescriptor`] when `is_error`.
    pub data: Value,
    /// Whether `data` describes a failure.
    pub is_error: bool,
    /// Response metadata.
    pub response: ResponseSummary,
}

impl Outcome {
    pub fn success(response: RemoteResponse) -> Self {
        Self {
            data: response.data,
            is_error: false,
            response: response.response,
        }
    }

    pub fn failure(err: &RemoteError) -> Self {
        let descriptor = ErrorDescriptor::from(err);
        Self {
            data: serde_json::to_value(&descriptor).unwrap_or(Value::Null),
            is_error: true,
            response: err.response.clone().unwrap_or_default(),
        }
    }

    /// The error descriptor carried by a failed outcome.
    pub fn error_descriptor(&self) -> Result<ErrorDescriptor, ProtocolError> {
        if !self.is_error {
            return Err(ProtocolError::MalformedOutcome(
                "outcome is not an error".to_string(),
            ));
        }
        serde_json::from_value(self.data.clone())
            .map_err(|e| ProtocolError::MalformedOutcome(format!("bad error descriptor: {}", e)))
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// JSON encoding of protocol messages.
///
/// Outcomes are written to the shared channel as one JSON document; the
/// channel's control region carries the error flag alongside, and decoding
/// checks that both agree.
pub mod codec {
    use serde::Serialize;

    use super::{Outcome, ProtocolError};

    /// Serialized size of a message in bytes.
    pub fn encoded_len<T: Serialize>(message: &T) -> Result<usize, ProtocolError> {
        serde_json::to_vec(message)
            .map(|bytes| bytes.len())
            .map_err(ProtocolError::Unserializable)
    }

    /// Encode an outcome for the shared channel.
    pub fn encode_outcome(outcome: &Outcome) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(outcome)
            .map_err(|e| ProtocolError::MalformedOutcome(format!("serialize error: {}", e)))
    }

    /// Decode an outcome read from the shared channel.
    pub fn decode_outcome(bytes: &[u8], is_error: bool) -> Result<Outcome, ProtocolError> {
        let outcome: Outcome = serde_json::from_slice(bytes)
            .map_err(|e| ProtocolError::MalformedOutcome(format!("deserialize error: {}", e)))?;
        if outcome.is_error != is_error {
            return Err(ProtocolError::MalformedOutcome(format!(
                "error flag mismatch: control region says {}, payload says {}",
                is_error, outcome.is_error
            )));
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
