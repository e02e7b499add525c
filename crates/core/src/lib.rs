// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! sb-core: building blocks of the synchronous remote-call bridge
//!
//! This crate provides the shared result channel, the retry engine, the
//! remote result/failure model, the credential seam, and configuration
//! used by both halves of the bridge.

pub mod channel;
pub mod config;
pub mod credentials;
pub mod error;
pub mod remote;
pub mod retry;

pub use channel::{ChannelResult, SharedChannel, WaitOutcome};
pub use config::{BridgeConfig, RetryConfig};
pub use credentials::{AccessToken, CredentialProvider, StaticCredentials, TokenInfo};
pub use error::{Error, Result};
pub use remote::{RemoteError, RemoteResponse, ResponseSummary};
pub use retry::{classify, is_retryable, Backoff, RetryEngine, RetryOptions, Verdict};
