// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sb-core operations.

use thiserror::Error;

/// All possible errors that can occur in sb-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("channel protocol violation: {0}")]
    ChannelProtocol(String),
}

/// A specialized Result type for sb-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
