// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors surfaced by the `syncbridge` binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bridge(#[from] sb_bridge::Error),

    #[error(transparent)]
    Core(#[from] sb_core::Error),

    #[error("invalid JSON argument '{arg}': {source}\n  hint: quote strings, e.g. '\"text\"'")]
    InvalidArgument {
        arg: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot render output: {0}")]
    Output(String),
}

/// A specialized Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
