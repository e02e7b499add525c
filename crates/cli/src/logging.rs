// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Default filter when neither `--verbose` nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter: `--verbose` wins, then `RUST_LOG`, then [`DEFAULT_FILTER`].
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    if !crate::env::rust_log_set() {
        return EnvFilter::new(DEFAULT_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Logs go to `log_file` when it can be opened, otherwise to stderr.
pub fn setup_logging(verbose: bool, log_file: Option<&Path>) {
    let filter = filter(verbose);

    let file = log_file.and_then(|path| {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
    });

    // Ignore the error if a subscriber is already installed
    let _ = match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
