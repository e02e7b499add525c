// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// Retry settings that keep demo retries fast.
pub const FAST_RETRY: &str = "[retry]\ninitial_delay_ms = 1\nmax_jitter_ms = 0\n";

/// The binary with a clean environment.
pub fn syncbridge() -> Command {
    let mut cmd = cargo_bin_cmd!("syncbridge");
    cmd.env_remove("SYNCBRIDGE_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Write a config file into `temp` and return its path.
pub fn write_config(temp: &TempDir, contents: &str) -> PathBuf {
    let path = temp.path().join("syncbridge.toml");
    std::fs::write(&path, contents).unwrap();
    path
}
