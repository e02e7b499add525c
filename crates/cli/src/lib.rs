// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! syncbridge - command-line front end for the synchronous remote-call bridge.
//!
//! The binary starts a [`SyncBridge`](sb_bridge::SyncBridge) over a set of
//! demo remote calls ([`demo`]) so the bridge can be exercised end to end:
//! round trips, overflow files, retries, timeouts, and remote failures.

mod cli;
mod commands;
pub mod demo;
pub mod env;
pub mod error;
pub mod logging;

pub use cli::{Cli, Command};
pub use error::{Error, Result};

use std::path::{Path, PathBuf};

use sb_core::BridgeConfig;
use tracing::debug;

/// Resolve the config file: `--config` first, then `SYNCBRIDGE_CONFIG`.
pub fn config_source(flag: Option<&Path>) -> Option<PathBuf> {
    flag.map(Path::to_path_buf).or_else(env::config_path)
}

/// Load the effective configuration, applying the `--capacity` override.
pub fn load_config(path: Option<&Path>, capacity: Option<usize>) -> Result<BridgeConfig> {
    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            BridgeConfig::load(path)?
        }
        None => BridgeConfig::default(),
    };
    if let Some(capacity) = capacity {
        config.capacity_bytes = capacity;
        config.validate()?;
    }
    Ok(config)
}

/// Run a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let source = config_source(cli.config.as_deref());
    let config = load_config(source.as_deref(), cli.capacity)?;

    match cli.command {
        Command::Call { method, args } => commands::call::run(&config, &method, &args),
        Command::Config => commands::config::run(&config),
        Command::Methods => commands::methods::run(),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
