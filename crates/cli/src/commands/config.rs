// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use sb_core::BridgeConfig;

use crate::error::{Error, Result};

/// Execute `syncbridge config`: print the effective configuration.
pub fn run(config: &BridgeConfig) -> Result<()> {
    print!("{}", render(config)?);
    Ok(())
}

pub fn render(config: &BridgeConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| Error::Output(e.to_string()))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
