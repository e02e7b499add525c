// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde_json::Value;

use sb_bridge::SyncBridge;
use sb_core::BridgeConfig;

use crate::demo;
use crate::error::{Error, Result};

/// Execute `syncbridge call`.
pub fn run(config: &BridgeConfig, method: &str, args: &[String]) -> Result<()> {
    let params = parse_args(args)?;
    let output = call(config, method, params)?;
    println!("{}", output);
    Ok(())
}

/// Start a bridge over the demo registry, make one call, and render the result.
pub fn call(config: &BridgeConfig, method: &str, params: Vec<Value>) -> Result<String> {
    let bridge = SyncBridge::start(config, demo::registry(), demo::credentials())?;
    let value = bridge.call_sync(method, params)?;
    bridge.shutdown();
    serde_json::to_string(&value).map_err(|e| Error::Output(e.to_string()))
}

/// Parse each argument as JSON.
pub fn parse_args(args: &[String]) -> Result<Vec<Value>> {
    args.iter()
        .map(|arg| {
            serde_json::from_str(arg).map_err(|source| Error::InvalidArgument {
                arg: arg.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;
