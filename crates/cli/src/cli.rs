// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand};

const QUICKSTART_HELP: &str = "\
Examples:
  syncbridge call echo '{\"a\": 1}'     Round-trip a value through the bridge
  syncbridge call fail                 Surface a remote failure
  syncbridge --capacity 4096 call blob 100000
                                       Force the overflow-file path
  syncbridge config                    Print the effective configuration";

#[derive(Parser, Debug)]
#[command(name = "syncbridge")]
#[command(about = "Blocking calls into asynchronous, retried remote operations")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Path to a TOML config file (overrides SYNCBRIDGE_CONFIG)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Shared data region size in bytes
    #[arg(long, global = true, value_name = "BYTES")]
    pub capacity: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Invoke a demo remote call and print its JSON result
    Call {
        /// Registered method name
        method: String,

        /// Positional arguments, each parsed as JSON
        #[arg(value_name = "JSON")]
        args: Vec<String>,
    },

    /// Print the effective configuration as TOML
    Config,

    /// List the registered demo methods
    Methods,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
