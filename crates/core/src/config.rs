// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge configuration.
//!
//! Stored as TOML. Every field is optional in the file; missing fields take
//! the defaults below.
//!
//! ```toml
//! capacity_bytes = 16777216
//! call_timeout_secs = 120
//!
//! [retry]
//! max_retries = 7
//! initial_delay_ms = 1800
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::DEFAULT_CAPACITY;
use crate::error::{Error, Result};
use crate::retry::{Backoff, RetryOptions};

/// Smallest data region that can still carry an overflow file path.
pub const MIN_CAPACITY: usize = 4096;

/// Default limit on one serialized task (1 MiB).
pub const DEFAULT_MAX_TASK_BYTES: usize = 1024 * 1024;

/// Top-level bridge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Size of the shared data region in bytes.
    #[serde(default = "default_capacity_bytes")]
    pub capacity_bytes: usize,
    /// Upper bound on one serialized task.
    #[serde(default = "default_max_task_bytes")]
    pub max_task_bytes: usize,
    /// Seconds a call may block before the bridge is declared lost.
    /// Absent means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_timeout_secs: Option<u64>,
    /// Seconds to wait for the worker to finish initializing.
    #[serde(default = "default_startup_timeout_secs")]
    pub startup_timeout_secs: u64,
    /// Directory for overflow files (default: system temp dir).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overflow_dir: Option<PathBuf>,
    /// Retry engine settings.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Retry engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call (default: 7).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// First backoff delay in milliseconds (default: 1800).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Exclusive upper bound for random jitter in milliseconds (default: 1000).
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
    /// Seed for deterministic jitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jitter_seed: Option<u64>,
}

fn default_capacity_bytes() -> usize {
    DEFAULT_CAPACITY
}

fn default_max_task_bytes() -> usize {
    DEFAULT_MAX_TASK_BYTES
}

fn default_startup_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    7
}

fn default_initial_delay_ms() -> u64 {
    1800
}

fn default_max_jitter_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
            jitter_seed: None,
        }
    }
}

impl RetryConfig {
    /// Default per-call options derived from this config.
    pub fn options(&self) -> RetryOptions {
        RetryOptions::default()
            .with_max_retries(self.max_retries)
            .with_initial_delay(Duration::from_millis(self.initial_delay_ms))
    }

    /// Jitter source derived from this config.
    pub fn backoff(&self) -> Backoff {
        let max_jitter = Duration::from_millis(self.max_jitter_ms);
        match self.jitter_seed {
            Some(seed) => Backoff::seeded(max_jitter, seed),
            None => Backoff::new(max_jitter),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: default_capacity_bytes(),
            max_task_bytes: default_max_task_bytes(),
            call_timeout_secs: None,
            startup_timeout_secs: default_startup_timeout_secs(),
            overflow_dir: None,
            retry: RetryConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Loads config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: BridgeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the bridge cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.capacity_bytes < MIN_CAPACITY {
            return Err(Error::Config(format!(
                "capacity_bytes must be at least {} (got {})",
                MIN_CAPACITY, self.capacity_bytes
            )));
        }
        if self.max_task_bytes == 0 {
            return Err(Error::Config("max_task_bytes must be positive".to_string()));
        }
        if self.startup_timeout_secs == 0 {
            return Err(Error::Config(
                "startup_timeout_secs must be positive".to_string(),
            ));
        }
        if self.call_timeout_secs == Some(0) {
            return Err(Error::Config(
                "call_timeout_secs must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_secs.map(Duration::from_secs)
    }

    pub fn startup_timeout(&self) -> Duration {
        Duration::from_secs(self.startup_timeout_secs)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
