// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry engine for fallible remote calls.
//!
//! Runs one operation to completion, absorbing transient failures with
//! exponential backoff plus jitter. A 401 invalidates the cached token and
//! retries immediately. Exhausted or non-retryable failures are returned as
//! values; the caller decides how to surface them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, warn};

use crate::credentials::CredentialProvider;
use crate::remote::{RemoteError, RemoteResponse, ResponseSummary};

/// Default number of attempts per call.
pub const DEFAULT_MAX_RETRIES: u32 = 7;
/// Default delay before the first backoff retry.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1800);
/// Default upper bound (exclusive) for random jitter.
pub const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(1000);

/// Predicate over a failure and its response metadata.
pub type ErrorCheck = Arc<dyn Fn(&RemoteError, Option<&ResponseSummary>) -> bool + Send + Sync>;

/// Per-call retry options.
#[derive(Clone)]
pub struct RetryOptions {
    /// Total attempts, including the first one.
    pub max_retries: u32,
    /// Delay before the first backoff retry; doubles after each one.
    pub initial_delay: Duration,
    /// Marks additional failures as retryable.
    pub extra_retry_check: Option<ErrorCheck>,
    /// Suppresses the terminal-failure log for expected failures.
    pub skip_log: Option<ErrorCheck>,
}

impl RetryOptions {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_extra_retry_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&RemoteError, Option<&ResponseSummary>) -> bool + Send + Sync + 'static,
    {
        self.extra_retry_check = Some(Arc::new(check));
        self
    }

    pub fn with_skip_log<F>(mut self, check: F) -> Self
    where
        F: Fn(&RemoteError, Option<&ResponseSummary>) -> bool + Send + Sync + 'static,
    {
        self.skip_log = Some(Arc::new(check));
        self
    }

    fn extra_retryable(&self, err: &RemoteError) -> bool {
        self.extra_retry_check
            .as_ref()
            .is_some_and(|check| check(err, err.response.as_ref()))
    }

    fn should_skip_log(&self, err: &RemoteError) -> bool {
        self.skip_log
            .as_ref()
            .is_some_and(|check| check(err, err.response.as_ref()))
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
            extra_retry_check: None,
            skip_log: None,
        }
    }
}

impl fmt::Debug for RetryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryOptions")
            .field("max_retries", &self.max_retries)
            .field("initial_delay", &self.initial_delay)
            .field("extra_retry_check", &self.extra_retry_check.is_some())
            .field("skip_log", &self.skip_log.is_some())
            .finish()
    }
}

/// How a failure should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Back off, then try again.
    Retry,
    /// Invalidate the token, then try again without delay.
    Reauthenticate,
    /// Give up.
    Fail,
}

/// Classify a failure.
pub fn classify(err: &RemoteError, options: &RetryOptions) -> Verdict {
    match err.effective_status() {
        Some(401) => return Verdict::Reauthenticate,
        Some(408 | 429 | 500 | 503) => return Verdict::Retry,
        Some(403) if err.mentions_rate_limit() => return Verdict::Retry,
        _ => {}
    }
    if err.is_network_transient() || options.extra_retryable(err) {
        Verdict::Retry
    } else {
        Verdict::Fail
    }
}

/// True if `err` is worth another attempt.
pub fn is_retryable(err: &RemoteError, options: &RetryOptions) -> bool {
    classify(err, options) != Verdict::Fail
}

/// Jitter source for backoff delays.
pub struct Backoff {
    max_jitter: Duration,
    rng: Mutex<StdRng>,
}

impl Backoff {
    /// Random jitter in `[0, max_jitter)`, seeded from entropy.
    pub fn new(max_jitter: Duration) -> Self {
        Self {
            max_jitter,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic jitter for reproducible runs.
    pub fn seeded(max_jitter: Duration, seed: u64) -> Self {
        Self {
            max_jitter,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// No jitter: delays are exactly the backoff schedule.
    pub fn none() -> Self {
        Self::seeded(Duration::ZERO, 0)
    }

    /// Draw the next jitter value.
    pub fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        let mut rng = self.rng.lock();
        Duration::from_millis(rng.gen_range(0..max_ms))
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_JITTER)
    }
}

/// Attempt bookkeeping local to one `retry` invocation.
#[derive(Debug, Clone, Copy)]
struct AttemptState {
    delay: Duration,
    attempts_remaining: u32,
}

/// Executes remote operations with retry, backoff, and token refresh.
pub struct RetryEngine {
    credentials: Arc<dyn CredentialProvider>,
    backoff: Backoff,
}

impl RetryEngine {
    pub fn new(credentials: Arc<dyn CredentialProvider>, backoff: Backoff) -> Self {
        Self {
            credentials,
            backoff,
        }
    }

    /// The provider invalidated on authentication failures.
    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    /// Run `operation` until it succeeds, fails terminally, or runs out of attempts.
    ///
    /// `tag` identifies the call in diagnostics.
    pub async fn retry<F, Fut>(
        &self,
        tag: &str,
        mut operation: F,
        options: &RetryOptions,
    ) -> Result<RemoteResponse, RemoteError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RemoteResponse, RemoteError>>,
    {
        let mut state = AttemptState {
            delay: options.initial_delay,
            attempts_remaining: options.max_retries.max(1),
        };

        loop {
            state.attempts_remaining -= 1;
            let err = match operation().await {
                Ok(response) => return Ok(response),
                Err(err) => err,
            };

            let verdict = classify(&err, options);
            if verdict == Verdict::Fail || state.attempts_remaining == 0 {
                if !options.should_skip_log(&err) {
                    error!(
                        tag,
                        status = ?err.effective_status(),
                        retryable = verdict != Verdict::Fail,
                        error = %err,
                        "remote call failed"
                    );
                }
                return Err(err);
            }

            if verdict == Verdict::Reauthenticate {
                warn!(tag, "credentials rejected; invalidating token and retrying");
                self.credentials.invalidate_token();
                continue;
            }

            let wait = state.delay + self.backoff.jitter();
            warn!(
                tag,
                status = ?err.effective_status(),
                code = ?err.code,
                attempts_remaining = state.attempts_remaining,
                delay_ms = wait.as_millis() as u64,
                "transient remote failure; backing off"
            );
            tokio::time::sleep(wait).await;
            state.delay = state.delay.saturating_mul(2);
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
