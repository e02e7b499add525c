// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground half of the bridge.
//!
//! [`SyncBridge::call_sync`] posts a task to the background worker, parks the
//! calling thread on the shared channel's status slot, then reads and decodes
//! the outcome. One call is in flight at a time.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use sb_core::channel::{STATUS_BUSY, STATUS_INITIALIZING};
use sb_core::{BridgeConfig, CredentialProvider, RetryEngine, SharedChannel, WaitOutcome};
use sb_ipc::{codec, Task};

use crate::error::{BridgeFault, Error, RemoteFailure, Result};
use crate::registry::Registry;
use crate::worker::{self, WorkerContext};

/// Blocking entry point to asynchronous remote calls.
pub struct SyncBridge {
    channel: Arc<SharedChannel>,
    /// Held from dispatch until the result has been read back.
    call_guard: Mutex<()>,
    tasks: Option<mpsc::UnboundedSender<Task>>,
    worker: Option<JoinHandle<()>>,
    call_timeout: Option<Duration>,
    max_task_bytes: usize,
}

impl SyncBridge {
    /// Start the background worker and wait for its startup handshake.
    pub fn start(
        config: &BridgeConfig,
        registry: Registry,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let channel = SharedChannel::reserve(config.capacity_bytes, config.overflow_dir.clone());
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let (startup_tx, mut startup_rx) = oneshot::channel();

        let ctx = WorkerContext {
            channel: Arc::clone(&channel),
            registry,
            engine: RetryEngine::new(credentials, config.retry.backoff()),
            default_options: config.retry.options(),
        };
        let handle = worker::spawn(ctx, task_rx, startup_tx)
            .map_err(|e| BridgeFault::StartupFailed(format!("cannot spawn worker: {}", e)))?;

        let mut bridge = Self {
            channel,
            call_guard: Mutex::new(()),
            tasks: Some(task_tx),
            worker: Some(handle),
            call_timeout: config.call_timeout(),
            max_task_bytes: config.max_task_bytes,
        };

        let timeout = config.startup_timeout();
        match bridge
            .channel
            .wait_while(STATUS_INITIALIZING, Some(timeout))
        {
            WaitOutcome::TimedOut => {
                error!(?timeout, "background worker did not become ready");
                bridge.abandon();
                return Err(BridgeFault::StartupTimeout(timeout).into());
            }
            WaitOutcome::Changed(_) if bridge.channel.is_lost() => {
                let reason = startup_rx
                    .try_recv()
                    .unwrap_or_else(|_| "worker exited during startup".to_string());
                error!(reason = %reason, "background worker failed to start");
                bridge.join_worker();
                return Err(BridgeFault::StartupFailed(reason).into());
            }
            WaitOutcome::Changed(_) => {}
        }

        debug!(
            capacity = bridge.channel.capacity(),
            call_timeout = ?bridge.call_timeout,
            "bridge ready"
        );
        Ok(bridge)
    }

    /// Invoke `method` and block until its outcome is available.
    ///
    /// Returns the remote call's data, the rehydrated remote failure, or a
    /// bridge fault. Invalid calls are rejected before anything blocks.
    pub fn call_sync(&self, method: &str, args: Vec<Value>) -> Result<Value> {
        let task = Task::new(method, args);
        task.validate(self.max_task_bytes)
            .map_err(|e| Error::InvalidCall(e.to_string()))?;

        let tasks = self.tasks.as_ref().ok_or(BridgeFault::Shutdown)?;
        // Status turns free before the result is read back
        let _call = self.call_guard.try_lock().ok_or_else(|| {
            Error::InvalidCall("another call is already in flight".to_string())
        })?;
        if self.channel.is_lost() {
            return Err(BridgeFault::Lost.into());
        }
        self.channel.mark_busy().map_err(|status| {
            Error::InvalidCall(format!(
                "another call is already in flight (status {})",
                status
            ))
        })?;

        debug!(method, "dispatching task");
        if tasks.send(task).is_err() {
            error!(method, "background worker is gone; cannot dispatch");
            self.channel.force_release();
            return Err(BridgeFault::Lost.into());
        }

        if let WaitOutcome::TimedOut = self.channel.wait_while(STATUS_BUSY, self.call_timeout) {
            let timeout = self.call_timeout.unwrap_or_default();
            error!(method, ?timeout, "no result in time; abandoning bridge");
            self.channel.force_release();
            return Err(BridgeFault::CallTimeout(timeout).into());
        }
        if self.channel.is_lost() {
            error!(method, "background worker lost while call was in flight");
            return Err(BridgeFault::Lost.into());
        }

        let result = self.channel.read_result().map_err(|e| self.protocol_fault(e))?;
        let outcome =
            codec::decode_outcome(&result.bytes, result.is_error).map_err(|e| self.protocol_fault(e))?;

        if outcome.is_error {
            let descriptor = outcome
                .error_descriptor()
                .map_err(|e| self.protocol_fault(e))?;
            return Err(Error::Remote(RemoteFailure::new(descriptor, outcome.response)));
        }
        Ok(outcome.data)
    }

    /// Typed variant of [`call_sync`](Self::call_sync).
    ///
    /// `args` follows [`Task::from_serialize`]: tuples and arrays spread into
    /// positional arguments.
    pub fn call_as<T, A>(&self, method: &str, args: &A) -> Result<T>
    where
        T: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let task =
            Task::from_serialize(method, args).map_err(|e| Error::InvalidCall(e.to_string()))?;
        let data = self.call_sync(&task.method, task.args)?;
        serde_json::from_value(data).map_err(|source| Error::Decode {
            method: method.to_string(),
            source,
        })
    }

    /// True while a task is dispatched and its outcome not yet published.
    pub fn in_flight(&self) -> bool {
        self.channel.status() == STATUS_BUSY
    }

    /// True once the bridge has been abandoned.
    pub fn is_lost(&self) -> bool {
        self.channel.is_lost()
    }

    /// Stop the worker and wait for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn protocol_fault(&self, err: impl std::fmt::Display) -> Error {
        error!(error = %err, "channel protocol violation; abandoning bridge");
        self.channel.force_release();
        BridgeFault::Protocol(err.to_string()).into()
    }

    /// Mark the bridge lost and detach from the worker without joining.
    fn abandon(&mut self) {
        self.channel.force_release();
        self.tasks = None;
        self.worker = None;
    }

    fn join_worker(&mut self) {
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                debug!("background worker panicked");
            }
        }
    }

    fn stop(&mut self) {
        self.tasks = None;
        let Some(handle) = self.worker.take() else {
            return;
        };
        // An abandoned worker may be stuck inside a remote call
        if self.channel.is_lost() && !handle.is_finished() {
            debug!("detaching from abandoned background worker");
            return;
        }
        if handle.join().is_err() {
            debug!("background worker panicked");
        }
        debug!("bridge shut down");
    }
}

impl Drop for SyncBridge {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SyncBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncBridge")
            .field("channel", &self.channel)
            .field("running", &self.tasks.is_some())
            .field("call_timeout", &self.call_timeout)
            .field("max_task_bytes", &self.max_task_bytes)
            .finish()
    }
}
