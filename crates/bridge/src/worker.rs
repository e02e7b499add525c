// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Background half of the bridge.
//!
//! The worker owns a current-thread tokio runtime on a dedicated OS thread.
//! It receives [`Task`]s over an unbounded channel, runs each one through the
//! retry engine, and publishes the [`Outcome`] to the shared channel.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info_span, warn, Instrument};

use sb_core::{RetryEngine, RetryOptions, SharedChannel};
use sb_ipc::{codec, Outcome, Task};

use crate::registry::{unknown_method, AuthContext, Registry};

/// Name of the background thread.
pub const WORKER_THREAD_NAME: &str = "syncbridge-worker";

/// Everything the worker needs to execute tasks.
pub(crate) struct WorkerContext {
    pub(crate) channel: Arc<SharedChannel>,
    pub(crate) registry: Registry,
    pub(crate) engine: RetryEngine,
    pub(crate) default_options: RetryOptions,
}

/// How the worker loop ended.
enum Exit {
    /// The task sender was dropped.
    Drained,
    /// The worker cannot go on; the bridge must be abandoned.
    Failed(String),
}

/// Forces the channel free if the worker thread ends without a clean drain.
///
/// Dropped on normal return and during unwinding alike, so a panicking
/// remote call still wakes a blocked caller.
struct ReleaseGuard {
    channel: Arc<SharedChannel>,
    armed: bool,
}

impl ReleaseGuard {
    fn new(channel: Arc<SharedChannel>) -> Self {
        Self {
            channel,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if self.armed || thread::panicking() {
            error!(
                panicking = thread::panicking(),
                "background worker terminated unexpectedly; releasing blocked caller"
            );
            self.channel.force_release();
        }
    }
}

/// Spawn the worker thread.
///
/// A startup failure reason is sent over `startup` before the thread exits.
pub(crate) fn spawn(
    ctx: WorkerContext,
    tasks: mpsc::UnboundedReceiver<Task>,
    startup: oneshot::Sender<String>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || run_thread(ctx, tasks, startup))
}

fn run_thread(
    ctx: WorkerContext,
    tasks: mpsc::UnboundedReceiver<Task>,
    startup: oneshot::Sender<String>,
) {
    let mut guard = ReleaseGuard::new(Arc::clone(&ctx.channel));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            let _ = startup.send(format!("cannot build runtime: {}", e));
            return;
        }
    };

    match runtime.block_on(run(&ctx, tasks, startup)) {
        Exit::Drained => {
            debug!("task channel closed; background worker exiting");
            guard.disarm();
        }
        Exit::Failed(reason) => {
            error!(reason = %reason, "background worker failed");
        }
    }
}

async fn run(
    ctx: &WorkerContext,
    mut tasks: mpsc::UnboundedReceiver<Task>,
    startup: oneshot::Sender<String>,
) -> Exit {
    // Warm the credential cache before announcing readiness
    if let Err(e) = ctx.engine.credentials().access_token().await {
        let reason = format!("cannot acquire credentials: {}", e);
        let _ = startup.send(reason.clone());
        return Exit::Failed(reason);
    }
    if let Err(status) = ctx.channel.mark_ready() {
        let reason = format!("channel not initializing at startup (status {})", status);
        let _ = startup.send(reason.clone());
        return Exit::Failed(reason);
    }
    debug!(methods = ?ctx.registry.methods(), "background worker ready");

    while let Some(task) = tasks.recv().await {
        let span = info_span!("task", method = %task.method);
        let outcome = execute(ctx, task).instrument(span).await;
        if let Err(reason) = publish(&ctx.channel, &outcome) {
            return Exit::Failed(reason);
        }
    }
    Exit::Drained
}

/// Run one task to completion, always producing an outcome.
async fn execute(ctx: &WorkerContext, task: Task) -> Outcome {
    let Some(entry) = ctx.registry.get(&task.method) else {
        warn!("no remote call registered under this name");
        return Outcome::failure(&unknown_method(&task.method));
    };
    debug!(args = task.args.len(), "executing task");

    let options = entry.options.as_ref().unwrap_or(&ctx.default_options);
    let credentials = Arc::clone(ctx.engine.credentials());
    let call = Arc::clone(&entry.call);
    let args = task.args;

    let result = ctx
        .engine
        .retry(
            &task.method,
            || {
                let credentials = Arc::clone(&credentials);
                let call = Arc::clone(&call);
                let args = args.clone();
                async move {
                    let token = credentials.access_token().await?;
                    call.call(AuthContext::new(token), args).await
                }
            },
            options,
        )
        .await;

    match result {
        Ok(response) => Outcome::success(response),
        Err(err) => Outcome::failure(&err),
    }
}

/// Write the outcome, release the channel, and wake the caller.
fn publish(channel: &SharedChannel, outcome: &Outcome) -> Result<(), String> {
    if channel.is_lost() {
        debug!("caller abandoned the bridge; dropping outcome");
        return Ok(());
    }
    let bytes = codec::encode_outcome(outcome).map_err(|e| e.to_string())?;
    channel
        .write_result(&bytes, outcome.is_error)
        .map_err(|e| format!("cannot write result: {}", e))?;
    channel.mark_free();
    channel.notify();
    Ok(())
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
