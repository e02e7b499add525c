// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared result channel between the blocking caller and the background worker.
//!
//! The channel is a control region of atomic slots plus a fixed-capacity
//! data region. Requests never travel through it; only results do.
//!
//! Protocol:
//! - `status` starts at [`STATUS_INITIALIZING`]; the worker moves it to
//!   [`STATUS_FREE`] once ready.
//! - The caller moves `status` from free to [`STATUS_BUSY`] before posting a
//!   task, then parks until it changes.
//! - The worker writes the result, then `result_size`/`is_error`/
//!   `result_location`, then stores free and notifies.
//!
//! Results larger than the data region are written to a single-use overflow
//! file whose UTF-8 path is stored inline instead. The reader deletes it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Status slot values.
pub const STATUS_FREE: u32 = 0;
pub const STATUS_BUSY: u32 = 1;
pub const STATUS_INITIALIZING: u32 = 2;

/// Result location slot values.
pub const LOCATION_INLINE: u32 = 0;
pub const LOCATION_FILE: u32 = 1;

/// Default data region size (16 MiB).
pub const DEFAULT_CAPACITY: usize = 16 * 1024 * 1024;

/// Prefix of overflow file names.
const OVERFLOW_PREFIX: &str = "sb-result-";

/// Raw result bytes read back from the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelResult {
    /// Serialized payload.
    pub bytes: Vec<u8>,
    /// Error flag from the control region.
    pub is_error: bool,
}

/// Outcome of a blocking wait on the status slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Status changed to the contained value.
    Changed(u32),
    /// Deadline passed with the status unchanged.
    TimedOut,
}

/// Control + data regions shared by exactly one caller and one worker.
pub struct SharedChannel {
    status: AtomicU32,
    result_size: AtomicU64,
    is_error: AtomicU32,
    result_location: AtomicU32,
    lost: AtomicBool,
    data: Mutex<Box<[u8]>>,
    signal: Mutex<()>,
    wakeup: Condvar,
    overflow_dir: PathBuf,
}

impl SharedChannel {
    /// Allocate the channel with a data region of `capacity` bytes.
    ///
    /// Overflow files go to `overflow_dir`, or the system temp directory.
    pub fn reserve(capacity: usize, overflow_dir: Option<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            status: AtomicU32::new(STATUS_INITIALIZING),
            result_size: AtomicU64::new(0),
            is_error: AtomicU32::new(0),
            result_location: AtomicU32::new(LOCATION_INLINE),
            lost: AtomicBool::new(false),
            data: Mutex::new(vec![0u8; capacity].into_boxed_slice()),
            signal: Mutex::new(()),
            wakeup: Condvar::new(),
            overflow_dir: overflow_dir.unwrap_or_else(std::env::temp_dir),
        })
    }

    /// Data region capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.data.lock().len()
    }

    /// Directory receiving overflow files.
    pub fn overflow_dir(&self) -> &Path {
        &self.overflow_dir
    }

    /// Current status slot value.
    pub fn status(&self) -> u32 {
        self.status.load(Ordering::SeqCst)
    }

    /// Claim the channel for one task.
    ///
    /// Fails with the observed status if the channel is not free.
    pub fn mark_busy(&self) -> std::result::Result<(), u32> {
        self.status
            .compare_exchange(STATUS_FREE, STATUS_BUSY, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
    }

    /// Release the channel. Only called after the result has been written.
    pub fn mark_free(&self) {
        self.status.store(STATUS_FREE, Ordering::SeqCst);
    }

    /// Announce the end of the startup handshake.
    ///
    /// Fails with the observed status unless the channel is initializing.
    pub fn mark_ready(&self) -> std::result::Result<(), u32> {
        self.status
            .compare_exchange(
                STATUS_INITIALIZING,
                STATUS_FREE,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .map(|_| ())?;
        self.notify();
        Ok(())
    }

    /// Wake every waiter parked in [`wait_while`](Self::wait_while).
    pub fn notify(&self) {
        let _guard = self.signal.lock();
        self.wakeup.notify_all();
    }

    /// Park while `status == current`, up to `timeout` if given.
    pub fn wait_while(&self, current: u32, timeout: Option<Duration>) -> WaitOutcome {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut guard = self.signal.lock();
        loop {
            let observed = self.status.load(Ordering::SeqCst);
            if observed != current {
                return WaitOutcome::Changed(observed);
            }
            match deadline {
                None => self.wakeup.wait(&mut guard),
                Some(deadline) => {
                    if self.wakeup.wait_until(&mut guard, deadline).timed_out() {
                        let observed = self.status.load(Ordering::SeqCst);
                        if observed != current {
                            return WaitOutcome::Changed(observed);
                        }
                        return WaitOutcome::TimedOut;
                    }
                }
            }
        }
    }

    /// Deadlock breaker: flag the channel lost, force it free, and wake waiters.
    pub fn force_release(&self) {
        self.lost.store(true, Ordering::SeqCst);
        self.status.store(STATUS_FREE, Ordering::SeqCst);
        self.notify();
    }

    /// True once [`force_release`](Self::force_release) has run.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::SeqCst)
    }

    /// Write a result. Worker side only.
    ///
    /// Payloads that do not fit are spilled to an overflow file.
    pub fn write_result(&self, bytes: &[u8], is_error: bool) -> Result<()> {
        let mut data = self.data.lock();
        if bytes.len() <= data.len() {
            data[..bytes.len()].copy_from_slice(bytes);
            self.result_location.store(LOCATION_INLINE, Ordering::SeqCst);
            self.result_size.store(bytes.len() as u64, Ordering::SeqCst);
        } else {
            let path = self.write_overflow(bytes)?;
            let encoded = match path.to_str() {
                Some(p) if p.len() <= data.len() => p.as_bytes(),
                _ => {
                    let _ = fs::remove_file(&path);
                    return Err(Error::ChannelProtocol(format!(
                        "overflow path {} does not fit in a {} byte data region",
                        path.display(),
                        data.len()
                    )));
                }
            };
            data[..encoded.len()].copy_from_slice(encoded);
            self.result_location.store(LOCATION_FILE, Ordering::SeqCst);
            self.result_size.store(encoded.len() as u64, Ordering::SeqCst);
            debug!(
                size = bytes.len(),
                path = %path.display(),
                "result spilled to overflow file"
            );
        }
        self.is_error.store(u32::from(is_error), Ordering::SeqCst);
        Ok(())
    }

    /// Read the current result. Caller side only, after observing free.
    ///
    /// Overflow files are consumed and deleted.
    pub fn read_result(&self) -> Result<ChannelResult> {
        let data = self.data.lock();
        let size = usize::try_from(self.result_size.load(Ordering::SeqCst))
            .unwrap_or(usize::MAX);
        if size > data.len() {
            return Err(Error::ChannelProtocol(format!(
                "result size {} exceeds data region capacity {}",
                size,
                data.len()
            )));
        }
        let is_error = self.is_error.load(Ordering::SeqCst) == 1;

        match self.result_location.load(Ordering::SeqCst) {
            LOCATION_INLINE => Ok(ChannelResult {
                bytes: data[..size].to_vec(),
                is_error,
            }),
            LOCATION_FILE => {
                let path = std::str::from_utf8(&data[..size])
                    .map(PathBuf::from)
                    .map_err(|e| {
                        Error::ChannelProtocol(format!("overflow path is not UTF-8: {}", e))
                    })?;
                drop(data);
                let read = fs::read(&path);
                if let Err(e) = fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %e, "failed to remove overflow file");
                }
                Ok(ChannelResult {
                    bytes: read?,
                    is_error,
                })
            }
            other => Err(Error::ChannelProtocol(format!(
                "unknown result location {}",
                other
            ))),
        }
    }

    fn write_overflow(&self, bytes: &[u8]) -> Result<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix(OVERFLOW_PREFIX)
            .suffix(".json")
            .tempfile_in(&self.overflow_dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|e| Error::Io(e.error))?;
        Ok(path)
    }
}

impl std::fmt::Debug for SharedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedChannel")
            .field("status", &self.status())
            .field("lost", &self.is_lost())
            .field("overflow_dir", &self.overflow_dir)
            .finish()
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
