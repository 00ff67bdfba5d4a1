//! Cooperative shutdown barrier.
//!
//! Every public operation registers with the gate for its whole duration.
//! Closing the gate is a one-way latch: new operations are refused
//! immediately, and [`OperationGate::close`] blocks until the operations
//! already in flight have finished, so resources can be torn down safely.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Returned by [`OperationGate::begin`] once shutdown has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("shutdown in progress")]
pub struct GateClosed;

pub struct OperationGate {
    closed: AtomicBool,
    in_flight: Mutex<usize>,
    drained: Condvar,
}

/// Registration of one in-flight operation; released on drop.
#[must_use = "the operation is only registered while the guard is alive"]
pub struct OperationGuard<'a> {
    gate: &'a OperationGate,
}

impl OperationGate {
    pub fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
            in_flight: Mutex::new(0),
            drained: Condvar::new(),
        }
    }

    /// Register a new operation, or fail if shutdown has begun.
    pub fn begin(&self) -> Result<OperationGuard<'_>, GateClosed> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(GateClosed);
        }
        let mut count = self.in_flight.lock();
        // Re-check under the lock so a concurrent close() either sees this
        // operation counted or this call sees the latch.
        if self.closed.load(Ordering::SeqCst) {
            return Err(GateClosed);
        }
        *count += 1;
        Ok(OperationGuard { gate: self })
    }

    /// Refuse new operations and wait for in-flight ones to finish.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let mut count = self.in_flight.lock();
        if *count > 0 {
            tracing::debug!(in_flight = *count, "waiting for operations to drain");
        }
        while *count > 0 {
            self.drained.wait(&mut count);
        }
    }

    /// Like [`close`](Self::close) but gives up waiting after `timeout`.
    ///
    /// Returns `true` if every in-flight operation finished in time. The gate
    /// stays closed either way.
    pub fn close_timeout(&self, timeout: Duration) -> bool {
        self.closed.store(true, Ordering::SeqCst);
        let deadline = Instant::now() + timeout;
        let mut count = self.in_flight.lock();
        while *count > 0 {
            if self.drained.wait_until(&mut count, deadline).timed_out() {
                return *count == 0;
            }
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of operations currently registered.
    pub fn in_flight(&self) -> usize {
        *self.in_flight.lock()
    }

    fn end(&self) {
        let mut count = self.in_flight.lock();
        *count -= 1;
        if *count == 0 {
            self.drained.notify_all();
        }
    }
}

impl Default for OperationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.gate.end();
    }
}
