//! Observation hooks for retry attempts

use std::fmt::Display;
use std::time::Duration;

/// Callbacks fired by `RetryExecutor` as attempts start, fail and finish
///
/// Errors are passed as `&dyn Display` so any operation error type can be
/// observed without boxing.
pub trait RetryObserver: Send + Sync {
    /// An attempt (1-indexed) is about to run
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// An attempt failed and the next one runs after `delay`
    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration);

    /// The operation succeeded on `attempt`
    fn on_success(&self, attempt: u32, total_duration: Duration);

    /// The final allowed attempt failed
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display);
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Display, _delay: Duration) {}

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Display) {}
}

/// Observer that writes retry events to `tracing`
///
/// Attempt starts log at DEBUG, retries at WARN, exhaustion at ERROR.
/// A success logs at INFO only when it took more than one attempt.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    operation: String,
}

impl TracingObserver {
    /// `operation` is attached to every event as a field, e.g. `fabric/1.20.1: add sodium`
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt,
            max_attempts,
            "starting attempt"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, retrying"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        tracing::error!(
            operation = %self.operation,
            attempts,
            error = %final_error,
            "giving up"
        );
    }
}
