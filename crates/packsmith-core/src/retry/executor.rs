//! Retry loop driven by a `RetryPolicy`

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use crate::types::RetryPolicy;

use super::error::RetryError;
use super::observer::{NoOpObserver, RetryObserver};
use super::strategies::calculate_delay;

/// Builder for a `RetryExecutor`
///
/// ```rust
/// use packsmith_core::retry::{RetryExecutorBuilder, TracingObserver};
/// use packsmith_core::types::RetryPolicy;
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_observer(TracingObserver::new("fabric/1.20.1: update"))
///     .with_jitter(false)
///     .build();
/// ```
pub struct RetryExecutorBuilder<O = NoOpObserver> {
    policy: RetryPolicy,
    observer: O,
    jitter: bool,
}

impl Default for RetryExecutorBuilder<NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<NoOpObserver> {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            observer: NoOpObserver,
            jitter: true,
        }
    }
}

impl<O> RetryExecutorBuilder<O> {
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            observer,
            jitter: self.jitter,
        }
    }

    /// Enabled by default. Turn it off when delays must follow the policy
    /// table exactly.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn build(self) -> RetryExecutor<O> {
        RetryExecutor {
            policy: self.policy,
            observer: self.observer,
            jitter: self.jitter,
        }
    }
}

/// Executes an async operation until it succeeds or the policy runs out
///
/// Every error is retried; only the attempt budget ends the loop.
pub struct RetryExecutor<O> {
    policy: RetryPolicy,
    observer: O,
    jitter: bool,
}

impl<O> RetryExecutor<O>
where
    O: RetryObserver,
{
    /// Run `op` until it succeeds, returning its value and the attempt count
    ///
    /// A policy with `max_attempts == 0` never calls `op` and yields
    /// `RetryError::Cancelled`.
    pub async fn execute_counted<F, Fut, T, E>(&self, mut op: F) -> Result<(T, u32), RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let start = Instant::now();
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0;

        while attempt < max_attempts {
            attempt += 1;
            self.observer.on_attempt_start(attempt, max_attempts);

            let err = match op().await {
                Ok(value) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok((value, attempt));
                }
                Err(err) => err,
            };

            if attempt == max_attempts {
                self.observer.on_exhausted(attempt, &err);
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: err,
                    elapsed: start.elapsed(),
                });
            }

            let delay = calculate_delay(&self.policy, attempt, self.jitter);
            self.observer.on_attempt_failed(attempt, &err, delay);

            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        tracing::warn!("retry policy allows no attempts; operation skipped");
        Err(RetryError::Cancelled)
    }
}
