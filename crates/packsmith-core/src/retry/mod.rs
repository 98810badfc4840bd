//! Retry execution engine with policy-based configuration
//!
//! Every external tool invocation goes through this engine instead of a
//! hand-written loop, so the attempt budget and the delay table are one
//! injectable `RetryPolicy`.
//!
//! # Features
//!
//! - Delay strategies: None, Fixed, Exponential, Linear, explicit Sequence
//! - Optional jitter
//! - Observable attempts via the `RetryObserver` trait
//! - `TracingObserver` for structured logs
//! - Attempt counts reported on success as well as on failure
//!
//! # Example
//!
//! ```rust,no_run
//! use packsmith_core::retry::{RetryError, RetryExecutorBuilder, TracingObserver};
//! use packsmith_core::types::RetryPolicy;
//!
//! async fn example() -> Result<(String, u32), RetryError<std::io::Error>> {
//!     RetryExecutorBuilder::new()
//!         .with_policy(RetryPolicy::default())
//!         .with_observer(TracingObserver::new("fabric/1.20.1: update all"))
//!         .build()
//!         .execute_counted(|| async { Ok("done".to_string()) })
//!         .await
//! }
//! ```

mod error;
mod executor;
mod observer;
mod strategies;

pub use error::RetryError;
pub use executor::{RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, TracingObserver};
pub use strategies::calculate_delay;
