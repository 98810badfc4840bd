//! # packsmith-core
//!
//! Core library for the packsmith CLI providing:
//! - Runtime configuration loading (defaults, files, environment)
//! - Shared domain types (mod loaders, source platforms, retry policies)
//! - Retry execution engine with policy-based backoff

pub mod config;
pub mod error;
pub mod retry;
pub mod types;
pub mod utils;

pub use config::HierarchicalConfigLoader;
pub use error::{Error, Result};
pub use utils::get_home_dir;
