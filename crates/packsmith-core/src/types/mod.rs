//! Type definitions shared across packsmith crates

mod loader;
mod platform;
mod runtime_config;

pub use loader::*;
pub use platform::*;
pub use runtime_config::*;
