//! Command implementations

pub mod build;
pub mod common;
pub mod export;
pub mod sync;
pub mod update;
