//! Common test utilities for packsmith-extensions
//!
//! - A scripted `PackTool` mock that records invocations
//! - Builders for descriptor files and version trees

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
