//! Extension handling for packsmith
//!
//! This crate handles:
//! - Loading extension descriptors (`extensions.toml`)
//! - Merging mod entries with last-writer-wins per (name, loader, version)
//! - Discovering `<loader>/<game-version>` directories
//! - Planning install, sync, update and export work items
//! - Running work items through packwiz on a bounded pool with retry
//! - Aggregating failures per target
//! - Build directory preparation, overlays and pack version suffixes

pub mod descriptor;
pub mod discovery;
pub mod executor;
pub mod export;
pub mod merge;
pub mod overlay;
pub mod pack_manifest;
pub mod planner;
pub mod report;
pub mod resources;
pub mod tool;

pub use descriptor::{load_descriptors, DescriptorMetadata, ExtensionDescriptor, ModEntry};
pub use discovery::{discover_versions, VersionDirectory};
pub use executor::{ExecutionSummary, ProgressSink, TaskExecutor, TaskOutcome};
pub use merge::{merge_mods, merge_names, MergedModSet, ModKey};
pub use planner::{InstallPlan, SyncPlan, WorkAction, WorkItem};
pub use report::{FailureGroup, FailureReport};
pub use resources::ResourceKind;
pub use tool::{PackTool, PackwizTool, ToolError};
