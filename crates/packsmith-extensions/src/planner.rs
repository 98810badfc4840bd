//! Work item planning
//!
//! Planners turn a merged mod set or a list of discovered directories into
//! `WorkItem`s. They read the file system but never run a process.

use crate::discovery::VersionDirectory;
use crate::merge::{MergedModSet, ModKey};
use crate::resources::{is_metadata_file, list_resources, spec_from_filename, ResourceKind};
use anyhow::{Context, Result};
use packsmith_core::types::Platform;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// What the packaging tool is asked to do in a target directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkAction {
    /// Add a mod from its hosting URL
    AddMod {
        mod_name: String,
        url: String,
        platform: Platform,
    },
    /// Install a resource declared by a `.pw.toml` metadata file
    InstallResource {
        spec: String,
        file_name: String,
        kind: ResourceKind,
        platform: Platform,
    },
    /// Refresh every mod to its latest version
    Update,
    /// Export the pack in the given format
    Export { format: Platform },
}

impl WorkAction {
    /// Short description used in progress lines and failure reports
    pub fn label(&self) -> String {
        match self {
            WorkAction::AddMod { mod_name, .. } => mod_name.clone(),
            WorkAction::InstallResource { file_name, .. } => file_name.clone(),
            WorkAction::Update => "update".to_string(),
            WorkAction::Export { format } => format!("export ({})", format),
        }
    }
}

impl fmt::Display for WorkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkAction::AddMod { mod_name, platform, .. } => {
                write!(f, "add {} from {}", mod_name, platform)
            }
            WorkAction::InstallResource { spec, platform, .. } => {
                write!(f, "install {} from {}", spec, platform)
            }
            WorkAction::Update => f.write_str("update all"),
            WorkAction::Export { format } => write!(f, "export {}", format),
        }
    }
}

/// One invocation of the packaging tool, consumed exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub target: VersionDirectory,
    pub action: WorkAction,
    /// Failure report grouping, e.g. `fabric/1.20.1` or `mods`
    pub group: String,
}

impl WorkItem {
    pub fn new(target: VersionDirectory, action: WorkAction) -> Self {
        let group = target.group_key();
        Self {
            target,
            action,
            group,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn label(&self) -> String {
        self.action.label()
    }
}

/// Install items plus the triples that had no matching directory
#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
    pub items: Vec<WorkItem>,
    /// Triples without a `<loader>/<version>` directory; informational only
    pub dropped: Vec<ModKey>,
}

/// Expand a merged mod set against the discovered directories
///
/// Each item's platform comes from its URL. Triples whose (loader, version)
/// directory does not exist are listed in `dropped` and never become items.
pub fn plan_install(merged: &MergedModSet, dirs: &[VersionDirectory]) -> InstallPlan {
    let index: HashMap<(&str, &str), &VersionDirectory> = dirs
        .iter()
        .map(|d| ((d.loader.as_str(), d.game_version.as_str()), d))
        .collect();

    let mut plan = InstallPlan::default();
    for (key, url) in merged.iter() {
        match index.get(&(key.loader.as_str(), key.version.as_str())) {
            Some(dir) => plan.items.push(WorkItem::new(
                (*dir).clone(),
                WorkAction::AddMod {
                    mod_name: key.name.clone(),
                    url: url.to_string(),
                    platform: Platform::detect(url),
                },
            )),
            None => {
                debug!("No directory for {} [{}], dropping", key.name, key.group());
                plan.dropped.push(key.clone());
            }
        }
    }

    if !plan.dropped.is_empty() {
        info!(
            "{} mod target(s) have no matching version directory and were skipped",
            plan.dropped.len()
        );
    }
    plan
}

/// One update item per directory
pub fn plan_update(dirs: &[VersionDirectory]) -> Vec<WorkItem> {
    dirs.iter()
        .map(|d| WorkItem::new(d.clone(), WorkAction::Update))
        .collect()
}

/// One export item per directory
pub fn plan_export(dirs: &[VersionDirectory], format: Platform) -> Vec<WorkItem> {
    dirs.iter()
        .map(|d| WorkItem::new(d.clone(), WorkAction::Export { format }))
        .collect()
}

/// Sync work for one resource kind
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub kind: ResourceKind,
    pub items: Vec<WorkItem>,
    /// Source files already present in the target, by exact file name
    pub already_present: Vec<String>,
    /// Source files the tool cannot install (no `.pw.toml` metadata)
    pub unsupported: Vec<String>,
}

impl SyncPlan {
    /// Report grouping for this plan's items
    pub fn group(&self) -> &'static str {
        self.kind.dir_name()
    }
}

/// Plan installing `kind` resources present in `source` but not in `target`
pub fn plan_sync(
    source: &Path,
    target: &VersionDirectory,
    kind: ResourceKind,
    platform: Platform,
) -> Result<SyncPlan> {
    let wanted = list_resources(source, kind)
        .with_context(|| format!("Failed to list {} in {}", kind.label(), source.display()))?;
    let existing: HashSet<String> = list_resources(&target.path, kind)
        .with_context(|| format!("Failed to list {} in {}", kind.label(), target.path.display()))?
        .into_iter()
        .collect();

    let mut plan = SyncPlan {
        kind,
        items: Vec::new(),
        already_present: Vec::new(),
        unsupported: Vec::new(),
    };

    for file_name in wanted {
        if existing.contains(&file_name) {
            plan.already_present.push(file_name);
        } else if is_metadata_file(&file_name) {
            let action = WorkAction::InstallResource {
                spec: spec_from_filename(&file_name).to_string(),
                file_name,
                kind,
                platform,
            };
            plan.items.push(WorkItem::new(target.clone(), action).with_group(kind.dir_name()));
        } else {
            plan.unsupported.push(file_name);
        }
    }

    debug!(
        "Sync {}: {} to install, {} present, {} unsupported",
        kind.label(),
        plan.items.len(),
        plan.already_present.len(),
        plan.unsupported.len()
    );
    Ok(plan)
}
