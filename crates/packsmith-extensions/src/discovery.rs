//! Version directory discovery
//!
//! Buildable units live at `<base>/<loader>/<game-version>/`. The tree is
//! scanned fresh on every call; nothing is cached between phases because
//! overlays and copies change it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One `<loader>/<game-version>` directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDirectory {
    /// Loader directory name; not restricted to known loaders
    pub loader: String,
    pub game_version: String,
    pub path: PathBuf,
}

impl VersionDirectory {
    pub fn new(loader: impl Into<String>, game_version: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            loader: loader.into(),
            game_version: game_version.into(),
            path: path.into(),
        }
    }

    /// Describe an arbitrary directory, taking the loader and version from
    /// its last two path components
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let component = |p: Option<&Path>| {
            p.and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let game_version = component(Some(&path));
        let loader = component(path.parent());
        Self {
            loader,
            game_version,
            path,
        }
    }

    /// `loader/version`
    pub fn group_key(&self) -> String {
        format!("{}/{}", self.loader, self.game_version)
    }
}

/// List every `<loader>/<game-version>` directory under `base`
///
/// A missing `base` yields an empty list. Results are sorted by loader, then
/// version, so plans and progress output are stable between runs.
pub fn discover_versions(base: &Path) -> Result<Vec<VersionDirectory>> {
    if !base.is_dir() {
        debug!("{} is not a directory, no versions discovered", base.display());
        return Ok(Vec::new());
    }

    let mut found = Vec::new();
    for loader_dir in sorted_subdirs(base)? {
        let Some(loader) = utf8_name(&loader_dir) else {
            continue;
        };
        for version_dir in sorted_subdirs(&loader_dir)? {
            let Some(game_version) = utf8_name(&version_dir) else {
                continue;
            };
            found.push(VersionDirectory::new(loader.clone(), game_version, version_dir));
        }
    }

    debug!("Discovered {} version directories under {}", found.len(), base.display());
    Ok(found)
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn utf8_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str().map(str::to_string);
    if name.is_none() {
        warn!("Skipping non UTF-8 directory name: {}", path.display());
    }
    name
}
