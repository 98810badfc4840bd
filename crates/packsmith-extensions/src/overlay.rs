//! Build directory preparation and extension overlays

use crate::descriptor::ExtensionDescriptor;
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Copy the versions template to `<output_dir>/<name>`, replacing any previous build
pub fn prepare_build_dir(versions_dir: &Path, output_dir: &Path, name: &str) -> Result<PathBuf> {
    if !versions_dir.is_dir() {
        bail!("Versions directory not found: {}", versions_dir.display());
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let target = output_dir.join(name);

    let source = versions_dir.canonicalize()?;
    if output_dir.canonicalize()?.starts_with(&source) {
        bail!(
            "Output directory {} must not be inside {}",
            output_dir.display(),
            versions_dir.display()
        );
    }

    if target.exists() {
        info!("Removing existing build directory: {}", target.display());
        fs::remove_dir_all(&target)
            .with_context(|| format!("Failed to remove {}", target.display()))?;
    }

    let copied = copy_tree(versions_dir, &target)?;
    info!(
        "Copied {} file(s) from {} to {}",
        copied,
        versions_dir.display(),
        target.display()
    );
    Ok(target)
}

/// Copy the descriptor's sibling `versions/` directory over `target`
///
/// Existing files are overwritten. Returns the number of files copied; a
/// missing or empty overlay directory copies nothing.
pub fn overlay_extension(descriptor: &ExtensionDescriptor, target: &Path) -> Result<usize> {
    let overlay = descriptor.overlay_dir();
    if !overlay.is_dir() {
        debug!("{} has no overlay directory", descriptor.display_name());
        return Ok(0);
    }

    let copied = copy_tree(&overlay, target)?;
    if copied > 0 {
        info!(
            "Overlaid {} file(s) from {} ({})",
            copied,
            overlay.display(),
            descriptor.display_name()
        );
    } else {
        debug!("Overlay directory {} is empty", overlay.display());
    }
    Ok(copied)
}

/// Apply every descriptor's overlay in order
///
/// An overlay that fails to copy is logged and skipped; files it copied
/// before failing stay in place. Returns the total number of files copied.
pub fn overlay_extensions(descriptors: &[ExtensionDescriptor], target: &Path) -> usize {
    descriptors
        .iter()
        .map(|descriptor| match overlay_extension(descriptor, target) {
            Ok(copied) => copied,
            Err(e) => {
                warn!(
                    "Skipping overlay from {}: {:#}",
                    descriptor.display_name(),
                    e
                );
                0
            }
        })
        .sum()
}

/// Recursively copy `source` into `target`, merging with what is there
fn copy_tree(source: &Path, target: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.with_context(|| format!("Failed to walk {}", source.display()))?;
        let relative = entry.path().strip_prefix(source)?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)
                .with_context(|| format!("Failed to create {}", destination.display()))?;
        } else {
            fs::copy(entry.path(), &destination).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    entry.path().display(),
                    destination.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_rejects_nested_output() {
        let temp = TempDir::new().unwrap();
        let versions = temp.path().join("versions");
        fs::create_dir_all(versions.join("fabric/1.20.1")).unwrap();

        let result = prepare_build_dir(&versions, &versions.join("build"), "x");
        assert!(result.is_err());
    }

    #[test]
    fn test_prepare_requires_versions_dir() {
        let temp = TempDir::new().unwrap();
        let result = prepare_build_dir(&temp.path().join("nope"), &temp.path().join("build"), "x");
        assert!(result.is_err());
    }
}
