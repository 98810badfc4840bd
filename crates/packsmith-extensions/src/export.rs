//! Exported pack housekeeping

use packsmith_core::types::Platform;
use std::fs;
use std::io;
use crate::discovery::VersionDirectory;
use std::path::Path;
use tracing::{debug, warn};

/// Delete previously exported packs of `format` directly inside `dir`
///
/// Returns how many files were removed.
pub fn clean_previous_exports(dir: &Path, format: Platform) -> io::Result<usize> {
    let suffix = format!(".{}", format.export_extension());
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if name.to_string_lossy().ends_with(&suffix) {
            fs::remove_file(entry.path())?;
            debug!("Removed stale export {}", entry.path().display());
            removed += 1;
        }
    }

    Ok(removed)
}

/// Clean stale exports in every directory, warning about the ones that fail
///
/// Returns the total number of files removed.
pub fn clean_exports(dirs: &[VersionDirectory], format: Platform) -> usize {
    dirs.iter()
        .map(|dir| match clean_previous_exports(&dir.path, format) {
            Ok(removed) => removed,
            Err(e) => {
                warn!(
                    "Failed to clean old exports in {}: {}",
                    dir.path.display(),
                    e
                );
                0
            }
        })
        .sum()
}
