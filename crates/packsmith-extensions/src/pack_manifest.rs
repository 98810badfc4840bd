//! `pack.toml` version suffixing
//!
//! The file is edited as text rather than re-serialised: only the first
//! `version = "..."` line changes and every other byte is left as written.

use crate::discovery::discover_versions;
use anyhow::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

pub const PACK_MANIFEST: &str = "pack.toml";

static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*version\s*=\s*")([^"]*)(".*)$"#).expect("version line regex is valid")
});

/// Append `-suffix` to the first `version = "..."` value in `content`
///
/// Returns `None` when no such line exists.
pub fn suffix_version_line(content: &str, suffix: &str) -> Option<String> {
    let mut out = String::with_capacity(content.len() + suffix.len() + 1);
    let mut replaced = false;

    for line in content.split_inclusive('\n') {
        if replaced {
            out.push_str(line);
            continue;
        }

        let (body, ending) = split_line_ending(line);
        match VERSION_LINE.captures(body) {
            Some(caps) => {
                out.push_str(&caps[1]);
                out.push_str(&caps[2]);
                out.push('-');
                out.push_str(suffix);
                out.push_str(&caps[3]);
                out.push_str(ending);
                replaced = true;
            }
            None => out.push_str(line),
        }
    }

    replaced.then_some(out)
}

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Rewrite one `pack.toml` in place; `Ok(false)` when it has no version line
pub fn append_version_suffix(path: &Path, suffix: &str) -> packsmith_core::Result<bool> {
    let content = fs::read_to_string(path)?;
    match suffix_version_line(&content, suffix) {
        Some(updated) => {
            fs::write(path, updated)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Suffix every `<loader>/<version>/pack.toml` under `base`
///
/// Files that cannot be updated are logged and skipped. Returns how many
/// files were rewritten.
pub fn apply_suffix_to_tree(base: &Path, suffix: &str) -> Result<usize> {
    let mut updated = 0;

    for dir in discover_versions(base)? {
        let manifest = dir.path.join(PACK_MANIFEST);
        if !manifest.is_file() {
            continue;
        }
        match append_version_suffix(&manifest, suffix) {
            Ok(true) => {
                debug!("Suffixed version in {}", manifest.display());
                updated += 1;
            }
            Ok(false) => warn!("No version line in {}", manifest.display()),
            Err(e) => warn!("Failed to update {}: {}", manifest.display(), e),
        }
    }

    if updated > 0 {
        info!("Updated {} pack.toml file(s) with suffix '-{}'", updated, suffix);
    } else {
        warn!("No pack.toml files were updated");
    }
    Ok(updated)
}
