//! Merging of extension descriptors
//!
//! Descriptors are merged in input order. The unit of override is the
//! (mod name, loader, game version) triple, not the whole mod: a later
//! descriptor that redefines Sodium for fabric/1.20.1 replaces only that URL
//! and leaves Sodium's other loaders and versions as they were.

use crate::descriptor::ExtensionDescriptor;
use packsmith_core::types::Loader;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

/// Characters that cannot appear in a portable file name
static NON_PORTABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[/\\:*?"<>|\x00-\x1f]"#).expect("forbidden-character regex is valid")
});

const UNNAMED_COMPONENT: &str = "unnamed";

/// Identity of one merged URL
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ModKey {
    pub name: String,
    pub loader: Loader,
    pub version: String,
}

impl ModKey {
    pub fn new(name: impl Into<String>, loader: Loader, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loader,
            version: version.into(),
        }
    }

    /// `loader/version`, the grouping used in reports
    pub fn group(&self) -> String {
        format!("{}/{}", self.loader, self.version)
    }
}

/// Exactly one URL per (name, loader, version)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedModSet {
    entries: BTreeMap<ModKey, String>,
}

impl MergedModSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the URL for `key`, returning the replaced URL
    pub fn upsert(&mut self, key: ModKey, url: impl Into<String>) -> Option<String> {
        self.entries.insert(key, url.into())
    }

    pub fn get(&self, name: &str, loader: Loader, version: &str) -> Option<&str> {
        self.entries
            .get(&ModKey::new(name, loader, version))
            .map(String::as_str)
    }

    /// Entries in key order (name, then loader, then version)
    pub fn iter(&self) -> impl Iterator<Item = (&ModKey, &str)> {
        self.entries.iter().map(|(key, url)| (key, url.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Combine descriptor names into one file-system safe build name
///
/// Each name is lowercased with spaces turned into hyphens; names are joined
/// with `-` in input order. Missing or blank names become `unnamed`.
pub fn merge_names(descriptors: &[ExtensionDescriptor]) -> String {
    descriptors
        .iter()
        .map(|d| sanitize_name(d.metadata.name.as_deref()))
        .collect::<Vec<_>>()
        .join("-")
}

fn sanitize_name(name: Option<&str>) -> String {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return UNNAMED_COMPONENT.to_string();
    };

    let lowered = name.to_lowercase().replace(' ', "-");
    let cleaned = NON_PORTABLE.replace_all(&lowered, "-").into_owned();

    // "." and ".." would resolve to the output directory or its parent
    if cleaned.chars().all(|c| c == '.') {
        UNNAMED_COMPONENT.to_string()
    } else {
        cleaned
    }
}

/// Merge mod entries from every descriptor, last writer wins per triple
pub fn merge_mods(descriptors: &[ExtensionDescriptor]) -> MergedModSet {
    let mut merged = MergedModSet::new();

    for descriptor in descriptors {
        for entry in &descriptor.mods {
            for (loader, version, url) in entry.targets() {
                let key = ModKey::new(entry.name.clone(), loader, version);
                if let Some(previous) = merged.upsert(key, url) {
                    if previous != url {
                        debug!(
                            "{} overrides {} [{}/{}]: {} -> {}",
                            descriptor.display_name(),
                            entry.name,
                            loader,
                            version,
                            previous,
                            url
                        );
                    }
                }
            }
        }
    }

    merged
}
