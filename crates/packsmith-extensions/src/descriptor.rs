//! Extension descriptor loading
//!
//! An extension descriptor is a TOML document:
//!
//! ```toml
//! [extensions]
//! name = "Opti Utils"
//! version = "1.2.0"
//!
//! [[mod]]
//! name = "Sodium"
//! fabric = { "1.20.1" = "https://modrinth.com/mod/sodium/version/mc1.20.1-0.5.3" }
//! ```
//!
//! Loader tables other than `fabric`, `forge` and `neoforge` are ignored so
//! that descriptors written for newer loaders still load.

use packsmith_core::types::Loader;
use packsmith_core::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name used for descriptors and mods that do not declare one
pub const UNNAMED: &str = "Unnamed";

/// The `[extensions]` table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DescriptorMetadata {
    pub name: Option<String>,
    pub version: Option<String>,

    /// Free-form keys kept as-is
    #[serde(flatten)]
    pub extra: toml::Table,
}

/// One `[[mod]]` entry: a mod name and a URL per (loader, game version)
#[derive(Debug, Clone, PartialEq)]
pub struct ModEntry {
    pub name: String,
    pub per_loader: BTreeMap<Loader, BTreeMap<String, String>>,
}

impl ModEntry {
    /// Iterate every (loader, game version, url) this entry defines
    pub fn targets(&self) -> impl Iterator<Item = (Loader, &str, &str)> + '_ {
        self.per_loader.iter().flat_map(|(loader, versions)| {
            versions
                .iter()
                .map(move |(version, url)| (*loader, version.as_str(), url.as_str()))
        })
    }

    fn from_table(table: &toml::Table, source: &Path) -> Self {
        let name = table
            .get("name")
            .and_then(toml::Value::as_str)
            .unwrap_or(UNNAMED)
            .to_string();

        let mut per_loader = BTreeMap::new();
        for loader in Loader::ALL {
            let Some(value) = table.get(loader.as_str()) else {
                continue;
            };
            let Some(versions) = value.as_table() else {
                warn!(
                    "{}: mod '{}' has a non-table '{}' entry, ignoring it",
                    source.display(),
                    name,
                    loader
                );
                continue;
            };

            let mut urls = BTreeMap::new();
            for (version, url) in versions {
                match url.as_str() {
                    Some(url) => {
                        urls.insert(version.clone(), url.to_string());
                    }
                    None => warn!(
                        "{}: mod '{}' {}/{} has a non-string URL, ignoring it",
                        source.display(),
                        name,
                        loader,
                        version
                    ),
                }
            }
            if !urls.is_empty() {
                per_loader.insert(loader, urls);
            }
        }

        Self { name, per_loader }
    }
}

/// A parsed descriptor file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionDescriptor {
    pub metadata: DescriptorMetadata,
    pub mods: Vec<ModEntry>,
    pub source_path: PathBuf,
}

#[derive(Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    extensions: DescriptorMetadata,

    #[serde(default, rename = "mod")]
    mods: Vec<toml::Table>,
}

impl ExtensionDescriptor {
    /// Parse descriptor text; `source_path` is recorded for overlays and messages
    pub fn parse(content: &str, source_path: impl Into<PathBuf>) -> Result<Self> {
        let source_path = source_path.into();
        let raw: RawDescriptor = toml::from_str(content)
            .map_err(|e| Error::toml_parse(source_path.display().to_string(), e))?;

        let mods = raw
            .mods
            .iter()
            .map(|table| ModEntry::from_table(table, &source_path))
            .collect();

        Ok(Self {
            metadata: raw.extensions,
            mods,
            source_path,
        })
    }

    /// Read and parse a descriptor file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::config_not_found(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    pub fn display_name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or(UNNAMED)
    }

    pub fn display_version(&self) -> &str {
        self.metadata.version.as_deref().unwrap_or("N/A")
    }

    /// The `versions/` directory next to the descriptor file
    pub fn overlay_dir(&self) -> PathBuf {
        self.source_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("versions")
    }
}

/// Load every descriptor that parses, in input order
///
/// Missing or malformed files are logged and skipped. An empty result is
/// left for the caller to treat as fatal.
pub fn load_descriptors<P: AsRef<Path>>(paths: &[P]) -> Vec<ExtensionDescriptor> {
    let mut descriptors = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        match ExtensionDescriptor::load(path) {
            Ok(descriptor) => {
                info!(
                    "Loaded extension: {} ({}) from {}",
                    descriptor.display_name(),
                    descriptor.display_version(),
                    path.display()
                );
                debug!("{} declares {} mod(s)", path.display(), descriptor.mods.len());
                descriptors.push(descriptor);
            }
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[extensions]
name = "Opti Utils"
version = "1.2.0"
author = "someone"

[[mod]]
name = "Sodium"
fabric = { "1.20.1" = "https://modrinth.com/mod/sodium" }

[[mod]]
name = "JEI"
forge = { "1.20.1" = "https://www.curseforge.com/minecraft/mc-mods/jei", "1.19.2" = "https://www.curseforge.com/minecraft/mc-mods/jei" }
quilt = { "1.20.1" = "https://modrinth.com/mod/jei" }
"#;

    #[test]
    fn test_parse_metadata_and_extra_keys() {
        let d = ExtensionDescriptor::parse(SAMPLE, "ext/extensions.toml").unwrap();
        assert_eq!(d.display_name(), "Opti Utils");
        assert_eq!(d.display_version(), "1.2.0");
        assert_eq!(
            d.metadata.extra.get("author").and_then(|v| v.as_str()),
            Some("someone")
        );
    }

    #[test]
    fn test_unknown_loader_keys_ignored() {
        let d = ExtensionDescriptor::parse(SAMPLE, "ext/extensions.toml").unwrap();
        let jei = &d.mods[1];
        assert_eq!(jei.per_loader.len(), 1);
        assert_eq!(jei.targets().count(), 2);
        assert!(jei.targets().all(|(loader, _, _)| loader == Loader::Forge));
    }

    #[test]
    fn test_missing_names_default() {
        let d = ExtensionDescriptor::parse(
            "[[mod]]\nfabric = { \"1.20.1\" = \"https://modrinth.com/mod/x\" }\n",
            "x.toml",
        )
        .unwrap();
        assert_eq!(d.display_name(), UNNAMED);
        assert_eq!(d.display_version(), "N/A");
        assert_eq!(d.mods[0].name, UNNAMED);
    }

    #[test]
    fn test_non_string_url_skipped() {
        let d = ExtensionDescriptor::parse(
            "[[mod]]\nname = \"A\"\nfabric = { \"1.20.1\" = 5, \"1.20.4\" = \"https://modrinth.com/mod/a\" }\n",
            "x.toml",
        )
        .unwrap();
        let targets: Vec<_> = d.mods[0].targets().collect();
        assert_eq!(targets, vec![(Loader::Fabric, "1.20.4", "https://modrinth.com/mod/a")]);
    }

    #[test]
    fn test_overlay_dir_is_sibling() {
        let d = ExtensionDescriptor::parse("", "packs/opti/extensions.toml").unwrap();
        assert_eq!(d.overlay_dir(), PathBuf::from("packs/opti/versions"));
    }

    #[test]
    fn test_load_descriptors_skips_bad_inputs() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("good.toml");
        let bad = temp.path().join("bad.toml");
        std::fs::write(&good, SAMPLE).unwrap();
        std::fs::write(&bad, "[extensions\nname = ").unwrap();
        let missing = temp.path().join("missing.toml");

        let loaded = load_descriptors(&[&missing, &bad, &good]);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].source_path, good);
    }
}
