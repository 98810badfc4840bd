//! Fixture builders for descriptors and version trees

#![allow(dead_code)]

use packsmith_core::types::RetryPolicy;
use packsmith_extensions::descriptor::ExtensionDescriptor;
use std::fs;
use std::path::{Path, PathBuf};

/// Retry policy with the default shape but millisecond delays
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::sequence(3, vec![1, 3, 9])
}

/// Create `<base>/<loader>/<version>` for each `loader/version` entry
pub fn version_tree(base: &Path, dirs: &[&str]) {
    for dir in dirs {
        fs::create_dir_all(base.join(dir)).unwrap();
    }
}

/// Builder for descriptor TOML documents
pub struct DescriptorBuilder {
    name: Option<String>,
    version: Option<String>,
    mods: Vec<(String, Vec<(String, String, String)>)>,
}

impl DescriptorBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            version: Some("1.0.0".to_string()),
            mods: Vec::new(),
        }
    }

    pub fn unnamed() -> Self {
        Self {
            name: None,
            version: None,
            mods: Vec::new(),
        }
    }

    /// Add a `[[mod]]` entry with (loader, game version, url) targets
    pub fn with_mod(mut self, name: &str, targets: &[(&str, &str, &str)]) -> Self {
        let targets = targets
            .iter()
            .map(|(l, v, u)| (l.to_string(), v.to_string(), u.to_string()))
            .collect();
        self.mods.push((name.to_string(), targets));
        self
    }

    pub fn to_toml(&self) -> String {
        let mut out = String::from("[extensions]\n");
        if let Some(name) = &self.name {
            out.push_str(&format!("name = \"{}\"\n", name));
        }
        if let Some(version) = &self.version {
            out.push_str(&format!("version = \"{}\"\n", version));
        }

        for (name, targets) in &self.mods {
            out.push_str(&format!("\n[[mod]]\nname = \"{}\"\n", name));
            let mut loaders: Vec<&str> = Vec::new();
            for (loader, _, _) in targets {
                if !loaders.contains(&loader.as_str()) {
                    loaders.push(loader);
                }
            }
            for loader in loaders {
                let entries: Vec<String> = targets
                    .iter()
                    .filter(|(l, _, _)| l == loader)
                    .map(|(_, v, u)| format!("\"{}\" = \"{}\"", v, u))
                    .collect();
                out.push_str(&format!("{} = {{ {} }}\n", loader, entries.join(", ")));
            }
        }
        out
    }

    pub fn build(&self) -> ExtensionDescriptor {
        ExtensionDescriptor::parse(&self.to_toml(), "extensions.toml").unwrap()
    }

    /// Write to `<dir>/extensions.toml` and return the path
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        fs::create_dir_all(dir).unwrap();
        let path = dir.join("extensions.toml");
        fs::write(&path, self.to_toml()).unwrap();
        path
    }
}
