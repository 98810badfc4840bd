//! Resource files inside a version directory

use std::fs;
use std::io;
use std::path::Path;

/// Suffix of packwiz metadata files
pub const METADATA_SUFFIX: &str = ".pw.toml";

/// File suffixes treated as resources
const RESOURCE_SUFFIXES: [&str; 3] = [".jar", METADATA_SUFFIX, ".zip"];

/// Kinds of resources synced between version directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mods,
    ResourcePacks,
    ShaderPacks,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Mods,
        ResourceKind::ResourcePacks,
        ResourceKind::ShaderPacks,
    ];

    /// Subdirectory name inside a version directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            ResourceKind::Mods => "mods",
            ResourceKind::ResourcePacks => "resourcepacks",
            ResourceKind::ShaderPacks => "shaderpacks",
        }
    }

    /// Human readable plural
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Mods => "mods",
            ResourceKind::ResourcePacks => "resource packs",
            ResourceKind::ShaderPacks => "shader packs",
        }
    }
}

pub fn is_resource_file(file_name: &str) -> bool {
    RESOURCE_SUFFIXES.iter().any(|s| file_name.ends_with(s))
}

pub fn is_metadata_file(file_name: &str) -> bool {
    file_name.ends_with(METADATA_SUFFIX)
}

/// Resource file names of `kind` in `version_dir`, sorted
///
/// A missing kind directory means no resources.
pub fn list_resources(version_dir: &Path, kind: ResourceKind) -> io::Result<Vec<String>> {
    let dir = version_dir.join(kind.dir_name());
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_resource_file(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// The packwiz install spec for a resource file name
///
/// `sodium.pw.toml` gives `sodium`; other files lose their last extension.
pub fn spec_from_filename(file_name: &str) -> &str {
    if let Some(spec) = file_name.strip_suffix(METADATA_SUFFIX) {
        return spec;
    }
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}
