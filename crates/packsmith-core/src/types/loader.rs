//! Mod loader identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// A mod-loading runtime. Partitions the version directory tree
/// (`<base>/<loader>/<game-version>/`) and the per-loader tables of a
/// descriptor's `[[mod]]` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Fabric,
    Forge,
    #[serde(rename = "neoforge")]
    NeoForge,
}

impl Loader {
    /// Every known loader, in the order descriptor tables are scanned
    pub const ALL: [Loader; 3] = [Loader::Fabric, Loader::Forge, Loader::NeoForge];

    /// Directory / descriptor key for this loader
    pub fn as_str(&self) -> &'static str {
        match self {
            Loader::Fabric => "fabric",
            Loader::Forge => "forge",
            Loader::NeoForge => "neoforge",
        }
    }
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
