//! Mod hosting platforms and export formats

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A mod hosting platform understood by packwiz. Doubles as the pack export
/// format, since packwiz exports one pack flavour per platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Modrinth,
    #[serde(rename = "curseforge")]
    CurseForge,
}

/// URL host signatures, checked in priority order
const SIGNATURES: &[(&str, Platform)] = &[
    ("modrinth.com", Platform::Modrinth),
    ("curseforge.com", Platform::CurseForge),
];

impl Platform {
    /// Detect the platform a mod URL points at.
    ///
    /// Falls back to the first (primary) platform when no signature matches.
    pub fn detect(url: &str) -> Platform {
        let lowered = url.to_lowercase();
        SIGNATURES
            .iter()
            .find(|(signature, _)| lowered.contains(signature))
            .map(|(_, platform)| *platform)
            .unwrap_or(SIGNATURES[0].1)
    }

    /// Full subcommand name (`packwiz modrinth ...`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Modrinth => "modrinth",
            Platform::CurseForge => "curseforge",
        }
    }

    /// Short subcommand alias (`packwiz mr ...`)
    pub fn alias(&self) -> &'static str {
        match self {
            Platform::Modrinth => "mr",
            Platform::CurseForge => "cf",
        }
    }

    /// File extension of exported packs
    pub fn export_extension(&self) -> &'static str {
        match self {
            Platform::Modrinth => "mrpack",
            Platform::CurseForge => "zip",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "modrinth" | "mr" => Ok(Platform::Modrinth),
            "curseforge" | "cf" => Ok(Platform::CurseForge),
            _ => Err(Error::unknown_platform(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_modrinth() {
        assert_eq!(
            Platform::detect("https://modrinth.com/mod/sodium"),
            Platform::Modrinth
        );
    }

    #[test]
    fn test_detect_curseforge_case_insensitive() {
        assert_eq!(
            Platform::detect("https://www.CurseForge.com/minecraft/mc-mods/jei"),
            Platform::CurseForge
        );
    }

    #[test]
    fn test_detect_unknown_defaults_to_primary() {
        assert_eq!(
            Platform::detect("https://github.com/CaffeineMC/sodium/releases"),
            Platform::Modrinth
        );
        assert_eq!(Platform::detect(""), Platform::Modrinth);
    }

    #[test]
    fn test_parse_accepts_aliases() {
        assert_eq!("mr".parse::<Platform>().unwrap(), Platform::Modrinth);
        assert_eq!("CurseForge".parse::<Platform>().unwrap(), Platform::CurseForge);
        assert!("github".parse::<Platform>().is_err());
    }

    #[test]
    fn test_export_extensions() {
        assert_eq!(Platform::Modrinth.export_extension(), "mrpack");
        assert_eq!(Platform::CurseForge.export_extension(), "zip");
    }
}
