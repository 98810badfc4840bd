//! Small helpers shared by the config loader and the CLI

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Get the user's home directory
///
/// `HOME` wins over `dirs::home_dir()` so that CI jobs and containers which
/// override it are respected.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }

    dirs::home_dir().ok_or_else(|| Error::invalid_config("Could not determine home directory"))
}

/// Get the packsmith configuration directory (~/.packsmith)
pub fn get_packsmith_dir() -> Result<PathBuf> {
    Ok(get_home_dir()?.join(".packsmith"))
}
