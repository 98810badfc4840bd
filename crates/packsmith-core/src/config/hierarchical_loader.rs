//! Hierarchical configuration loader with precedence
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults (`RuntimeConfig::default()`)
//! 2. User config (`~/.packsmith/runtime.yaml`)
//! 3. Project config (`--config <file>` or `./packsmith.yaml`)
//! 4. Environment variables (`PACKSMITH_*`)
//! 5. CLI flags (applied by the caller)
//!
//! File layers are merged key by key before deserialising, so a file that
//! only sets `executor.concurrency` leaves every other value alone.

use crate::error::{Error, Result};
use crate::types::RuntimeConfig;
use crate::utils::get_packsmith_dir;
use camino::{Utf8Path, Utf8PathBuf};
use serde_yaml_ng::{Mapping, Value};
use std::env;
use std::fs;

/// File name of the per-user runtime configuration
pub const USER_CONFIG_FILE: &str = "runtime.yaml";

/// File name picked up from the working directory when `--config` is absent
pub const PROJECT_CONFIG_FILE: &str = "packsmith.yaml";

/// Configuration hierarchy loader
pub struct HierarchicalConfigLoader {
    /// Directory holding `runtime.yaml`
    config_dir: Utf8PathBuf,
}

impl HierarchicalConfigLoader {
    /// Loader rooted at `~/.packsmith`
    pub fn new() -> Result<Self> {
        let dir = get_packsmith_dir()?;
        let config_dir = Utf8PathBuf::from_path_buf(dir).map_err(|p| {
            Error::invalid_config(format!(
                "Config directory is not valid UTF-8: {}",
                p.display()
            ))
        })?;
        Ok(Self { config_dir })
    }

    /// Create a loader with a custom config directory
    pub fn with_dir(config_dir: Utf8PathBuf) -> Self {
        Self { config_dir }
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// Load runtime configuration with hierarchical precedence
    ///
    /// `project_file`, when given, must exist. The user file is optional.
    pub fn load_runtime_config(&self, project_file: Option<&Utf8Path>) -> Result<RuntimeConfig> {
        let mut merged = Value::Mapping(Mapping::new());

        let user_file = self.config_dir.join(USER_CONFIG_FILE);
        if user_file.exists() {
            tracing::debug!(path = %user_file, "loading user runtime config");
            merge_values(&mut merged, load_yaml_value(&user_file)?);
        }

        if let Some(path) = project_file {
            if !path.exists() {
                return Err(Error::config_not_found(path.as_str()));
            }
            tracing::debug!(path = %path, "loading project runtime config");
            merge_values(&mut merged, load_yaml_value(path)?);
        }

        let config: RuntimeConfig = serde_yaml_ng::from_value(merged)
            .map_err(|e| Error::invalid_config(format!("Failed to apply config files: {}", e)))?;

        apply_env_overrides(config)
    }
}

/// Read a YAML file into an untyped value; an empty file counts as an empty mapping
fn load_yaml_value(path: &Utf8Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(Value::Mapping(Mapping::new()));
    }

    let value: Value = serde_yaml_ng::from_str(&content)
        .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))?;

    match value {
        Value::Mapping(_) => Ok(value),
        Value::Null => Ok(Value::Mapping(Mapping::new())),
        _ => Err(Error::invalid_config(format!(
            "{} must contain a YAML mapping at the top level",
            path
        ))),
    }
}

/// Merge `overlay` into `base`: mappings recurse, anything else is replaced
fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn apply_env_overrides(mut config: RuntimeConfig) -> Result<RuntimeConfig> {
    if let Ok(val) = env::var("PACKSMITH_CONCURRENCY") {
        config.executor.concurrency = val
            .parse()
            .ok()
            .filter(|n: &usize| *n > 0)
            .ok_or_else(|| {
                Error::invalid_config("PACKSMITH_CONCURRENCY must be a positive number")
            })?;
    }

    if let Ok(val) = env::var("PACKSMITH_TIMEOUT_SECS") {
        config.executor.timeout_secs = val.parse().map_err(|_| {
            Error::invalid_config("PACKSMITH_TIMEOUT_SECS must be a valid number")
        })?;
    }

    if let Ok(val) = env::var("PACKSMITH_MAX_ATTEMPTS") {
        config.retry.max_attempts = val.parse().map_err(|_| {
            Error::invalid_config("PACKSMITH_MAX_ATTEMPTS must be a valid number")
        })?;
    }

    if let Ok(val) = env::var("PACKSMITH_TOOL") {
        if !val.is_empty() {
            config.tool.program = val;
        }
    }

    // Any value disables color, following the NO_COLOR convention.
    if env::var_os("PACKSMITH_NO_COLOR").is_some() {
        config.display.color_enabled = false;
    }

    Ok(config)
}
