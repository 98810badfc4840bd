//! Runtime configuration types for operational parameters
//!
//! These types control how work items are executed: pool size, per-invocation
//! timeout, retry policy, which packaging tool to run, and where the version
//! tree lives.

use serde::{Deserialize, Serialize};

use super::Platform;

/// Complete runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Worker pool settings
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Retry policy applied to every external invocation
    #[serde(default)]
    pub retry: RetryPolicy,

    /// External packaging tool
    #[serde(default)]
    pub tool: ToolConfig,

    /// Directory layout defaults
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Display and output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecutorConfig {
    /// Number of concurrent tool invocations
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-invocation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}
fn default_timeout_secs() -> u64 {
    300 // 5 minutes
}

/// Retry policy for an operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay strategy between attempts
    #[serde(default)]
    pub strategy: RetryStrategy,

    /// Explicit delay table used by `RetryStrategy::Sequence`
    #[serde(default = "default_delays_ms")]
    pub delays_ms: Vec<u64>,

    /// Backoff multiplier for exponential strategies
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            strategy: RetryStrategy::default(),
            delays_ms: default_delays_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            initial_delay_ms: default_initial_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl RetryPolicy {
    /// Policy with an explicit delay table
    pub fn sequence(max_attempts: u32, delays_ms: Vec<u64>) -> Self {
        Self {
            max_attempts,
            strategy: RetryStrategy::Sequence,
            delays_ms,
            ..Self::default()
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_delays_ms() -> Vec<u64> {
    vec![1000, 3000, 9000]
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_initial_delay() -> u64 {
    1000
}
fn default_max_delay() -> u64 {
    30000
}

/// Retry strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RetryStrategy {
    /// No delay between attempts
    None,

    /// Fixed delay between retries
    FixedDelay,

    /// Exponential backoff
    ExponentialBackoff,

    /// Linear backoff
    LinearBackoff,

    /// Delays taken from `delays_ms`; the last entry repeats (default)
    #[default]
    Sequence,
}

/// External packaging tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolConfig {
    /// Program name or path
    #[serde(default = "default_program")]
    pub program: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_program() -> String {
    "packwiz".to_string()
}

/// Directory layout defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Version tree template (`<versions-dir>/<loader>/<game-version>/`)
    #[serde(default = "default_versions_dir")]
    pub versions_dir: String,

    /// Where merged builds are written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Pack format produced by export
    #[serde(default)]
    pub export_format: Platform,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            versions_dir: default_versions_dir(),
            output_dir: default_output_dir(),
            export_format: Platform::default(),
        }
    }
}

fn default_versions_dir() -> String {
    "versions".to_string()
}
fn default_output_dir() -> String {
    "build".to_string()
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DisplayConfig {
    /// Enable colored output
    #[serde(default = "default_color_enabled")]
    pub color_enabled: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color_enabled: default_color_enabled(),
        }
    }
}

fn default_color_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_config_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.executor.concurrency, 4);
        assert_eq!(config.executor.timeout_secs, 300);
        assert_eq!(config.tool.program, "packwiz");
        assert_eq!(config.layout.versions_dir, "versions");
        assert_eq!(config.layout.output_dir, "build");
        assert_eq!(config.layout.export_format, Platform::Modrinth);
    }

    #[test]
    fn test_retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.strategy, RetryStrategy::Sequence);
        assert_eq!(policy.delays_ms, vec![1000, 3000, 9000]);
    }

    #[test]
    fn test_partial_yaml_keeps_field_defaults() {
        let yaml = "executor:\n  concurrency: 8\n";
        let config: RuntimeConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.executor.concurrency, 8);
        assert_eq!(config.executor.timeout_secs, 300);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_kebab_case_serialization() {
        let yaml = serde_yaml_ng::to_string(&RuntimeConfig::default()).unwrap();
        assert!(yaml.contains("timeout-secs: 300"));
        assert!(yaml.contains("strategy: sequence"));
        assert!(yaml.contains("export-format: modrinth"));
    }
}
