//! Error types for packsmith-core

use thiserror::Error;

/// Result type alias using packsmith-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for packsmith
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration value or shape
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// TOML parsing error (extension descriptors, pack manifests)
    #[error("TOML parsing error in {path}: {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown source platform / export format
    #[error("Unknown platform: {platform}. Known platforms: modrinth, curseforge")]
    UnknownPlatform { platform: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a TOML parse error for the given file
    pub fn toml_parse(path: impl Into<String>, source: toml::de::Error) -> Self {
        Self::TomlParse {
            path: path.into(),
            source,
        }
    }

    /// Create an unknown platform error
    pub fn unknown_platform(platform: impl Into<String>) -> Self {
        Self::UnknownPlatform {
            platform: platform.into(),
        }
    }
}
