//! Error types for the ambient layers (configuration loading).
//!
//! Nothing inside the per-tick simulation returns these; gameplay failures
//! are booleans and notifications.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate a `WorldConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Convenience alias: a `Result` using `ConfigError` as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;
