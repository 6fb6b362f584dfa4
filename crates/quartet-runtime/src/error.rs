#![forbid(unsafe_code)]

//! Runtime error types.

use thiserror::Error;

/// Failure to load a [`GameConfig`](crate::config::GameConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
