//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid engine timeout '{value}': expected a positive number of seconds")]
    InvalidTimeout { value: String },

    #[error("invalid engine URL '{value}': expected an http:// or https:// URL")]
    InvalidEngineUrl { value: String },

    /// `PROFALIGN_DEFAULT_MODEL` names a model that is not in the catalog.
    #[error("unknown default model '{model_id}'. Available: {available}")]
    UnknownDefaultModel { model_id: String, available: String },

    /// Path exists but is not a directory (when a directory was expected).
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },
}
