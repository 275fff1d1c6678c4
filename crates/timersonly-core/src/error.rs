//! Core error types for timersonly-core.
//!
//! The countdown engine and the pomodoro scheduler are total and never
//! return errors. Everything here belongs to the edges: the preference
//! file, user-supplied values and catalog lookups.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timersonly-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No preset with the given slug
    #[error("Timer not found: {0}")]
    UnknownTimer(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Could not determine or create the configuration directory
    #[error("Configuration directory unavailable: {0}")]
    NoConfigDir(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Not a `#rrggbb` color
    #[error("Invalid hex color: {0:?}")]
    InvalidColor(String),

    /// Preset catalog failed its consistency checks
    #[error("{} catalog problem(s): {}", .0.len(), .0.join("; "))]
    Catalog(Vec<String>),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_lists_every_problem() {
        let err = ValidationError::Catalog(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "2 catalog problem(s): a; b");
    }

    #[test]
    fn nested_errors_convert_into_core_error() {
        let err: CoreError = ConfigError::UnknownKey("ui.nope".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown config key: ui.nope"
        );
    }
}
