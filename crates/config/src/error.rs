//! Error types for the configuration system

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse config file
    #[error("Failed to parse config file at {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config contains invalid values
    #[error("Config validation failed: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    /// Config directory path could not be determined
    #[error("Could not determine config directory path")]
    PathResolutionError,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validation error for a specific config field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path to the field (e.g., "player.tick_interval_ms")
    pub field: String,

    /// Human-readable error message
    pub message: String,

    /// The rejected value
    pub value: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: impl ToString) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field '{}': {} (got: {})", self.field, self.message, self.value)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("player.initial_speed_level", "must be 1-3", 7);
        assert_eq!(
            err.to_string(),
            "Field 'player.initial_speed_level': must be 1-3 (got: 7)"
        );
    }

    #[test]
    fn test_invalid_joins_all_errors() {
        let err = ConfigError::Invalid(vec![
            ValidationError::new("a", "bad", 1),
            ValidationError::new("b", "worse", 2),
        ]);
        let message = err.to_string();
        assert!(message.contains("Field 'a': bad"));
        assert!(message.contains("Field 'b': worse"));
    }
}
