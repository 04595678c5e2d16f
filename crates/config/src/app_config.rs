//! Application-level configuration section

use crate::validation::{ConfigSection, ValidationError};
use serde::{Deserialize, Serialize};

/// Log level for application logging
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Returns the matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(ValidationError::new(
                "app.log_level",
                "must be one of: error, warn, info, debug, trace",
                other,
            )),
        }
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Log level for application output
    pub log_level: LogLevel,

    /// Debug mode raises the effective log level to at least `debug`
    pub debug_mode: bool,
}

impl AppConfig {
    /// Returns the log filter to install, taking debug mode into account
    pub fn effective_log_level(&self) -> log::LevelFilter {
        let configured = self.log_level.to_level_filter();
        if self.debug_mode {
            configured.max(log::LevelFilter::Debug)
        } else {
            configured
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            debug_mode: false,
        }
    }
}

impl ConfigSection for AppConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_log_level(), log::LevelFilter::Info);
    }

    #[test]
    fn test_debug_mode_raises_level() {
        let config = AppConfig {
            log_level: LogLevel::Warn,
            debug_mode: true,
        };
        assert_eq!(config.effective_log_level(), log::LevelFilter::Debug);

        let config = AppConfig {
            log_level: LogLevel::Trace,
            debug_mode: true,
        };
        assert_eq!(config.effective_log_level(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_log_level_from_toml() {
        let config: AppConfig = toml::from_str("log_level = \"trace\"").unwrap();
        assert_eq!(config.log_level, LogLevel::Trace);
        assert!(!config.debug_mode);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" trace ".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
