//! BookPlay configuration
//!
//! Settings live in a single TOML file with one table per section:
//!
//! ```toml
//! [app]
//! log_level = "info"
//!
//! [player]
//! tick_interval_ms = 1000
//! jump_backward_secs = 5.0
//! jump_forward_secs = 10.0
//! wrap_chapters = false
//! ```
//!
//! Missing fields fall back to defaults, `BOOKPLAY_*` environment variables
//! override the file, and the result is validated before it is returned.
//!
//! # Example
//!
//! ```rust,no_run
//! use bookplay_config::{default_config_path, Config};
//!
//! let config = default_config_path()
//!     .and_then(|path| Config::load(&path))
//!     .unwrap_or_default();
//! println!("Tick interval: {:?}", config.player.tick_interval());
//! ```

mod app_config;
mod error;
mod loader;
mod player_config;
mod validation;

pub use app_config::{AppConfig, LogLevel};
pub use error::{ConfigError, ConfigResult, ValidationError};
pub use loader::default_config_path;
pub use player_config::PlayerConfig;
pub use validation::{ConfigSection, Validator};

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Application-level settings
    pub app: AppConfig,

    /// Player behaviour
    pub player: PlayerConfig,
}

impl Config {
    /// Validates every section
    ///
    /// Returns all validation errors found across all sections.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.app.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.player.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
