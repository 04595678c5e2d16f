//! Reads the config file and layers environment overrides on top
//!
//! Order of precedence: defaults < file < `BOOKPLAY_*` variables.

use crate::{Config, ConfigError, ConfigResult};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the platform config file path
///
/// - Linux: `~/.config/bookplay/config.toml`
/// - macOS: `~/Library/Application Support/bookplay/config.toml`
/// - Windows: `%APPDATA%\bookplay\config\config.toml`
pub fn default_config_path() -> ConfigResult<PathBuf> {
    ProjectDirs::from("", "", "bookplay")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .ok_or(ConfigError::PathResolutionError)
}

impl Config {
    /// Loads `path`, applies `BOOKPLAY_SECTION_FIELD` overrides and validates
    ///
    /// A missing file yields defaults. An empty or unparseable file is an
    /// error, as is any value out of range after the overrides.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with<F>(path: &Path, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = read_file(path)?;
        apply_env_overrides(&mut config, lookup);
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }
}

fn read_file(path: &Path) -> ConfigResult<Config> {
    if !path.exists() {
        log::info!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if contents.trim().is_empty() {
        return Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Config file is empty or contains only whitespace",
            ),
        });
    }

    let config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Applies `BOOKPLAY_*` overrides read through `lookup`
///
/// Unparseable values are skipped with a warning.
fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    fn parse<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
        let raw = raw?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring {}: cannot parse '{}'", key, raw);
                None
            }
        }
    }

    macro_rules! override_field {
        ($key:literal, $field:expr) => {
            if let Some(value) = parse($key, lookup($key)) {
                $field = value;
            }
        };
    }

    override_field!("BOOKPLAY_PLAYER_TICK_INTERVAL_MS", config.player.tick_interval_ms);
    override_field!("BOOKPLAY_PLAYER_JUMP_BACKWARD_SECS", config.player.jump_backward_secs);
    override_field!("BOOKPLAY_PLAYER_JUMP_FORWARD_SECS", config.player.jump_forward_secs);
    override_field!("BOOKPLAY_PLAYER_INITIAL_SPEED_LEVEL", config.player.initial_speed_level);
    override_field!("BOOKPLAY_PLAYER_WRAP_CHAPTERS", config.player.wrap_chapters);
    override_field!("BOOKPLAY_PLAYER_AUTO_ADVANCE", config.player.auto_advance);
    override_field!("BOOKPLAY_APP_LOG_LEVEL", config.app.log_level);
    override_field!("BOOKPLAY_APP_DEBUG_MODE", config.app.debug_mode);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LogLevel;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_default_path_ends_with_file_name() {
        let path = default_config_path().unwrap();
        assert!(path.ends_with("config.toml"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_with(&dir.path().join("config.toml"), no_env).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "  \n").unwrap();
        assert!(matches!(
            Config::load_with(&path, no_env),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[player]\nwrap_chapters = false\ntick_interval_ms = 500\n").unwrap();

        let vars: HashMap<&str, &str> = [
            ("BOOKPLAY_PLAYER_WRAP_CHAPTERS", "true"),
            ("BOOKPLAY_PLAYER_JUMP_FORWARD_SECS", "30"),
            ("BOOKPLAY_APP_LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let config =
            Config::load_with(&path, |key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert!(config.player.wrap_chapters);
        assert_eq!(config.player.tick_interval_ms, 500);
        assert_eq!(config.player.jump_forward_secs, 30.0);
        assert_eq!(config.app.log_level, LogLevel::Debug);
        assert!(config.player.auto_advance);
    }

    #[test]
    fn test_env_overrides_ignore_garbage() {
        let mut config = Config::default();
        apply_env_overrides(&mut config, |key| {
            (key == "BOOKPLAY_PLAYER_TICK_INTERVAL_MS").then(|| "soon".to_string())
        });
        assert_eq!(config.player.tick_interval_ms, 1000);
    }

    #[test]
    fn test_out_of_range_override_is_invalid() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_with(&dir.path().join("config.toml"), |key| {
            (key == "BOOKPLAY_PLAYER_INITIAL_SPEED_LEVEL").then(|| "4".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Invalid(errors)) if errors.len() == 1));
    }
}
