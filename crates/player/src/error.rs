// FILE: crates/player/src/error.rs

use bookplay_config::ConfigError;
use thiserror::Error;

/// Failures reported by an audio engine
///
/// The state machine never propagates these; they are logged and the
/// effect is dropped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No media loaded")]
    NoMediaLoaded,

    #[error("Failed to load {url}: {reason}")]
    LoadFailed { url: String, reason: String },

    #[error("Duration unavailable for {0}")]
    DurationUnavailable(String),

    #[error("Invalid playback rate: {0}")]
    InvalidRate(f32),

    #[error("Device error: {0}")]
    Device(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the player service
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("Player service has stopped")]
    ServiceStopped,

    #[error("Invalid player configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type PlayerResult<T> = Result<T, PlayerError>;
