//! Playback-related domain models

use crate::error::{AppError, Result};
use crate::types::{Duration, Validator};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete playback speed level
///
/// The player offers three rates (1x, 2x, 3x) and cycles through them in
/// order, wrapping from the fastest back to normal speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 3;

    /// Normal speed (1x)
    pub const NORMAL: Self = Self(1);

    /// Creates a speed level, rejecting values outside 1..=3
    pub fn new(level: u8) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&level) {
            Err(AppError::InvalidSpeed {
                level,
                min: Self::MIN,
                max: Self::MAX,
            })
        } else {
            Ok(Self(level))
        }
    }

    /// Returns the level as an integer
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the playback rate multiplier handed to the audio engine
    pub fn rate(&self) -> f32 {
        f32::from(self.0)
    }

    /// Returns the following level: 1 -> 2 -> 3 -> 1
    pub fn next(self) -> Self {
        Self(self.0 % Self::MAX + 1)
    }
}

impl Default for SpeedLevel {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl TryFrom<u8> for SpeedLevel {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SpeedLevel> for u8 {
    fn from(level: SpeedLevel) -> Self {
        level.0
    }
}

impl Validator for SpeedLevel {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        Self::new(self.0).map(|_| ()).map_err(|e| vec![e.to_string()])
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Elapsed and remaining clock labels for a playback position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLabels {
    pub elapsed: String,
    pub remaining: String,
}

impl TimeLabels {
    /// Builds labels from a position and total length in seconds
    ///
    /// Remaining time is `total - current` and never goes below zero.
    pub fn new(current_secs: f64, total_secs: f64) -> Self {
        let current = Duration::from_secs_f64(current_secs);
        let total = Duration::from_secs_f64(total_secs);

        Self {
            elapsed: current.as_clock(),
            remaining: total.saturating_sub(current).as_clock(),
        }
    }
}
