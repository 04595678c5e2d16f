//! Player configuration section

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport and chapter-navigation behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Interval between time reports while playing, in milliseconds
    pub tick_interval_ms: u64,

    /// Seconds rewound by "jump backward"
    pub jump_backward_secs: f64,

    /// Seconds skipped by "jump forward"
    pub jump_forward_secs: f64,

    /// Speed level (1-3) a new player starts at
    pub initial_speed_level: u8,

    /// Wrap from the last chapter to the first (and back) when skipping
    pub wrap_chapters: bool,

    /// Start the next chapter automatically when a track finishes
    pub auto_advance: bool,
}

impl PlayerConfig {
    /// Returns the tick interval as a `Duration`
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            jump_backward_secs: 5.0,
            jump_forward_secs: 10.0,
            initial_speed_level: 1,
            wrap_chapters: false,
            auto_advance: true,
        }
    }
}

impl ConfigSection for PlayerConfig {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::in_range(self.tick_interval_ms, 100, 5000, "player.tick_interval_ms"),
            Validator::in_range(
                self.jump_backward_secs,
                1.0,
                60.0,
                "player.jump_backward_secs",
            ),
            Validator::in_range(
                self.jump_forward_secs,
                1.0,
                120.0,
                "player.jump_forward_secs",
            ),
            Validator::in_range(
                self.initial_speed_level,
                1,
                3,
                "player.initial_speed_level",
            ),
        ])
    }
}
