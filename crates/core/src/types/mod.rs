//! Domain types for BookPlay
//!
//! This module contains all domain models organized by responsibility:
//! - `chapter`: Chapters, book metadata and skip direction
//! - `playback`: Speed levels and time labels
//! - `common`: Shared traits and utilities

mod chapter;
mod common;
mod playback;

// Re-export all public types
pub use chapter::{BookMetadata, Chapter, SkipDirection};
pub use common::{Duration, Validator};
pub use playback::{SpeedLevel, TimeLabels};
