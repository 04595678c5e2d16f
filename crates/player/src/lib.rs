// FILE: crates/player/src/lib.rs
//! BookPlay player - sequential playback of a book's key points
//!
//! The pieces, bottom up:
//! - [`AudioEngine`]: the playback backend, with [`SimulatedEngine`] for
//!   tests and demos
//! - [`ChapterSequence`]: ordered chapters and the current-chapter cursor
//! - [`TickScheduler`]: the periodic time reporter
//! - [`PlaybackStateMachine`]: transport state for one track
//! - [`ChapterPlayer`]: moves between chapters on skips and finished tracks
//! - [`PlayerService`]: runs a `ChapterPlayer` on a tokio task
//!
//! # Example
//!
//! ```rust,no_run
//! use bookplay_config::PlayerConfig;
//! use bookplay_core::Chapter;
//! use bookplay_player::{PlayerService, SimulatedEngine};
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(SimulatedEngine::new().with_duration("https://cdn.example.com/1.mp3", 90.0));
//! let handle = PlayerService::spawn(engine, &PlayerConfig::default())?;
//!
//! handle
//!     .set_chapter_sequence(vec![Chapter::new("Intro", "https://cdn.example.com/1.mp3", "")])
//!     .await?;
//! handle.request_play_from_start().await?;
//! println!("{:?}", handle.snapshot());
//! # Ok(())
//! # }
//! ```

mod adapter;
mod chapters;
mod controller;
mod error;
mod machine;
mod scheduler;
mod service;
mod session;

pub use adapter::{AudioEngine, EngineCall, SimulatedEngine};
pub use chapters::ChapterSequence;
pub use controller::ChapterPlayer;
pub use error::{EngineError, EngineResult, PlayerError, PlayerResult};
pub use machine::{PlaybackStateMachine, PlayerEvent, PlayerSignal};
pub use scheduler::{SchedulerToken, TickScheduler};
pub use service::{PlayerCommand, PlayerHandle, PlayerService};
pub use session::{DurationRequest, PlaybackSession, PlayerSnapshot, Transport, TransportState};
