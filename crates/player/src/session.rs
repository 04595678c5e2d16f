// FILE: crates/player/src/session.rs
//! Playback session state and the observable snapshot

use crate::chapters::ChapterSequence;
use crate::scheduler::SchedulerToken;
use bookplay_core::{SpeedLevel, TimeLabels};
use serde::{Deserialize, Serialize};

/// Transport state of the current track
///
/// A playing track always owns a live scheduler token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// No track loaded
    Idle,
    /// Track loaded, not playing
    Paused { track: String },
    /// Track playing and time being reported under `token`
    Playing { track: String, token: SchedulerToken },
}

impl Transport {
    /// Returns the loaded track URL
    pub fn track(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Paused { track } | Self::Playing { track, .. } => Some(track),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }

    /// Returns the scheduler token while playing
    pub fn token(&self) -> Option<SchedulerToken> {
        match self {
            Self::Playing { token, .. } => Some(*token),
            _ => None,
        }
    }

    /// Returns the state without its payload
    pub fn state(&self) -> TransportState {
        match self {
            Self::Idle => TransportState::Idle,
            Self::Paused { .. } => TransportState::Paused,
            Self::Playing { .. } => TransportState::Playing,
        }
    }
}

/// Payload-free transport state, as published to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    #[default]
    Idle,
    Paused,
    Playing,
}

/// Tag of an in-flight duration lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DurationRequest(pub(crate) u64);

impl DurationRequest {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Mutable playback state owned by the state machine
///
/// Times are in seconds. A `total_time` of 0 means the length is unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub(crate) transport: Transport,
    pub(crate) current_time: f64,
    pub(crate) total_time: f64,
    pub(crate) speed: SpeedLevel,
    pub(crate) pending_duration: Option<DurationRequest>,
}

impl PlaybackSession {
    pub fn new(speed: SpeedLevel) -> Self {
        Self {
            transport: Transport::Idle,
            current_time: 0.0,
            total_time: 0.0,
            speed,
            pending_duration: None,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn speed(&self) -> SpeedLevel {
        self.speed
    }

    /// Returns the duration lookup the session is waiting for
    pub fn pending_duration(&self) -> Option<DurationRequest> {
        self.pending_duration
    }

    pub fn is_loading_duration(&self) -> bool {
        self.pending_duration.is_some()
    }

    /// Returns elapsed and remaining clock labels
    pub fn time_labels(&self) -> TimeLabels {
        TimeLabels::new(self.current_time, self.total_time)
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(SpeedLevel::NORMAL)
    }
}

/// Read-only view of the player published after every event
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub transport: TransportState,
    pub is_playing: bool,
    pub current_time: f64,
    pub total_time: f64,
    pub speed_level: u8,
    pub is_loading_duration: bool,
    pub elapsed_label: String,
    pub remaining_label: String,
    pub book_name: Option<String>,
    pub chapter_title: Option<String>,
    pub chapter_text: Option<String>,
    pub progress_label: Option<String>,
}

impl PlayerSnapshot {
    /// Captures the session together with the chapter cursor
    pub fn capture(
        session: &PlaybackSession,
        sequence: &ChapterSequence,
        book_name: Option<&str>,
    ) -> Self {
        let labels = session.time_labels();
        let chapter = sequence.current();

        Self {
            transport: session.transport.state(),
            is_playing: session.is_playing(),
            current_time: session.current_time,
            total_time: session.total_time,
            speed_level: session.speed.value(),
            is_loading_duration: session.is_loading_duration(),
            elapsed_label: labels.elapsed,
            remaining_label: labels.remaining,
            book_name: book_name.map(str::to_string),
            chapter_title: chapter.map(|c| c.title.clone()),
            chapter_text: chapter.map(|c| c.display_text.clone()),
            progress_label: sequence.progress_label(),
        }
    }
}
