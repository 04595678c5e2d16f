// FILE: crates/player/src/adapter.rs
//! Audio engine abstraction and an in-memory engine
//!
//! The state machine only talks to [`AudioEngine`]. Every effect is
//! best-effort: it returns an [`EngineResult`] that the caller logs and
//! otherwise ignores.

use crate::error::{EngineError, EngineResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Playback backend driven by the state machine
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Replaces the loaded media with `url` and starts it from the beginning
    fn play(&self, url: &str) -> EngineResult<()>;

    /// Resumes the loaded media without reloading it
    fn play_current(&self) -> EngineResult<()>;

    fn pause(&self) -> EngineResult<()>;

    /// Moves the playhead to `time` seconds
    fn seek(&self, time: f64) -> EngineResult<()>;

    /// Sets the playback rate multiplier
    fn set_speed(&self, rate: f32) -> EngineResult<()>;

    /// Returns the playhead position in seconds
    fn current_time(&self) -> f64;

    /// Resolves the length of the loaded media in seconds
    ///
    /// This may be slow (network media) and may fail.
    async fn duration(&self) -> EngineResult<f64>;

    /// Returns the URL of the loaded media, if any
    fn currently_playing_url(&self) -> Option<String>;
}

/// A call received by [`SimulatedEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Play(String),
    PlayCurrent,
    Pause,
    Seek(f64),
    SetSpeed(f32),
    Duration,
}

#[derive(Debug)]
struct SimulatedState {
    durations: HashMap<String, f64>,
    load_delay: Option<Duration>,
    offline: bool,
    loaded: Option<String>,
    anchor: f64,
    running_since: Option<Instant>,
    rate: f32,
    calls: Vec<EngineCall>,
}

impl SimulatedState {
    fn media_length(&self) -> Option<f64> {
        self.loaded
            .as_ref()
            .and_then(|url| self.durations.get(url))
            .copied()
    }

    fn position_at(&self, now: Instant) -> f64 {
        let position = match self.running_since {
            Some(since) => {
                self.anchor + now.duration_since(since).as_secs_f64() * f64::from(self.rate)
            }
            None => self.anchor,
        };

        match self.media_length() {
            Some(length) => position.min(length),
            None => position,
        }
    }

    /// Folds the running clock into the anchor
    fn freeze(&mut self, now: Instant) {
        self.anchor = self.position_at(now);
        if self.running_since.is_some() {
            self.running_since = Some(now);
        }
    }

    fn require_media(&self) -> EngineResult<()> {
        if self.offline {
            return Err(EngineError::Device("output offline".to_string()));
        }
        if self.loaded.is_none() {
            return Err(EngineError::NoMediaLoaded);
        }
        Ok(())
    }
}

/// In-memory engine with a virtual clock
///
/// Media lengths are registered per URL. The playhead advances with
/// `tokio::time`, so paused-time tests drive it deterministically. It runs
/// at the configured rate and stops at the end of the media.
#[derive(Debug)]
pub struct SimulatedEngine {
    state: Mutex<SimulatedState>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimulatedState {
                durations: HashMap::new(),
                load_delay: None,
                offline: false,
                loaded: None,
                anchor: 0.0,
                running_since: None,
                rate: 1.0,
                calls: Vec::new(),
            }),
        }
    }

    /// Registers the length of the media at `url`
    pub fn with_duration(self, url: impl Into<String>, seconds: f64) -> Self {
        self.set_duration(url, seconds);
        self
    }

    /// Delays every duration lookup by `delay`
    pub fn with_load_delay(self, delay: Duration) -> Self {
        self.lock().load_delay = Some(delay);
        self
    }

    pub fn set_duration(&self, url: impl Into<String>, seconds: f64) {
        self.lock().durations.insert(url.into(), seconds);
    }

    /// Makes every effect fail with a device error while set
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Forces the playhead to `seconds` without recording a call
    pub fn set_position(&self, seconds: f64) {
        let mut state = self.lock();
        let now = Instant::now();
        state.anchor = seconds.max(0.0);
        if state.running_since.is_some() {
            state.running_since = Some(now);
        }
    }

    /// Returns true while the clock is running
    pub fn is_running(&self) -> bool {
        self.lock().running_since.is_some()
    }

    /// Returns the current rate multiplier
    pub fn rate(&self) -> f32 {
        self.lock().rate
    }

    /// Returns every call received so far
    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioEngine for SimulatedEngine {
    fn play(&self, url: &str) -> EngineResult<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::Play(url.to_string()));

        if state.offline {
            return Err(EngineError::Device("output offline".to_string()));
        }
        if url.trim().is_empty() {
            return Err(EngineError::LoadFailed {
                url: url.to_string(),
                reason: "empty URL".to_string(),
            });
        }

        state.loaded = Some(url.to_string());
        state.anchor = 0.0;
        state.running_since = Some(Instant::now());
        Ok(())
    }

    fn play_current(&self) -> EngineResult<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::PlayCurrent);
        state.require_media()?;

        if state.running_since.is_none() {
            state.running_since = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&self) -> EngineResult<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::Pause);
        state.require_media()?;

        state.freeze(Instant::now());
        state.running_since = None;
        Ok(())
    }

    fn seek(&self, time: f64) -> EngineResult<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::Seek(time));
        state.require_media()?;

        let now = Instant::now();
        let mut target = time.max(0.0);
        if let Some(length) = state.media_length() {
            target = target.min(length);
        }
        state.anchor = target;
        if state.running_since.is_some() {
            state.running_since = Some(now);
        }
        Ok(())
    }

    fn set_speed(&self, rate: f32) -> EngineResult<()> {
        let mut state = self.lock();
        state.calls.push(EngineCall::SetSpeed(rate));

        if state.offline {
            return Err(EngineError::Device("output offline".to_string()));
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EngineError::InvalidRate(rate));
        }

        state.freeze(Instant::now());
        state.rate = rate;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.lock().position_at(Instant::now())
    }

    async fn duration(&self) -> EngineResult<f64> {
        let (url, delay) = {
            let mut state = self.lock();
            state.calls.push(EngineCall::Duration);
            (state.loaded.clone(), state.load_delay)
        };

        let url = url.ok_or(EngineError::NoMediaLoaded)?;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.lock()
            .durations
            .get(&url)
            .copied()
            .ok_or(EngineError::DurationUnavailable(url))
    }

    fn currently_playing_url(&self) -> Option<String> {
        self.lock().loaded.clone()
    }
}
