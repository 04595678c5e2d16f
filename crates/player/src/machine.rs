// FILE: crates/player/src/machine.rs
//! Transport state machine for a single track
//!
//! Events are applied one at a time. Effects on the audio engine are
//! fire-and-forget: failures are logged and the state change still happens.
//! The two asynchronous sources (the tick timer and the duration lookup)
//! report back as [`PlayerEvent`]s on the channel given to
//! [`PlaybackStateMachine::new`].

use crate::adapter::AudioEngine;
use crate::error::EngineResult;
use crate::scheduler::{SchedulerToken, TickScheduler};
use crate::session::{DurationRequest, PlaybackSession, Transport};
use bookplay_config::PlayerConfig;
use bookplay_core::{AppError, SkipDirection, SpeedLevel};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Inputs of the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    ViewAppeared,
    TogglePlayPause,
    PlayFromStart,
    PauseRequested,
    Seek(f64),
    JumpBackward,
    JumpForward,
    NextTrack,
    PreviousTrack,
    LoadTrackInfo,
    DurationLoaded {
        request: DurationRequest,
        duration: f64,
    },
    CurrentTimeTick {
        token: SchedulerToken,
        time: f64,
    },
    ChangeSpeed,
    TrackExhausted,
}

/// Notifications for the chapter controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSignal {
    /// The current track played to its end
    TrackExhausted,
    /// The user asked for the neighbouring chapter
    SkipRequested(SkipDirection),
}

/// Drives one track through Idle, Paused and Playing
pub struct PlaybackStateMachine {
    engine: Arc<dyn AudioEngine>,
    events: UnboundedSender<PlayerEvent>,
    scheduler: TickScheduler,
    session: PlaybackSession,
    jump_backward: f64,
    jump_forward: f64,
    next_request: u64,
}

impl PlaybackStateMachine {
    /// Creates an idle machine
    ///
    /// Must be called inside a tokio runtime; timers and duration lookups
    /// are spawned on it.
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        events: UnboundedSender<PlayerEvent>,
        config: &PlayerConfig,
    ) -> Self {
        let speed = SpeedLevel::new(config.initial_speed_level).unwrap_or_else(|e| {
            warn!("{} ({})", e, e.recovery_action());
            SpeedLevel::NORMAL
        });

        let machine = Self {
            engine,
            events,
            scheduler: TickScheduler::new(config.tick_interval()),
            session: PlaybackSession::new(speed),
            jump_backward: config.jump_backward_secs,
            jump_forward: config.jump_forward_secs,
            next_request: 0,
        };

        if speed != SpeedLevel::NORMAL {
            machine.effect("set_speed", machine.engine.set_speed(speed.rate()));
        }
        machine
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn engine(&self) -> &Arc<dyn AudioEngine> {
        &self.engine
    }

    /// Returns true if `token` belongs to the running tick timer
    pub fn is_token_live(&self, token: SchedulerToken) -> bool {
        self.scheduler.is_live(token)
    }

    /// Applies one event, returning the signal it raised
    pub fn handle(&mut self, event: PlayerEvent) -> Option<PlayerSignal> {
        debug!("Handling {:?} in {:?}", event, self.session.transport.state());

        match event {
            PlayerEvent::ViewAppeared => {
                if self.session.transport.track().is_some() {
                    self.toggle_play_pause();
                    self.load_track_info();
                }
                None
            }
            PlayerEvent::TogglePlayPause => {
                self.toggle_play_pause();
                None
            }
            PlayerEvent::PlayFromStart => {
                self.play_from_start();
                None
            }
            PlayerEvent::PauseRequested => {
                self.pause();
                None
            }
            PlayerEvent::Seek(time) => {
                self.seek(time);
                None
            }
            PlayerEvent::JumpBackward => {
                self.jump_backward();
                None
            }
            PlayerEvent::JumpForward => {
                self.seek(self.session.current_time + self.jump_forward);
                None
            }
            PlayerEvent::NextTrack => Some(self.request_skip(SkipDirection::Forward)),
            PlayerEvent::PreviousTrack => Some(self.request_skip(SkipDirection::Backward)),
            PlayerEvent::LoadTrackInfo => {
                self.load_track_info();
                None
            }
            PlayerEvent::DurationLoaded { request, duration } => {
                self.apply_duration(request, duration);
                None
            }
            PlayerEvent::CurrentTimeTick { token, time } => self.apply_tick(token, time),
            PlayerEvent::ChangeSpeed => {
                self.session.speed = self.session.speed.next();
                let rate = self.session.speed.rate();
                self.effect("set_speed", self.engine.set_speed(rate));
                None
            }
            PlayerEvent::TrackExhausted => Some(PlayerSignal::TrackExhausted),
        }
    }

    /// Switches to another track, or to none
    ///
    /// Stops the timer, pauses the engine if it was playing and forgets the
    /// old times and any pending duration lookup.
    pub fn set_current_track(&mut self, url: Option<String>) {
        if self.session.is_playing() {
            self.effect("pause", self.engine.pause());
        }
        self.scheduler.stop();

        self.session.current_time = 0.0;
        self.session.total_time = 0.0;
        self.session.pending_duration = None;
        self.session.transport = match url {
            Some(track) => Transport::Paused { track },
            None => Transport::Idle,
        };
    }

    fn toggle_play_pause(&mut self) {
        match self.session.transport.clone() {
            Transport::Idle => debug!("Ignoring play/pause with no track loaded"),
            Transport::Playing { track, token } => {
                self.scheduler.cancel(token);
                self.effect("pause", self.engine.pause());
                self.session.transport = Transport::Paused { track };
            }
            Transport::Paused { track } => {
                let loaded = self.engine.currently_playing_url();
                let result = if loaded.as_deref() == Some(track.as_str()) {
                    self.engine.play_current()
                } else {
                    self.engine.play(&track)
                };
                self.effect("play", result);
                self.start_playing(track);
            }
        }
    }

    fn play_from_start(&mut self) {
        let Some(track) = self.session.transport.track().map(str::to_string) else {
            debug!("Ignoring play-from-start with no track loaded");
            return;
        };

        self.session.current_time = 0.0;
        self.effect("play", self.engine.play(&track));
        self.load_track_info();
        self.start_playing(track);
    }

    fn pause(&mut self) {
        match self.session.transport.clone() {
            Transport::Idle => {}
            Transport::Paused { .. } => {
                self.effect("pause", self.engine.pause());
            }
            Transport::Playing { track, token } => {
                self.scheduler.cancel(token);
                self.effect("pause", self.engine.pause());
                self.session.transport = Transport::Paused { track };
            }
        }
    }

    fn seek(&mut self, time: f64) {
        let time = if time.is_nan() { 0.0 } else { time };
        self.session.current_time = time.min(self.session.total_time).max(0.0);
        self.effect("seek", self.engine.seek(self.session.current_time));
    }

    /// Only clamped at 0; `total_time` may still be unknown
    fn jump_backward(&mut self) {
        self.session.current_time = (self.session.current_time - self.jump_backward).max(0.0);
        self.effect("seek", self.engine.seek(self.session.current_time));
    }

    fn request_skip(&mut self, direction: SkipDirection) -> PlayerSignal {
        self.pause_if_playing();
        PlayerSignal::SkipRequested(direction)
    }

    fn pause_if_playing(&mut self) {
        if let Transport::Playing { track, token } = self.session.transport.clone() {
            self.scheduler.cancel(token);
            self.effect("pause", self.engine.pause());
            self.session.transport = Transport::Paused { track };
        }
    }

    fn load_track_info(&mut self) {
        self.next_request += 1;
        let request = DurationRequest(self.next_request);
        self.session.pending_duration = Some(request);

        let engine = Arc::clone(&self.engine);
        let events = self.events.clone();
        let track = self.session.transport.track().unwrap_or_default().to_string();
        tokio::spawn(async move {
            let duration = match engine.duration().await {
                Ok(duration) => duration,
                Err(e) => {
                    let err = AppError::media_unavailable(track, e.to_string());
                    warn!("{} ({})", err, err.recovery_action());
                    0.0
                }
            };

            if events
                .send(PlayerEvent::DurationLoaded { request, duration })
                .is_err()
            {
                debug!("Player gone before duration {} arrived", request.id());
            }
        });
    }

    fn apply_duration(&mut self, request: DurationRequest, duration: f64) {
        if self.session.pending_duration != Some(request) {
            debug!("Discarding stale duration result {}", request.id());
            return;
        }

        self.session.total_time = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        self.session.pending_duration = None;

        if self.session.total_time > 0.0 && self.session.current_time > self.session.total_time {
            self.session.current_time = self.session.total_time;
        }
    }

    fn apply_tick(&mut self, token: SchedulerToken, time: f64) -> Option<PlayerSignal> {
        if !self.scheduler.is_live(token) {
            debug!("Dropping tick from cancelled timer {}", token.id());
            return None;
        }

        let time = if time.is_finite() { time.max(0.0) } else { 0.0 };
        let total = self.session.total_time;
        self.session.current_time = if total > 0.0 { time.min(total) } else { time };

        let exhausted = !self.session.is_loading_duration() && total > 0.0 && time >= total;
        if !exhausted {
            return None;
        }

        self.scheduler.cancel(token);
        if let Transport::Playing { track, .. } = self.session.transport.clone() {
            info!("Finished playing {}", track);
            self.session.transport = Transport::Paused { track };
        }
        Some(PlayerSignal::TrackExhausted)
    }

    fn start_playing(&mut self, track: String) {
        let engine = Arc::clone(&self.engine);
        let token = self
            .scheduler
            .start(self.events.clone(), move |token| PlayerEvent::CurrentTimeTick {
                token,
                time: engine.current_time(),
            });
        self.session.transport = Transport::Playing { track, token };
    }

    #[cfg(test)]
    pub(crate) fn set_total_time_for_test(&mut self, total: f64) {
        self.session.total_time = total;
    }

    fn effect(&self, name: &str, result: EngineResult<()>) {
        if let Err(e) = result {
            warn!("Audio engine {} failed: {}", name, e);
        }
    }
}
