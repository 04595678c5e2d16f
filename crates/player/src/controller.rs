// FILE: crates/player/src/controller.rs
//! Chapter-level playback control
//!
//! [`ChapterPlayer`] owns the navigator and the state machine. It turns the
//! machine's signals into chapter changes: a skip request or a finished
//! track moves the cursor and restarts playback on the new chapter.

use crate::adapter::AudioEngine;
use crate::chapters::ChapterSequence;
use crate::machine::{PlaybackStateMachine, PlayerEvent, PlayerSignal};
use crate::session::{PlaybackSession, PlayerSnapshot};
use bookplay_config::PlayerConfig;
use bookplay_core::{AppError, BookMetadata, Chapter, SkipDirection, Validator};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct ChapterPlayer {
    machine: PlaybackStateMachine,
    sequence: ChapterSequence,
    book_name: Option<String>,
    wrap_chapters: bool,
    auto_advance: bool,
}

impl ChapterPlayer {
    /// Creates a player with no chapters
    ///
    /// Timer ticks and duration results are delivered on `events` and have
    /// to be fed back through [`ChapterPlayer::handle_event`].
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        events: UnboundedSender<PlayerEvent>,
        config: &PlayerConfig,
    ) -> Self {
        Self {
            machine: PlaybackStateMachine::new(engine, events, config),
            sequence: ChapterSequence::default(),
            book_name: None,
            wrap_chapters: config.wrap_chapters,
            auto_advance: config.auto_advance,
        }
    }

    /// Replaces the chapter list and loads its first chapter, paused
    pub fn set_chapter_sequence(&mut self, chapters: Vec<Chapter>) {
        self.sequence = ChapterSequence::new(chapters);
        let url = self.sequence.current().map(|c| c.media_url.clone());

        match &url {
            Some(url) => info!(
                "Loaded {} key points, starting with {}",
                self.sequence.len(),
                url
            ),
            None => info!("Loaded an empty chapter list"),
        }
        self.machine.set_current_track(url);
    }

    /// Loads a book's key points
    ///
    /// Metadata problems are logged; playable chapters are still loaded.
    pub fn load_metadata(&mut self, metadata: BookMetadata) {
        if let Err(errors) = metadata.validate() {
            warn!(
                "Metadata for '{}' has problems: {}",
                metadata.book_name,
                errors.join("; ")
            );
        }

        self.book_name = Some(metadata.book_name.clone());
        self.set_chapter_sequence(metadata.into_chapters());
    }

    pub fn request_play_from_start(&mut self) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::PlayFromStart)
    }

    pub fn request_toggle_play_pause(&mut self) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::TogglePlayPause)
    }

    pub fn request_pause(&mut self) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::PauseRequested)
    }

    pub fn request_seek(&mut self, time: f64) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::Seek(time))
    }

    pub fn request_jump_backward(&mut self) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::JumpBackward)
    }

    pub fn request_jump_forward(&mut self) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::JumpForward)
    }

    pub fn request_change_speed(&mut self) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::ChangeSpeed)
    }

    pub fn request_skip(&mut self, direction: SkipDirection) -> Option<PlayerSignal> {
        let event = match direction {
            SkipDirection::Forward => PlayerEvent::NextTrack,
            SkipDirection::Backward => PlayerEvent::PreviousTrack,
        };
        self.dispatch(event)
    }

    pub fn view_appeared(&mut self) -> Option<PlayerSignal> {
        self.dispatch(PlayerEvent::ViewAppeared)
    }

    /// Feeds an internal event (tick or duration result) to the machine
    ///
    /// Returns the signal the event raised, after it has been resolved.
    pub fn handle_event(&mut self, event: PlayerEvent) -> Option<PlayerSignal> {
        self.dispatch(event)
    }

    pub fn session(&self) -> &PlaybackSession {
        self.machine.session()
    }

    pub fn sequence(&self) -> &ChapterSequence {
        &self.sequence
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.sequence.current()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot::capture(
            self.machine.session(),
            &self.sequence,
            self.book_name.as_deref(),
        )
    }

    fn dispatch(&mut self, event: PlayerEvent) -> Option<PlayerSignal> {
        let signal = self.machine.handle(event)?;
        self.resolve(signal);
        Some(signal)
    }

    fn resolve(&mut self, signal: PlayerSignal) {
        match signal {
            PlayerSignal::SkipRequested(direction) => self.advance(direction),
            PlayerSignal::TrackExhausted if self.auto_advance => {
                self.advance(SkipDirection::Forward)
            }
            PlayerSignal::TrackExhausted => {
                info!("Key point finished, auto-advance is off");
            }
        }
    }

    fn advance(&mut self, direction: SkipDirection) {
        let Some(chapter) = self
            .sequence
            .advance(direction, self.wrap_chapters)
            .cloned()
        else {
            let err = AppError::NavigatorExhausted { direction };
            info!("{} ({})", err, err.recovery_action());
            return;
        };

        info!(
            "Moving {} to '{}' ({})",
            direction,
            chapter.title,
            self.sequence.progress_label().unwrap_or_default()
        );
        self.machine.set_current_track(Some(chapter.media_url));
        self.machine.handle(PlayerEvent::PlayFromStart);
    }
}
