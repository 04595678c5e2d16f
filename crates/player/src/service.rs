// FILE: crates/player/src/service.rs
//! Background task that owns a [`ChapterPlayer`]
//!
//! Callers talk to the task through a [`PlayerHandle`]. Internal events
//! (ticks, duration results) and caller commands are applied one at a time,
//! and a fresh [`PlayerSnapshot`] is published after each.

use crate::adapter::AudioEngine;
use crate::controller::ChapterPlayer;
use crate::error::{PlayerError, PlayerResult};
use crate::machine::PlayerEvent;
use crate::session::PlayerSnapshot;
use bookplay_config::{ConfigError, ConfigSection, PlayerConfig};
use bookplay_core::{BookMetadata, Chapter, SkipDirection};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

const COMMAND_BUFFER: usize = 32;

/// Requests accepted by the player task
#[derive(Debug, Clone)]
pub enum PlayerCommand {
    SetChapters(Vec<Chapter>),
    LoadMetadata(BookMetadata),
    PlayFromStart,
    TogglePlayPause,
    Pause,
    Seek(f64),
    JumpBackward,
    JumpForward,
    ChangeSpeed,
    Skip(SkipDirection),
    ViewAppeared,
}

/// What travels on the command channel
#[derive(Debug)]
enum Request {
    Command(PlayerCommand),
    Shutdown,
}

pub struct PlayerService;

impl PlayerService {
    /// Starts the player task on the current tokio runtime
    ///
    /// The configuration is validated first.
    pub fn spawn(
        engine: Arc<dyn AudioEngine>,
        config: &PlayerConfig,
    ) -> PlayerResult<PlayerHandle> {
        config
            .validate()
            .map_err(|errors| PlayerError::Config(ConfigError::Invalid(errors)))?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (request_tx, request_rx) = mpsc::channel(COMMAND_BUFFER);

        let player = ChapterPlayer::new(engine, event_tx, config);
        let (snapshot_tx, snapshot_rx) = watch::channel(player.snapshot());

        let task = tokio::spawn(run(player, request_rx, event_rx, snapshot_tx));
        info!("Player service started");

        Ok(PlayerHandle {
            requests: request_tx,
            snapshots: snapshot_rx,
            task: Some(task),
        })
    }
}

async fn run(
    mut player: ChapterPlayer,
    mut requests: mpsc::Receiver<Request>,
    mut events: mpsc::UnboundedReceiver<PlayerEvent>,
    snapshots: watch::Sender<PlayerSnapshot>,
) {
    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                player.handle_event(event);
            }
            request = requests.recv() => match request {
                Some(Request::Command(command)) => apply(&mut player, command),
                Some(Request::Shutdown) | None => break,
            },
        }

        snapshots.send_replace(player.snapshot());
    }

    player.request_pause();
    snapshots.send_replace(player.snapshot());
    debug!("Player service stopped");
}

fn apply(player: &mut ChapterPlayer, command: PlayerCommand) {
    match command {
        PlayerCommand::SetChapters(chapters) => player.set_chapter_sequence(chapters),
        PlayerCommand::LoadMetadata(metadata) => player.load_metadata(metadata),
        PlayerCommand::PlayFromStart => {
            player.request_play_from_start();
        }
        PlayerCommand::TogglePlayPause => {
            player.request_toggle_play_pause();
        }
        PlayerCommand::Pause => {
            player.request_pause();
        }
        PlayerCommand::Seek(time) => {
            player.request_seek(time);
        }
        PlayerCommand::JumpBackward => {
            player.request_jump_backward();
        }
        PlayerCommand::JumpForward => {
            player.request_jump_forward();
        }
        PlayerCommand::ChangeSpeed => {
            player.request_change_speed();
        }
        PlayerCommand::Skip(direction) => {
            player.request_skip(direction);
        }
        PlayerCommand::ViewAppeared => {
            player.view_appeared();
        }
    }
}

/// Caller side of a running player task
pub struct PlayerHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<PlayerSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl PlayerHandle {
    /// Sends a command to the player task
    pub async fn send(&self, command: PlayerCommand) -> PlayerResult<()> {
        self.requests
            .send(Request::Command(command))
            .await
            .map_err(|_| PlayerError::ServiceStopped)
    }

    pub async fn set_chapter_sequence(&self, chapters: Vec<Chapter>) -> PlayerResult<()> {
        self.send(PlayerCommand::SetChapters(chapters)).await
    }

    pub async fn load_metadata(&self, metadata: BookMetadata) -> PlayerResult<()> {
        self.send(PlayerCommand::LoadMetadata(metadata)).await
    }

    pub async fn request_play_from_start(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::PlayFromStart).await
    }

    pub async fn request_toggle_play_pause(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::TogglePlayPause).await
    }

    pub async fn request_pause(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::Pause).await
    }

    pub async fn request_seek(&self, time: f64) -> PlayerResult<()> {
        self.send(PlayerCommand::Seek(time)).await
    }

    pub async fn request_jump_backward(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::JumpBackward).await
    }

    pub async fn request_jump_forward(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::JumpForward).await
    }

    pub async fn request_change_speed(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::ChangeSpeed).await
    }

    pub async fn request_skip(&self, direction: SkipDirection) -> PlayerResult<()> {
        self.send(PlayerCommand::Skip(direction)).await
    }

    pub async fn view_appeared(&self) -> PlayerResult<()> {
        self.send(PlayerCommand::ViewAppeared).await
    }

    /// Returns a receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshots.clone()
    }

    /// Returns the latest snapshot
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Returns true while the player task is running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the player task and waits for it to finish
    ///
    /// Playback is paused on the way out. Calling this twice is harmless.
    pub async fn shutdown(&mut self) -> PlayerResult<()> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        // Already-stopped tasks have closed the channel
        let _ = self.requests.send(Request::Shutdown).await;
        task.await.map_err(|e| {
            log::error!("Player task failed: {}", e);
            PlayerError::ServiceStopped
        })
    }
}
