// FILE: crates/player/examples/simulated_playback.rs
//! Plays a three-chapter book on the simulated engine
//!
//! Run with `BOOKPLAY_PLAYER_WRAP_CHAPTERS=false` or `RUST_LOG=debug` to
//! see the config overrides and state transitions.

use bookplay_config::{default_config_path, Config};
use bookplay_core::BookMetadata;
use bookplay_player::{PlayerService, SimulatedEngine, TransportState};
use std::sync::Arc;
use std::time::Duration;

const BOOK: &str = r#"{
    "bookName": "The Pragmatic Listener",
    "imageUrl": "https://cdn.example.com/cover.jpg",
    "keyPoints": [
        { "title": "Start small", "fileUrl": "https://cdn.example.com/kp1.mp3", "text": "One habit at a time" },
        { "title": "Stack habits", "fileUrl": "https://cdn.example.com/kp2.mp3", "text": "Anchor new habits to old ones" },
        { "title": "Track progress", "fileUrl": "https://cdn.example.com/kp3.mp3", "text": "Never miss twice" }
    ]
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = default_config_path()
        .and_then(|path| Config::load(&path))
        .unwrap_or_else(|e| {
            eprintln!("Using default config: {}", e);
            Config::default()
        });

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.effective_log_level().to_string()),
    )
    .init();

    let engine = Arc::new(
        SimulatedEngine::new()
            .with_duration("https://cdn.example.com/kp1.mp3", 3.0)
            .with_duration("https://cdn.example.com/kp2.mp3", 2.0)
            .with_duration("https://cdn.example.com/kp3.mp3", 4.0)
            .with_load_delay(Duration::from_millis(300)),
    );

    let mut handle = PlayerService::spawn(engine, &config.player)?;
    let mut updates = handle.subscribe();

    handle.load_metadata(BookMetadata::from_json(BOOK)?).await?;
    handle.view_appeared().await?;

    let deadline = tokio::time::sleep(Duration::from_secs(20));
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }

        let snapshot = updates.borrow_and_update().clone();
        println!(
            "{:<16} {:>8} {} / -{}  x{}  {:?}",
            snapshot.progress_label.unwrap_or_default(),
            snapshot.chapter_title.unwrap_or_default(),
            snapshot.elapsed_label,
            snapshot.remaining_label,
            snapshot.speed_level,
            snapshot.transport,
        );

        let finished = snapshot.transport == TransportState::Paused
            && snapshot.total_time > 0.0
            && snapshot.current_time >= snapshot.total_time;
        if finished && !config.player.wrap_chapters {
            break;
        }
    }

    handle.shutdown().await?;
    Ok(())
}
