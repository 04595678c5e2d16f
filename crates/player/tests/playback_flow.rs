// FILE: crates/player/tests/playback_flow.rs
//! End-to-end playback through the player service on paused tokio time

use bookplay_config::PlayerConfig;
use bookplay_core::{BookMetadata, Chapter, SkipDirection};
use bookplay_player::{
    EngineCall, PlayerError, PlayerHandle, PlayerService, SimulatedEngine, TransportState,
};
use std::sync::Arc;
use std::time::Duration;

const A: &str = "https://cdn.example.com/a.mp3";
const B: &str = "https://cdn.example.com/b.mp3";
const C: &str = "https://cdn.example.com/c.mp3";

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn chapters() -> Vec<Chapter> {
    vec![
        Chapter::new("Identity", A, "Habits shape who you are"),
        Chapter::new("Cue", B, "Make it obvious"),
        Chapter::new("Reward", C, "Make it satisfying"),
    ]
}

fn engine() -> Arc<SimulatedEngine> {
    Arc::new(
        SimulatedEngine::new()
            .with_duration(A, 3.0)
            .with_duration(B, 2.0)
            .with_duration(C, 4.0),
    )
}

fn plays(engine: &SimulatedEngine) -> Vec<String> {
    engine
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            EngineCall::Play(url) => Some(url),
            _ => None,
        })
        .collect()
}

async fn start(
    engine: Arc<SimulatedEngine>,
    config: PlayerConfig,
) -> Result<PlayerHandle, PlayerError> {
    let handle = PlayerService::spawn(engine, &config)?;
    handle.set_chapter_sequence(chapters()).await?;
    Ok(handle)
}

#[tokio::test(start_paused = true)]
async fn test_auto_advance_plays_whole_book() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = engine();
    let mut handle = start(engine.clone(), PlayerConfig::default()).await?;

    handle.request_play_from_start().await?;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_eq!(plays(&engine), vec![A, B, C]);

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.transport, TransportState::Paused);
    assert_eq!(snapshot.chapter_title.as_deref(), Some("Reward"));
    assert_eq!(snapshot.progress_label.as_deref(), Some("KEY POINT 3 OF 3"));
    assert_eq!(snapshot.current_time, 4.0);
    assert_eq!(snapshot.total_time, 4.0);
    assert_eq!(snapshot.remaining_label, "00:00");

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_auto_advance_wraps_to_first_chapter() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = engine();
    let config = PlayerConfig {
        wrap_chapters: true,
        ..PlayerConfig::default()
    };
    let mut handle = start(engine.clone(), config).await?;

    handle.request_play_from_start().await?;
    // a (3s) + b (2s) + c (4s), then half a second into a again
    tokio::time::sleep(Duration::from_millis(9500)).await;

    assert_eq!(plays(&engine), vec![A, B, C, A]);
    let snapshot = handle.snapshot();
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.chapter_title.as_deref(), Some("Identity"));

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_no_auto_advance_stops_after_track() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = engine();
    let config = PlayerConfig {
        auto_advance: false,
        ..PlayerConfig::default()
    };
    let mut handle = start(engine.clone(), config).await?;

    handle.request_play_from_start().await?;
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(plays(&engine), vec![A]);
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.transport, TransportState::Paused);
    assert_eq!(snapshot.current_time, 3.0);

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_duration_loads_asynchronously() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = Arc::new(
        SimulatedEngine::new()
            .with_duration(A, 42.0)
            .with_load_delay(Duration::from_millis(1500)),
    );
    let mut handle = start(engine, PlayerConfig::default()).await?;

    handle.request_play_from_start().await?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    let snapshot = handle.snapshot();
    assert!(snapshot.is_loading_duration);
    assert_eq!(snapshot.total_time, 0.0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let snapshot = handle.snapshot();
    assert!(!snapshot.is_loading_duration);
    assert_eq!(snapshot.total_time, 42.0);
    assert_eq!(snapshot.current_time, 2.0);

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_stale_duration_does_not_overwrite() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = Arc::new(
        SimulatedEngine::new()
            .with_duration(A, 100.0)
            .with_duration(B, 50.0)
            .with_load_delay(Duration::from_secs(5)),
    );
    let mut handle = start(engine, PlayerConfig::default()).await?;

    handle.request_play_from_start().await?;
    tokio::time::sleep(Duration::from_secs(1)).await;
    handle.request_skip(SkipDirection::Forward).await?;

    // The lookup for the first chapter finishes before the one for the second
    tokio::time::sleep(Duration::from_millis(4500)).await;
    assert_eq!(handle.snapshot().total_time, 0.0);
    assert!(handle.snapshot().is_loading_duration);

    tokio::time::sleep(Duration::from_secs(1)).await;
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.chapter_title.as_deref(), Some("Cue"));
    assert_eq!(snapshot.total_time, 50.0);

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_view_appeared_toggles_and_loads() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = engine();
    let mut handle = start(engine.clone(), PlayerConfig::default()).await?;

    handle.view_appeared().await?;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let snapshot = handle.snapshot();
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.total_time, 3.0);
    assert_eq!(snapshot.current_time, 1.0);
    assert_eq!(snapshot.elapsed_label, "00:01");
    assert!(engine.calls().contains(&EngineCall::Duration));

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_transport_controls() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = Arc::new(SimulatedEngine::new().with_duration(A, 600.0));
    let mut handle = start(engine.clone(), PlayerConfig::default()).await?;

    handle.request_play_from_start().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    handle.request_seek(120.0).await?;
    handle.request_jump_forward().await?;
    handle.request_jump_backward().await?;
    handle.request_jump_backward().await?;
    handle.request_change_speed().await?;
    handle.request_toggle_play_pause().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.current_time, 120.0);
    assert_eq!(snapshot.speed_level, 2);
    assert_eq!(snapshot.transport, TransportState::Paused);
    assert_eq!(engine.rate(), 2.0);
    assert!(!engine.is_running());

    handle.request_toggle_play_pause().await?;
    tokio::time::sleep(Duration::from_millis(1050)).await;
    let snapshot = handle.snapshot();
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.current_time, 122.0);
    assert_eq!(engine.calls().last(), Some(&EngineCall::PlayCurrent));

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_skip_backward_at_first_chapter() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = engine();
    let mut handle = start(engine.clone(), PlayerConfig::default()).await?;

    handle.request_skip(SkipDirection::Backward).await?;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.chapter_title.as_deref(), Some("Identity"));
    assert_eq!(snapshot.transport, TransportState::Paused);
    assert!(plays(&engine).is_empty());

    handle.shutdown().await?;
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_snapshots_are_published() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let mut handle = PlayerService::spawn(engine(), &PlayerConfig::default())?;
    let mut updates = handle.subscribe();

    let metadata = BookMetadata::from_json(
        r#"{
            "bookName": "Atomic Habits",
            "imageUrl": "https://cdn.example.com/cover.jpg",
            "keyPoints": [
                { "title": "Identity", "fileUrl": "https://cdn.example.com/a.mp3", "text": "Who you are" }
            ]
        }"#,
    )?;
    handle.load_metadata(metadata).await?;

    updates.changed().await?;
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.book_name.as_deref(), Some("Atomic Habits"));
    assert_eq!(snapshot.progress_label.as_deref(), Some("KEY POINT 1 OF 1"));
    assert_eq!(snapshot.transport, TransportState::Paused);

    handle.shutdown().await?;
    assert!(matches!(
        handle.request_play_from_start().await,
        Err(PlayerError::ServiceStopped)
    ));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_engine_failures_are_tolerated() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let engine = engine();
    engine.set_offline(true);
    let mut handle = start(engine.clone(), PlayerConfig::default()).await?;

    handle.request_play_from_start().await?;
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let snapshot = handle.snapshot();
    assert!(snapshot.is_playing);
    assert_eq!(snapshot.current_time, 0.0);
    assert!(!snapshot.is_loading_duration);
    assert_eq!(snapshot.total_time, 0.0);

    handle.shutdown().await?;
    Ok(())
}
