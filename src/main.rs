//! Blast Grid Demo Runner
//!
//! Headless driver for the simulation core: plays a scripted game, checks
//! determinism by replay, then runs a short real-time session on the loop.

use std::time::Duration;

use anyhow::{ensure, Context};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use blast_grid::{
    GameConfig, TICK_RATE, VERSION,
    core::direction::Direction,
    game::{
        events::GameEventData,
        input::{Command, TickInput},
        state::GameSession,
        tick::{replay_session, tick},
    },
    profile::JsonFileStore,
    runtime::{GameLoop, PlaySession},
};

/// Upper bound on the scripted game (two minutes of play).
const DEMO_TICKS: u32 = 120 * TICK_RATE;

/// Where profiles are kept unless `BLAST_GRID_USERS` says otherwise.
const DEFAULT_USER_FILE: &str = "blast_grid_users.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Blast Grid v{}", VERSION);

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => GameConfig::default(),
    };
    info!(
        "Grid {}x{}, {} levels, {} fps",
        config.cols,
        config.rows,
        config.max_level(),
        config.fps
    );

    let user_file = std::env::var("BLAST_GRID_USERS").unwrap_or_else(|_| DEFAULT_USER_FILE.to_string());
    let rng_seed = 12345u64;
    let mut play = PlaySession::login(Box::new(JsonFileStore::new(user_file)), "player", rng_seed);

    demo_game(&mut play, &config, rng_seed)?;
    demo_realtime(&config, rng_seed + 1).await?;

    play.logout();
    Ok(())
}

/// Scripted input: change heading every 40 ticks, drop a bomb every 90.
fn scripted_input(t: u32) -> TickInput {
    let input = TickInput::walking(Direction::ALL[((t / 40) % 4) as usize]);
    if t % 90 == 0 {
        input.with_bomb()
    } else {
        input
    }
}

/// Play a scripted game headlessly and verify it by replay.
fn demo_game(play: &mut PlaySession, config: &GameConfig, rng_seed: u64) -> anyhow::Result<()> {
    info!("=== Starting Demo Game ===");
    info!("RNG Seed: {}", rng_seed);

    let mut session = play.new_game(config.clone(), rng_seed);
    // Level 1 announcement
    play.apply_events(&session.take_events());

    let mut inputs = Vec::new();
    let mut total_events = 0;

    for t in 0..DEMO_TICKS {
        let input = scripted_input(t);
        inputs.push(input);

        let result = tick(&mut session, &input);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::EnemyKilled { kind, points, .. } => {
                    info!("Tick {}: {:?} killed (+{})", event.tick, kind, points);
                }
                GameEventData::PowerUpCollected { kind, .. } => {
                    info!("Tick {}: picked up {:?}", event.tick, kind);
                }
                GameEventData::PlayerDamaged { hp_left } => {
                    info!("Tick {}: player hit, {} hp left", event.tick, hp_left);
                }
                _ => {}
            }
        }
        play.apply_events(&result.events);

        if result.ended() {
            info!("Game ended at tick {} (victory: {})", session.tick, result.victory);
            break;
        }
    }

    info!("=== Game Results ===");
    info!("Level reached: {}", session.level + 1);
    info!("Total score: {}", session.display_total());
    info!("Total events: {}", total_events);

    let hash = session.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay_session(config.clone(), rng_seed, &inputs);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    ensure!(hash == replay_hash, "Determinism failure: hashes differ");
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}

/// Run a short real-time session on the tokio loop.
async fn demo_realtime(config: &GameConfig, rng_seed: u64) -> anyhow::Result<()> {
    info!("=== Real-Time Loop ===");

    let handle = GameLoop::spawn(GameSession::new(config.clone(), rng_seed));
    let mut events = handle.subscribe();

    for command in [Command::MoveRight, Command::PlaceBomb, Command::MoveLeft, Command::MoveDown, Command::Stop] {
        handle.send(command).await?;
        tokio::time::sleep(Duration::from_millis(250)).await;
    }

    let mut seen = 0;
    while events.try_recv().is_ok() {
        seen += 1;
    }

    let snapshot = handle.snapshot();
    info!(
        "Loop {} at tick {}: hp {}, score {}, {} events",
        handle.id(),
        snapshot.tick,
        snapshot.hud.hp,
        snapshot.hud.total_score,
        seen
    );

    let session = handle.stop().await?;
    info!("Loop state hash: {}", hex::encode(session.compute_hash()));
    Ok(())
}
