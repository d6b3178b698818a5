//! Real-Time Game Loop
//!
//! Drives a `GameSession` at the configured frame rate on a tokio task.
//! Commands arrive over a channel and are buffered between ticks; the tick
//! itself is synchronous. After every tick the loop publishes a snapshot
//! (latest-value channel) and the tick's events (broadcast).

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::game::events::GameEvent;
use crate::game::input::{Command, InputBuffer};
use crate::game::snapshot::FrameSnapshot;
use crate::game::state::GameSession;
use crate::game::tick::tick;

/// Command queue depth.
const COMMAND_BUFFER: usize = 64;

/// Event broadcast capacity. Slow subscribers lag rather than block the loop.
const EVENT_BUFFER: usize = 256;

/// Game loop errors.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    /// The loop has already stopped.
    #[error("Game loop has stopped")]
    Closed,

    /// The loop task panicked or was cancelled.
    #[error("Game loop task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Spawns game loops.
pub struct GameLoop;

impl GameLoop {
    /// Start ticking `session` on a new task.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(session: GameSession) -> GameLoopHandle {
        let id = Uuid::new_v4();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(FrameSnapshot::capture(&session)));
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        info!("Game loop {} starting at {} fps", id, session.config.fps);

        let task = tokio::spawn(run_loop(
            id,
            session,
            command_rx,
            snapshot_tx,
            event_tx.clone(),
            shutdown_rx,
        ));

        GameLoopHandle {
            id,
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
            shutdown_tx,
            task,
        }
    }
}

async fn run_loop(
    id: Uuid,
    mut session: GameSession,
    mut commands: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<Arc<FrameSnapshot>>,
    event_tx: broadcast::Sender<GameEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> GameSession {
    let mut input = InputBuffer::new();
    let mut tick_interval = interval(session.config.tick_duration());
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {}
            _ = shutdown_rx.recv() => {
                info!("Game loop {} stopped at tick {}", id, session.tick);
                break;
            }
        }

        while let Ok(command) = commands.try_recv() {
            input.push(command);
        }

        let level = session.level;
        let result = tick(&mut session, &input.take());
        if session.level != level {
            // Held keys don't carry into the next level
            input.clear();
        }

        let ended = result.ended();
        for event in result.events {
            // No subscribers is fine
            let _ = event_tx.send(event);
        }
        snapshot_tx.send_replace(Arc::new(FrameSnapshot::capture(&session)));

        if ended {
            info!(
                "Game loop {} finished at tick {} (victory: {})",
                id, session.tick, result.victory
            );
            break;
        }
    }

    debug!("Game loop {} exiting", id);
    session
}

/// Handle to a running game loop.
pub struct GameLoopHandle {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<FrameSnapshot>>,
    events: broadcast::Sender<GameEvent>,
    shutdown_tx: broadcast::Sender<()>,
    task: JoinHandle<GameSession>,
}

impl GameLoopHandle {
    /// Loop id (for logs).
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Queue a command for the next tick.
    pub async fn send(&self, command: Command) -> Result<(), LoopError> {
        self.commands.send(command).await.map_err(|_| LoopError::Closed)
    }

    /// Receiver for the latest snapshot.
    pub fn snapshots(&self) -> watch::Receiver<Arc<FrameSnapshot>> {
        self.snapshots.clone()
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> Arc<FrameSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to events from the next tick on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// True once the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the game to end on its own and return the final session.
    pub async fn join(self) -> Result<GameSession, LoopError> {
        Ok(self.task.await?)
    }

    /// Stop the loop and return the session as of the last tick.
    pub async fn stop(self) -> Result<GameSession, LoopError> {
        // Already finished if there is no receiver left
        let _ = self.shutdown_tx.send(());
        Ok(self.task.await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    use crate::config::GameConfig;
    use crate::core::rng::ScriptedRng;
    use crate::game::events::GameEventData;
    use crate::game::floor::Floor;
    use crate::game::grid::Grid;
    use crate::game::state::GamePhase;

    fn fast_config() -> GameConfig {
        GameConfig { fps: 500, ..GameConfig::default() }
    }

    #[tokio::test]
    async fn test_loop_ticks_until_stopped() {
        let handle = GameLoop::spawn(GameSession::new(fast_config(), 1));
        let mut snapshots = handle.snapshots();

        timeout(Duration::from_secs(5), async {
            while snapshots.borrow().tick < 10 {
                snapshots.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        let session = handle.stop().await.unwrap();
        assert!(session.tick >= 10);
        assert_eq!(session.phase, GamePhase::Playing);
    }

    #[tokio::test]
    async fn test_commands_move_player() {
        let handle = GameLoop::spawn(GameSession::new(fast_config(), 2));
        let mut snapshots = handle.snapshots();
        handle.send(Command::MoveRight).await.unwrap();

        // Spawn pocket (2, 1) is always floor
        timeout(Duration::from_secs(5), async {
            while snapshots.borrow().player.x <= 48 {
                snapshots.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        let session = handle.stop().await.unwrap();
        assert!(session.player.x > 48);
    }

    #[tokio::test]
    async fn test_loop_ends_with_game() {
        let config = GameConfig {
            cols: 7,
            rows: 7,
            enemies_per_level: vec![0],
            phase_transition_ticks: 2,
            ..fast_config()
        };
        let floor = Floor::new(Grid::new(config.cols, config.rows), config.tile_size);
        let mut session = GameSession::with_floor(config, floor, 0, Box::new(ScriptedRng::new(vec![0])));
        let exit = session.floor.grid().exit();
        session.player.x = exit.col * session.config.tile_size;
        session.player.y = exit.row * session.config.tile_size;

        let handle = GameLoop::spawn(session);
        let mut events = handle.subscribe();

        let session = timeout(Duration::from_secs(5), handle.join()).await.unwrap().unwrap();
        assert_eq!(session.phase, GamePhase::Victory);

        let mut saw_victory = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event.data, GameEventData::Victory { .. }) {
                saw_victory = true;
            }
        }
        assert!(saw_victory);
    }
}
