//! Game Session State
//!
//! `GameSession` is the explicit context the tick operates on: config,
//! current floor, player, level counter, scores, phase and the random source.
//! Nothing in the simulation reads global state.

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::config::GameConfig;
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::game::events::{GameEvent, GameEventData};
use crate::game::floor::Floor;
use crate::game::map::create_map;
use crate::game::player::Player;
use crate::game::powerup::PowerUpTable;

// =============================================================================
// PHASE
// =============================================================================

/// Current phase of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Player died, death animation running
    PlayerDying {
        /// Ticks before game over
        ticks_remaining: u32,
    },
    /// Player reached the exit, win animation running
    LevelCleared {
        /// Ticks before the next level
        ticks_remaining: u32,
    },
    /// Game lost
    GameOver,
    /// Every level cleared
    Victory,
}

impl GamePhase {
    /// True for `GameOver` and `Victory`.
    pub fn is_ended(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }

    /// Stable numeric tag for hashing.
    pub fn tag(self) -> u8 {
        match self {
            GamePhase::Playing => 0,
            GamePhase::PlayerDying { .. } => 1,
            GamePhase::LevelCleared { .. } => 2,
            GamePhase::GameOver => 3,
            GamePhase::Victory => 4,
        }
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Complete state of one game, from level 1 to victory or game over.
#[derive(Debug)]
pub struct GameSession {
    /// Simulation constants
    pub config: GameConfig,
    /// Current level
    pub floor: Floor,
    /// The player
    pub player: Player,
    /// Zero-based level index
    pub level: u32,
    /// Score banked from cleared levels
    pub total_score: u32,
    /// Ticks simulated
    pub tick: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Seed the random source was built from (for verification)
    pub rng_seed: u64,
    /// Power-up drop table
    pub power_up_table: PowerUpTable,
    pub(crate) rng: Box<dyn RandomSource>,
    pending_events: Vec<GameEvent>,
}

impl GameSession {
    /// Start a new game at level 1 with a seeded generator.
    ///
    /// `config` is assumed validated.
    pub fn new(config: GameConfig, rng_seed: u64) -> Self {
        Self::with_rng(config, rng_seed, Box::new(DeterministicRng::new(rng_seed)))
    }

    /// Start a new game at level 1 drawing from `rng`.
    ///
    /// `rng_seed` is only recorded for hashing.
    pub fn with_rng(config: GameConfig, rng_seed: u64, mut rng: Box<dyn RandomSource>) -> Self {
        let floor = create_map(&config, 0, rng.as_mut());
        let mut session = Self::with_floor(config, floor, rng_seed, rng);
        session.announce_level();
        session
    }

    /// Wrap a prepared floor as level 1 (hand-built scenarios).
    pub fn with_floor(
        config: GameConfig,
        floor: Floor,
        rng_seed: u64,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let player = Player::new(&config);
        Self {
            config,
            floor,
            player,
            level: 0,
            total_score: 0,
            tick: 0,
            phase: GamePhase::Playing,
            rng_seed,
            power_up_table: PowerUpTable::default(),
            rng,
            pending_events: Vec::new(),
        }
    }

    /// Generate level `level`, reset the player and resume play.
    pub fn start_level(&mut self, level: u32) {
        self.level = level;
        self.floor = create_map(&self.config, level, self.rng.as_mut());
        self.player.reset(&self.config);
        self.phase = GamePhase::Playing;
        self.announce_level();
    }

    fn announce_level(&mut self) {
        let enemies = self.floor.enemies().len() as u32;
        info!("Level {} started with {} enemies", self.level + 1, enemies);
        self.push_event(GameEvent::new(
            self.tick,
            GameEventData::LevelStarted { level: self.level, enemies },
        ));
    }

    /// Mutable access to the random source.
    pub fn rng(&mut self) -> &mut dyn RandomSource {
        self.rng.as_mut()
    }

    /// Check if the game has ended.
    pub fn is_ended(&self) -> bool {
        self.phase.is_ended()
    }

    /// Banked score plus the current level score, capped.
    pub fn display_total(&self) -> u32 {
        self.total_score
            .saturating_add(self.player.score)
            .min(self.config.max_score)
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            hasher.update_u32(self.level);
            hasher.update_u32(self.total_score);
            hasher.update_u8(self.phase.tag());
            match self.phase {
                GamePhase::PlayerDying { ticks_remaining }
                | GamePhase::LevelCleared { ticks_remaining } => hasher.update_u32(ticks_remaining),
                _ => {}
            }
            self.player.hash_into(hasher);
            self.floor.hash_into(hasher);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_level_one() {
        let mut session = GameSession::new(GameConfig::default(), 12345);
        assert_eq!(session.level, 0);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.floor.enemies().len(), 3);

        let events = session.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, GameEventData::LevelStarted { level: 0, enemies: 3 });
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_session_determinism() {
        let a = GameSession::new(GameConfig::default(), 777);
        let b = GameSession::new(GameConfig::default(), 777);
        let c = GameSession::new(GameConfig::default(), 778);
        assert_eq!(a.compute_hash(), b.compute_hash());
        assert_ne!(a.compute_hash(), c.compute_hash());
    }

    #[test]
    fn test_start_level_resets_player() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        session.player.radius = 4;
        session.player.score = 900;
        session.player.x = 300;

        session.start_level(1);
        assert_eq!(session.level, 1);
        assert_eq!(session.floor.enemies().len(), 4);
        assert_eq!(session.player.radius, session.config.start_radius);
        assert_eq!(session.player.score, 0);
        assert_eq!(session.player.x, session.config.tile_size);
    }

    #[test]
    fn test_display_total_caps() {
        let mut session = GameSession::new(GameConfig::default(), 1);
        session.total_score = 99_999_000;
        session.player.score = 5_000;
        assert_eq!(session.display_total(), 99_999_999);
    }
}
