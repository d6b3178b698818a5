//! Game Events
//!
//! Events generated during simulation, returned from each tick in place of
//! change notifications. Presentation layers use them for sounds and effects.

use serde::{Serialize, Deserialize};

use crate::core::rect::Cell;
use crate::game::enemy::EnemyKind;
use crate::game::powerup::PowerUpKind;

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Phase changes and game end
    Lifecycle = 0,
    /// Deaths and damage
    Damage = 1,
    /// Detonations and terrain changes
    Blast = 2,
    /// Pickups and spawns
    Item = 3,
    /// Bomb placement
    Action = 4,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A level began
    LevelStarted {
        /// Zero-based level
        level: u32,
        /// Enemies on the floor
        enemies: u32,
    },

    /// Player dropped a bomb
    BombPlaced {
        /// Bomb id
        bomb_id: u32,
        /// Bomb cell
        cell: Cell,
    },

    /// A bomb went off
    BombExploded {
        /// Bomb id
        bomb_id: u32,
        /// Bomb cell
        cell: Cell,
        /// Cells reached by the blast
        tiles: u32,
        /// Set off by another blast
        chained: bool,
    },

    /// A breakable tile was replaced by floor
    TileDestroyed {
        /// Tile cell
        cell: Cell,
    },

    /// A power-up appeared
    PowerUpSpawned {
        /// Power-up id
        power_up_id: u32,
        /// Variant
        kind: PowerUpKind,
        /// Cell
        cell: Cell,
    },

    /// A blast destroyed a power-up
    PowerUpDestroyed {
        /// Power-up id
        power_up_id: u32,
    },

    /// Player picked up a power-up
    PowerUpCollected {
        /// Power-up id
        power_up_id: u32,
        /// Variant
        kind: PowerUpKind,
        /// Points awarded
        points: u32,
    },

    /// An enemy took a hit
    EnemyDamaged {
        /// Enemy id
        enemy_id: u32,
        /// Hit points left
        hp_left: u32,
    },

    /// An enemy died
    EnemyKilled {
        /// Enemy id
        enemy_id: u32,
        /// Variant
        kind: EnemyKind,
        /// Points awarded
        points: u32,
    },

    /// Player took a hit
    PlayerDamaged {
        /// Hit points left
        hp_left: u32,
    },

    /// Player died
    PlayerDied,

    /// Player reached the exit with all enemies cleared
    LevelCleared {
        /// Zero-based level
        level: u32,
        /// Score earned this level
        level_score: u32,
    },

    /// Game lost
    GameOver {
        /// Total score (level score discarded)
        total_score: u32,
    },

    /// Final level cleared
    Victory {
        /// Total score
        total_score: u32,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event, deriving priority from the data.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        let priority = match &data {
            GameEventData::LevelStarted { .. }
            | GameEventData::LevelCleared { .. }
            | GameEventData::GameOver { .. }
            | GameEventData::Victory { .. } => EventPriority::Lifecycle,
            GameEventData::EnemyDamaged { .. }
            | GameEventData::EnemyKilled { .. }
            | GameEventData::PlayerDamaged { .. }
            | GameEventData::PlayerDied => EventPriority::Damage,
            GameEventData::BombExploded { .. } | GameEventData::TileDestroyed { .. } => {
                EventPriority::Blast
            }
            GameEventData::PowerUpSpawned { .. }
            | GameEventData::PowerUpDestroyed { .. }
            | GameEventData::PowerUpCollected { .. } => EventPriority::Item,
            GameEventData::BombPlaced { .. } => EventPriority::Action,
        };

        Self { tick, priority, data }
    }

    /// True for events that end the game.
    pub fn is_terminal(&self) -> bool {
        matches!(self.data, GameEventData::GameOver { .. } | GameEventData::Victory { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_from_data() {
        let death = GameEvent::new(3, GameEventData::PlayerDied);
        let bomb = GameEvent::new(3, GameEventData::BombPlaced { bomb_id: 1, cell: Cell::new(1, 1) });
        let over = GameEvent::new(3, GameEventData::GameOver { total_score: 0 });

        assert_eq!(death.priority, EventPriority::Damage);
        assert!(over.priority < death.priority);
        assert!(death.priority < bomb.priority);
        assert!(over.is_terminal());
        assert!(!death.is_terminal());
    }
}
