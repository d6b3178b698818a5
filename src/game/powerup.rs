//! Power-Ups
//!
//! Weighted drop table and the pickup effects each kind grants.

use serde::{Serialize, Deserialize};

use crate::core::rect::{Cell, Rect};
use crate::core::rng::RandomSource;

/// Power-up variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerUpKind {
    /// Rare bonus
    IceCreamCone = 0,
    /// Bonus
    Apple = 1,
    /// Bonus
    RiceBall = 2,
    /// Extra hit point
    Bomberman = 3,
    /// Larger blast radius
    Fire = 4,
    /// Faster movement
    Accelerator = 5,
    /// Extra bomb
    BombUp = 6,
}

/// Stat change granted on pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpEffect {
    /// Score only
    ScoreOnly,
    /// +1 hit point
    ExtraHp,
    /// +1 blast radius
    ExtraRadius,
    /// +1 speed
    ExtraSpeed,
    /// +1 bomb capacity
    ExtraBomb,
}

impl PowerUpKind {
    /// All kinds.
    pub const ALL: [PowerUpKind; 7] = [
        PowerUpKind::IceCreamCone,
        PowerUpKind::Apple,
        PowerUpKind::RiceBall,
        PowerUpKind::Bomberman,
        PowerUpKind::Fire,
        PowerUpKind::Accelerator,
        PowerUpKind::BombUp,
    ];

    /// Drop weight in tenths of a percent (weights sum to 1000).
    pub const fn weight(self) -> u32 {
        match self {
            PowerUpKind::IceCreamCone => 10,
            PowerUpKind::Apple => 30,
            PowerUpKind::RiceBall => 35,
            PowerUpKind::Bomberman => 75,
            PowerUpKind::Fire => 150,
            PowerUpKind::Accelerator => 250,
            PowerUpKind::BombUp => 450,
        }
    }

    /// Score awarded on pickup.
    pub const fn score(self) -> u32 {
        match self {
            PowerUpKind::IceCreamCone => 50_000,
            PowerUpKind::Apple => 8_000,
            PowerUpKind::RiceBall => 5_000,
            PowerUpKind::Bomberman => 500,
            PowerUpKind::Fire => 200,
            PowerUpKind::Accelerator => 400,
            PowerUpKind::BombUp => 10,
        }
    }

    /// Stat effect on pickup.
    pub const fn effect(self) -> PowerUpEffect {
        match self {
            PowerUpKind::Bomberman => PowerUpEffect::ExtraHp,
            PowerUpKind::Fire => PowerUpEffect::ExtraRadius,
            PowerUpKind::Accelerator => PowerUpEffect::ExtraSpeed,
            PowerUpKind::BombUp => PowerUpEffect::ExtraBomb,
            _ => PowerUpEffect::ScoreOnly,
        }
    }
}

// =============================================================================
// DROP TABLE
// =============================================================================

/// Weighted selection over power-up kinds.
#[derive(Clone, Debug)]
pub struct PowerUpTable {
    entries: Vec<(PowerUpKind, u32)>,
    total: u32,
}

impl Default for PowerUpTable {
    fn default() -> Self {
        Self::new(PowerUpKind::ALL.iter().map(|k| (*k, k.weight())).collect())
    }
}

impl PowerUpTable {
    /// Build a table.
    ///
    /// # Panics
    ///
    /// If `entries` is empty or the weights sum to zero.
    pub fn new(entries: Vec<(PowerUpKind, u32)>) -> Self {
        let total: u32 = entries.iter().map(|(_, w)| *w).sum();
        assert!(
            !entries.is_empty() && total > 0,
            "power-up table needs at least one positive weight"
        );
        Self { entries, total }
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u32 {
        self.total
    }

    /// Pick a kind with probability `weight / total`.
    pub fn generate_random_type(&self, rng: &mut dyn RandomSource) -> PowerUpKind {
        let mut roll = rng.next_int(self.total);
        for (kind, weight) in &self.entries {
            if roll < *weight {
                return *kind;
            }
            roll -= weight;
        }
        // Unreachable while roll < total; fall back to the last entry.
        self.entries[self.entries.len() - 1].0
    }
}

// =============================================================================
// POWER-UP
// =============================================================================

/// A power-up lying on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUp {
    /// Unique within a level
    pub id: u32,
    /// Cell it occupies
    pub cell: Cell,
    /// Variant
    pub kind: PowerUpKind,
    /// Picked up by the player
    pub collected: bool,
}

impl PowerUp {
    /// Create an uncollected power-up.
    pub fn new(id: u32, cell: Cell, kind: PowerUpKind) -> Self {
        Self { id, cell, kind, collected: false }
    }

    /// Collider (the full cell).
    pub fn collider(&self, tile_size: i32) -> Rect {
        self.cell.rect(tile_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::{DeterministicRng, ScriptedRng};

    #[test]
    fn test_default_weights_sum_to_1000() {
        assert_eq!(PowerUpTable::default().total_weight(), 1000);
    }

    #[test]
    fn test_cumulative_walk() {
        let table = PowerUpTable::default();
        // 0..10 ice cream, 10..40 apple, ..., 550..1000 bomb up
        let cases = [
            (0, PowerUpKind::IceCreamCone),
            (9, PowerUpKind::IceCreamCone),
            (10, PowerUpKind::Apple),
            (75, PowerUpKind::Bomberman),
            (149, PowerUpKind::Bomberman),
            (150, PowerUpKind::Fire),
            (549, PowerUpKind::Accelerator),
            (550, PowerUpKind::BombUp),
            (999, PowerUpKind::BombUp),
        ];
        for (roll, expected) in cases {
            let mut rng = ScriptedRng::new(vec![roll]);
            assert_eq!(table.generate_random_type(&mut rng), expected, "roll {}", roll);
        }
    }

    #[test]
    fn test_distribution_roughly_matches_weights() {
        let table = PowerUpTable::default();
        let mut rng = DeterministicRng::new(2024);
        let mut bomb_ups = 0;
        for _ in 0..10_000 {
            if table.generate_random_type(&mut rng) == PowerUpKind::BombUp {
                bomb_ups += 1;
            }
        }
        assert!((4_000..5_000).contains(&bomb_ups), "got {}", bomb_ups);
    }

    #[test]
    #[should_panic]
    fn test_empty_table_panics() {
        PowerUpTable::new(Vec::new());
    }

    #[test]
    #[should_panic]
    fn test_zero_weight_table_panics() {
        PowerUpTable::new(vec![(PowerUpKind::Apple, 0)]);
    }
}
