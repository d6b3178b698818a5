//! Enemies
//!
//! Enemy kinds are a closed set described by a behavior table. Movement
//! resolution against the rest of the floor lives in `floor.rs`; this module
//! owns the per-enemy state machine.

use serde::{Serialize, Deserialize};

use crate::core::direction::Direction;
use crate::core::rect::{Cell, Rect};
use crate::core::rng::RandomSource;

// =============================================================================
// KINDS
// =============================================================================

/// Enemy variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EnemyKind {
    /// Weak wanderer
    Puropen = 0,
    /// Tougher wanderer, worth more
    Denkyun = 1,
}

/// Behavior table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyStats {
    /// Pixels per tick
    pub speed: i32,
    /// Starting hit points
    pub hp: u32,
    /// Score awarded on death
    pub score: u32,
}

impl EnemyKind {
    /// All kinds, indexed by `from_index`.
    pub const ALL: [EnemyKind; 2] = [EnemyKind::Puropen, EnemyKind::Denkyun];

    /// Behavior table lookup.
    pub const fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Puropen => EnemyStats { speed: 2, hp: 1, score: 100 },
            EnemyKind::Denkyun => EnemyStats { speed: 2, hp: 2, score: 400 },
        }
    }

    /// Convert from index.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

// =============================================================================
// ENEMY
// =============================================================================

/// Enemy animation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum EnemyAnimation {
    /// Moving normally
    #[default]
    Walking = 0,
    /// Recovering from a hit
    Hit = 1,
    /// Killed
    Dying = 2,
}

/// A live enemy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enemy {
    /// Unique within a level
    pub id: u32,
    /// Variant
    pub kind: EnemyKind,
    /// Left edge of the sprite cell (pixels)
    pub x: i32,
    /// Top edge of the sprite cell (pixels)
    pub y: i32,
    /// Pixels per tick
    pub speed: i32,
    /// Remaining hit points
    pub hp: u32,
    /// False once killed
    pub alive: bool,
    /// Inside the post-hit cooldown
    pub damaged: bool,
    /// Current heading
    pub direction: Direction,
    /// Animation state
    pub animation: EnemyAnimation,
    /// Ticks left in the post-hit cooldown
    pub hit_cooldown: u32,
}

impl Enemy {
    /// Create an enemy standing on `cell`.
    pub fn new(id: u32, kind: EnemyKind, cell: Cell, tile_size: i32, direction: Direction) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            x: cell.col * tile_size,
            y: cell.row * tile_size,
            speed: stats.speed,
            hp: stats.hp,
            alive: true,
            damaged: false,
            direction,
            animation: EnemyAnimation::Walking,
            hit_cooldown: 0,
        }
    }

    /// Score awarded for killing this enemy.
    #[inline]
    pub fn score(&self) -> u32 {
        self.kind.stats().score
    }

    /// Collider at the current position.
    ///
    /// Inset by an eighth of a tile on every side so enemies can pass each
    /// other in adjacent corridors without snagging.
    pub fn collider(&self, tile_size: i32) -> Rect {
        Self::collider_at(self.x, self.y, tile_size)
    }

    fn collider_at(x: i32, y: i32, tile_size: i32) -> Rect {
        let inset = tile_size / 8;
        Rect::new(x + inset, y + inset, tile_size - 2 * inset, tile_size - 2 * inset)
    }

    /// Collider one step ahead along the current heading.
    pub fn next_collider(&self, tile_size: i32) -> Rect {
        Self::collider_at(
            self.x + self.direction.dx() * self.speed,
            self.y + self.direction.dy() * self.speed,
            tile_size,
        )
    }

    /// Cell containing the collider center.
    pub fn cell(&self, tile_size: i32) -> Cell {
        let (cx, cy) = self.collider(tile_size).center();
        Cell::containing(cx, cy, tile_size)
    }

    /// Take one hit.
    ///
    /// Ignored while dead or inside the hit cooldown. Returns true if the hit
    /// landed; check `alive` afterwards to see whether it was lethal.
    pub fn damage(&mut self, cooldown_ticks: u32) -> bool {
        if !self.alive || self.damaged {
            return false;
        }

        self.hp = self.hp.saturating_sub(1);
        if self.hp == 0 {
            self.die();
        } else {
            self.damaged = true;
            self.hit_cooldown = cooldown_ticks;
            self.animation = EnemyAnimation::Hit;
        }
        true
    }

    /// Kill the enemy. Terminal.
    pub fn die(&mut self) {
        self.alive = false;
        self.hp = 0;
        self.damaged = false;
        self.hit_cooldown = 0;
        self.animation = EnemyAnimation::Dying;
    }

    /// Count down the hit cooldown.
    pub fn tick_cooldown(&mut self) {
        if !self.damaged {
            return;
        }
        self.hit_cooldown = self.hit_cooldown.saturating_sub(1);
        if self.hit_cooldown == 0 {
            self.damaged = false;
            self.animation = EnemyAnimation::Walking;
        }
    }

    /// Turn to one of the three other headings, chosen uniformly.
    pub fn random_direction(&mut self, rng: &mut dyn RandomSource) -> Direction {
        let others: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| *d != self.direction)
            .collect();
        self.direction = others[rng.next_int(others.len() as u32) as usize];
        self.direction
    }

    /// Step along the current heading. Collision is the caller's concern.
    pub fn advance(&mut self) {
        self.x += self.direction.dx() * self.speed;
        self.y += self.direction.dy() * self.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::ScriptedRng;

    fn enemy(kind: EnemyKind) -> Enemy {
        Enemy::new(0, kind, Cell::new(3, 3), 48, Direction::Left)
    }

    #[test]
    fn test_behavior_table() {
        assert_eq!(EnemyKind::Puropen.stats().hp, 1);
        assert_eq!(EnemyKind::Denkyun.stats().score, 400);
        assert_eq!(EnemyKind::from_index(1), Some(EnemyKind::Denkyun));
        assert_eq!(EnemyKind::from_index(2), None);
    }

    #[test]
    fn test_one_hp_dies() {
        let mut e = enemy(EnemyKind::Puropen);
        assert!(e.damage(120));
        assert!(!e.alive);
        assert_eq!(e.animation, EnemyAnimation::Dying);
        assert!(!e.damage(120));
    }

    #[test]
    fn test_cooldown_blocks_second_hit() {
        let mut e = enemy(EnemyKind::Denkyun);
        assert!(e.damage(3));
        assert_eq!(e.hp, 1);
        assert_eq!(e.animation, EnemyAnimation::Hit);
        assert!(!e.damage(3));

        for _ in 0..3 {
            e.tick_cooldown();
        }
        assert!(!e.damaged);
        assert_eq!(e.animation, EnemyAnimation::Walking);
        assert!(e.damage(3));
        assert!(!e.alive);
    }

    #[test]
    fn test_random_direction_never_repeats() {
        let mut rng = ScriptedRng::new((0..12).collect());
        let mut e = enemy(EnemyKind::Puropen);
        for _ in 0..12 {
            let before = e.direction;
            assert_ne!(e.random_direction(&mut rng), before);
        }
    }

    #[test]
    fn test_collider_and_step() {
        let mut e = enemy(EnemyKind::Puropen);
        assert_eq!(e.collider(48), Rect::new(150, 150, 36, 36));
        assert_eq!(e.next_collider(48), Rect::new(148, 150, 36, 36));
        e.advance();
        assert_eq!((e.x, e.y), (142, 144));
        assert_eq!(e.cell(48), Cell::new(3, 3));
    }
}
