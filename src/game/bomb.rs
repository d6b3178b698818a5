//! Bombs
//!
//! A bomb sits on one cell, counts its fuse down once per tick and is
//! replaced by an explosion when it reaches zero or is caught in another blast.

use serde::{Serialize, Deserialize};

use crate::core::rect::{Cell, Rect};

/// A placed bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    /// Unique within a level
    pub id: u32,
    /// Cell it occupies
    pub cell: Cell,
    /// Blast radius in tiles
    pub radius: u32,
    /// Ticks until detonation
    pub fuse_ticks: u32,
    /// Detonated (expired or chained)
    pub exploded: bool,
    /// Blocks the player. Off at placement until the player steps clear.
    pub collision_enabled: bool,
}

impl Bomb {
    /// Create an armed bomb with player collision disabled.
    pub fn new(id: u32, cell: Cell, radius: u32, fuse_ticks: u32) -> Self {
        Self {
            id,
            cell,
            radius,
            fuse_ticks,
            exploded: false,
            collision_enabled: false,
        }
    }

    /// Advance the fuse by one tick.
    ///
    /// Returns true on the tick the fuse runs out. An exploded bomb never
    /// fires again.
    pub fn tick(&mut self) -> bool {
        if self.exploded {
            return false;
        }
        self.fuse_ticks = self.fuse_ticks.saturating_sub(1);
        if self.fuse_ticks == 0 {
            self.exploded = true;
            return true;
        }
        false
    }

    /// Force detonation (chain reaction). Returns false if already exploded.
    pub fn explode(&mut self) -> bool {
        if self.exploded {
            return false;
        }
        self.exploded = true;
        self.fuse_ticks = 0;
        true
    }

    /// Collider (the full cell).
    pub fn collider(&self, tile_size: i32) -> Rect {
        self.cell.rect(tile_size)
    }

    /// Turn player collision on once `player` no longer overlaps the bomb.
    ///
    /// Returns the resulting flag. Never turns collision back off.
    pub fn enable_collision(&mut self, player: &Rect, tile_size: i32) -> bool {
        if !self.collision_enabled && !self.collider(tile_size).intersects(player) {
            self.collision_enabled = true;
        }
        self.collision_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuse_runs_out_once() {
        let mut bomb = Bomb::new(0, Cell::new(1, 1), 1, 3);
        assert!(!bomb.tick());
        assert!(!bomb.tick());
        assert!(bomb.tick());
        assert!(bomb.exploded);
        assert!(!bomb.tick());
        assert!(!bomb.explode());
    }

    #[test]
    fn test_forced_explosion() {
        let mut bomb = Bomb::new(0, Cell::new(1, 1), 1, 100);
        assert!(bomb.explode());
        assert!(!bomb.tick());
    }

    #[test]
    fn test_collision_enabled_after_leaving() {
        let mut bomb = Bomb::new(0, Cell::new(1, 1), 1, 100);
        let on_top = Rect::new(60, 48, 48, 48);
        assert!(!bomb.enable_collision(&on_top, 48));

        // Touching the edge counts as clear
        let clear = Rect::new(96, 48, 48, 48);
        assert!(bomb.enable_collision(&clear, 48));

        // Stays on even if the player walks back into it
        assert!(bomb.enable_collision(&on_top, 48));
    }
}
