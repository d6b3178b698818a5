//! Explosions
//!
//! Blast propagation: from the bomb cell, walk each of the four directions
//! up to `radius` tiles. Unbreakable tiles (and anything off the grid) stop
//! the arm and are excluded. A breakable tile is included and stops the arm.
//! Floor is included and the arm continues.

use serde::{Serialize, Deserialize};

use crate::core::direction::Direction;
use crate::core::rect::{Cell, Rect};
use crate::game::grid::{Grid, TileType};

/// Position of a tile within the blast shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlastRole {
    /// Bomb cell
    Center,
    /// Interior of an arm
    Arm(Direction),
    /// Last tile of an arm
    End(Direction),
}

/// One cell reached by a blast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastTile {
    /// Affected cell
    pub cell: Cell,
    /// Sprite role
    pub role: BlastRole,
}

/// Compute the cells reached by a blast of `radius` at `origin`.
///
/// The center comes first, followed by each arm in `Direction::ALL` order
/// walking outward. Pure: the grid is only read.
pub fn propagate(grid: &Grid, origin: Cell, radius: u32) -> Vec<BlastTile> {
    let mut tiles = vec![BlastTile { cell: origin, role: BlastRole::Center }];

    for dir in Direction::ALL {
        let arm_start = tiles.len();
        for step in 1..=radius as i32 {
            let cell = origin.offset(dir, step);
            match grid.check_floor(cell.col, cell.row) {
                TileType::Unbreakable => break,
                TileType::Breakable => {
                    tiles.push(BlastTile { cell, role: BlastRole::Arm(dir) });
                    break;
                }
                TileType::Floor => {
                    tiles.push(BlastTile { cell, role: BlastRole::Arm(dir) });
                }
            }
        }
        if tiles.len() > arm_start {
            let last = tiles.len() - 1;
            tiles[last].role = BlastRole::End(dir);
        }
    }

    tiles
}

/// A live blast.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Explosion {
    /// Unique within a level
    pub id: u32,
    /// Bomb cell
    pub origin: Cell,
    /// Bomb radius
    pub radius: u32,
    /// Affected cells with roles
    pub tiles: Vec<BlastTile>,
    /// Ticks until retired
    pub remaining_ticks: u32,
}

impl Explosion {
    /// Propagate a blast over `grid` and wrap it with a lifetime.
    pub fn new(id: u32, grid: &Grid, origin: Cell, radius: u32, lifetime_ticks: u32) -> Self {
        Self {
            id,
            origin,
            radius,
            tiles: propagate(grid, origin, radius),
            remaining_ticks: lifetime_ticks,
        }
    }

    /// True if `cell` is part of this blast.
    pub fn contains(&self, cell: Cell) -> bool {
        self.tiles.iter().any(|t| t.cell == cell)
    }

    /// Affected cells.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.tiles.iter().map(|t| t.cell)
    }

    /// True if `rect` overlaps any affected cell.
    pub fn intersects(&self, rect: &Rect, tile_size: i32) -> bool {
        self.tiles.iter().any(|t| t.cell.rect(tile_size).intersects(rect))
    }

    /// Count down the lifetime. Returns true once expired.
    pub fn tick(&mut self) -> bool {
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        self.remaining_ticks == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn role_at(tiles: &[BlastTile], cell: Cell) -> Option<BlastRole> {
        tiles.iter().find(|t| t.cell == cell).map(|t| t.role)
    }

    #[test]
    fn test_open_grid_radius_two_hits_nine_tiles() {
        let grid = Grid::new(13, 11);
        let origin = Cell::new(6, 5);
        let tiles = propagate(&grid, origin, 2);

        assert_eq!(tiles.len(), 9);
        assert_eq!(role_at(&tiles, origin), Some(BlastRole::Center));
        assert_eq!(role_at(&tiles, Cell::new(7, 5)), Some(BlastRole::Arm(Direction::Right)));
        assert_eq!(role_at(&tiles, Cell::new(8, 5)), Some(BlastRole::End(Direction::Right)));
        assert_eq!(role_at(&tiles, Cell::new(6, 3)), Some(BlastRole::End(Direction::Up)));
        assert_eq!(role_at(&tiles, Cell::new(4, 5)), Some(BlastRole::End(Direction::Left)));
        assert_eq!(role_at(&tiles, Cell::new(6, 7)), Some(BlastRole::End(Direction::Down)));
    }

    #[test]
    fn test_radius_zero_is_center_only() {
        let grid = Grid::new(13, 11);
        let tiles = propagate(&grid, Cell::new(6, 5), 0);
        assert_eq!(tiles, vec![BlastTile { cell: Cell::new(6, 5), role: BlastRole::Center }]);
    }

    #[test]
    fn test_stops_at_breakable_and_unbreakable() {
        let mut grid = Grid::new(13, 11);
        let origin = Cell::new(6, 5);
        grid.set_type(Cell::new(7, 5), TileType::Unbreakable);
        grid.set_type(Cell::new(5, 5), TileType::Breakable);
        grid.set_type(Cell::new(4, 5), TileType::Breakable);

        let tiles = propagate(&grid, origin, 3);

        // Right arm is empty
        assert_eq!(role_at(&tiles, Cell::new(7, 5)), None);
        assert_eq!(role_at(&tiles, Cell::new(8, 5)), None);
        // Left arm stops on the first breakable, which is the arm end
        assert_eq!(role_at(&tiles, Cell::new(5, 5)), Some(BlastRole::End(Direction::Left)));
        assert_eq!(role_at(&tiles, Cell::new(4, 5)), None);
        // 1 center + 1 left + 3 up + 3 down
        assert_eq!(tiles.len(), 8);
    }

    #[test]
    fn test_border_limits_arm() {
        let grid = Grid::new(13, 11);
        let tiles = propagate(&grid, Cell::new(1, 1), 4);
        assert!(tiles.iter().all(|t| grid.in_bounds(t.cell)));
        assert!(tiles.iter().all(|t| grid.check_floor(t.cell.col, t.cell.row) != TileType::Unbreakable));
        assert_eq!(role_at(&tiles, Cell::new(0, 1)), None);
        assert_eq!(tiles.len(), 9);
    }

    #[test]
    fn test_lifetime() {
        let grid = Grid::new(13, 11);
        let mut explosion = Explosion::new(0, &grid, Cell::new(2, 2), 1, 2);
        assert!(explosion.contains(Cell::new(3, 2)));
        assert!(explosion.intersects(&Rect::new(100, 100, 10, 10), 48));
        assert!(!explosion.tick());
        assert!(explosion.tick());
    }

    proptest! {
        #[test]
        fn prop_never_crosses_unbreakable(
            seed in any::<u64>(),
            col in 1i32..12,
            row in 1i32..10,
            radius in 0u32..6,
        ) {
            use crate::core::rng::{DeterministicRng, RandomSource};

            let mut rng = DeterministicRng::new(seed);
            let mut grid = Grid::new(13, 11);
            for r in 1..10 {
                for c in 1..12 {
                    let tile_type = match rng.next_int(3) {
                        0 => TileType::Floor,
                        1 => TileType::Breakable,
                        _ => TileType::Unbreakable,
                    };
                    grid.set_type(Cell::new(c, r), tile_type);
                }
            }
            let origin = Cell::new(col, row);
            let tiles = propagate(&grid, origin, radius);

            prop_assert_eq!(tiles[0].cell, origin);
            for dir in Direction::ALL {
                let arm: Vec<Cell> = tiles.iter()
                    .filter(|t| matches!(t.role, BlastRole::Arm(d) | BlastRole::End(d) if d == dir))
                    .map(|t| t.cell)
                    .collect();
                prop_assert!(arm.len() <= radius as usize);
                for (i, cell) in arm.iter().enumerate() {
                    prop_assert_eq!(*cell, origin.offset(dir, i as i32 + 1));
                    let tile_type = grid.check_floor(cell.col, cell.row);
                    prop_assert_ne!(tile_type, TileType::Unbreakable);
                    // Only the last tile of an arm may be breakable
                    if i + 1 < arm.len() {
                        prop_assert_eq!(tile_type, TileType::Floor);
                    }
                }
            }
        }
    }
}
