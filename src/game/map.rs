//! Level Layout
//!
//! Fixed per-level rule: unbreakable border and pillars on every even/even
//! interior cell, breakable blocks scattered over the rest, a clear spawn
//! pocket in the top-left corner and the exit in the bottom-right corner.

use tracing::debug;

use crate::config::GameConfig;
use crate::core::direction::Direction;
use crate::core::rect::Cell;
use crate::core::rng::{shuffle, RandomSource};
use crate::game::enemy::{Enemy, EnemyKind};
use crate::game::floor::Floor;
use crate::game::grid::{Grid, TileType};

/// Cells kept as floor around the spawn point.
pub const SPAWN_POCKET: [Cell; 3] = [Cell::new(1, 1), Cell::new(2, 1), Cell::new(1, 2)];

/// Cells forced breakable to seal the spawn pocket.
pub const SPAWN_SEAL: [Cell; 2] = [Cell::new(3, 1), Cell::new(1, 3)];

/// True for cells that are unbreakable in every layout.
#[inline]
pub fn is_fixed_unbreakable(col: i32, row: i32, width: i32, height: i32) -> bool {
    col == 0
        || row == 0
        || col == width - 1
        || row == height - 1
        || (col % 2 == 0 && row % 2 == 0)
}

/// Generate the terrain for a level.
pub fn create_grid(config: &GameConfig, rng: &mut dyn RandomSource) -> Grid {
    let mut grid = Grid::new(config.cols, config.rows);

    for row in 0..config.rows {
        for col in 0..config.cols {
            let cell = Cell::new(col, row);
            let tile_type = if is_fixed_unbreakable(col, row, config.cols, config.rows) {
                TileType::Unbreakable
            } else if rng.chance(config.breakable_chance) {
                TileType::Breakable
            } else {
                TileType::Floor
            };
            grid.set_type(cell, tile_type);
        }
    }

    for cell in SPAWN_POCKET {
        grid.set_type(cell, TileType::Floor);
    }
    for cell in SPAWN_SEAL {
        if !is_fixed_unbreakable(cell.col, cell.row, config.cols, config.rows) {
            grid.set_type(cell, TileType::Breakable);
        }
    }

    // Exit sits on the last interior cell, which is never a pillar for odd
    // dimensions. Force it walkable either way.
    let exit = Cell::new(config.cols - 2, config.rows - 2);
    grid.set_type(exit, TileType::Floor);
    grid.set_exit(exit);

    grid
}

/// Generate a full level: terrain plus enemies.
///
/// `level` is zero-based. Enemies take distinct floor cells outside the spawn
/// pocket; if fewer cells are free than the level asks for, fewer enemies spawn.
pub fn create_map(config: &GameConfig, level: u32, rng: &mut dyn RandomSource) -> Floor {
    let grid = create_grid(config, rng);

    let mut candidates: Vec<Cell> = grid
        .tiles()
        .iter()
        .filter(|t| t.tile_type == TileType::Floor && !SPAWN_POCKET.contains(&t.cell))
        .map(|t| t.cell)
        .collect();
    shuffle(rng, &mut candidates);

    let mut floor = Floor::new(grid, config.tile_size);
    let wanted = config.enemies_for_level(level) as usize;

    for cell in candidates.into_iter().take(wanted) {
        let kind = EnemyKind::ALL[rng.next_int(EnemyKind::ALL.len() as u32) as usize];
        let direction = Direction::ALL[rng.next_int(4) as usize];
        let id = floor.next_id();
        floor.add_enemy(Enemy::new(id, kind, cell, config.tile_size, direction));
    }

    debug!(
        "Level {} generated: {} breakable tiles, {} enemies",
        level + 1,
        floor.grid().tiles().iter().filter(|t| t.tile_type == TileType::Breakable).count(),
        floor.enemies().len()
    );

    floor
}
