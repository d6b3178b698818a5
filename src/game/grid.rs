//! Grid / Terrain Model
//!
//! The static part of a level: a `width x height` array of tiles and the
//! exit cell. Anything outside the array reads as `Unbreakable`, so callers
//! never need their own bounds checks.

use serde::{Serialize, Deserialize};

use crate::core::rect::{Cell, Rect};

// =============================================================================
// TILES
// =============================================================================

/// Terrain kind of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum TileType {
    /// Walkable, blasts pass through
    #[default]
    Floor = 0,
    /// Blocks movement; destroyed by the first blast that reaches it
    Breakable = 1,
    /// Blocks movement and blasts
    Unbreakable = 2,
}

impl TileType {
    /// True for tiles actors cannot enter.
    #[inline]
    pub fn is_blocking(self) -> bool {
        !matches!(self, TileType::Floor)
    }
}

/// One grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Position
    pub cell: Cell,
    /// Terrain kind
    pub tile_type: TileType,
    /// Hit by a blast and waiting to be replaced by floor
    pub hit: bool,
}

impl Tile {
    /// Create an unhit tile.
    pub const fn new(cell: Cell, tile_type: TileType) -> Self {
        Self { cell, tile_type, hit: false }
    }
}

// =============================================================================
// GRID
// =============================================================================

/// Terrain for one level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    /// Row-major tiles
    tiles: Vec<Tile>,
    exit: Cell,
}

impl Grid {
    /// Create a cleared grid (unbreakable border, floor inside) with the exit
    /// in the bottom-right interior corner.
    ///
    /// Dimensions below 1 are raised to 1.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut grid = Self {
            width,
            height,
            tiles: Vec::with_capacity((width * height) as usize),
            exit: Cell::new((width - 2).max(0), (height - 2).max(0)),
        };
        grid.clear();
        grid
    }

    /// Columns.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Rows.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// True if `cell` lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.col >= 0 && cell.row >= 0 && cell.col < self.width && cell.row < self.height
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        if self.in_bounds(cell) {
            Some((cell.row * self.width + cell.col) as usize)
        } else {
            None
        }
    }

    /// Tile type at a coordinate; `Unbreakable` outside the grid.
    pub fn check_floor(&self, col: i32, row: i32) -> TileType {
        self.tile(Cell::new(col, row))
            .map(|t| t.tile_type)
            .unwrap_or(TileType::Unbreakable)
    }

    /// True if the cell is in bounds and walkable.
    #[inline]
    pub fn is_floor(&self, cell: Cell) -> bool {
        self.check_floor(cell.col, cell.row) == TileType::Floor
    }

    /// Tile at a cell.
    pub fn tile(&self, cell: Cell) -> Option<&Tile> {
        self.index(cell).map(|i| &self.tiles[i])
    }

    /// Replace the tile at the tile's own cell. Out-of-bounds tiles are ignored.
    pub fn set_cell(&mut self, tile: Tile) {
        if let Some(i) = self.index(tile.cell) {
            self.tiles[i] = tile;
        }
    }

    /// Set the terrain kind of a cell, clearing its hit flag.
    pub fn set_type(&mut self, cell: Cell, tile_type: TileType) {
        self.set_cell(Tile::new(cell, tile_type));
    }

    /// Mark a breakable tile as hit.
    ///
    /// Returns true only on the first hit of a breakable tile.
    pub fn mark_hit(&mut self, cell: Cell) -> bool {
        match self.index(cell) {
            Some(i) => {
                let tile = &mut self.tiles[i];
                if tile.tile_type == TileType::Breakable && !tile.hit {
                    tile.hit = true;
                    true
                } else {
                    false
                }
            }
            None => false,
        }
    }

    /// Reset to an unbreakable border around floor.
    pub fn clear(&mut self) {
        self.tiles.clear();
        for row in 0..self.height {
            for col in 0..self.width {
                let border = row == 0 || col == 0 || row == self.height - 1 || col == self.width - 1;
                let tile_type = if border { TileType::Unbreakable } else { TileType::Floor };
                self.tiles.push(Tile::new(Cell::new(col, row), tile_type));
            }
        }
    }

    /// Exit cell.
    #[inline]
    pub fn exit(&self) -> Cell {
        self.exit
    }

    /// Move the exit.
    pub fn set_exit(&mut self, cell: Cell) {
        self.exit = cell;
    }

    /// All tiles, row-major.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// True if any blocking cell overlaps `rect`. Cells outside the grid block.
    pub fn blocks_rect(&self, rect: &Rect, tile_size: i32) -> bool {
        let Some((first, last)) = rect.cell_span(tile_size) else {
            return false;
        };
        for row in first.row..=last.row {
            for col in first.col..=last.col {
                if self.check_floor(col, row).is_blocking() {
                    return true;
                }
            }
        }
        false
    }
}
