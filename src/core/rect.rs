//! Grid Cells and Axis-Aligned Rectangles
//!
//! All positions are integer pixels. A cell `(col, row)` covers the pixel
//! rectangle `[col * tile, (col + 1) * tile) x [row * tile, (row + 1) * tile)`.
//! Intervals are half-open, so rectangles that only share an edge do not overlap.

use serde::{Serialize, Deserialize};

use super::direction::Direction;

// =============================================================================
// CELL
// =============================================================================

/// Grid coordinate. May lie outside the grid; bounds are checked by the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Column (x)
    pub col: i32,
    /// Row (y)
    pub row: i32,
}

impl Cell {
    /// Create a cell.
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Cell `steps` tiles away along `dir`.
    #[inline]
    pub fn offset(self, dir: Direction, steps: i32) -> Self {
        Self {
            col: self.col + dir.dx() * steps,
            row: self.row + dir.dy() * steps,
        }
    }

    /// Cell containing the given pixel.
    #[inline]
    pub fn containing(x: i32, y: i32, tile_size: i32) -> Self {
        Self {
            col: x.div_euclid(tile_size),
            row: y.div_euclid(tile_size),
        }
    }

    /// Pixel rectangle covered by this cell.
    #[inline]
    pub fn rect(self, tile_size: i32) -> Rect {
        Rect::new(self.col * tile_size, self.row * tile_size, tile_size, tile_size)
    }
}

// =============================================================================
// RECT
// =============================================================================

/// Axis-aligned rectangle in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge (inclusive)
    pub x: i32,
    /// Top edge (inclusive)
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True if the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Half-open overlap test. Touching edges do not overlap.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Copy moved by `(dx, dy)`.
    #[inline]
    pub const fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Center point (rounded down).
    #[inline]
    pub const fn center(&self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Inclusive range of cells this rectangle touches.
    ///
    /// Returns `None` for an empty rectangle.
    pub fn cell_span(&self, tile_size: i32) -> Option<(Cell, Cell)> {
        if self.is_empty() {
            return None;
        }
        let first = Cell::containing(self.x, self.y, tile_size);
        let last = Cell::containing(self.right() - 1, self.bottom() - 1, tile_size);
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 48, 48);
        let right = Rect::new(48, 0, 48, 48);
        let below = Rect::new(0, 48, 48, 48);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
        assert!(a.intersects(&right.translate(-1, 0)));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let a = Rect::new(0, 0, 48, 48);
        assert!(!a.intersects(&Rect::new(10, 10, 0, 5)));
    }

    #[test]
    fn test_cell_span() {
        let r = Rect::new(50, 47, 48, 2);
        let (first, last) = r.cell_span(48).unwrap();
        assert_eq!(first, Cell::new(1, 0));
        assert_eq!(last, Cell::new(2, 1));

        // Negative coordinates floor towards -inf
        let r = Rect::new(-1, -1, 1, 1);
        assert_eq!(r.cell_span(48).unwrap().0, Cell::new(-1, -1));
    }

    #[test]
    fn test_cell_offset() {
        let c = Cell::new(3, 3);
        assert_eq!(c.offset(Direction::Up, 2), Cell::new(3, 1));
        assert_eq!(c.offset(Direction::Right, 1), Cell::new(4, 3));
        assert_eq!(c.rect(48), Rect::new(144, 144, 48, 48));
    }
}
