//! Movement headings on the grid.

use serde::{Serialize, Deserialize};

/// One of the four axis-aligned headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum Direction {
    /// Towards row 0
    Up = 0,
    /// Towards the last row
    #[default]
    Down = 1,
    /// Towards column 0
    Left = 2,
    /// Towards the last column
    Right = 3,
}

impl Direction {
    /// All headings, in propagation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Column delta of one step.
    #[inline]
    pub const fn dx(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            _ => 0,
        }
    }

    /// Row delta of one step.
    #[inline]
    pub const fn dy(self) -> i32 {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
            _ => 0,
        }
    }

    /// The heading pointing the other way.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Convert from index (0-3).
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Direction::Up),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Right),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_are_unit_steps() {
        for dir in Direction::ALL {
            assert_eq!(dir.dx().abs() + dir.dy().abs(), 1);
            assert_eq!(dir.dx() + dir.opposite().dx(), 0);
            assert_eq!(dir.dy() + dir.opposite().dy(), 0);
            assert_eq!(Direction::from_index(dir as u8), Some(dir));
        }
        assert_eq!(Direction::from_index(4), None);
    }
}
