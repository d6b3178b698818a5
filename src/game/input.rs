//! Input Commands and Buffering
//!
//! Commands arrive at any time between ticks. The buffer collapses them into
//! one `TickInput` per tick: the most recent directional command wins and
//! keeps applying until `Stop`; a bomb request fires once.

use serde::{Serialize, Deserialize};

use crate::core::direction::Direction;

/// Player commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Walk up
    MoveUp,
    /// Walk down
    MoveDown,
    /// Walk left
    MoveLeft,
    /// Walk right
    MoveRight,
    /// Drop a bomb on the current cell
    PlaceBomb,
    /// Stop walking
    Stop,
}

impl Command {
    /// Heading for directional commands.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Command::MoveUp => Some(Direction::Up),
            Command::MoveDown => Some(Direction::Down),
            Command::MoveLeft => Some(Direction::Left),
            Command::MoveRight => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Input applied during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Heading to walk, or `None` to stand still
    pub movement: Option<Direction>,
    /// Drop a bomb this tick
    pub place_bomb: bool,
}

impl TickInput {
    /// No movement, no bomb.
    pub const IDLE: TickInput = TickInput { movement: None, place_bomb: false };

    /// Walk in `dir`.
    pub fn walking(dir: Direction) -> Self {
        Self { movement: Some(dir), place_bomb: false }
    }

    /// Copy with a bomb request.
    pub fn with_bomb(mut self) -> Self {
        self.place_bomb = true;
        self
    }
}

/// Collapses commands between ticks.
#[derive(Clone, Debug, Default)]
pub struct InputBuffer {
    movement: Option<Direction>,
    place_bomb: bool,
}

impl InputBuffer {
    /// Empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a command.
    pub fn push(&mut self, command: Command) {
        match command {
            Command::PlaceBomb => self.place_bomb = true,
            Command::Stop => self.movement = None,
            other => self.movement = other.direction(),
        }
    }

    /// Produce this tick's input. Movement persists; the bomb request is consumed.
    pub fn take(&mut self) -> TickInput {
        TickInput {
            movement: self.movement,
            place_bomb: std::mem::take(&mut self.place_bomb),
        }
    }

    /// Forget everything (level change).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_direction_wins() {
        let mut buffer = InputBuffer::new();
        buffer.push(Command::MoveUp);
        buffer.push(Command::MoveLeft);
        assert_eq!(buffer.take(), TickInput::walking(Direction::Left));
        // Held until stopped
        assert_eq!(buffer.take(), TickInput::walking(Direction::Left));
        buffer.push(Command::Stop);
        assert_eq!(buffer.take(), TickInput::IDLE);
    }

    #[test]
    fn test_bomb_is_one_shot() {
        let mut buffer = InputBuffer::new();
        buffer.push(Command::MoveRight);
        buffer.push(Command::PlaceBomb);
        buffer.push(Command::PlaceBomb);
        assert_eq!(buffer.take(), TickInput::walking(Direction::Right).with_bomb());
        assert!(!buffer.take().place_bomb);
    }

    #[test]
    fn test_clear() {
        let mut buffer = InputBuffer::new();
        buffer.push(Command::MoveDown);
        buffer.push(Command::PlaceBomb);
        buffer.clear();
        assert_eq!(buffer.take(), TickInput::IDLE);
    }
}
