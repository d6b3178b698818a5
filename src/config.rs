//! Game Configuration
//!
//! Constants consumed by the simulation: grid dimensions, tile size, frame
//! rate, stat maxima, enemy counts per level and timer lengths. Fixed at
//! process start; a running session only ever reads them.

use std::path::Path;
use std::time::Duration;

use serde::{Serialize, Deserialize};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Grid too small to hold the spawn pocket and the exit.
    #[error("Grid must be at least 5x5, got {cols}x{rows}")]
    GridTooSmall {
        /// Configured columns
        cols: i32,
        /// Configured rows
        rows: i32,
    },

    /// Grid cell count or pixel extent does not fit in an `i32`.
    #[error("Grid {cols}x{rows} at tile size {tile_size} is too large")]
    GridTooLarge {
        /// Configured columns
        cols: i32,
        /// Configured rows
        rows: i32,
        /// Configured tile size
        tile_size: i32,
    },

    /// Explosion radius longer than the grid.
    #[error("Max radius {radius} exceeds the grid span {span}")]
    RadiusTooLarge {
        /// Configured max radius
        radius: u32,
        /// Longer grid side
        span: i32,
    },

    /// Tile size must be positive.
    #[error("Tile size must be positive, got {0}")]
    InvalidTileSize(i32),

    /// Frame rate must be positive.
    #[error("Frame rate must be positive")]
    InvalidFrameRate,

    /// At least one level is required.
    #[error("At least one level is required")]
    NoLevels,

    /// A per-mille chance above 1000.
    #[error("Chance {name} out of range: {value} (max 1000)")]
    ChanceOutOfRange {
        /// Field name
        name: &'static str,
        /// Configured value
        value: u32,
    },

    /// A starting stat above its maximum, or a maximum of zero.
    #[error("Stat {name} invalid: start {start}, max {max}")]
    InvalidStat {
        /// Stat name
        name: &'static str,
        /// Starting value
        start: u32,
        /// Maximum value
        max: u32,
    },

    /// Movement speed must stay below one tile per tick.
    #[error("Max speed {speed} must be below tile size {tile_size}")]
    SpeedTooHigh {
        /// Configured max speed
        speed: u32,
        /// Configured tile size
        tile_size: i32,
    },

    /// Failed to read the config file.
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the config file.
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulation configuration.
///
/// All durations are in ticks at `fps`. Chances are per-mille.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid columns
    pub cols: i32,
    /// Grid rows
    pub rows: i32,
    /// Tile edge length in pixels
    pub tile_size: i32,
    /// Target frame rate (Hz)
    pub fps: u32,

    /// Maximum player hit points
    pub max_hp: u32,
    /// Maximum bomb capacity
    pub max_bombs: u32,
    /// Maximum explosion radius
    pub max_radius: u32,
    /// Maximum player speed (pixels per tick)
    pub max_speed: u32,

    /// Player hit points at level start
    pub start_hp: u32,
    /// Player speed at level start (also the floor speed loss stops at)
    pub start_speed: u32,
    /// Player bomb capacity at level start
    pub start_bombs: u32,
    /// Player explosion radius at level start
    pub start_radius: u32,

    /// Enemy count per level; its length is the number of levels
    pub enemies_per_level: Vec<u32>,

    /// Ticks from placement to detonation
    pub bomb_fuse_ticks: u32,
    /// Ticks an explosion stays live
    pub explosion_ticks: u32,
    /// Ticks a hit breakable tile burns before turning to floor
    pub tile_burn_ticks: u32,
    /// Player invulnerability after a hit and at level start
    pub player_invulnerability_ticks: u32,
    /// Enemy invulnerability after a hit
    pub enemy_hit_cooldown_ticks: u32,
    /// Delay between the player dying or clearing a level and the phase change
    pub phase_transition_ticks: u32,

    /// Chance an interior non-pillar cell starts breakable
    pub breakable_chance: u32,
    /// Chance a destroyed breakable tile drops a power-up
    pub powerup_chance: u32,
    /// Chance per tick an enemy turns without being blocked
    pub enemy_turn_chance: u32,

    /// Score display cap
    pub max_score: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cols: 17,
            rows: 13,
            tile_size: 48, // 16px sprites at 3x
            fps: crate::TICK_RATE,
            max_hp: 9,
            max_bombs: 6,
            max_radius: 4,
            max_speed: 6,
            start_hp: 5,
            start_speed: 3,
            start_bombs: 1,
            start_radius: 1,
            enemies_per_level: vec![3, 4, 5],
            bomb_fuse_ticks: 144,              // 2.4s
            explosion_ticks: 30,               // 0.5s
            tile_burn_ticks: 30,               // 0.5s
            player_invulnerability_ticks: 360, // 6s
            enemy_hit_cooldown_ticks: 120,     // 2s
            phase_transition_ticks: 180,       // 3s
            breakable_chance: 400,
            powerup_chance: 400,
            enemy_turn_chance: 7, // ~2 in 301
            max_score: 99_999_999,
        }
    }
}

impl GameConfig {
    /// Load and validate a JSON config file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 5 || self.rows < 5 {
            return Err(ConfigError::GridTooSmall { cols: self.cols, rows: self.rows });
        }
        if self.tile_size <= 0 {
            return Err(ConfigError::InvalidTileSize(self.tile_size));
        }
        let limit = i32::MAX as i64;
        let (cols, rows, tile) = (self.cols as i64, self.rows as i64, self.tile_size as i64);
        if cols * rows > limit || cols * tile > limit || rows * tile > limit {
            return Err(ConfigError::GridTooLarge {
                cols: self.cols,
                rows: self.rows,
                tile_size: self.tile_size,
            });
        }
        if self.fps == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        if self.enemies_per_level.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        for (name, value) in [
            ("breakable_chance", self.breakable_chance),
            ("powerup_chance", self.powerup_chance),
            ("enemy_turn_chance", self.enemy_turn_chance),
        ] {
            if value > 1000 {
                return Err(ConfigError::ChanceOutOfRange { name, value });
            }
        }

        for (name, start, max) in [
            ("hp", self.start_hp, self.max_hp),
            ("bombs", self.start_bombs, self.max_bombs),
            ("radius", self.start_radius, self.max_radius),
            ("speed", self.start_speed, self.max_speed),
        ] {
            if max == 0 || start == 0 || start > max {
                return Err(ConfigError::InvalidStat { name, start, max });
            }
        }

        let span = self.cols.max(self.rows);
        if self.max_radius as i64 > span as i64 {
            return Err(ConfigError::RadiusTooLarge { radius: self.max_radius, span });
        }

        if self.max_speed as i64 >= self.tile_size as i64 {
            return Err(ConfigError::SpeedTooHigh {
                speed: self.max_speed,
                tile_size: self.tile_size,
            });
        }

        Ok(())
    }

    /// Number of levels in a game.
    pub fn max_level(&self) -> u32 {
        self.enemies_per_level.len() as u32
    }

    /// Enemy count for a zero-based level (last entry repeats past the end).
    pub fn enemies_for_level(&self, level: u32) -> u32 {
        self.enemies_per_level
            .get(level as usize)
            .or_else(|| self.enemies_per_level.last())
            .copied()
            .unwrap_or(0)
    }

    /// Wall-clock length of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.fps.max(1) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_level(), 3);
        assert_eq!(config.enemies_for_level(0), 3);
        assert_eq!(config.enemies_for_level(2), 5);
        assert_eq!(config.enemies_for_level(9), 5);
        assert_eq!(config.tick_duration(), Duration::from_micros(16_666));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{ "cols": 21, "enemies_per_level": [1] }"#).unwrap();
        assert_eq!(config.cols, 21);
        assert_eq!(config.rows, 13);
        assert_eq!(config.max_level(), 1);
    }

    #[test]
    fn test_rejects_invalid() {
        let small = GameConfig { cols: 3, ..GameConfig::default() };
        assert!(matches!(small.validate(), Err(ConfigError::GridTooSmall { .. })));

        let no_levels = GameConfig { enemies_per_level: vec![], ..GameConfig::default() };
        assert!(matches!(no_levels.validate(), Err(ConfigError::NoLevels)));

        let chance = GameConfig { powerup_chance: 1001, ..GameConfig::default() };
        assert!(matches!(chance.validate(), Err(ConfigError::ChanceOutOfRange { .. })));

        let stat = GameConfig { start_hp: 10, ..GameConfig::default() };
        assert!(matches!(stat.validate(), Err(ConfigError::InvalidStat { name: "hp", .. })));

        let fast = GameConfig { max_speed: 48, ..GameConfig::default() };
        assert!(matches!(fast.validate(), Err(ConfigError::SpeedTooHigh { .. })));

        let wide = GameConfig { cols: 50_000, rows: 50_000, ..GameConfig::default() };
        assert!(matches!(wide.validate(), Err(ConfigError::GridTooLarge { .. })));

        let huge_tiles = GameConfig { cols: 100, tile_size: 30_000_000, ..GameConfig::default() };
        assert!(matches!(huge_tiles.validate(), Err(ConfigError::GridTooLarge { .. })));

        let long_reach = GameConfig { max_radius: 18, ..GameConfig::default() };
        assert!(matches!(
            long_reach.validate(),
            Err(ConfigError::RadiusTooLarge { radius: 18, span: 17 })
        ));

        assert!(matches!(
            GameConfig::from_json_str(r#"{ "cols": 2147483647, "rows": 2147483647 }"#),
            Err(ConfigError::GridTooLarge { .. })
        ));

        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
