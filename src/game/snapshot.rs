//! Frame Snapshots
//!
//! Read-only view of a session after a tick, for renderers and the HUD.
//! Snapshots own their data so they can be shared across tasks.

use serde::{Serialize, Deserialize};

use crate::core::direction::Direction;
use crate::core::rect::Cell;
use crate::game::enemy::{EnemyAnimation, EnemyKind};
use crate::game::explosion::BlastTile;
use crate::game::grid::TileType;
use crate::game::player::PlayerAnimation;
use crate::game::powerup::PowerUpKind;
use crate::game::state::{GamePhase, GameSession};

/// One terrain tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    /// Position
    pub cell: Cell,
    /// Terrain type
    pub tile_type: TileType,
    /// Burning down after a blast
    pub burning: bool,
}

/// A placed bomb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombView {
    /// Bomb id
    pub id: u32,
    /// Position
    pub cell: Cell,
    /// Ticks until detonation
    pub fuse_ticks: u32,
}

/// A live enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyView {
    /// Enemy id
    pub id: u32,
    /// Variant
    pub kind: EnemyKind,
    /// Left edge (pixels)
    pub x: i32,
    /// Top edge (pixels)
    pub y: i32,
    /// Heading
    pub direction: Direction,
    /// Animation state
    pub animation: EnemyAnimation,
}

/// A live explosion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionView {
    /// Explosion id
    pub id: u32,
    /// Affected cells with their sprite roles
    pub tiles: Vec<BlastTile>,
    /// Ticks until it disappears
    pub remaining_ticks: u32,
}

/// A power-up on the ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUpView {
    /// Power-up id
    pub id: u32,
    /// Position
    pub cell: Cell,
    /// Variant
    pub kind: PowerUpKind,
}

/// The player sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Left edge (pixels)
    pub x: i32,
    /// Top edge (pixels)
    pub y: i32,
    /// Facing
    pub direction: Direction,
    /// Animation state
    pub animation: PlayerAnimation,
    /// Flashing while invulnerable
    pub immortal: bool,
}

/// Values shown on the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Hit points
    pub hp: u32,
    /// Bomb capacity
    pub bombs: u32,
    /// Bombs available now
    pub current_bombs: u32,
    /// Blast radius
    pub radius: u32,
    /// Speed
    pub speed: u32,
    /// Score this level
    pub score: u32,
    /// Banked score plus this level, capped
    pub total_score: u32,
    /// One-based level number
    pub level: u32,
    /// Phase
    pub phase: GamePhase,
}

/// Everything needed to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Tick the snapshot was taken after
    pub tick: u32,
    /// Grid columns
    pub width: i32,
    /// Grid rows
    pub height: i32,
    /// Terrain, row-major
    pub tiles: Vec<TileView>,
    /// Exit cell
    pub exit: Cell,
    /// Bombs
    pub bombs: Vec<BombView>,
    /// Enemies
    pub enemies: Vec<EnemyView>,
    /// Explosions
    pub explosions: Vec<ExplosionView>,
    /// Power-ups
    pub power_ups: Vec<PowerUpView>,
    /// Player
    pub player: PlayerView,
    /// HUD values
    pub hud: HudSnapshot,
}

impl FrameSnapshot {
    /// Capture the current state of `session`.
    pub fn capture(session: &GameSession) -> Self {
        let floor = &session.floor;
        let grid = floor.grid();
        let player = &session.player;

        Self {
            tick: session.tick,
            width: grid.width(),
            height: grid.height(),
            tiles: grid
                .tiles()
                .iter()
                .map(|t| TileView { cell: t.cell, tile_type: t.tile_type, burning: t.hit })
                .collect(),
            exit: grid.exit(),
            bombs: floor
                .bombs()
                .iter()
                .map(|b| BombView { id: b.id, cell: b.cell, fuse_ticks: b.fuse_ticks })
                .collect(),
            enemies: floor
                .enemies()
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    x: e.x,
                    y: e.y,
                    direction: e.direction,
                    animation: e.animation,
                })
                .collect(),
            explosions: floor
                .explosions()
                .iter()
                .map(|e| ExplosionView {
                    id: e.id,
                    tiles: e.tiles.clone(),
                    remaining_ticks: e.remaining_ticks,
                })
                .collect(),
            power_ups: floor
                .power_ups()
                .iter()
                .map(|p| PowerUpView { id: p.id, cell: p.cell, kind: p.kind })
                .collect(),
            player: PlayerView {
                x: player.x,
                y: player.y,
                direction: player.direction,
                animation: player.animation,
                immortal: player.is_immortal(),
            },
            hud: HudSnapshot {
                hp: player.hp,
                bombs: player.bombs,
                current_bombs: player.current_bombs,
                radius: player.radius,
                speed: player.speed,
                score: player.score,
                total_score: session.display_total(),
                level: session.level + 1,
                phase: session.phase,
            },
        }
    }
}
