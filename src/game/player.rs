//! Player State
//!
//! The player persists across levels and is reset (not recreated) when a
//! level starts. Movement collision is supplied by the caller as a predicate
//! so this module stays independent of the floor.

use serde::{Serialize, Deserialize};

use crate::config::GameConfig;
use crate::core::direction::Direction;
use crate::core::hash::StateHasher;
use crate::core::rect::{Cell, Rect};
use crate::game::powerup::{PowerUpEffect, PowerUpKind};

/// Player animation state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum PlayerAnimation {
    /// Standing still
    #[default]
    Idle = 0,
    /// Moving
    Walking = 1,
    /// Just took damage
    Hit = 2,
    /// Killed
    Dying = 3,
    /// Reached the exit
    Winning = 4,
}

/// The player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Left edge (pixels)
    pub x: i32,
    /// Top edge (pixels)
    pub y: i32,
    /// Hit points
    pub hp: u32,
    /// Pixels per tick
    pub speed: u32,
    /// Bomb capacity
    pub bombs: u32,
    /// Bombs available to place right now
    pub current_bombs: u32,
    /// Blast radius of placed bombs
    pub radius: u32,
    /// Facing
    pub direction: Direction,
    /// Walking this tick
    pub moving: bool,
    /// False once killed
    pub alive: bool,
    /// Showing the hit reaction
    pub damaged: bool,
    /// Ticks of invulnerability left
    pub immortal_ticks: u32,
    /// Reached the exit this level
    pub level_finished: bool,
    /// Animation state
    pub animation: PlayerAnimation,
    /// Score earned this level
    pub score: u32,
}

impl Player {
    /// Create a player at the spawn cell with starting stats.
    pub fn new(config: &GameConfig) -> Self {
        let mut player = Self {
            x: 0,
            y: 0,
            hp: 0,
            speed: 0,
            bombs: 0,
            current_bombs: 0,
            radius: 0,
            direction: Direction::Down,
            moving: false,
            alive: true,
            damaged: false,
            immortal_ticks: 0,
            level_finished: false,
            animation: PlayerAnimation::Idle,
            score: 0,
        };
        player.reset(config);
        player
    }

    /// Restore starting stats and move to the spawn cell.
    ///
    /// The player starts each level invulnerable.
    pub fn reset(&mut self, config: &GameConfig) {
        let spawn = Self::spawn_cell();
        self.x = spawn.col * config.tile_size;
        self.y = spawn.row * config.tile_size;
        self.hp = config.start_hp;
        self.speed = config.start_speed;
        self.bombs = config.start_bombs;
        self.current_bombs = config.start_bombs;
        self.radius = config.start_radius;
        self.direction = Direction::Down;
        self.moving = false;
        self.alive = true;
        self.damaged = false;
        self.immortal_ticks = config.player_invulnerability_ticks;
        self.level_finished = false;
        self.animation = PlayerAnimation::Idle;
        self.score = 0;
    }

    /// Spawn cell, top-left interior corner.
    pub const fn spawn_cell() -> Cell {
        Cell::new(1, 1)
    }

    /// Collider (one full tile).
    pub fn collider(&self, tile_size: i32) -> Rect {
        Rect::new(self.x, self.y, tile_size, tile_size)
    }

    /// Cell containing the collider center.
    pub fn center_cell(&self, tile_size: i32) -> Cell {
        let (cx, cy) = self.collider(tile_size).center();
        Cell::containing(cx, cy, tile_size)
    }

    /// True while damage is ignored.
    #[inline]
    pub fn is_immortal(&self) -> bool {
        self.immortal_ticks > 0
    }

    /// True while input is accepted.
    #[inline]
    pub fn can_act(&self) -> bool {
        self.alive && !self.level_finished
    }

    // =========================================================================
    // MOVEMENT
    // =========================================================================

    fn start_moving(&mut self, direction: Direction) {
        if !self.can_act() {
            return;
        }
        self.direction = direction;
        self.moving = true;
        if !self.damaged {
            self.animation = PlayerAnimation::Walking;
        }
    }

    /// Head up.
    pub fn move_up(&mut self) {
        self.start_moving(Direction::Up);
    }

    /// Head down.
    pub fn move_down(&mut self) {
        self.start_moving(Direction::Down);
    }

    /// Head left.
    pub fn move_left(&mut self) {
        self.start_moving(Direction::Left);
    }

    /// Head right.
    pub fn move_right(&mut self) {
        self.start_moving(Direction::Right);
    }

    /// Stop walking.
    pub fn stop(&mut self) {
        if !self.can_act() {
            return;
        }
        self.moving = false;
        if !self.damaged {
            self.animation = PlayerAnimation::Idle;
        }
    }

    /// Apply one step of movement.
    ///
    /// If the next collider is blocked the move is rejected and the player
    /// snaps to the cell containing its center, which lines it up with
    /// corridors. Returns true if the player moved.
    pub fn update_position<F>(&mut self, tile_size: i32, blocked: F) -> bool
    where
        F: Fn(&Rect) -> bool,
    {
        if !self.can_act() || !self.moving {
            return false;
        }

        let step = self.speed as i32;
        let next = self
            .collider(tile_size)
            .translate(self.direction.dx() * step, self.direction.dy() * step);

        if blocked(&next) {
            let cell = self.center_cell(tile_size);
            self.x = cell.col * tile_size;
            self.y = cell.row * tile_size;
            false
        } else {
            self.x = next.x;
            self.y = next.y;
            true
        }
    }

    // =========================================================================
    // DAMAGE
    // =========================================================================

    /// Take one hit.
    ///
    /// No-op while immortal, dead or after finishing the level. Otherwise
    /// loses a hit point and one speed above the starting speed, then becomes
    /// immortal for the configured window. Returns true if the hit landed.
    pub fn damage(&mut self, config: &GameConfig) -> bool {
        if self.is_immortal() || !self.alive || self.level_finished {
            return false;
        }

        self.hp = self.hp.saturating_sub(1);
        if self.speed > config.start_speed {
            self.speed -= 1;
        }

        if self.hp == 0 {
            self.die();
        } else {
            self.damaged = true;
            self.immortal_ticks = config.player_invulnerability_ticks;
            self.animation = PlayerAnimation::Hit;
        }
        true
    }

    /// Kill the player. Terminal for the level.
    pub fn die(&mut self) {
        self.alive = false;
        self.hp = 0;
        self.moving = false;
        self.damaged = false;
        self.immortal_ticks = 0;
        self.animation = PlayerAnimation::Dying;
    }

    /// Mark the level as finished.
    pub fn finish_level(&mut self) {
        if !self.alive || self.level_finished {
            return;
        }
        self.level_finished = true;
        self.moving = false;
        self.damaged = false;
        self.animation = PlayerAnimation::Winning;
    }

    /// Count down invulnerability; the hit reaction ends with it.
    pub fn tick_timers(&mut self) {
        if self.immortal_ticks == 0 {
            return;
        }
        self.immortal_ticks -= 1;
        if self.immortal_ticks == 0 && self.damaged {
            self.damaged = false;
            if self.can_act() {
                self.animation = if self.moving {
                    PlayerAnimation::Walking
                } else {
                    PlayerAnimation::Idle
                };
            }
        }
    }

    // =========================================================================
    // POWER-UPS AND SCORE
    // =========================================================================

    /// Apply a pickup, clamping each stat to its maximum. Ignored once dead.
    pub fn handle_power_up_effect(&mut self, kind: PowerUpKind, config: &GameConfig) {
        if !self.alive {
            return;
        }
        match kind.effect() {
            PowerUpEffect::ExtraHp => {
                self.hp = (self.hp + 1).min(config.max_hp);
            }
            PowerUpEffect::ExtraRadius => {
                self.radius = (self.radius + 1).min(config.max_radius);
            }
            PowerUpEffect::ExtraSpeed => {
                self.speed = (self.speed + 1).min(config.max_speed);
            }
            PowerUpEffect::ExtraBomb => {
                if self.bombs < config.max_bombs {
                    self.bombs += 1;
                    self.current_bombs += 1;
                }
            }
            PowerUpEffect::ScoreOnly => {}
        }
        self.add_score(kind.score(), config.max_score);
    }

    /// Add to the level score, saturating at `cap`.
    pub fn add_score(&mut self, amount: u32, cap: u32) {
        self.score = self.score.saturating_add(amount).min(cap);
    }

    /// Add player state to hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_i32(self.x);
        hasher.update_i32(self.y);
        hasher.update_u32(self.hp);
        hasher.update_u32(self.speed);
        hasher.update_u32(self.bombs);
        hasher.update_u32(self.current_bombs);
        hasher.update_u32(self.radius);
        hasher.update_u8(self.direction as u8);
        hasher.update_bool(self.moving);
        hasher.update_bool(self.alive);
        hasher.update_u32(self.immortal_ticks);
        hasher.update_bool(self.level_finished);
        hasher.update_u8(self.animation as u8);
        hasher.update_u32(self.score);
    }
}
