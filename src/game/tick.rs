//! Simulation Tick
//!
//! One fixed-timestep update of a `GameSession`. Steps run in a fixed order:
//!
//! 1. bomb fuses, detonations and chain detonations; blast damage
//! 2. burnt-down breakable tiles and power-up drops
//! 3. explosion lifetimes
//! 4. enemy movement
//! 5. player input and movement
//! 6. contact damage, lingering blast damage, pickups, exit
//! 7. phase transitions
//!
//! Blast damage is applied at detonation (step 1), before anything moves, so
//! an actor standing in the blast on that tick cannot step out of it. Blasts
//! that stay live keep hurting whatever walks into them (step 6).

#[cfg(feature = "debug-tracing")]
use tracing::debug;
use tracing::info;

use crate::config::GameConfig;
use crate::core::direction::Direction;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::floor::EnemyHit;
use crate::game::input::TickInput;
use crate::game::state::{GamePhase, GameSession};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Game ended in a loss this tick (or earlier)
    pub game_over: bool,
    /// Game ended in a win this tick (or earlier)
    pub victory: bool,
}

impl TickResult {
    /// True if the game is over either way.
    pub fn ended(&self) -> bool {
        self.game_over || self.victory
    }
}

/// Run one simulation tick.
///
/// Total over every reachable state: an ended session returns immediately,
/// and input for a dead or finished player is ignored.
///
/// # Determinism
///
/// All randomness comes from the session's random source and all collections
/// iterate in insertion order, so the same seed and inputs always produce
/// the same state.
pub fn tick(session: &mut GameSession, input: &TickInput) -> TickResult {
    let mut result = TickResult::default();

    match session.phase {
        GamePhase::GameOver => {
            result.game_over = true;
            result.events = session.take_events();
            return result;
        }
        GamePhase::Victory => {
            result.victory = true;
            result.events = session.take_events();
            return result;
        }
        _ => {}
    }

    // 0. Advance tick counter
    session.tick += 1;

    // 1. Fuses and detonations
    process_detonations(session);

    // 2. Scheduled tile destruction
    process_burning_tiles(session);

    // 3. Explosion lifetimes
    session.floor.tick_explosions();

    // 4. Enemies
    session
        .floor
        .update_enemies(session.rng.as_mut(), session.config.enemy_turn_chance);

    // 5. Player
    session.player.tick_timers();
    if session.phase == GamePhase::Playing {
        apply_input(session, input);
    }

    // 6. Interactions
    process_interactions(session);

    // 7. Phase transitions
    advance_phase(session, &mut result);

    #[cfg(feature = "debug-tracing")]
    debug!(
        tick = session.tick,
        enemies = session.floor.enemies().len(),
        bombs = session.floor.bombs().len(),
        explosions = session.floor.explosions().len(),
        "tick complete"
    );

    result.events = session.take_events();
    result
}

/// Record enemy hits as events and credit kills to the player.
fn record_enemy_hits(session: &mut GameSession, hits: Vec<EnemyHit>) {
    let tick = session.tick;
    for hit in hits {
        let data = if hit.killed {
            session.player.add_score(hit.score, session.config.max_score);
            GameEventData::EnemyKilled { enemy_id: hit.enemy_id, kind: hit.kind, points: hit.score }
        } else {
            GameEventData::EnemyDamaged { enemy_id: hit.enemy_id, hp_left: hit.hp_left }
        };
        session.push_event(GameEvent::new(tick, data));
    }
}

/// Hit the player once if `hurt`, emitting the matching event.
fn hurt_player(session: &mut GameSession, hurt: bool) {
    if !hurt || !session.player.damage(&session.config) {
        return;
    }
    let tick = session.tick;
    let data = if session.player.alive {
        GameEventData::PlayerDamaged { hp_left: session.player.hp }
    } else {
        GameEventData::PlayerDied
    };
    session.push_event(GameEvent::new(tick, data));
}

/// Step 1: count fuses down and resolve every detonation, chains included.
fn process_detonations(session: &mut GameSession) {
    let expired = session.floor.tick_bombs();
    if expired.is_empty() {
        return;
    }

    let detonations = session.floor.detonate(
        expired,
        session.config.explosion_ticks,
        session.config.tile_burn_ticks,
    );

    let tick = session.tick;

    for detonation in &detonations {
        // Every bomb belongs to the player; give the slot back
        session.player.current_bombs = (session.player.current_bombs + 1).min(session.player.bombs);

        session.push_event(GameEvent::new(
            tick,
            GameEventData::BombExploded {
                bomb_id: detonation.bomb.id,
                cell: detonation.bomb.cell,
                tiles: detonation.cells.len() as u32,
                chained: detonation.chained,
            },
        ));
        for power_up in &detonation.power_ups_destroyed {
            session.push_event(GameEvent::new(
                tick,
                GameEventData::PowerUpDestroyed { power_up_id: power_up.id },
            ));
        }

        let hits = session
            .floor
            .damage_enemies_in_blast(Some(detonation.explosion_id), session.config.enemy_hit_cooldown_ticks);
        record_enemy_hits(session, hits);
    }

    let tile_size = session.config.tile_size;
    let player_rect = session.player.collider(tile_size);
    let in_blast = session.player.alive && session.floor.collides_with_explosions(&player_rect);
    hurt_player(session, in_blast);
}

/// Step 2: apply destructions whose burn time elapsed.
fn process_burning_tiles(session: &mut GameSession) {
    let destroyed = session.floor.tick_tiles_exploded(
        session.rng.as_mut(),
        &session.power_up_table,
        session.config.powerup_chance,
    );

    let tick = session.tick;
    for tile in destroyed {
        session.push_event(GameEvent::new(tick, GameEventData::TileDestroyed { cell: tile.cell }));
        if let Some(power_up) = tile.power_up {
            session.push_event(GameEvent::new(
                tick,
                GameEventData::PowerUpSpawned {
                    power_up_id: power_up.id,
                    kind: power_up.kind,
                    cell: power_up.cell,
                },
            ));
        }
    }
}

/// Step 5: bomb placement, heading and movement.
fn apply_input(session: &mut GameSession, input: &TickInput) {
    let config: &GameConfig = &session.config;
    let tile_size = config.tile_size;

    if input.place_bomb && session.player.can_act() && session.player.current_bombs > 0 {
        let cell = session.player.center_cell(tile_size);
        if let Some(bomb_id) = session
            .floor
            .place_bomb(cell, session.player.radius, config.bomb_fuse_ticks)
        {
            session.player.current_bombs -= 1;
            let tick = session.tick;
            session.push_event(GameEvent::new(tick, GameEventData::BombPlaced { bomb_id, cell }));
        }
    }

    match input.movement {
        Some(Direction::Up) => session.player.move_up(),
        Some(Direction::Down) => session.player.move_down(),
        Some(Direction::Left) => session.player.move_left(),
        Some(Direction::Right) => session.player.move_right(),
        None => session.player.stop(),
    }

    let player_rect = session.player.collider(tile_size);
    session.floor.refresh_bomb_collision(&player_rect);

    let floor = &session.floor;
    session.player.update_position(tile_size, |rect| {
        floor.collides_with_blocks(rect) || floor.player_collides_with_bombs(rect)
    });
}

/// Step 6: everything that depends on positions after movement.
fn process_interactions(session: &mut GameSession) {
    let tile_size = session.config.tile_size;

    // Enemies that walked into a live blast
    let hits = session
        .floor
        .damage_enemies_in_blast(None, session.config.enemy_hit_cooldown_ticks);
    record_enemy_hits(session, hits);

    if !session.player.can_act() {
        return;
    }

    let player_rect = session.player.collider(tile_size);
    let hurt = session.floor.collides_with_enemies(&player_rect, None)
        || session.floor.collides_with_explosions(&player_rect);
    hurt_player(session, hurt);

    if !session.player.alive {
        return;
    }

    let tick = session.tick;
    while let Some(power_up) = session.floor.take_power_up(&player_rect) {
        session.player.handle_power_up_effect(power_up.kind, &session.config);
        session.push_event(GameEvent::new(
            tick,
            GameEventData::PowerUpCollected {
                power_up_id: power_up.id,
                kind: power_up.kind,
                points: power_up.kind.score(),
            },
        ));
    }

    if session.floor.collides_with_exit(&player_rect) {
        session.player.finish_level();
    }
}

/// Step 7: start, count down and finish phase transitions.
fn advance_phase(session: &mut GameSession, result: &mut TickResult) {
    let tick = session.tick;
    let delay = session.config.phase_transition_ticks;

    match session.phase {
        GamePhase::Playing => {
            if !session.player.alive {
                session.phase = GamePhase::PlayerDying { ticks_remaining: delay };
            } else if session.player.level_finished {
                session.phase = GamePhase::LevelCleared { ticks_remaining: delay };
                info!("Level {} cleared, level score {}", session.level + 1, session.player.score);
                session.push_event(GameEvent::new(
                    tick,
                    GameEventData::LevelCleared { level: session.level, level_score: session.player.score },
                ));
            }
        }
        GamePhase::PlayerDying { ticks_remaining: 0 } => {
            // Level score is forfeited
            session.player.score = 0;
            session.phase = GamePhase::GameOver;
            result.game_over = true;
            info!("Game over at level {}, total score {}", session.level + 1, session.total_score);
            session.push_event(GameEvent::new(
                tick,
                GameEventData::GameOver { total_score: session.total_score },
            ));
        }
        GamePhase::PlayerDying { ticks_remaining } => {
            session.phase = GamePhase::PlayerDying { ticks_remaining: ticks_remaining - 1 };
        }
        GamePhase::LevelCleared { ticks_remaining: 0 } => {
            session.total_score = session.display_total();
            session.player.score = 0;
            let next = session.level + 1;
            if next >= session.config.max_level() {
                session.phase = GamePhase::Victory;
                result.victory = true;
                info!("Victory, total score {}", session.total_score);
                session.push_event(GameEvent::new(
                    tick,
                    GameEventData::Victory { total_score: session.total_score },
                ));
            } else {
                session.start_level(next);
            }
        }
        GamePhase::LevelCleared { ticks_remaining } => {
            session.phase = GamePhase::LevelCleared { ticks_remaining: ticks_remaining - 1 };
        }
        GamePhase::GameOver | GamePhase::Victory => {}
    }
}

/// Replay a game from recorded per-tick inputs.
///
/// Stops early if the game ends. Returns the final session and all events.
pub fn replay_session(
    config: GameConfig,
    rng_seed: u64,
    inputs: &[TickInput],
) -> (GameSession, Vec<GameEvent>) {
    let mut session = GameSession::new(config, rng_seed);
    let mut all_events = Vec::new();

    for input in inputs {
        let result = tick(&mut session, input);
        let ended = result.ended();
        all_events.extend(result.events);
        if ended {
            break;
        }
    }

    (session, all_events)
}

// =============================================================================
// TESTS
// =============================================================================
