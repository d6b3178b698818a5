//! Floor Aggregation and Collision
//!
//! A `Floor` is one level: the terrain grid plus every live bomb, enemy,
//! explosion and power-up, and the breakable tiles currently burning.
//! It answers rectangle queries against those collections and owns the
//! mutations that touch more than one of them (detonation, tile destruction,
//! enemy movement).
//!
//! Collections are `Vec`s kept in insertion order, so iteration is
//! deterministic.

use serde::{Serialize, Deserialize};

use crate::core::hash::StateHasher;
use crate::core::rect::{Cell, Rect};
use crate::core::rng::RandomSource;
use crate::game::bomb::Bomb;
use crate::game::enemy::{Enemy, EnemyKind};
use crate::game::explosion::Explosion;
use crate::game::grid::{Grid, Tile, TileType};
use crate::game::powerup::{PowerUp, PowerUpTable};

// =============================================================================
// REPORTS
// =============================================================================

/// A breakable tile waiting to turn into floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurningTile {
    /// Tile position
    pub cell: Cell,
    /// Ticks until destruction is applied
    pub remaining_ticks: u32,
}

/// Outcome of one bomb detonation.
#[derive(Clone, Debug)]
pub struct Detonation {
    /// The bomb that went off
    pub bomb: Bomb,
    /// Explosion created in its place
    pub explosion_id: u32,
    /// True if set off by another blast rather than its own fuse
    pub chained: bool,
    /// Cells reached by the blast
    pub cells: Vec<Cell>,
    /// Breakable tiles newly scheduled for destruction
    pub tiles_hit: Vec<Cell>,
    /// Power-ups destroyed by the blast
    pub power_ups_destroyed: Vec<PowerUp>,
}

/// A breakable tile replaced by floor.
#[derive(Clone, Copy, Debug)]
pub struct TileDestroyed {
    /// Tile position
    pub cell: Cell,
    /// Power-up dropped on the cell, if any
    pub power_up: Option<PowerUp>,
}

/// A blast hit on an enemy.
#[derive(Clone, Copy, Debug)]
pub struct EnemyHit {
    /// Enemy id
    pub enemy_id: u32,
    /// Enemy variant
    pub kind: EnemyKind,
    /// Hit points left
    pub hp_left: u32,
    /// Killed (and already removed from the floor)
    pub killed: bool,
    /// Score for the kill, 0 if it survived
    pub score: u32,
}

// =============================================================================
// FLOOR
// =============================================================================

/// Terrain and live actors for one level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Floor {
    grid: Grid,
    tile_size: i32,
    bombs: Vec<Bomb>,
    enemies: Vec<Enemy>,
    explosions: Vec<Explosion>,
    power_ups: Vec<PowerUp>,
    tiles_exploded: Vec<BurningTile>,
    next_id: u32,
}

impl Floor {
    /// Wrap a grid with empty actor collections.
    pub fn new(grid: Grid, tile_size: i32) -> Self {
        Self {
            grid,
            tile_size,
            bombs: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            power_ups: Vec::new(),
            tiles_exploded: Vec::new(),
            next_id: 0,
        }
    }

    /// Terrain.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable terrain.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Tile edge in pixels.
    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Tile type at a coordinate; `Unbreakable` outside the grid.
    pub fn check_floor(&self, col: i32, row: i32) -> TileType {
        self.grid.check_floor(col, row)
    }

    /// Replace a tile.
    pub fn set_cell(&mut self, tile: Tile) {
        self.grid.set_cell(tile);
    }

    /// Allocate an entity id (shared by all collections).
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // =========================================================================
    // COLLECTIONS
    // =========================================================================

    /// Placed bombs, oldest first.
    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    /// Add a bomb. Rejected if its cell already holds one.
    pub fn add_bomb(&mut self, bomb: Bomb) -> bool {
        if self.bomb_at(bomb.cell) {
            return false;
        }
        self.bombs.push(bomb);
        true
    }

    /// Remove a bomb by id.
    pub fn remove_bomb(&mut self, id: u32) -> Option<Bomb> {
        let index = self.bombs.iter().position(|b| b.id == id)?;
        Some(self.bombs.remove(index))
    }

    /// True if a bomb occupies `cell`.
    pub fn bomb_at(&self, cell: Cell) -> bool {
        self.bombs.iter().any(|b| b.cell == cell)
    }

    /// Live enemies.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Add an enemy.
    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    /// Remove an enemy by id.
    pub fn remove_enemy(&mut self, id: u32) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(index))
    }

    /// True once every enemy is dead.
    pub fn enemies_cleared(&self) -> bool {
        !self.enemies.iter().any(|e| e.alive)
    }

    /// Live explosions.
    pub fn explosions(&self) -> &[Explosion] {
        &self.explosions
    }

    /// Add an explosion.
    pub fn add_explosion(&mut self, explosion: Explosion) {
        self.explosions.push(explosion);
    }

    /// Remove an explosion by id.
    pub fn remove_explosion(&mut self, id: u32) -> Option<Explosion> {
        let index = self.explosions.iter().position(|e| e.id == id)?;
        Some(self.explosions.remove(index))
    }

    /// Power-ups on the ground.
    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    /// Add a power-up. Rejected if its cell already holds one.
    pub fn add_power_up(&mut self, power_up: PowerUp) -> bool {
        if self.power_ups.iter().any(|p| p.cell == power_up.cell) {
            return false;
        }
        self.power_ups.push(power_up);
        true
    }

    /// Remove a power-up by id.
    pub fn remove_power_up(&mut self, id: u32) -> Option<PowerUp> {
        let index = self.power_ups.iter().position(|p| p.id == id)?;
        Some(self.power_ups.remove(index))
    }

    /// Breakable tiles burning down.
    pub fn tiles_exploded(&self) -> &[BurningTile] {
        &self.tiles_exploded
    }

    // =========================================================================
    // COLLISION QUERIES
    // =========================================================================

    /// True if `rect` overlaps a blocking tile or leaves the grid.
    pub fn collides_with_blocks(&self, rect: &Rect) -> bool {
        self.grid.blocks_rect(rect, self.tile_size)
    }

    /// True if `rect` overlaps a live enemy other than `exclude`.
    pub fn collides_with_enemies(&self, rect: &Rect, exclude: Option<u32>) -> bool {
        self.enemies
            .iter()
            .filter(|e| e.alive && Some(e.id) != exclude)
            .any(|e| e.collider(self.tile_size).intersects(rect))
    }

    /// True if `rect` overlaps any cell of a live explosion.
    pub fn collides_with_explosions(&self, rect: &Rect) -> bool {
        self.explosions
            .iter()
            .any(|e| e.intersects(rect, self.tile_size))
    }

    /// True if every enemy is dead and `rect` overlaps the exit cell.
    pub fn collides_with_exit(&self, rect: &Rect) -> bool {
        self.enemies_cleared() && self.grid.exit().rect(self.tile_size).intersects(rect)
    }

    /// True if `rect` overlaps an uncollected power-up.
    pub fn collides_with_power_ups(&self, rect: &Rect) -> bool {
        self.power_ups
            .iter()
            .any(|p| !p.collected && p.collider(self.tile_size).intersects(rect))
    }

    /// True if `rect` overlaps a bomb whose player collision is enabled.
    pub fn player_collides_with_bombs(&self, rect: &Rect) -> bool {
        self.bombs
            .iter()
            .any(|b| b.collision_enabled && b.collider(self.tile_size).intersects(rect))
    }

    /// True if `rect` overlaps any bomb. Enemies never pass through bombs.
    pub fn enemy_collides_with_bombs(&self, rect: &Rect) -> bool {
        self.bombs
            .iter()
            .any(|b| b.collider(self.tile_size).intersects(rect))
    }

    // =========================================================================
    // BOMBS AND BLASTS
    // =========================================================================

    /// Place a bomb on a floor cell that holds no bomb. Returns its id.
    pub fn place_bomb(&mut self, cell: Cell, radius: u32, fuse_ticks: u32) -> Option<u32> {
        if !self.grid.is_floor(cell) || self.bomb_at(cell) {
            return None;
        }
        let id = self.next_id();
        self.bombs.push(Bomb::new(id, cell, radius, fuse_ticks));
        Some(id)
    }

    /// Enable player collision on every bomb the player has stepped off.
    pub fn refresh_bomb_collision(&mut self, player: &Rect) {
        for bomb in &mut self.bombs {
            bomb.enable_collision(player, self.tile_size);
        }
    }

    /// Advance all fuses. Returns ids of bombs whose fuse ran out, oldest first.
    pub fn tick_bombs(&mut self) -> Vec<u32> {
        self.bombs
            .iter_mut()
            .filter_map(|b| if b.tick() { Some(b.id) } else { None })
            .collect()
    }

    /// Detonate `expired` bombs and every bomb their blasts reach, in order.
    ///
    /// Chained bombs go off in the same call, before any other state moves.
    pub fn detonate(
        &mut self,
        expired: Vec<u32>,
        explosion_ticks: u32,
        burn_ticks: u32,
    ) -> Vec<Detonation> {
        let mut queue: std::collections::VecDeque<(u32, bool)> =
            expired.into_iter().map(|id| (id, false)).collect();
        let mut detonations = Vec::new();

        while let Some((bomb_id, chained)) = queue.pop_front() {
            let Some(detonation) = self.explode_bomb(bomb_id, chained, explosion_ticks, burn_ticks) else {
                continue;
            };

            // Bombs caught in the blast go off next
            if let Some(explosion) = self.explosions.last() {
                for bomb in &mut self.bombs {
                    if explosion.contains(bomb.cell) && bomb.explode() {
                        queue.push_back((bomb.id, true));
                    }
                }
            }

            detonations.push(detonation);
        }

        detonations
    }

    /// Replace a bomb with its explosion.
    ///
    /// Schedules hit breakable tiles and destroys power-ups in the blast.
    pub fn explode_bomb(
        &mut self,
        bomb_id: u32,
        chained: bool,
        explosion_ticks: u32,
        burn_ticks: u32,
    ) -> Option<Detonation> {
        let mut bomb = self.remove_bomb(bomb_id)?;
        bomb.exploded = true;

        let explosion_id = self.next_id();
        let explosion = Explosion::new(explosion_id, &self.grid, bomb.cell, bomb.radius, explosion_ticks);
        let cells: Vec<Cell> = explosion.cells().collect();

        let mut tiles_hit = Vec::new();
        for cell in &cells {
            if self.destroy_block(*cell, burn_ticks) {
                tiles_hit.push(*cell);
            }
        }

        let mut power_ups_destroyed = Vec::new();
        self.power_ups.retain(|p| {
            if explosion.contains(p.cell) {
                power_ups_destroyed.push(*p);
                false
            } else {
                true
            }
        });

        self.explosions.push(explosion);

        Some(Detonation {
            bomb,
            explosion_id,
            chained,
            cells,
            tiles_hit,
            power_ups_destroyed,
        })
    }

    /// Mark a breakable tile hit and schedule it to burn down.
    ///
    /// Returns false for non-breakable tiles and tiles already scheduled.
    pub fn destroy_block(&mut self, cell: Cell, burn_ticks: u32) -> bool {
        if !self.grid.mark_hit(cell) {
            return false;
        }
        self.tiles_exploded.push(BurningTile { cell, remaining_ticks: burn_ticks });
        true
    }

    /// Burn scheduled tiles down and apply destructions that are due.
    ///
    /// A tile that is still breakable becomes floor and rolls for a power-up.
    pub fn tick_tiles_exploded(
        &mut self,
        rng: &mut dyn RandomSource,
        table: &PowerUpTable,
        powerup_chance: u32,
    ) -> Vec<TileDestroyed> {
        let mut due = Vec::new();
        self.tiles_exploded.retain_mut(|t| {
            t.remaining_ticks = t.remaining_ticks.saturating_sub(1);
            if t.remaining_ticks == 0 {
                due.push(t.cell);
                false
            } else {
                true
            }
        });

        let mut destroyed = Vec::new();
        for cell in due {
            if self.grid.check_floor(cell.col, cell.row) != TileType::Breakable {
                continue;
            }
            self.grid.set_cell(Tile::new(cell, TileType::Floor));

            let mut power_up = None;
            if rng.chance(powerup_chance) {
                let kind = table.generate_random_type(rng);
                let candidate = PowerUp::new(self.next_id(), cell, kind);
                if self.add_power_up(candidate) {
                    power_up = Some(candidate);
                }
            }
            destroyed.push(TileDestroyed { cell, power_up });
        }
        destroyed
    }

    /// Count down explosion lifetimes. Returns ids of retired explosions.
    pub fn tick_explosions(&mut self) -> Vec<u32> {
        let mut retired = Vec::new();
        self.explosions.retain_mut(|e| {
            if e.tick() {
                retired.push(e.id);
                false
            } else {
                true
            }
        });
        retired
    }

    /// Damage every enemy overlapping explosion `explosion_id`, or any live
    /// explosion when `None`. Killed enemies are removed.
    pub fn damage_enemies_in_blast(
        &mut self,
        explosion_id: Option<u32>,
        cooldown_ticks: u32,
    ) -> Vec<EnemyHit> {
        let tile_size = self.tile_size;
        let mut hits = Vec::new();

        for enemy in &mut self.enemies {
            if !enemy.alive {
                continue;
            }
            let collider = enemy.collider(tile_size);
            let in_blast = self
                .explosions
                .iter()
                .filter(|e| explosion_id.map_or(true, |id| e.id == id))
                .any(|e| e.intersects(&collider, tile_size));

            if in_blast && enemy.damage(cooldown_ticks) {
                hits.push(EnemyHit {
                    enemy_id: enemy.id,
                    kind: enemy.kind,
                    hp_left: enemy.hp,
                    killed: !enemy.alive,
                    score: if enemy.alive { 0 } else { enemy.score() },
                });
            }
        }

        self.enemies.retain(|e| e.alive);
        hits
    }

    /// Take the first uncollected power-up overlapping `rect`.
    pub fn take_power_up(&mut self, rect: &Rect) -> Option<PowerUp> {
        let tile_size = self.tile_size;
        let index = self
            .power_ups
            .iter()
            .position(|p| !p.collected && p.collider(tile_size).intersects(rect))?;
        let mut power_up = self.power_ups.remove(index);
        power_up.collected = true;
        Some(power_up)
    }

    // =========================================================================
    // ENEMY MOVEMENT
    // =========================================================================

    /// Move every enemy one step.
    ///
    /// An enemy whose next step would hit terrain, the grid edge, another
    /// enemy or a bomb turns instead of moving. An unblocked enemy also turns
    /// with `turn_chance` per-mille. Returns ids of enemies that turned.
    pub fn update_enemies(&mut self, rng: &mut dyn RandomSource, turn_chance: u32) -> Vec<u32> {
        let mut turned = Vec::new();

        for i in 0..self.enemies.len() {
            self.enemies[i].tick_cooldown();
            if !self.enemies[i].alive {
                continue;
            }

            let (id, next) = {
                let enemy = &self.enemies[i];
                (enemy.id, enemy.next_collider(self.tile_size))
            };
            let blocked = self.collides_with_blocks(&next)
                || self.collides_with_enemies(&next, Some(id))
                || self.enemy_collides_with_bombs(&next);

            let enemy = &mut self.enemies[i];
            if blocked || rng.chance(turn_chance) {
                enemy.random_direction(rng);
                turned.push(id);
            } else {
                enemy.advance();
            }
        }

        turned
    }

    /// Add floor state to hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        for tile in self.grid.tiles() {
            hasher.update_u8(tile.tile_type as u8);
            hasher.update_bool(tile.hit);
        }
        for bomb in &self.bombs {
            hasher.update_u32(bomb.id);
            hasher.update_i32(bomb.cell.col);
            hasher.update_i32(bomb.cell.row);
            hasher.update_u32(bomb.fuse_ticks);
            hasher.update_bool(bomb.collision_enabled);
        }
        for enemy in &self.enemies {
            hasher.update_u32(enemy.id);
            hasher.update_u8(enemy.kind as u8);
            hasher.update_i32(enemy.x);
            hasher.update_i32(enemy.y);
            hasher.update_u32(enemy.hp);
            hasher.update_u8(enemy.direction as u8);
            hasher.update_u32(enemy.hit_cooldown);
        }
        for explosion in &self.explosions {
            hasher.update_u32(explosion.id);
            hasher.update_u32(explosion.tiles.len() as u32);
            hasher.update_u32(explosion.remaining_ticks);
        }
        for power_up in &self.power_ups {
            hasher.update_u32(power_up.id);
            hasher.update_u8(power_up.kind as u8);
            hasher.update_i32(power_up.cell.col);
            hasher.update_i32(power_up.cell.row);
        }
        for burning in &self.tiles_exploded {
            hasher.update_i32(burning.cell.col);
            hasher.update_i32(burning.cell.row);
            hasher.update_u32(burning.remaining_ticks);
        }
        hasher.update_u32(self.next_id);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::direction::Direction;
    use crate::core::rng::ScriptedRng;
    use crate::game::powerup::PowerUpKind;

    const TILE: i32 = 48;

    fn open_floor() -> Floor {
        Floor::new(Grid::new(13, 11), TILE)
    }

    #[test]
    fn test_out_of_bounds_always_collides() {
        let floor = open_floor();
        assert!(floor.collides_with_blocks(&Rect::new(-TILE, 0, TILE, TILE)));
        assert!(floor.collides_with_blocks(&Rect::new(13 * TILE, 5 * TILE, TILE, TILE)));
        assert!(floor.collides_with_blocks(&Rect::new(0, 11 * TILE + 5, 4, 4)));
        assert!(!floor.collides_with_blocks(&Cell::new(3, 3).rect(TILE)));
    }

    #[test]
    fn test_exit_requires_cleared_enemies() {
        let mut floor = open_floor();
        let exit = floor.grid().exit().rect(TILE);
        floor.add_enemy(Enemy::new(0, EnemyKind::Puropen, Cell::new(3, 3), TILE, Direction::Up));
        assert!(!floor.collides_with_exit(&exit));

        floor.remove_enemy(0);
        assert!(floor.collides_with_exit(&exit));
        assert!(!floor.collides_with_exit(&exit.translate(TILE, 0)));
    }

    #[test]
    fn test_enemy_self_exclusion() {
        let mut floor = open_floor();
        floor.add_enemy(Enemy::new(7, EnemyKind::Puropen, Cell::new(3, 3), TILE, Direction::Up));
        let rect = floor.enemies()[0].collider(TILE);
        assert!(floor.collides_with_enemies(&rect, None));
        assert!(!floor.collides_with_enemies(&rect, Some(7)));
    }

    #[test]
    fn test_bomb_collision_rules() {
        let mut floor = open_floor();
        let cell = Cell::new(2, 1);
        let id = floor.place_bomb(cell, 1, 10).unwrap();
        assert!(floor.place_bomb(cell, 1, 10).is_none());
        assert!(floor.place_bomb(Cell::new(0, 0), 1, 10).is_none());

        let rect = cell.rect(TILE);
        // Player passes through a fresh bomb, enemies do not
        assert!(!floor.player_collides_with_bombs(&rect));
        assert!(floor.enemy_collides_with_bombs(&rect));

        floor.refresh_bomb_collision(&rect);
        assert!(!floor.player_collides_with_bombs(&rect));

        floor.refresh_bomb_collision(&Cell::new(4, 1).rect(TILE));
        assert!(floor.player_collides_with_bombs(&rect));
        assert!(floor.remove_bomb(id).is_some());
    }

    #[test]
    fn test_place_tick_explode_is_deterministic() {
        let run = || {
            let mut floor = open_floor();
            floor.grid_mut().set_type(Cell::new(8, 5), TileType::Breakable);
            floor.place_bomb(Cell::new(6, 5), 3, 4).unwrap();
            let mut detonations = Vec::new();
            for _ in 0..4 {
                let expired = floor.tick_bombs();
                detonations.extend(floor.detonate(expired, 30, 30));
            }
            assert_eq!(detonations.len(), 1);
            (floor.explosions()[0].tiles.clone(), detonations[0].tiles_hit.clone())
        };

        let (tiles_a, hit_a) = run();
        let (tiles_b, hit_b) = run();
        assert_eq!(tiles_a, tiles_b);
        assert_eq!(hit_a, vec![Cell::new(8, 5)]);
        assert_eq!(hit_a, hit_b);
    }

    #[test]
    fn test_chain_detonation_same_call() {
        let mut floor = open_floor();
        let first = floor.place_bomb(Cell::new(3, 3), 2, 1).unwrap();
        let second = floor.place_bomb(Cell::new(5, 3), 1, 500).unwrap();
        let third = floor.place_bomb(Cell::new(5, 4), 1, 500).unwrap();
        let far = floor.place_bomb(Cell::new(9, 9), 1, 500).unwrap();

        let expired = floor.tick_bombs();
        assert_eq!(expired, vec![first]);
        let detonations = floor.detonate(expired, 30, 30);

        let ids: Vec<u32> = detonations.iter().map(|d| d.bomb.id).collect();
        assert_eq!(ids, vec![first, second, third]);
        assert!(!detonations[0].chained);
        assert!(detonations[1].chained && detonations[2].chained);
        assert_eq!(floor.bombs().len(), 1);
        assert_eq!(floor.bombs()[0].id, far);
        assert_eq!(floor.explosions().len(), 3);
    }

    #[test]
    fn test_breakable_scheduled_once() {
        let mut floor = open_floor();
        let target = Cell::new(5, 5);
        floor.grid_mut().set_type(target, TileType::Breakable);

        floor.place_bomb(Cell::new(4, 5), 1, 1).unwrap();
        floor.place_bomb(Cell::new(6, 5), 1, 1).unwrap();
        let expired = floor.tick_bombs();
        let detonations = floor.detonate(expired, 30, 2);

        // Both blasts include the tile, only one schedules it
        assert!(floor.explosions().iter().all(|e| e.contains(target)));
        let scheduled: usize = detonations.iter().map(|d| d.tiles_hit.len()).sum();
        assert_eq!(scheduled, 1);
        assert_eq!(floor.tiles_exploded().len(), 1);

        let table = PowerUpTable::default();
        // 999 fails the 400 per-mille roll
        let mut rng = ScriptedRng::new(vec![999]);
        assert!(floor.tick_tiles_exploded(&mut rng, &table, 400).is_empty());
        let destroyed = floor.tick_tiles_exploded(&mut rng, &table, 400);
        assert_eq!(destroyed.len(), 1);
        assert!(destroyed[0].power_up.is_none());
        assert_eq!(floor.check_floor(5, 5), TileType::Floor);
        assert!(floor.tiles_exploded().is_empty());
    }

    #[test]
    fn test_destroyed_tile_drops_power_up() {
        let mut floor = open_floor();
        let cell = Cell::new(2, 2);
        floor.grid_mut().set_type(cell, TileType::Breakable);
        assert!(floor.destroy_block(cell, 1));

        // Roll 0 passes the chance, then 999 picks BombUp
        let mut rng = ScriptedRng::new(vec![0, 999]);
        let destroyed = floor.tick_tiles_exploded(&mut rng, &PowerUpTable::default(), 400);
        let power_up = destroyed[0].power_up.unwrap();
        assert_eq!(power_up.kind, PowerUpKind::BombUp);
        assert_eq!(power_up.cell, cell);
        assert!(floor.collides_with_power_ups(&cell.rect(TILE)));

        let taken = floor.take_power_up(&cell.rect(TILE)).unwrap();
        assert!(taken.collected);
        assert!(floor.power_ups().is_empty());
    }

    #[test]
    fn test_blast_removes_power_ups() {
        let mut floor = open_floor();
        let id = floor.next_id();
        floor.add_power_up(PowerUp::new(id, Cell::new(4, 3), PowerUpKind::Fire));
        floor.place_bomb(Cell::new(3, 3), 1, 1).unwrap();
        let expired = floor.tick_bombs();
        let detonations = floor.detonate(expired, 30, 30);
        assert_eq!(detonations[0].power_ups_destroyed.len(), 1);
        assert!(floor.power_ups().is_empty());
    }

    #[test]
    fn test_one_hp_enemy_removed_by_blast() {
        let mut floor = open_floor();
        floor.add_enemy(Enemy::new(100, EnemyKind::Puropen, Cell::new(5, 3), TILE, Direction::Up));
        floor.place_bomb(Cell::new(3, 3), 2, 1).unwrap();
        let expired = floor.tick_bombs();
        let detonations = floor.detonate(expired, 30, 30);

        let hits = floor.damage_enemies_in_blast(Some(detonations[0].explosion_id), 120);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].killed);
        assert_eq!(hits[0].score, 100);
        assert!(floor.enemies().is_empty());
        assert!(floor.enemies_cleared());
    }

    #[test]
    fn test_enemy_turns_when_blocked() {
        let mut floor = open_floor();
        // Collider flush against the left border
        let mut enemy = Enemy::new(0, EnemyKind::Puropen, Cell::new(1, 3), TILE, Direction::Left);
        enemy.x = TILE - TILE / 8;
        floor.add_enemy(enemy);

        let mut rng = ScriptedRng::new(vec![0]);
        let turned = floor.update_enemies(&mut rng, 0);
        assert_eq!(turned, vec![0]);
        let enemy = &floor.enemies()[0];
        assert_ne!(enemy.direction, Direction::Left);
        assert_eq!((enemy.x, enemy.y), (TILE - TILE / 8, 3 * TILE));
    }

    #[test]
    fn test_enemy_moves_when_clear() {
        let mut floor = open_floor();
        floor.add_enemy(Enemy::new(0, EnemyKind::Puropen, Cell::new(5, 3), TILE, Direction::Right));
        let mut rng = ScriptedRng::new(vec![999]);
        assert!(floor.update_enemies(&mut rng, 7).is_empty());
        assert_eq!(floor.enemies()[0].x, 5 * TILE + 2);
    }
}
