use crate::archetype::Archetype;
use crate::config::Config;
use crate::disc::DiscStatus;
use crate::scheduler::{TaskId, ThrowScheduler};
use crate::sprite::DrawCommand;
use crate::unit::{FrameContext, Unit};
use crate::vector::Vector;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickResult {
    pub moved: Vec<MovedUnit>,
    pub thrown: Vec<DiscThrown>,
    pub caught: Vec<u32>,
    /// Units that armed an automatic throw this frame
    pub primed: Vec<u32>,
    /// Units that picked a new destination this frame
    pub retargeted: Vec<u32>,
    pub hits: Vec<UnitHit>,
    pub regenerated: Vec<u32>,
    pub derezzed: Vec<u32>,
    pub score: u32,
    #[serde(rename = "playerDead")]
    pub player_dead: bool,
    pub tick: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovedUnit {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscThrown {
    #[serde(rename = "unitId")]
    pub unit_id: u32,
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitHit {
    pub id: u32,
    pub hits: u32,
    #[serde(rename = "maxHits")]
    pub max_hits: u32,
}

/// The game grid: the player, the enemies and the score.
///
/// Owns the throw scheduler and the regeneration clock, so everything
/// happens inside `tick` on the caller's thread.
pub struct Arena {
    pub config: Config,
    pub player: Option<Unit>,
    pub enemies: Vec<Unit>,
    pub score: u32,
    diagonal: f32,
    scheduler: ThrowScheduler,
    rng: ChaCha8Rng,
    next_id: u32,
    tick: u64,
    last_regeneration: Option<f64>,
}

impl Arena {
    pub fn new(config: Config, rng: ChaCha8Rng) -> Self {
        Self {
            diagonal: config.diagonal(),
            config,
            player: None,
            enemies: Vec::new(),
            score: 0,
            scheduler: ThrowScheduler::new(),
            rng,
            next_id: 1,
            tick: 0,
            last_regeneration: None,
        }
    }

    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }

    #[inline]
    pub fn diagonal(&self) -> f32 {
        self.diagonal
    }

    #[inline]
    pub fn player_location(&self) -> Option<Vector> {
        self.player.as_ref().map(|p| p.location())
    }

    pub fn is_player_dead(&self) -> bool {
        self.player.as_ref().map_or(false, |p| p.is_dead())
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Put the player on the grid, replacing any previous one
    pub fn spawn_player(&mut self, location: Vector) -> u32 {
        let id = self.allocate_id();
        if let Some(old) = self.player.take() {
            self.scheduler.cancel_unit(old.id);
        }
        self.player = Some(Unit::tran(id, location, &self.config, &mut self.rng));
        info!("Tran #{} entered the grid", id);
        id
    }

    pub fn clear_player(&mut self) {
        if let Some(player) = self.player.take() {
            self.scheduler.cancel_unit(player.id);
        }
    }

    /// Add an enemy of the given archetype. Asking for `Tran` spawns the player.
    pub fn spawn(&mut self, archetype: Archetype, location: Vector) -> u32 {
        if archetype == Archetype::Tran {
            return self.spawn_player(location);
        }
        let id = self.allocate_id();
        let unit = Unit::new(id, archetype, location, &self.config, &mut self.rng);
        info!("{} #{} spawned at ({:.1}, {:.1})", archetype, id, location.x, location.y);
        self.enemies.push(unit);
        id
    }

    pub fn unit(&self, id: u32) -> Option<&Unit> {
        self.player
            .iter()
            .chain(self.enemies.iter())
            .find(|u| u.id == id)
    }

    /// Sync the player to a host-driven position
    pub fn move_player(&mut self, location: Vector) -> bool {
        match self.player.as_mut() {
            Some(player) => {
                player.sprite.location = location;
                player
                    .sprite
                    .bind_to_grid(self.config.width, self.config.height);
                true
            }
            None => false,
        }
    }

    /// Manual throw by the player
    pub fn throw_player_disc(&mut self, direction: Vector, current_time: f64) -> bool {
        self.player
            .as_mut()
            .map_or(false, |p| p.throw(direction, current_time))
    }

    pub fn hit_unit(&mut self, id: u32, strength: u32) -> bool {
        let bounds = self.config.bounds();
        let Some(unit) = self
            .player
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|u| u.id == id)
        else {
            return false;
        };
        unit.hit(strength, &bounds, &mut self.rng);
        true
    }

    /// Cancel a unit's scheduled throw. The disc goes back to plain held.
    pub fn cancel_throw(&mut self, id: u32) -> bool {
        let Some(unit) = self
            .player
            .iter_mut()
            .chain(self.enemies.iter_mut())
            .find(|u| u.id == id)
        else {
            return false;
        };
        let Some(task) = unit.pending_throw.take() else {
            return false;
        };
        if let Some(disc) = unit.disc.as_mut() {
            if disc.status == DiscStatus::Primed {
                disc.catch();
            }
        }
        self.scheduler.cancel(task)
    }

    pub fn pending_throw(&self, id: u32) -> Option<TaskId> {
        self.unit(id).and_then(|u| u.pending_throw)
    }

    /// Award points and take a dead enemy off the grid. Players stay.
    pub fn remove(&mut self, id: u32) -> bool {
        let Some(idx) = self.enemies.iter().position(|u| u.id == id) else {
            return false;
        };
        if self.enemies[idx].is_player {
            return false;
        }

        let unit = self.enemies.remove(idx);
        self.scheduler.cancel_unit(unit.id);
        self.score += unit.points;
        info!("{} derezzed", unit.name());
        true
    }

    /// Advance one frame
    pub fn tick(&mut self, current_time: f64) -> TickResult {
        self.tick += 1;
        let mut result = TickResult {
            tick: self.tick,
            ..TickResult::default()
        };

        // 1. Fire throws that came due since last frame
        let player_location = self.player_location();
        for task in self.scheduler.take_due(current_time) {
            let rng = &mut self.rng;
            let Some(unit) = self
                .player
                .iter_mut()
                .chain(self.enemies.iter_mut())
                .find(|u| u.id == task.unit_id)
            else {
                continue;
            };
            if unit.pending_throw != Some(task.id) {
                continue;
            }
            if let Some(direction) = unit.throw_disc(player_location, current_time, rng) {
                result.thrown.push(DiscThrown {
                    unit_id: unit.id,
                    dx: direction.x,
                    dy: direction.y,
                });
            }
        }

        // 2. Player: catch and carry its disc
        let bounds = self.config.bounds();
        {
            let mut ctx = FrameContext {
                bounds,
                diagonal: self.diagonal,
                player_location,
                current_time,
                scheduler: &mut self.scheduler,
                rng: &mut self.rng,
            };
            if let Some(player) = self.player.as_mut() {
                let outcome = player.update(&mut ctx);
                if outcome.caught_disc {
                    result.caught.push(player.id);
                }
                if outcome.retargeted {
                    result.retargeted.push(player.id);
                }
            }

            // 3. Enemies
            for unit in self.enemies.iter_mut() {
                let before = unit.location();
                let outcome = unit.update(&mut ctx);
                if outcome.caught_disc {
                    result.caught.push(unit.id);
                }
                if outcome.retargeted {
                    result.retargeted.push(unit.id);
                }
                if outcome.primed.is_some() {
                    result.primed.push(unit.id);
                }
                if unit.location() != before {
                    result.moved.push(MovedUnit {
                        id: unit.id,
                        x: unit.location().x,
                        y: unit.location().y,
                    });
                }
            }
        }

        // 4. Deadly discs
        self.resolve_disc_hits(&mut result);

        // 5. Periodic regeneration
        let interval = self.config.regeneration_interval_ms();
        match self.last_regeneration {
            None => self.last_regeneration = Some(current_time),
            Some(last) if current_time - last >= interval => {
                self.last_regeneration = Some(current_time);
                for unit in self.player.iter_mut().chain(self.enemies.iter_mut()) {
                    if unit.regenerate(&bounds, &mut self.rng) {
                        result.regenerated.push(unit.id);
                    }
                }
            }
            Some(_) => {}
        }

        // 6. Sweep the dead once nothing is iterating the enemy list
        let dead: Vec<u32> = self
            .enemies
            .iter()
            .filter(|u| u.is_dead())
            .map(|u| u.id)
            .collect();
        for id in dead {
            if self.remove(id) {
                result.derezzed.push(id);
            }
        }

        if self.tick % 60 == 0 {
            debug!(
                "[Arena] Tick {}: enemies={}, pending_throws={}, score={}",
                self.tick,
                self.enemies.len(),
                self.scheduler.len(),
                self.score
            );
        }

        result.score = self.score;
        result.player_dead = self.is_player_dead();
        result
    }

    fn resolve_disc_hits(&mut self, result: &mut TickResult) {
        let bounds = self.config.bounds();

        // Enemy discs against the player
        if let Some(player) = self.player.as_mut() {
            for enemy in self.enemies.iter_mut() {
                let Some(disc) = enemy.disc.as_mut() else {
                    continue;
                };
                if disc.status == DiscStatus::Deadly && player.sprite.collides(&disc.sprite) {
                    disc.recall();
                    player.hit(1, &bounds, &mut self.rng);
                    result.hits.push(UnitHit {
                        id: player.id,
                        hits: player.hits,
                        max_hits: player.max_hits,
                    });
                }
            }

            // The player's disc against the first enemy it touches
            if let Some(disc) = player.disc.as_mut() {
                if disc.status == DiscStatus::Deadly {
                    if let Some(enemy) = self
                        .enemies
                        .iter_mut()
                        .find(|e| !e.is_dead() && e.sprite.collides(&disc.sprite))
                    {
                        disc.recall();
                        enemy.hit(1, &bounds, &mut self.rng);
                        result.hits.push(UnitHit {
                            id: enemy.id,
                            hits: enemy.hits,
                            max_hits: enemy.max_hits,
                        });
                    }
                }
            }
        }
    }

    /// Render list for the whole grid
    pub fn draw(&self) -> Vec<DrawCommand> {
        let mut out = Vec::with_capacity((self.enemies.len() + 1) * 2);
        for unit in self.player.iter().chain(self.enemies.iter()) {
            unit.draw(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::with_seed(Config::default(), 99)
    }

    #[test]
    fn test_bulldog_removal_awards_points_once() {
        let mut arena = arena();
        let id = arena.spawn(Archetype::Bulldog, Vector::new(400.0, 300.0));

        assert!(arena.hit_unit(id, 1));
        assert!(arena.hit_unit(id, 1));
        assert!(arena.unit(id).unwrap().is_dead());
        assert_eq!(arena.score, 0);

        assert!(arena.remove(id));
        assert_eq!(arena.score, 500);
        assert!(arena.unit(id).is_none());
        assert!(!arena.remove(id));
        assert_eq!(arena.score, 500);
    }

    #[test]
    fn test_player_is_never_removed() {
        let mut arena = arena();
        let id = arena.spawn_player(Vector::new(100.0, 100.0));
        arena.hit_unit(id, 5);

        assert!(!arena.remove(id));
        let result = arena.tick(0.0);
        assert!(result.player_dead);
        assert!(arena.player.is_some());
        assert_eq!(arena.score, 0);
    }

    #[test]
    fn test_tick_sweeps_dead_enemies() {
        let mut arena = arena();
        let warrior = arena.spawn(Archetype::Warrior, Vector::new(100.0, 100.0));
        let guard = arena.spawn(Archetype::Guard, Vector::new(500.0, 500.0));
        arena.hit_unit(warrior, 1);

        let result = arena.tick(0.0);
        assert_eq!(result.derezzed, vec![warrior]);
        assert_eq!(result.score, 100);
        assert_eq!(arena.enemies.len(), 1);
        assert_eq!(arena.enemies[0].id, guard);
    }

    #[test]
    fn test_scheduled_throw_fires_on_time() {
        let mut arena = arena();
        arena.spawn_player(Vector::new(700.0, 500.0));
        let id = arena.spawn(Archetype::Warrior, Vector::new(100.0, 100.0));

        assert_eq!(arena.tick(0.0).primed, vec![id]);
        let task = arena.pending_throw(id).expect("warrior should prime on first frame");
        assert!(arena.scheduler.is_pending(task));

        // Nothing fires before the shortest possible delay
        let mut now = 0.0;
        while now < 990.0 {
            now += 16.0;
            let result = arena.tick(now);
            assert!(result.thrown.is_empty());
        }

        let mut thrown = None;
        while now <= 7100.0 && thrown.is_none() {
            now += 16.0;
            thrown = arena.tick(now).thrown.into_iter().find(|t| t.unit_id == id);
        }
        assert!(thrown.is_some());
        assert!(arena.pending_throw(id).is_none());
    }

    #[test]
    fn test_cancelled_throw_never_fires() {
        let mut arena = arena();
        arena.spawn_player(Vector::new(700.0, 500.0));
        let id = arena.spawn(Archetype::Leader, Vector::new(100.0, 100.0));

        arena.tick(0.0);
        assert!(arena.cancel_throw(id));
        assert!(!arena.cancel_throw(id));

        // The latch was released, so the next frame re-arms
        arena.tick(16.0);
        assert!(arena.pending_throw(id).is_some());
    }

    #[test]
    fn test_no_player_no_throws() {
        let mut arena = arena();
        arena.spawn(Archetype::Warrior, Vector::new(100.0, 100.0));
        for frame in 0..600 {
            let result = arena.tick(frame as f64 * 16.0);
            assert!(result.thrown.is_empty());
        }
        assert!(arena.scheduler.is_empty());
    }

    #[test]
    fn test_player_disc_hits_enemy() {
        let mut arena = arena();
        arena.spawn_player(Vector::new(100.0, 300.0));
        let guard = arena.spawn(Archetype::Guard, Vector::new(140.0, 300.0));

        assert!(arena.throw_player_disc(Vector::new(1.0, 0.0), 0.0));
        assert!(!arena.throw_player_disc(Vector::new(1.0, 0.0), 0.0));

        let mut hit = false;
        for frame in 1..20 {
            let result = arena.tick(frame as f64 * 16.0);
            if result.hits.iter().any(|h| h.id == guard) {
                hit = true;
                break;
            }
        }
        assert!(hit);
        assert_eq!(arena.unit(guard).unwrap().hits, 1);
        assert_eq!(
            arena.player.as_ref().unwrap().disc.as_ref().unwrap().status,
            DiscStatus::Returning
        );
    }

    #[test]
    fn test_enemy_disc_hits_player_once() {
        let mut arena = arena();
        let player = arena.spawn_player(Vector::new(100.0, 100.0));
        let warrior = arena.spawn(Archetype::Warrior, Vector::new(600.0, 400.0));

        let target = arena.player.as_ref().unwrap().sprite.center();
        let disc = arena.enemies[0].disc.as_mut().unwrap();
        disc.thrown(Vector::zero(), 0.0);
        disc.sprite.location = target;

        let result = arena.tick(16.0);
        assert!(result.hits.iter().any(|h| h.id == player));
        assert_eq!(arena.player.as_ref().unwrap().hits, 1);
        assert_eq!(
            arena.unit(warrior).unwrap().disc.as_ref().unwrap().status,
            DiscStatus::Returning
        );

        // Still overlapping, but a returning disc is harmless
        let result = arena.tick(32.0);
        assert!(result.hits.iter().all(|h| h.id != player));
        assert_eq!(arena.player.as_ref().unwrap().hits, 1);
    }

    #[test]
    fn test_regeneration_runs_on_interval() {
        let mut arena = arena();
        let bulldog = arena.spawn(Archetype::Bulldog, Vector::new(400.0, 300.0));
        arena.hit_unit(bulldog, 1);

        arena.tick(0.0);
        assert!(arena.tick(3000.0).regenerated.is_empty());
        assert_eq!(arena.tick(6000.0).regenerated, vec![bulldog]);
        assert_eq!(arena.unit(bulldog).unwrap().hits, 0);
    }

    #[test]
    fn test_draw_lists_every_sprite() {
        let mut arena = arena();
        arena.spawn_player(Vector::new(10.0, 10.0));
        arena.spawn(Archetype::Warrior, Vector::new(300.0, 300.0));
        arena.spawn(Archetype::Guard, Vector::new(500.0, 300.0));

        // player + disc, warrior + disc, guard
        assert_eq!(arena.draw().len(), 5);
    }
}
