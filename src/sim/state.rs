//! World state: entity collections, spawn policy, restart
//!
//! Everything here is owned exclusively by the `World` and mutated only
//! inside a tick; there is no concurrency and nothing to lock.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::dispatch::{EntityRef, InspectVisitor};
use super::entity::{Obstacle, Projectile, Ship};
use crate::consts::*;

/// Coarse game state, derived from ship health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ship alive; full update phase runs each tick
    Running,
    /// Ship dead; only the restart check runs
    GameOver,
}

/// Which interpreter drives the ship. Sticky: a tick with no input at all
/// leaves the mode unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Keyboard,
    Touch,
}

/// Read-only snapshot for the overlay pass
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    pub health: f32,
    pub destroyed: u32,
    pub phase: Phase,
    pub mode: ControlMode,
}

/// The whole simulation state
pub struct World {
    pub ship: Ship,
    /// Projectiles still in flight
    pub projectiles: Vec<Projectile>,
    /// Obstacles participating in physics and collision
    pub obstacles: Vec<Obstacle>,
    /// Destroyed obstacles, frozen in place and fading out
    pub wreckage: Vec<Obstacle>,
    /// Cumulative kills this session; never decreases until restart
    pub destroyed: u32,
    /// Timestamp of the previous tick (ms)
    pub last_tick: f64,
    /// Current viewport dimensions (px)
    pub viewport: Vec2,
    pub mode: ControlMode,
    /// Run seed, logged for reproducibility
    pub seed: u64,
    rng: Pcg32,
}

impl World {
    pub fn new(viewport: Vec2, seed: u64, now: f64) -> Self {
        let mut world = Self {
            ship: Self::centered_ship(viewport),
            projectiles: Vec::new(),
            obstacles: Vec::new(),
            wreckage: Vec::new(),
            destroyed: 0,
            last_tick: now,
            viewport,
            mode: ControlMode::Keyboard,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        };
        world.refill_obstacles(now);
        world
    }

    fn centered_ship(viewport: Vec2) -> Ship {
        Ship::new(viewport / 2.0 - Vec2::splat(SHIP_SIZE) / 2.0)
    }

    /// Ship health is the state machine: dead means game over.
    pub fn phase(&self) -> Phase {
        if self.ship.is_alive() {
            Phase::Running
        } else {
            Phase::GameOver
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            health: self.ship.health,
            destroyed: self.destroyed,
            phase: self.phase(),
            mode: self.mode,
        }
    }

    /// Full reset after a game over: fresh centered ship, empty collections,
    /// zero score, new obstacle batch. The control mode and RNG stream carry
    /// over.
    pub fn restart(&mut self, now: f64) {
        self.ship = Self::centered_ship(self.viewport);
        self.projectiles.clear();
        self.obstacles.clear();
        self.wreckage.clear();
        self.destroyed = 0;
        self.last_tick = now;
        self.refill_obstacles(now);
        log::info!("world restarted");
    }

    /// Viewport change. Stored dimensions update; entity positions are left
    /// alone - anything now out of bounds is culled by the next update phase.
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        log::debug!("viewport resized to {}x{}", viewport.x, viewport.y);
    }

    /// Respawn batch size: one base batch, plus one more per
    /// `RAMP_INTERVAL` cumulative kills. The difficulty ramp.
    pub fn batch_size(&self) -> u32 {
        SPAWN_BATCH * (1 + self.destroyed / RAMP_INTERVAL)
    }

    /// Spawn-floor check: when the live count drops below the floor, spawn
    /// one full batch.
    pub fn refill_obstacles(&mut self, now: f64) {
        if self.obstacles.len() >= SPAWN_FLOOR {
            return;
        }
        let batch = self.batch_size();
        for _ in 0..batch {
            self.obstacles
                .push(Obstacle::spawn(&mut self.rng, self.viewport, now));
        }
        log::debug!(
            "spawned {} obstacles ({} live, {} destroyed so far)",
            batch,
            self.obstacles.len(),
            self.destroyed
        );
    }

    /// Append a freshly fired projectile.
    pub fn add_projectile(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Walk every entity with a read-only inspection visitor.
    pub fn inspect(&self, visitor: &mut dyn InspectVisitor) {
        for projectile in &self.projectiles {
            EntityRef::Projectile(projectile).inspect(visitor);
        }
        for obstacle in &self.obstacles {
            EntityRef::Obstacle(obstacle).inspect(visitor);
        }
        for wreck in &self.wreckage {
            EntityRef::Obstacle(wreck).inspect(visitor);
        }
        EntityRef::Ship(&self.ship).inspect(visitor);
    }
}
