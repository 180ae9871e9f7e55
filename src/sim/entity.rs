//! Entity variants and their per-type rules
//!
//! Ship, Projectile and Obstacle own their physical state (positions are the
//! top-left corner of the entity's bounding box). Motion is plain linear
//! integration; anything fancier (steering, firing, fading) lives in the
//! per-type methods below.

use std::fmt;

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

/// Contract violations surfaced to the host. Everything else in the
/// simulation is a total function over well-formed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// `fire` was invoked with a zero-length direction vector. Interpreters
    /// must guarantee a non-zero direction before firing; letting this
    /// through would produce a non-finite velocity.
    ZeroFireDirection,
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ZeroFireDirection => {
                write!(f, "fire invoked with a zero-length direction vector")
            }
        }
    }
}

impl std::error::Error for SimError {}

/// The player's ship
///
/// Exactly one exists per world. Death is a health value, not an absence:
/// the ship is reset on restart, never removed.
#[derive(Debug, Clone)]
pub struct Ship {
    /// Top-left corner of the bounding box
    pub pos: Vec2,
    /// Bounding box extent (fixed square)
    pub size: Vec2,
    pub vel: Vec2,
    /// Hull integrity in [0, 1]
    pub health: f32,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(SHIP_SIZE),
            vel: Vec2::ZERO,
            health: 1.0,
        }
    }

    /// Center of the bounding box (projectile spawn point, touch reference)
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Set velocity from a steering direction. A zero vector stops the ship;
    /// anything else is unit-normalized and scaled to the ship speed.
    pub fn steer(&mut self, direction: Vec2) {
        self.vel = direction.normalize_or_zero() * SHIP_SPEED;
    }

    /// Stop in place (dead ship, no touch input)
    pub fn halt(&mut self) {
        self.vel = Vec2::ZERO;
    }

    /// Fire a projectile from the ship's center toward `direction`.
    ///
    /// Errors on a zero-length direction - callers must check first.
    pub fn fire(&self, direction: Vec2) -> Result<Projectile, SimError> {
        Projectile::new(self.center(), direction)
    }

    /// Apply one obstacle collision's worth of hull damage, floored at 0
    pub fn take_damage(&mut self) {
        self.health = (self.health - COLLISION_DAMAGE).max(0.0);
    }

    /// Incidental regeneration on a successful kill, capped at 1
    pub fn heal(&mut self) {
        self.health = (self.health + KILL_HEAL).min(1.0);
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Linear motion: pos += vel * dt (dt in seconds)
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Projectile fill color (0xRRGGBB, looked up by the renderer)
pub const PROJECTILE_COLOR: u32 = 0xffd24a;

/// A projectile fired by the ship
///
/// Velocity magnitude is always exactly `PROJECTILE_SPEED`; the constructor
/// normalizes whatever raw direction it is given.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub color: u32,
}

impl Projectile {
    /// Build a projectile at `origin` travelling along `direction`.
    ///
    /// Errors on a zero-length direction.
    pub fn new(origin: Vec2, direction: Vec2) -> Result<Self, SimError> {
        let unit = direction
            .try_normalize()
            .ok_or(SimError::ZeroFireDirection)?;
        Ok(Self {
            pos: origin,
            size: Vec2::splat(PROJECTILE_SIZE),
            vel: unit * PROJECTILE_SPEED,
            color: PROJECTILE_COLOR,
        })
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// How an obstacle died (drives the wreckage color)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Destroyed by a projectile
    Shot,
    /// Collided with the ship
    Rammed,
}

/// A drifting obstacle
///
/// Alive obstacles drift at a constant random velocity and fade in over
/// `FADE_IN_MS`. Once marked dead they freeze in place and fade out over
/// `FADE_OUT_MS` in the wreckage collection.
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    /// Creation timestamp (ms, host clock domain)
    pub spawned_at: f64,
    /// Death timestamp; set at most once, never cleared
    pub died_at: Option<f64>,
    pub fate: Option<Fate>,
}

impl Obstacle {
    /// Spawn at a uniform-random position within `bounds` with a
    /// uniform-random velocity in ±`OBSTACLE_MAX_SPEED` per axis.
    pub fn spawn<R: Rng>(rng: &mut R, bounds: Vec2, now: f64) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..bounds.x),
                rng.random_range(0.0..bounds.y),
            ),
            size: Vec2::splat(OBSTACLE_SIZE),
            vel: Vec2::new(
                rng.random_range(-OBSTACLE_MAX_SPEED..=OBSTACLE_MAX_SPEED),
                rng.random_range(-OBSTACLE_MAX_SPEED..=OBSTACLE_MAX_SPEED),
            ),
            spawned_at: now,
            died_at: None,
            fate: None,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.died_at.is_some()
    }

    /// Record a projectile kill: freeze, recolor, timestamp. Idempotent -
    /// only the first death of either kind sticks.
    pub fn mark_shot(&mut self, now: f64) {
        self.mark_dead(Fate::Shot, now);
    }

    /// Record a ship collision. Idempotent like `mark_shot`.
    pub fn mark_rammed(&mut self, now: f64) {
        self.mark_dead(Fate::Rammed, now);
    }

    fn mark_dead(&mut self, fate: Fate, now: f64) {
        if self.died_at.is_some() {
            return;
        }
        self.vel = Vec2::ZERO;
        self.died_at = Some(now);
        self.fate = Some(fate);
    }

    /// Render opacity at `now`: ramps 0→1 across the fade-in window after
    /// spawning, then (once dead) 1→0 across the fade-out window after
    /// death. One function serves both transitions.
    pub fn fade_alpha(&self, now: f64) -> f32 {
        match self.died_at {
            None => (((now - self.spawned_at) / FADE_IN_MS) as f32).clamp(0.0, 1.0),
            Some(died) => 1.0 - (((now - died) / FADE_OUT_MS) as f32).clamp(0.0, 1.0),
        }
    }
}
