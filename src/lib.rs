//! Drift Strike - a top-down arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, input interpretation, collisions, tick loop)
//! - `render`: Render-visitor implementations (HUD model, Canvas2D painter)
//! - `settings`: User preferences persisted in LocalStorage on web

pub mod render;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Ship bounding box edge length (square)
    pub const SHIP_SIZE: f32 = 30.0;
    /// Ship travel speed (px/s)
    pub const SHIP_SPEED: f32 = 500.0;

    /// Projectile bounding box edge length (square)
    pub const PROJECTILE_SIZE: f32 = 10.0;
    /// Projectile travel speed (px/s)
    pub const PROJECTILE_SPEED: f32 = 1000.0;

    /// Obstacle bounding box edge length (square)
    pub const OBSTACLE_SIZE: f32 = 15.0;
    /// Obstacle spawn velocity range: each axis is uniform in ±this (px/s)
    pub const OBSTACLE_MAX_SPEED: f32 = 100.0;

    /// Obstacles fade in over this window after spawning (ms)
    pub const FADE_IN_MS: f64 = 200.0;
    /// Destroyed obstacles fade out over this window after death (ms)
    pub const FADE_OUT_MS: f64 = 2000.0;

    /// Hull damage per obstacle collision
    pub const COLLISION_DAMAGE: f32 = 0.2;
    /// Hull regeneration per obstacle destroyed
    pub const KILL_HEAL: f32 = 0.01;

    /// Minimum live-obstacle count; dropping below triggers a respawn batch
    pub const SPAWN_FLOOR: usize = 8;
    /// Base respawn batch size
    pub const SPAWN_BATCH: u32 = 10;
    /// Batch size grows by one base batch per this many cumulative kills
    pub const RAMP_INTERVAL: u32 = 50;
}
