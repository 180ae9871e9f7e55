//! Render-visitor implementations
//!
//! The palette and HUD text live here so they can be unit-tested on any
//! target; the actual Canvas2D painter only builds for wasm.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::state::{ControlMode, Hud};
use crate::sim::{Fate, Obstacle};

/// Fill colors, 0xRRGGBB
pub mod palette {
    pub const BACKGROUND: u32 = 0x0b0e14;
    pub const SHIP: u32 = 0x4fc3f7;
    pub const OBSTACLE: u32 = 0x9aa0a6;
    /// Obstacle destroyed by a projectile
    pub const OBSTACLE_SHOT: u32 = 0xffa726;
    /// Obstacle that collided with the ship
    pub const OBSTACLE_RAMMED: u32 = 0xef5350;
    pub const HEALTH_TRACK: u32 = 0xd32f2f;
    pub const HEALTH_FILL: u32 = 0x43a047;
    pub const TEXT: u32 = 0xe0e0e0;
}

/// Height of the health bar strip at the top of the viewport (px)
pub const HEALTH_BAR_HEIGHT: f32 = 10.0;

/// Format a color as a CSS hex string.
pub fn css_color(rgb: u32) -> String {
    format!("#{:06x}", rgb & 0x00ff_ffff)
}

/// Wreckage is recolored by how it died; live obstacles share one color.
pub fn obstacle_color(obstacle: &Obstacle) -> u32 {
    match obstacle.fate {
        None => palette::OBSTACLE,
        Some(Fate::Shot) => palette::OBSTACLE_SHOT,
        Some(Fate::Rammed) => palette::OBSTACLE_RAMMED,
    }
}

/// The score/hull readout under the health bar.
pub fn status_line(hud: &Hud) -> String {
    format!(
        "destroyed: {}   hull: {:.0}%",
        hud.destroyed,
        hud.health * 100.0
    )
}

/// Mode-appropriate restart instructions for the game-over screen.
pub fn restart_hint(mode: ControlMode) -> &'static str {
    match mode {
        ControlMode::Keyboard => "press Enter to restart",
        ControlMode::Touch => "tap with three fingers to restart",
    }
}
