//! Simulation module
//!
//! All gameplay logic lives here. This module is platform-independent:
//! - Timestamps come in from the host (one monotonic clock domain)
//! - Seeded RNG only
//! - No rendering or DOM dependencies; drawing goes through visitor traits

pub mod collision;
pub mod dispatch;
pub mod entity;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::boxes_overlap;
pub use dispatch::{Census, EntityMut, EntityRef, InputVisitor, InspectVisitor, RenderVisitor};
pub use entity::{Fate, Obstacle, Projectile, Ship, SimError};
pub use input::{InputSnapshot, KeyboardControls, TouchControls, TouchSample};
pub use state::{ControlMode, Phase, World};
pub use tick::tick;
