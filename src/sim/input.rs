//! Input snapshots and the interpreters that turn them into ship intent
//!
//! The host forwards raw state every tick: which keys are currently down,
//! and the latest multi-touch sample if one arrived. The two interpreters
//! are input-visitor implementations, so the tick loop drives whichever is
//! active through the same dispatch call.

use std::collections::HashMap;

use glam::Vec2;

use super::dispatch::InputVisitor;
use super::entity::{Projectile, Ship, SimError};

/// Currently-pressed key identifiers, as reported by the host
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    keys: HashMap<String, bool>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key state change (host keydown/keyup handler).
    pub fn set_key(&mut self, key: &str, pressed: bool) {
        self.keys.insert(key.to_owned(), pressed);
    }

    pub fn pressed(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// True if any key at all is held (drives the sticky mode switch).
    pub fn any_pressed(&self) -> bool {
        self.keys.values().any(|&down| down)
    }
}

/// The most recent raw multi-touch event: one screen position per active
/// touch point, in the same coordinate space as the simulation.
#[derive(Debug, Clone, Default)]
pub struct TouchSample {
    pub points: Vec<Vec2>,
}

impl TouchSample {
    /// First touch point: absolute position the ship steers toward.
    pub fn steer_point(&self) -> Option<Vec2> {
        self.points.first().copied()
    }

    /// Second touch point: absolute position defining the fire direction.
    pub fn aim_point(&self) -> Option<Vec2> {
        self.points.get(1).copied()
    }

    /// Three simultaneous touches restart the game after a game over.
    pub fn is_restart_gesture(&self) -> bool {
        self.points.len() >= 3
    }
}

/// Keyboard-mode interpreter
///
/// Arrow keys accumulate a ±1-per-axis steering vector (opposite keys held
/// together cancel); `w`/`a`/`s`/`d` accumulate a firing direction the same
/// way, firing only when the result is non-zero.
pub struct KeyboardControls<'a> {
    keys: &'a InputSnapshot,
}

impl<'a> KeyboardControls<'a> {
    pub fn new(keys: &'a InputSnapshot) -> Self {
        Self { keys }
    }

    fn axis(&self, negative: &str, positive: &str) -> f32 {
        let mut v = 0.0;
        if self.keys.pressed(negative) {
            v -= 1.0;
        }
        if self.keys.pressed(positive) {
            v += 1.0;
        }
        v
    }
}

impl InputVisitor for KeyboardControls<'_> {
    fn ship(&mut self, ship: &mut Ship) -> Result<Option<Projectile>, SimError> {
        if !ship.is_alive() {
            ship.halt();
            return Ok(None);
        }

        // Screen coordinates: +y is down, so "up" is the negative direction
        let steer = Vec2::new(
            self.axis("ArrowLeft", "ArrowRight"),
            self.axis("ArrowUp", "ArrowDown"),
        );
        ship.steer(steer);

        let aim = Vec2::new(self.axis("a", "d"), self.axis("w", "s"));
        if aim != Vec2::ZERO {
            return ship.fire(aim).map(Some);
        }
        Ok(None)
    }
}

/// Touch-mode interpreter
///
/// The first touch point steers the ship toward its absolute position; the
/// second aims a shot the same way. No first touch means stop.
pub struct TouchControls<'a> {
    sample: Option<&'a TouchSample>,
}

impl<'a> TouchControls<'a> {
    pub fn new(sample: Option<&'a TouchSample>) -> Self {
        Self { sample }
    }
}

impl InputVisitor for TouchControls<'_> {
    fn ship(&mut self, ship: &mut Ship) -> Result<Option<Projectile>, SimError> {
        let center = ship.center();

        match self.sample.and_then(TouchSample::steer_point) {
            Some(target) => ship.steer(target - center),
            None => ship.halt(),
        }

        if let Some(target) = self.sample.and_then(TouchSample::aim_point) {
            let direction = target - center;
            // A tap dead on the ship center has no direction; don't fire
            if direction != Vec2::ZERO {
                return ship.fire(direction).map(Some);
            }
        }
        Ok(None)
    }
}
