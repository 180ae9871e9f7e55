//! Capability-visitor dispatch
//!
//! The tick loop iterates heterogeneous entity collections with a single
//! `dispatch` call per entity; the match below routes to the visitor callback
//! for that kind. Visitors implement only the callbacks they care about -
//! every trait method has a default body that logs at debug level and does
//! nothing, so a partial visitor (or an entity kind a role does not cover)
//! is an intentional no-op rather than an error.
//!
//! Three roles exist: render (one callback per drawable kind plus surface
//! clear and HUD overlay), input (ship only, may fire), and read-only
//! inspection.

use glam::Vec2;

use super::entity::{Obstacle, Projectile, Ship, SimError};
use super::state::Hud;

/// Draw-phase visitor. Implemented by the Canvas2D painter, and by
/// recording stubs in tests.
pub trait RenderVisitor {
    /// Start of the render phase: clear the surface and latch the frame
    /// timestamp (destroyed obstacles need it for fade alpha).
    fn begin(&mut self, _now: f64, _viewport: Vec2) {
        log::debug!("render visitor: no begin handler");
    }

    fn ship(&mut self, _ship: &Ship) {
        log::debug!("render visitor: no ship handler");
    }

    fn projectile(&mut self, _projectile: &Projectile) {
        log::debug!("render visitor: no projectile handler");
    }

    fn obstacle(&mut self, _obstacle: &Obstacle) {
        log::debug!("render visitor: no obstacle handler");
    }

    /// End of the render phase: health bar, score readout, game-over text.
    fn overlay(&mut self, _hud: &Hud) {
        log::debug!("render visitor: no overlay handler");
    }
}

/// Input-phase visitor. Only the ship is steerable; the callback returns the
/// projectile fired this tick, if any, for the caller to append.
pub trait InputVisitor {
    fn ship(&mut self, _ship: &mut Ship) -> Result<Option<Projectile>, SimError> {
        log::debug!("input visitor: no ship handler");
        Ok(None)
    }
}

/// Read-only inspection visitor (entity audits, debug overlays).
pub trait InspectVisitor {
    fn ship(&mut self, _ship: &Ship) {
        log::debug!("inspect visitor: no ship handler");
    }

    fn projectile(&mut self, _projectile: &Projectile) {
        log::debug!("inspect visitor: no projectile handler");
    }

    fn obstacle(&mut self, _obstacle: &Obstacle) {
        log::debug!("inspect visitor: no obstacle handler");
    }
}

/// A shared reference to an entity of any kind
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Ship(&'a Ship),
    Projectile(&'a Projectile),
    Obstacle(&'a Obstacle),
}

impl EntityRef<'_> {
    /// Route a draw call to the kind-specific callback.
    pub fn render(&self, visitor: &mut dyn RenderVisitor) {
        match self {
            EntityRef::Ship(ship) => visitor.ship(ship),
            EntityRef::Projectile(projectile) => visitor.projectile(projectile),
            EntityRef::Obstacle(obstacle) => visitor.obstacle(obstacle),
        }
    }

    /// Route a read-only inspection to the kind-specific callback.
    pub fn inspect(&self, visitor: &mut dyn InspectVisitor) {
        match self {
            EntityRef::Ship(ship) => visitor.ship(ship),
            EntityRef::Projectile(projectile) => visitor.projectile(projectile),
            EntityRef::Obstacle(obstacle) => visitor.obstacle(obstacle),
        }
    }
}

/// A mutable reference to an entity of any kind
#[derive(Debug)]
pub enum EntityMut<'a> {
    Ship(&'a mut Ship),
    Projectile(&'a mut Projectile),
    Obstacle(&'a mut Obstacle),
}

impl EntityMut<'_> {
    /// Route per-frame input to the kind-specific callback. Kinds the input
    /// role does not steer fall through to a logged no-op.
    pub fn consume_input(
        &mut self,
        visitor: &mut dyn InputVisitor,
    ) -> Result<Option<Projectile>, SimError> {
        match self {
            EntityMut::Ship(ship) => visitor.ship(ship),
            EntityMut::Projectile(_) | EntityMut::Obstacle(_) => {
                log::debug!("input dispatch: entity kind is not steerable");
                Ok(None)
            }
        }
    }
}

/// Entity head-count, one field per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Census {
    pub ships: usize,
    pub projectiles: usize,
    pub obstacles: usize,
}

impl InspectVisitor for Census {
    fn ship(&mut self, _ship: &Ship) {
        self.ships += 1;
    }

    fn projectile(&mut self, _projectile: &Projectile) {
        self.projectiles += 1;
    }

    fn obstacle(&mut self, _obstacle: &Obstacle) {
        self.obstacles += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::OBSTACLE_SIZE;

    fn sample_obstacle() -> Obstacle {
        Obstacle {
            pos: Vec2::ZERO,
            size: Vec2::splat(OBSTACLE_SIZE),
            vel: Vec2::ZERO,
            spawned_at: 0.0,
            died_at: None,
            fate: None,
        }
    }

    /// Renders nothing but remembers which callbacks fired
    #[derive(Default)]
    struct CallLog {
        ships: u32,
        projectiles: u32,
        obstacles: u32,
    }

    impl RenderVisitor for CallLog {
        fn ship(&mut self, _: &Ship) {
            self.ships += 1;
        }
        fn projectile(&mut self, _: &Projectile) {
            self.projectiles += 1;
        }
        fn obstacle(&mut self, _: &Obstacle) {
            self.obstacles += 1;
        }
    }

    #[test]
    fn test_render_dispatch_routes_by_kind() {
        let ship = Ship::new(Vec2::ZERO);
        let projectile = ship.fire(Vec2::X).unwrap();
        let obstacle = sample_obstacle();

        let mut log = CallLog::default();
        EntityRef::Ship(&ship).render(&mut log);
        EntityRef::Projectile(&projectile).render(&mut log);
        EntityRef::Obstacle(&obstacle).render(&mut log);
        EntityRef::Obstacle(&obstacle).render(&mut log);

        assert_eq!((log.ships, log.projectiles, log.obstacles), (1, 1, 2));
    }

    #[test]
    fn test_partial_visitor_is_a_noop() {
        // Implements nothing: every dispatch hits the default branch
        struct Blind;
        impl RenderVisitor for Blind {}
        impl InputVisitor for Blind {}

        let mut ship = Ship::new(Vec2::ZERO);
        let obstacle = sample_obstacle();
        let mut blind = Blind;

        EntityRef::Ship(&ship).render(&mut blind);
        EntityRef::Obstacle(&obstacle).render(&mut blind);
        let fired = EntityMut::Ship(&mut ship).consume_input(&mut blind).unwrap();
        assert!(fired.is_none());
    }

    #[test]
    fn test_input_dispatch_ignores_unsteerable_kinds() {
        struct AlwaysFire;
        impl InputVisitor for AlwaysFire {
            fn ship(&mut self, ship: &mut Ship) -> Result<Option<Projectile>, SimError> {
                ship.fire(Vec2::Y).map(Some)
            }
        }

        let mut obstacle = sample_obstacle();
        let fired = EntityMut::Obstacle(&mut obstacle)
            .consume_input(&mut AlwaysFire)
            .unwrap();
        assert!(fired.is_none());
    }

    #[test]
    fn test_census_counts_every_kind() {
        let ship = Ship::new(Vec2::ZERO);
        let projectile = ship.fire(Vec2::X).unwrap();
        let obstacle = sample_obstacle();

        let mut census = Census::default();
        EntityRef::Ship(&ship).inspect(&mut census);
        EntityRef::Projectile(&projectile).inspect(&mut census);
        EntityRef::Obstacle(&obstacle).inspect(&mut census);
        EntityRef::Obstacle(&obstacle).inspect(&mut census);

        assert_eq!(
            census,
            Census {
                ships: 1,
                projectiles: 1,
                obstacles: 2
            }
        );
    }
}
