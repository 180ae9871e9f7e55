//! Per-tick update and render orchestration
//!
//! One `tick` call per host frame: compute elapsed time, run the update
//! phase (input → physics → collision → spawn) unless the game is over,
//! then run the render phase. Collision sweeps build new filtered
//! collections instead of removing elements mid-scan.

use glam::Vec2;

use super::collision::boxes_overlap;
use super::dispatch::{EntityMut, EntityRef, RenderVisitor};
use super::entity::SimError;
use super::input::{InputSnapshot, KeyboardControls, TouchControls, TouchSample};
use super::state::{ControlMode, Phase, World};

/// Advance the world to `now` and draw it.
///
/// `keys` is the currently-pressed key map, `touch` the latest raw touch
/// sample if one is active. The only error path is the zero-direction fire
/// contract violation, which the host should treat as fatal to the session.
pub fn tick(
    world: &mut World,
    now: f64,
    keys: &InputSnapshot,
    touch: Option<&TouchSample>,
    renderer: &mut dyn RenderVisitor,
) -> Result<(), SimError> {
    let dt = ((now - world.last_tick) / 1000.0) as f32;
    world.last_tick = now;

    match world.phase() {
        Phase::GameOver => {
            // No physics, collision or spawning while dead; just the
            // restart triggers.
            let restart =
                keys.pressed("Enter") || touch.is_some_and(TouchSample::is_restart_gesture);
            if restart {
                world.restart(now);
            }
        }
        Phase::Running => update(world, now, dt, keys, touch)?,
    }

    render(world, now, renderer);
    Ok(())
}

/// The update phase for a running game.
fn update(
    world: &mut World,
    now: f64,
    dt: f32,
    keys: &InputSnapshot,
    touch: Option<&TouchSample>,
) -> Result<(), SimError> {
    // Sticky mode switch: a tick with no input at all changes nothing
    if touch.is_some() {
        world.mode = ControlMode::Touch;
    } else if keys.any_pressed() {
        world.mode = ControlMode::Keyboard;
    }

    // Drive the ship through the active interpreter; append anything fired
    let fired = match world.mode {
        ControlMode::Keyboard => {
            let mut controls = KeyboardControls::new(keys);
            EntityMut::Ship(&mut world.ship).consume_input(&mut controls)?
        }
        ControlMode::Touch => {
            let mut controls = TouchControls::new(touch);
            EntityMut::Ship(&mut world.ship).consume_input(&mut controls)?
        }
    };
    if let Some(projectile) = fired {
        world.add_projectile(projectile);
    }

    world.ship.advance(dt);

    // Cull anything whose position left the viewport
    let bounds = world.viewport;
    world.projectiles.retain(|p| in_bounds(p.pos, bounds));
    world.obstacles.retain(|o| in_bounds(o.pos, bounds));

    // Projectiles vs obstacles. Projectiles are not consumed on a hit, so
    // one may destroy several obstacles in the same tick; each kill heals.
    let mut survivors = Vec::with_capacity(world.obstacles.len());
    for mut obstacle in std::mem::take(&mut world.obstacles) {
        let hit = world
            .projectiles
            .iter()
            .any(|p| boxes_overlap(p.pos, p.size, obstacle.pos, obstacle.size));
        if hit {
            obstacle.mark_shot(now);
            world.ship.heal();
            world.destroyed += 1;
            world.wreckage.push(obstacle);
        } else {
            survivors.push(obstacle);
        }
    }
    world.obstacles = survivors;

    // Ship vs remaining obstacles
    let was_alive = world.ship.is_alive();
    let mut survivors = Vec::with_capacity(world.obstacles.len());
    for mut obstacle in std::mem::take(&mut world.obstacles) {
        let hit = boxes_overlap(
            world.ship.pos,
            world.ship.size,
            obstacle.pos,
            obstacle.size,
        );
        if hit {
            obstacle.mark_rammed(now);
            world.ship.take_damage();
            world.destroyed += 1;
            world.wreckage.push(obstacle);
        } else {
            survivors.push(obstacle);
        }
    }
    world.obstacles = survivors;

    if was_alive && !world.ship.is_alive() {
        log::info!("game over after {} kills", world.destroyed);
    }

    // Integrate the survivors; wreckage stays frozen where it died
    for projectile in &mut world.projectiles {
        projectile.advance(dt);
    }
    for obstacle in &mut world.obstacles {
        obstacle.advance(dt);
    }

    // Fully faded wreckage has nothing left to draw
    world.wreckage.retain(|o| o.fade_alpha(now) > 0.0);

    world.refill_obstacles(now);
    Ok(())
}

/// Strict bounds test on the entity position: off by any amount means gone.
#[inline]
fn in_bounds(pos: Vec2, bounds: Vec2) -> bool {
    pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= bounds.x && pos.y <= bounds.y
}

/// The render phase: clear, then projectiles, live obstacles, wreckage and
/// ship in that order, then the HUD overlay.
fn render(world: &World, now: f64, renderer: &mut dyn RenderVisitor) {
    renderer.begin(now, world.viewport);
    for projectile in &world.projectiles {
        EntityRef::Projectile(projectile).render(renderer);
    }
    for obstacle in &world.obstacles {
        EntityRef::Obstacle(obstacle).render(renderer);
    }
    for wreck in &world.wreckage {
        EntityRef::Obstacle(wreck).render(renderer);
    }
    EntityRef::Ship(&world.ship).render(renderer);
    renderer.overlay(&world.hud());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::{Fate, Obstacle, Projectile};
    use crate::sim::state::Hud;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    /// Renders nothing; every dispatch hits the logged-no-op defaults
    struct Headless;
    impl RenderVisitor for Headless {}

    fn world() -> World {
        let mut w = World::new(VIEWPORT, 42, 0.0);
        // Tests place their own obstacles
        w.obstacles.clear();
        w
    }

    fn obstacle_at(pos: Vec2, vel: Vec2) -> Obstacle {
        Obstacle {
            pos,
            size: Vec2::splat(OBSTACLE_SIZE),
            vel,
            spawned_at: 0.0,
            died_at: None,
            fate: None,
        }
    }

    fn projectile_at(pos: Vec2, dir: Vec2) -> Projectile {
        let mut p = Projectile::new(pos, dir).unwrap();
        p.pos = pos;
        p
    }

    #[test]
    fn test_entities_move_by_elapsed_time() {
        let mut w = world();
        w.obstacles.push(obstacle_at(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0)));
        tick(&mut w, 500.0, &InputSnapshot::new(), None, &mut Headless).unwrap();
        // 0.5s at 100 px/s; index 0 survives both sweeps untouched
        assert_eq!(w.obstacles[0].pos, Vec2::new(150.0, 100.0));
        assert_eq!(w.last_tick, 500.0);
    }

    #[test]
    fn test_projectile_kills_overlapping_obstacle() {
        let mut w = world();
        w.ship.health = 0.5;
        w.obstacles.push(obstacle_at(Vec2::new(100.0, 100.0), Vec2::ZERO));
        w.projectiles.push(projectile_at(Vec2::new(105.0, 105.0), Vec2::X));

        tick(&mut w, 16.0, &InputSnapshot::new(), None, &mut Headless).unwrap();

        assert_eq!(w.destroyed, 1);
        assert_eq!(w.wreckage.len(), 1);
        assert_eq!(w.wreckage[0].fate, Some(Fate::Shot));
        assert_eq!(w.wreckage[0].died_at, Some(16.0));
        assert!((w.ship.health - 0.51).abs() < 1e-6);
        // Projectiles are not consumed by hits
        assert_eq!(w.projectiles.len(), 1);
    }

    #[test]
    fn test_one_projectile_multi_kill_compounds_heals() {
        let mut w = world();
        w.ship.health = 0.5;
        w.obstacles.push(obstacle_at(Vec2::new(100.0, 100.0), Vec2::ZERO));
        w.obstacles.push(obstacle_at(Vec2::new(108.0, 100.0), Vec2::ZERO));
        w.projectiles.push(projectile_at(Vec2::new(104.0, 104.0), Vec2::X));

        tick(&mut w, 16.0, &InputSnapshot::new(), None, &mut Headless).unwrap();

        assert_eq!(w.destroyed, 2);
        assert_eq!(w.wreckage.len(), 2);
        assert!((w.ship.health - 0.52).abs() < 1e-6);
    }

    #[test]
    fn test_ship_collision_damages_and_freezes_obstacle() {
        let mut w = world();
        let overlap = w.ship.pos + Vec2::splat(5.0);
        w.obstacles.push(obstacle_at(overlap, Vec2::new(60.0, 0.0)));

        tick(&mut w, 16.0, &InputSnapshot::new(), None, &mut Headless).unwrap();

        assert!((w.ship.health - 0.8).abs() < 1e-6);
        assert_eq!(w.destroyed, 1);
        assert_eq!(w.wreckage[0].fate, Some(Fate::Rammed));
        assert_eq!(w.wreckage[0].vel, Vec2::ZERO);
        let frozen = w.wreckage[0].pos;

        tick(&mut w, 1000.0, &InputSnapshot::new(), None, &mut Headless).unwrap();
        assert_eq!(w.wreckage[0].pos, frozen);
    }

    #[test]
    fn test_offscreen_entities_are_culled() {
        let mut w = world();
        w.projectiles.push(projectile_at(Vec2::new(-1.0, 50.0), Vec2::X));
        w.projectiles.push(projectile_at(Vec2::new(50.0, 50.0), Vec2::X));
        w.obstacles.push(obstacle_at(Vec2::new(900.0, 50.0), Vec2::ZERO));
        w.obstacles.push(obstacle_at(Vec2::new(50.0, 601.0), Vec2::ZERO));

        tick(&mut w, 1.0, &InputSnapshot::new(), None, &mut Headless).unwrap();

        assert_eq!(w.projectiles.len(), 1);
        // Both placed obstacles were out of bounds; the refill batch replaced them
        assert!(w.obstacles.iter().all(|o| o.spawned_at == 1.0));
    }

    #[test]
    fn test_spawn_floor_holds_after_update() {
        let mut w = world();
        for _ in 0..3 {
            w.obstacles
                .push(obstacle_at(Vec2::new(200.0, 200.0), Vec2::ZERO));
        }
        tick(&mut w, 16.0, &InputSnapshot::new(), None, &mut Headless).unwrap();
        assert!(w.obstacles.len() >= SPAWN_FLOOR);
    }

    #[test]
    fn test_keyboard_fires_through_dispatch() {
        let mut w = world();
        let mut keys = InputSnapshot::new();
        keys.set_key("d", true);

        tick(&mut w, 16.0, &keys, None, &mut Headless).unwrap();
        assert_eq!(w.mode, ControlMode::Keyboard);
        assert_eq!(w.projectiles.len(), 1);
    }

    #[test]
    fn test_mode_is_sticky() {
        let mut w = world();
        let touch = TouchSample {
            points: vec![Vec2::new(10.0, 10.0)],
        };
        tick(&mut w, 16.0, &InputSnapshot::new(), Some(&touch), &mut Headless).unwrap();
        assert_eq!(w.mode, ControlMode::Touch);

        // No input this tick: mode unchanged
        tick(&mut w, 32.0, &InputSnapshot::new(), None, &mut Headless).unwrap();
        assert_eq!(w.mode, ControlMode::Touch);

        let mut keys = InputSnapshot::new();
        keys.set_key("ArrowUp", true);
        tick(&mut w, 48.0, &keys, None, &mut Headless).unwrap();
        assert_eq!(w.mode, ControlMode::Keyboard);
    }

    #[test]
    fn test_game_over_freezes_the_world() {
        let mut w = world();
        w.ship.health = 0.0;
        w.obstacles.push(obstacle_at(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0)));
        let destroyed_before = w.destroyed;

        let mut keys = InputSnapshot::new();
        keys.set_key("ArrowRight", true);
        tick(&mut w, 500.0, &keys, None, &mut Headless).unwrap();

        assert_eq!(w.phase(), Phase::GameOver);
        assert_eq!(w.obstacles[0].pos, Vec2::new(100.0, 100.0));
        assert_eq!(w.destroyed, destroyed_before);
        assert!(w.projectiles.is_empty());
    }

    #[test]
    fn test_enter_restarts_after_game_over() {
        let mut w = world();
        w.ship.health = 0.0;
        w.destroyed = 77;

        let mut keys = InputSnapshot::new();
        keys.set_key("Enter", true);
        tick(&mut w, 500.0, &keys, None, &mut Headless).unwrap();

        assert_eq!(w.phase(), Phase::Running);
        assert_eq!(w.destroyed, 0);
        assert_eq!(w.ship.center(), VIEWPORT / 2.0);
    }

    #[test]
    fn test_three_finger_touch_restarts() {
        let mut w = world();
        w.ship.health = 0.0;
        let gesture = TouchSample {
            points: vec![Vec2::ZERO, Vec2::ONE, Vec2::new(5.0, 5.0)],
        };
        tick(&mut w, 500.0, &InputSnapshot::new(), Some(&gesture), &mut Headless).unwrap();
        assert_eq!(w.phase(), Phase::Running);
    }

    #[test]
    fn test_destroyed_count_is_monotonic() {
        let mut w = world();
        let mut last = 0;
        for i in 1..=20 {
            let now = i as f64 * 16.0;
            // Keep feeding obstacles into the ship's box
            w.obstacles
                .push(obstacle_at(w.ship.pos + Vec2::splat(2.0), Vec2::ZERO));
            w.ship.health = 1.0; // keep it running
            tick(&mut w, now, &InputSnapshot::new(), None, &mut Headless).unwrap();
            assert!(w.destroyed >= last);
            last = w.destroyed;
        }
    }

    #[test]
    fn test_faded_wreckage_is_pruned() {
        let mut w = world();
        let mut wreck = obstacle_at(Vec2::new(50.0, 50.0), Vec2::ZERO);
        wreck.mark_shot(0.0);
        w.wreckage.push(wreck);

        tick(&mut w, 1000.0, &InputSnapshot::new(), None, &mut Headless).unwrap();
        assert_eq!(w.wreckage.len(), 1);

        // Keep the refill batch away from the sweeps so no new wreckage appears
        w.obstacles.clear();
        tick(&mut w, 2500.0, &InputSnapshot::new(), None, &mut Headless).unwrap();
        assert!(w.wreckage.is_empty());
    }

    #[test]
    fn test_render_phase_runs_even_when_dead() {
        #[derive(Default)]
        struct Probe {
            ships: u32,
            overlays: u32,
            cleared: u32,
        }
        impl RenderVisitor for Probe {
            fn begin(&mut self, _now: f64, _viewport: Vec2) {
                self.cleared += 1;
            }
            fn ship(&mut self, _: &crate::sim::Ship) {
                self.ships += 1;
            }
            fn overlay(&mut self, hud: &Hud) {
                assert_eq!(hud.phase, Phase::GameOver);
                self.overlays += 1;
            }
        }

        let mut w = world();
        w.ship.health = 0.0;
        let mut probe = Probe::default();
        tick(&mut w, 16.0, &InputSnapshot::new(), None, &mut probe).unwrap();
        assert_eq!((probe.cleared, probe.ships, probe.overlays), (1, 1, 1));
    }
}
