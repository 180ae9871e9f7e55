//! Canvas2D painter
//!
//! Render-visitor implementation over a `CanvasRenderingContext2d`. Entities
//! are flat filled rects; destroyed obstacles pick up their fade alpha from
//! the frame timestamp latched in `begin`.

use glam::Vec2;
use web_sys::CanvasRenderingContext2d;

use super::{
    HEALTH_BAR_HEIGHT, css_color, obstacle_color, palette, restart_hint, status_line,
};
use crate::Settings;
use crate::sim::state::{ControlMode, Hud, Phase};
use crate::sim::{Obstacle, Projectile, RenderVisitor, Ship};

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    /// Frame timestamp latched by `begin` (ms)
    now: f64,
    viewport: Vec2,
    /// Skip the health bar and score readout when off
    show_hud: bool,
    /// Extra downward shift for game-over text in touch mode (notch clearance)
    touch_safe_offset: f32,
}

impl CanvasRenderer {
    pub fn new(ctx: CanvasRenderingContext2d, settings: &Settings) -> Self {
        Self {
            ctx,
            now: 0.0,
            viewport: Vec2::ZERO,
            show_hud: settings.show_hud,
            touch_safe_offset: settings.touch_safe_offset,
        }
    }

    fn fill_rect(&self, pos: Vec2, size: Vec2, rgb: u32) {
        self.ctx.set_fill_style_str(&css_color(rgb));
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_text(&self, text: &str, pos: Vec2, rgb: u32) {
        self.ctx.set_fill_style_str(&css_color(rgb));
        let _ = self.ctx.fill_text(text, pos.x as f64, pos.y as f64);
    }
}

impl RenderVisitor for CanvasRenderer {
    fn begin(&mut self, now: f64, viewport: Vec2) {
        self.now = now;
        self.viewport = viewport;
        self.ctx.set_global_alpha(1.0);
        self.fill_rect(Vec2::ZERO, viewport, palette::BACKGROUND);
    }

    fn ship(&mut self, ship: &Ship) {
        self.fill_rect(ship.pos, ship.size, palette::SHIP);
    }

    fn projectile(&mut self, projectile: &Projectile) {
        self.fill_rect(projectile.pos, projectile.size, projectile.color);
    }

    fn obstacle(&mut self, obstacle: &Obstacle) {
        self.ctx
            .set_global_alpha(obstacle.fade_alpha(self.now) as f64);
        self.fill_rect(obstacle.pos, obstacle.size, obstacle_color(obstacle));
        self.ctx.set_global_alpha(1.0);
    }

    fn overlay(&mut self, hud: &Hud) {
        let w = self.viewport.x;

        if self.show_hud {
            // Full-width damage track with the proportional hull bar on top
            self.fill_rect(
                Vec2::ZERO,
                Vec2::new(w, HEALTH_BAR_HEIGHT),
                palette::HEALTH_TRACK,
            );
            self.fill_rect(
                Vec2::ZERO,
                Vec2::new(w * hud.health, HEALTH_BAR_HEIGHT),
                palette::HEALTH_FILL,
            );

            self.ctx.set_font("16px monospace");
            self.ctx.set_text_align("left");
            self.fill_text(
                &status_line(hud),
                Vec2::new(10.0, HEALTH_BAR_HEIGHT + 22.0),
                palette::TEXT,
            );
        }

        if hud.phase == Phase::GameOver {
            let offset = if hud.mode == ControlMode::Touch {
                self.touch_safe_offset
            } else {
                0.0
            };
            let center = Vec2::new(w / 2.0, self.viewport.y / 2.0 + offset);
            self.ctx.set_text_align("center");
            self.ctx.set_font("32px monospace");
            self.fill_text("GAME OVER", center, palette::TEXT);
            self.ctx.set_font("16px monospace");
            self.fill_text(
                restart_hint(hud.mode),
                center + Vec2::new(0.0, 28.0),
                palette::TEXT,
            );
        }
    }
}
