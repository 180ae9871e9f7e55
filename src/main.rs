//! Drift Strike entry point
//!
//! Handles platform-specific initialization and runs the frame loop. The
//! web build owns the canvas and input listeners and drives the simulation
//! from requestAnimationFrame; the native build runs a short headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use drift_strike::Settings;
    use drift_strike::render::CanvasRenderer;
    use drift_strike::sim::{InputSnapshot, TouchSample, World, tick};
    use glam::Vec2;

    /// Everything the frame loop touches
    struct Game {
        world: World,
        renderer: CanvasRenderer,
        keys: InputSnapshot,
        touch: Option<TouchSample>,
        /// Set on a contract violation; stops the loop
        failed: bool,
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Drift Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let viewport = size_canvas(&canvas);
        let ctx = canvas
            .get_context("2d")
            .expect("no 2d context")
            .expect("no 2d context")
            .dyn_into::<web_sys::CanvasRenderingContext2d>()
            .expect("not a 2d context");

        let settings = Settings::load();
        let seed = settings
            .fixed_seed
            .unwrap_or_else(|| js_sys::Date::now() as u64);
        let now = window.performance().expect("no performance").now();

        let game = Rc::new(RefCell::new(Game {
            world: World::new(viewport, seed, now),
            renderer: CanvasRenderer::new(ctx, &settings),
            keys: InputSnapshot::new(),
            touch: None,
            failed: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_resize_handler(&canvas, game.clone());
        request_animation_frame(game);

        log::info!("Drift Strike running!");
    }

    /// Match the backing store to the CSS size and return the viewport.
    fn size_canvas(canvas: &HtmlCanvasElement) -> Vec2 {
        let w = canvas.client_width().max(1) as u32;
        let h = canvas.client_height().max(1) as u32;
        canvas.set_width(w);
        canvas.set_height(h);
        Vec2::new(w as f32, h as f32)
    }

    /// Translate the active touch points into canvas coordinates.
    fn touch_sample(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<TouchSample> {
        let rect = canvas.get_bounding_client_rect();
        let touches = event.touches();
        let mut points = Vec::with_capacity(touches.length() as usize);
        for i in 0..touches.length() {
            if let Some(touch) = touches.get(i) {
                points.push(Vec2::new(
                    touch.client_x() as f32 - rect.left() as f32,
                    touch.client_y() as f32 - rect.top() as f32,
                ));
            }
        }
        if points.is_empty() {
            None
        } else {
            Some(TouchSample { points })
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard state tracking
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if key.starts_with("Arrow") {
                    event.prevent_default();
                }
                game.borrow_mut().keys.set_key(&key, true);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.set_key(&event.key(), false);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch tracking: keep the latest sample while fingers are down
        for event_name in ["touchstart", "touchmove", "touchend", "touchcancel"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().touch = touch_sample(&canvas_clone, &event);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let viewport = size_canvas(&canvas);
            game.borrow_mut().world.resize(viewport);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            if let Err(e) = tick(&mut g.world, time, &g.keys, g.touch.as_ref(), &mut g.renderer) {
                log::error!("simulation contract violation, halting: {}", e);
                g.failed = true;
            }
        }

        if !game.borrow().failed {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: drive the full loop with synthetic frames and scripted
/// input, logging an entity census as it goes.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use drift_strike::Settings;
    use drift_strike::sim::{Census, InputSnapshot, RenderVisitor, World, tick};
    use glam::Vec2;

    env_logger::init();
    log::info!("Drift Strike (native) starting headless demo...");

    struct Headless;
    impl RenderVisitor for Headless {}

    let settings = Settings::load();
    let seed = settings.fixed_seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    });
    log::info!("seed: {}", seed);

    let mut world = World::new(Vec2::new(800.0, 600.0), seed, 0.0);
    let mut keys = InputSnapshot::new();
    keys.set_key("w", true);

    let frame_ms = 1000.0 / 60.0;
    for frame in 1..=600u32 {
        // Sweep back and forth so the ship stays on screen
        let steer_right = (frame / 60) % 2 == 0;
        keys.set_key("ArrowRight", steer_right);
        keys.set_key("ArrowLeft", !steer_right);

        let now = frame as f64 * frame_ms;
        if let Err(e) = tick(&mut world, now, &keys, None, &mut Headless) {
            log::error!("simulation contract violation: {}", e);
            return;
        }

        if frame % 120 == 0 {
            let mut census = Census::default();
            world.inspect(&mut census);
            log::info!(
                "t={:.1}s {:?} destroyed={} hull={:.2}",
                now / 1000.0,
                census,
                world.destroyed,
                world.ship.health
            );
        }
    }

    println!(
        "demo finished: {} destroyed, hull at {:.0}%",
        world.destroyed,
        world.ship.health * 100.0
    );
}
