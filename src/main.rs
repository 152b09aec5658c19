//! Shape Burst entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use shape_burst::renderer::{RenderState, VertexBatch};
    use shape_burst::settings::{Rules, Settings};
    use shape_burst::sim::{FrameStatus, Viewport, World, tick};

    /// Toy instance holding all state
    struct Game {
        world: World,
        batch: VertexBatch,
        render_state: Option<RenderState>,
        /// Whether an animation frame is currently scheduled
        looping: bool,
        last_status: FrameStatus,
    }

    impl Game {
        fn new(settings: &Settings, viewport: Viewport, seed: u64) -> Self {
            Self {
                world: World::from_settings(settings, viewport, seed),
                batch: VertexBatch::new(settings.quality.circle_segments()),
                render_state: None,
                looping: false,
                last_status: FrameStatus::Stopped,
            }
        }

        /// Simulate and draw one frame
        fn frame(&mut self) -> FrameStatus {
            let status = tick(&mut self.world, &mut self.batch);
            if status != FrameStatus::Stopped {
                self.render();
            }
            status
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.batch) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update counter and message elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.last_status == FrameStatus::Stopped {
                return;
            }
            if let Some(el) = document.get_element_by_id("counter") {
                el.set_text_content(Some(&self.world.counter_text()));
            }
            if let FrameStatus::Won(message) = &self.last_status {
                if let Some(el) = document.get_element_by_id("message") {
                    el.set_text_content(Some(message));
                    let _ = el.set_attribute("class", "");
                }
                if let Some(btn) = document.get_element_by_id("start") {
                    btn.set_text_content(Some("Start"));
                }
            }
        }
    }

    fn canvas_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
        (canvas.client_width() as f32, canvas.client_height() as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Shape Burst starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Physics runs in CSS pixels; the surface uses device pixels
        let dpr = window.device_pixel_ratio();
        let (client_w, client_h) = canvas_size(&canvas);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed_or(js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(
            &settings,
            Viewport::new(client_w, client_h),
            seed,
        )));
        log::info!("World initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_canvas_click(&canvas, game.clone());
        setup_resize(canvas.clone(), game.clone());
        setup_clear_button(game.clone());
        setup_mode_button(game.clone());
        setup_start_button(game.clone());

        match settings.rules {
            Rules::FreePlay => {
                game.borrow_mut()
                    .world
                    .add_random_shapes(settings.initial_shapes);
                start_loop(game);
            }
            Rules::Goal => log::info!("Waiting for start"),
        }

        log::info!("Shape Burst running!");
    }

    fn setup_canvas_click(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let rect = canvas_clone.get_bounding_client_rect();
            let x = event.client_x() as f32 - rect.left() as f32;
            let y = event.client_y() as f32 - rect.top() as f32;
            game.borrow_mut().world.on_pointer_click(x, y);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let (w, h) = canvas_size(&canvas);
            let (pw, ph) = ((w as f64 * dpr) as u32, (h as f64 * dpr) as u32);
            canvas.set_width(pw);
            canvas.set_height(ph);

            let mut g = game.borrow_mut();
            g.world.set_viewport(w, h);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(pw, ph);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_clear_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("clear") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().world.clear();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mode_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("mode") {
            btn.set_text_content(Some(game.borrow().world.mode.label()));
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mode = game.borrow_mut().world.toggle_mode();
                btn_clone.set_text_content(Some(mode.label()));
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Start/Stop button; only meaningful under goal rules
    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(btn) = document.get_element_by_id("start") {
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let running = game.borrow_mut().world.toggle_run();
                btn_clone.set_text_content(Some(if running { "Stop" } else { "Start" }));
                if !running {
                    return;
                }
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("message"))
                {
                    let _ = el.set_attribute("class", "hidden");
                }
                start_loop(game.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Schedule the frame loop unless it is already running
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.looping {
                return;
            }
            g.looping = true;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let status = g.frame();
            let keep_going = status.keep_going();
            g.last_status = status;
            g.update_hud();
            if !keep_going {
                g.looping = false;
            }
            keep_going
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use shape_burst::renderer::VertexBatch;
    use shape_burst::settings::{Rules, Settings};
    use shape_burst::sim::{FrameStatus, Mode, Viewport, World, tick};

    env_logger::init();
    log::info!("Shape Burst (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let settings = Settings::load();
    let seed = settings.seed_or(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    );
    let mut world = World::from_settings(&settings, Viewport::new(1280.0, 720.0), seed);
    let mut batch = VertexBatch::new(settings.quality.circle_segments());

    match settings.rules {
        Rules::FreePlay => world.add_random_shapes(settings.initial_shapes),
        Rules::Goal => world.start(),
    }

    // A few scripted clicks: pop what is under the first shapes, then add some
    let targets: Vec<_> = world.shapes().take(3).map(|s| s.pos).collect();
    for target in targets {
        world.on_pointer_click(target.x, target.y);
    }
    world.set_mode(Mode::Add);
    for i in 0..5 {
        world.on_pointer_click(200.0 + i as f32 * 150.0, 100.0);
    }

    for frame in 0..600 {
        match tick(&mut world, &mut batch) {
            FrameStatus::Running { shapes } => {
                if frame % 120 == 0 {
                    log::info!(
                        "Frame {}: {} shapes, {} particles, {} vertices",
                        frame,
                        shapes,
                        world.particle_count(),
                        batch.vertices.len()
                    );
                }
            }
            FrameStatus::Won(message) => {
                println!("{}", message);
                break;
            }
            FrameStatus::Stopped => break,
        }
    }

    println!(
        "Simulated {} shapes, {} particles remaining",
        world.shape_count(),
        world.particle_count()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
