//! Astrolane entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent};

    use astrolane::assets::{AssetError, AssetHandle};
    use astrolane::bridge::{Banner, HudFrame, Presenter, SceneView};
    use astrolane::consts::*;
    use astrolane::sim::TickInput;
    use astrolane::{Driver, HighScore, Settings};

    // Scene graph and model loading live in the page's JS
    #[wasm_bindgen(inline_js = "
        export function render_scene(json) {
            if (window.renderScene) {
                window.renderScene(JSON.parse(json));
            }
        }

        export function load_model(path) {
            if (window.loadModel) {
                return window.loadModel(path);
            }
            return Promise.reject('no model loader on page');
        }
    ")]
    extern "C" {
        fn render_scene(json: &str);
        fn load_model(path: &str) -> js_sys::Promise;
    }

    const PLAYER_MODEL: &str = "assets/models/spaceship/scene.gltf";
    const OBSTACLE_MODEL: &str = "assets/models/asteroid/scene.gltf";

    /// Game instance holding all state
    struct Game {
        driver: Driver,
        input: TickInput,
        last_time: f64,
    }

    /// Writes HUD strings into the DOM
    struct DomPresenter {
        document: web_sys::Document,
        last_mode: &'static str,
    }

    impl DomPresenter {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn show(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }
    }

    impl Presenter for DomPresenter {
        fn hud(&mut self, frame: &HudFrame) {
            self.set_text("distance", &frame.distance);
            self.set_text("hearts", &frame.hearts);
            self.set_text("shield", &frame.shield);
            self.set_text("level", &frame.level);
            self.set_text("progress", &format!("{}%", frame.progress));
            self.set_text("highscore", &frame.high_score.to_string());
            if let Some(skin) = frame.skin {
                self.set_text("skin", skin);
            }
            if let Some(error) = &frame.asset_error {
                self.set_text("asset-error", error);
            }

            if frame.mode != self.last_mode {
                self.show("loading", frame.mode == "loading");
                self.show("menu", frame.mode == "menu");
                self.show("selection", frame.mode == "selection");
                self.show("hud", matches!(frame.mode, "playing" | "paused"));
                self.show("pauseMenu", frame.mode == "paused");
                self.show("gameover", frame.mode == "gameover");
                self.last_mode = frame.mode;
            }
        }

        fn banner(&mut self, banner: &Banner) {
            self.set_text("banner", &banner.text());
            if let Some(el) = self.document.get_element_by_id("banner") {
                // Restart the CSS fade
                let _ = el.class_list().remove_1("show");
                let _ = el.class_list().add_1("show");
            }
        }

        fn render(&mut self, view: &SceneView) {
            match serde_json::to_string(view) {
                Ok(json) => render_scene(&json),
                Err(e) => log::warn!("Scene encode failed: {}", e),
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Astrolane starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let high_score = HighScore::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let mut driver = Driver::new(&settings, seed, high_score);

        let player = driver.state.assets.request(PLAYER_MODEL);
        let obstacle = driver.state.assets.request(OBSTACLE_MODEL);
        driver.models.player = Some(player);
        driver.models.obstacle = Some(obstacle);

        let game = Rc::new(RefCell::new(Game {
            driver,
            input: TickInput::default(),
            last_time: 0.0,
        }));

        start_load(game.clone(), player, PLAYER_MODEL);
        start_load(game.clone(), obstacle, OBSTACLE_MODEL);

        setup_input_handlers(game.clone());

        let presenter = Rc::new(RefCell::new(DomPresenter {
            document,
            last_mode: "",
        }));
        request_animation_frame(game, presenter);

        log::info!("Astrolane running!");
    }

    /// Kick off a model load; success and failure both settle the gate
    fn start_load(game: Rc<RefCell<Game>>, handle: AssetHandle, path: &'static str) {
        let promise = load_model(path);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = wasm_bindgen_futures::JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(|e| AssetError::LoadFailed {
                    path: path.to_string(),
                    reason: e.as_string().unwrap_or_else(|| format!("{:?}", e)),
                });
            if let Err(e) = game.borrow_mut().driver.state.assets.resolve(handle, outcome) {
                log::warn!("{}", e);
            }
        });
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        for (event, down) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.set_key(&event.code(), down);
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (event, down) in [("mousedown", true), ("mouseup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.set_mouse_button(event.button(), down);
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, presenter: Rc<RefCell<DomPresenter>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, presenter, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, presenter: Rc<RefCell<DomPresenter>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let input = g.input;
            g.driver.frame(dt, &input, &mut *presenter.borrow_mut());
        }

        request_animation_frame(game, presenter);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use astrolane::bridge::LogPresenter;
    use astrolane::consts::*;
    use astrolane::sim::autopilot;
    use astrolane::{Driver, HighScore, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Astrolane (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` for web version");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    });
    let mut driver = Driver::new(&settings, seed, HighScore::load());

    // Models are optional on native: present files load, missing ones fall back
    for (path, is_player) in [
        ("assets/models/spaceship/scene.gltf", true),
        ("assets/models/asteroid/scene.gltf", false),
    ] {
        let handle = driver.state.assets.request(path);
        let outcome = if std::path::Path::new(path).exists() {
            Ok(())
        } else {
            Err(astrolane::AssetError::LoadFailed {
                path: path.to_string(),
                reason: "not found".to_string(),
            })
        };
        if let Err(e) = driver.state.assets.resolve(handle, outcome) {
            log::warn!("{}", e);
        }
        if is_player {
            driver.models.player = Some(handle);
        } else {
            driver.models.obstacle = Some(handle);
        }
    }

    let mut presenter = LogPresenter::default();
    let demo_ticks = TICKS_PER_SECOND * 120;
    for _ in 0..demo_ticks {
        let input = autopilot(&driver.state);
        driver.frame(SIM_DT, &input, &mut presenter);
    }

    log::info!(
        "Demo finished: score {}, level {}, best {}",
        driver.state.run.score,
        driver.state.run.level,
        driver.high_score.best
    );
}
