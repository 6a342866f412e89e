//! Canvas Arcade entry point
//!
//! In the browser this wires the Snake controller to requestAnimationFrame,
//! the canvas, Web Audio, and LocalStorage. Natively it plays one headless
//! autopilot run and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_host {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use canvas_arcade::audio::AudioManager;
    use canvas_arcade::consts::SNAKE_GAME_ID;
    use canvas_arcade::effects::ParticleField;
    use canvas_arcade::platform::{
        AnimationFrameTimer, KeyAction, LocalStorage, TimingSource, action_for_key,
    };
    use canvas_arcade::renderer::CanvasRenderer;
    use canvas_arcade::sim::autopilot::choose_direction;
    use canvas_arcade::{
        Board, Collaborators, GameConfig, GameController, GameNotice, HighScoreStore, Intent,
        RunStatus, Settings, SnakeSim,
    };

    /// How long death particles keep animating once a run has ended
    const AFTERGLOW_MS: f64 = 700.0;

    /// Everything the page callbacks share
    struct App {
        game: GameController<SnakeSim>,
        audio: Rc<RefCell<AudioManager>>,
        particles: Rc<RefCell<ParticleField>>,
        settings: Settings,
        document: Document,
        /// Frames for effects-only redraws after the loop has stopped
        glow: AnimationFrameTimer,
        glow_last: f64,
        glow_until: f64,
        autopilot: bool,
        audio_unlocked: bool,
    }

    impl App {
        /// One animation frame
        fn frame(&mut self, now: f64) {
            self.steer();
            self.game.tick(now);
            for notice in self.game.take_notices() {
                if matches!(notice, GameNotice::GameOver { .. }) {
                    self.glow_last = now;
                    self.glow_until = now + AFTERGLOW_MS;
                    self.glow.request_frame();
                }
                self.show_notice(notice);
            }
            self.update_hud();
        }

        /// Redraw a stopped game so its last particles can fade out
        fn afterglow(&mut self, now: f64) {
            if self.game.status() != RunStatus::Stopped || now > self.glow_until {
                return;
            }
            self.game.redraw(now - self.glow_last);
            self.glow_last = now;
            self.glow.request_frame();
        }

        fn steer(&mut self) {
            if !self.autopilot || self.game.status() != RunStatus::Running {
                return;
            }
            let sim = self.game.simulation();
            if let Some(direction) = choose_direction(sim.state(), sim.board()) {
                self.game.submit(Intent::Turn(direction));
            }
        }

        fn key(&mut self, action: KeyAction) {
            self.unlock_audio();
            match action {
                KeyAction::Game(intent) => {
                    self.game.submit(intent);
                }
                KeyAction::Restart => {
                    self.particles.borrow_mut().clear();
                    self.game.reset();
                    self.game.start();
                }
                KeyAction::ToggleAutopilot => {
                    self.autopilot = !self.autopilot;
                    log::info!("Autopilot: {}", self.autopilot);
                    if self.autopilot && self.game.status() != RunStatus::Running {
                        self.game.reset();
                        self.game.start();
                    }
                }
                KeyAction::ToggleSound => {
                    self.settings.sound = !self.settings.sound;
                    log::info!("Sound: {}", self.settings.sound);
                    self.apply_settings();
                }
                KeyAction::ToggleParticles => {
                    self.settings.particles = !self.settings.particles;
                    log::info!("Particles: {}", self.settings.particles);
                    self.apply_settings();
                }
            }
            self.update_hud();
        }

        /// Push changed settings to the collaborators and remember them
        fn apply_settings(&mut self) {
            self.audio.borrow_mut().apply_settings(&self.settings);
            self.particles
                .borrow_mut()
                .set_limit(self.settings.max_particles());
            if let Err(e) = self.settings.save(&mut LocalStorage::new()) {
                log::warn!("Failed to save settings: {}", e);
            }
        }

        /// Browsers only let audio start after a user gesture
        fn unlock_audio(&mut self) {
            if !self.audio_unlocked {
                self.audio_unlocked = true;
                self.audio.borrow().preload();
            }
        }

        fn auto_pause(&mut self, why: &str) {
            if self.game.status() == RunStatus::Running {
                self.game.pause();
                log::info!("Auto-paused ({})", why);
                self.update_hud();
            }
            if self.settings.mute_on_blur {
                self.audio.borrow_mut().set_muted(true);
            }
        }

        fn regain_focus(&mut self) {
            if self.settings.mute_on_blur {
                self.audio.borrow_mut().set_muted(false);
            }
        }

        fn show_notice(&self, notice: GameNotice) {
            match notice {
                GameNotice::LevelUp { level } => {
                    if let Some(el) = self.document.get_element_by_id("hud-level") {
                        let _ = el.set_attribute("class", "hud-item pop");
                    }
                    log::info!("Level {}", level);
                }
                GameNotice::GameOver {
                    score,
                    high_score,
                    new_high_score,
                    ..
                } => {
                    self.set_text("final-score", &score.to_string());
                    self.set_text("final-best", &high_score.to_string());
                    self.set_visible("new-high-score", new_high_score);
                    self.set_visible("game-over", true);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let state = self.game.state();
            let status = self.game.status();

            for (selector, value) in [
                ("#hud-score .hud-value", state.score.to_string()),
                ("#hud-best .hud-value", state.high_score.to_string()),
                ("#hud-level .hud-value", state.level.to_string()),
            ] {
                if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                    if el.text_content().as_deref() != Some(value.as_str()) {
                        el.set_text_content(Some(&value));
                    }
                }
            }

            self.set_visible("start-prompt", status == RunStatus::Idle);
            self.set_visible("pause-menu", status == RunStatus::Paused);
            self.set_visible("autopilot-badge", self.autopilot);
            if status != RunStatus::Stopped {
                self.set_visible("game-over", false);
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    fn js_error(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    /// Config comes from the canvas `data-config` attribute when present
    fn load_config(canvas: &HtmlCanvasElement) -> GameConfig {
        match canvas.get_attribute("data-config") {
            Some(json) => GameConfig::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring invalid data-config: {}", e);
                GameConfig::default()
            }),
            None => GameConfig::default(),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;
        log::info!("Canvas Arcade starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no #canvas element")?
            .dyn_into()?;

        let config = load_config(&canvas);
        let settings = Settings::load(&LocalStorage::new());
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);

        let particles = Rc::new(RefCell::new(ParticleField::new(
            seed,
            settings.max_particles(),
        )));
        let mut renderer = CanvasRenderer::new(
            &canvas,
            config.width() as u32,
            config.height() as u32,
            particles.clone(),
        )
        .map_err(js_error)?;
        renderer.options.show_grid = settings.show_grid;

        let audio = Rc::new(RefCell::new(AudioManager::new()));
        audio.borrow_mut().apply_settings(&settings);

        let timer = AnimationFrameTimer::new(window.clone());
        let frames = timer.clone();
        let glow = AnimationFrameTimer::new(window.clone());

        let board = Board::try_from(&config).map_err(js_error)?;
        let sim = SnakeSim::new(board, seed);
        let collaborators = Collaborators {
            timer: Box::new(timer),
            renderer: Box::new(renderer),
            audio: Box::new(audio.clone()),
            particles: Box::new(particles.clone()),
            scores: HighScoreStore::new(Box::new(LocalStorage::new())),
        };
        let game = GameController::new(SNAKE_GAME_ID, config, sim, collaborators);

        let app = Rc::new(RefCell::new(App {
            game,
            audio,
            particles,
            settings,
            document: document.clone(),
            glow: glow.clone(),
            glow_last: 0.0,
            glow_until: 0.0,
            autopilot: false,
            audio_unlocked: false,
        }));

        // Frames reach the app through a weak link so the timer never keeps it alive
        let weak = Rc::downgrade(&app);
        frames.set_target(Box::new(move |now| {
            if let Some(app) = weak.upgrade() {
                app.borrow_mut().frame(now);
            }
        }));
        let weak = Rc::downgrade(&app);
        glow.set_target(Box::new(move |now| {
            if let Some(app) = weak.upgrade() {
                app.borrow_mut().afterglow(now);
            }
        }));

        setup_keyboard(&window, app.clone())?;
        setup_auto_pause(&window, &document, app.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }
        app.borrow().update_hud();

        log::info!("Canvas Arcade ready, press Enter to start");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let Some(action) = action_for_key(&event.key()) else {
                return;
            };
            // Keep arrows and space from scrolling the page
            event.prevent_default();
            app.borrow_mut().key(action);
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(
        window: &web_sys::Window,
        document: &Document,
        app: Rc<RefCell<App>>,
    ) -> Result<(), JsValue> {
        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().auto_pause("tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().regain_focus();
            });
            window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = web_host::run() {
        web_sys::console::error_2(&"Canvas Arcade failed to start:".into(), &e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use canvas_arcade::audio::SilentAudio;
    use canvas_arcade::consts::SNAKE_GAME_ID;
    use canvas_arcade::effects::NoParticles;
    use canvas_arcade::platform::{ManualClock, MemoryStorage};
    use canvas_arcade::renderer::NullRenderer;
    use canvas_arcade::sim::autopilot::choose_direction;
    use canvas_arcade::{
        Board, Collaborators, ConfigError, GameConfig, GameController, GameNotice,
        HighScoreStore, Intent, RunStatus, SnakeSim,
    };

    /// Ten minutes of play at the configured frame rate
    const MAX_SECONDS: u64 = 600;

    /// Play one autopilot run; returns the final score
    pub fn run(config: GameConfig, seed: u64) -> Result<u64, ConfigError> {
        let clock = ManualClock::new();
        let frame_ms = config.frame_duration_ms();
        let max_frames = MAX_SECONDS * u64::from(config.target_fps());

        let collaborators = Collaborators {
            timer: Box::new(clock.clone()),
            renderer: Box::new(NullRenderer),
            audio: Box::new(SilentAudio),
            particles: Box::new(NoParticles),
            scores: HighScoreStore::new(Box::new(MemoryStorage::new())),
        };
        let sim = SnakeSim::new(Board::try_from(&config)?, seed);
        let mut game = GameController::new(SNAKE_GAME_ID, config, sim, collaborators);
        game.start();

        let mut frames = 0u64;
        while game.status() == RunStatus::Running {
            if frames >= max_frames {
                log::warn!("Frame cap reached, stopping");
                game.stop();
                break;
            }
            let sim = game.simulation();
            if let Some(direction) = choose_direction(sim.state(), sim.board()) {
                game.submit(Intent::Turn(direction));
            }

            clock.advance(frame_ms);
            let Some(now) = clock.deliver() else { break };
            game.tick(now);
            frames += 1;

            for notice in game.take_notices() {
                match notice {
                    GameNotice::LevelUp { level } => log::info!("Level {}", level),
                    GameNotice::GameOver { reason, score, .. } => {
                        log::info!("Game over after {} frames: {:?}, score {}", frames, reason, score)
                    }
                }
            }
        }

        let state = game.state();
        log::info!(
            "Final score {} (level {}, length {})",
            state.score,
            state.level,
            game.simulation().state().len()
        );
        Ok(state.score)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canvas Arcade (native) starting...");
    log::info!("The playable version runs in the browser; running a headless autopilot demo");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Seed: {}", seed);

    match headless::run(canvas_arcade::GameConfig::default(), seed) {
        Ok(score) => println!("{}", score),
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    }
}
