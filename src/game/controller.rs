//! Lifecycle controller
//!
//! A small state machine over run status:
//!
//! ```text
//! Idle --start--> Running <--pause--> Paused
//!   ^                |                  |
//!   |              stop / game over   stop
//!   |                v                  |
//!   +----reset---- Stopped <------------+
//! ```
//!
//! Every transition is total: calling one from a state where it makes no
//! sense is a logged no-op. Collaborator failures (render, audio, storage)
//! are logged and never stop the loop.

use glam::Vec2;

use super::input::{InputQueue, Intent};
use super::state::{GameState, RunStatus};
use crate::audio::{AudioSink, SoundEffect};
use crate::config::GameConfig;
use crate::effects::{Burst, ParticleSink};
use crate::highscores::HighScoreStore;
use crate::platform::{FrameHandle, TimingSource};
use crate::renderer::{RenderFrame, RenderSink};
use crate::sim::{GameOverReason, SimEvent, Simulation};

/// Application-level notifications the controller's owner can observe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameNotice {
    LevelUp {
        level: u32,
    },
    GameOver {
        reason: GameOverReason,
        score: u64,
        high_score: u64,
        new_high_score: bool,
    },
}

/// External collaborators injected into a controller
pub struct Collaborators<M> {
    pub timer: Box<dyn TimingSource>,
    pub renderer: Box<dyn RenderSink<M>>,
    pub audio: Box<dyn AudioSink>,
    pub particles: Box<dyn ParticleSink>,
    pub scores: HighScoreStore,
}

/// Drives one game identity's runs
pub struct GameController<S: Simulation> {
    game_id: String,
    config: GameConfig,
    sim: S,
    state: GameState,
    /// Distinguishes Stopped from Idle while not running
    ended: bool,
    last_time: f64,
    frame: Option<FrameHandle>,
    input: InputQueue,
    events: Vec<SimEvent>,
    notices: Vec<GameNotice>,
    timer: Box<dyn TimingSource>,
    renderer: Box<dyn RenderSink<S::Model>>,
    audio: Box<dyn AudioSink>,
    particles: Box<dyn ParticleSink>,
    scores: HighScoreStore,
}

impl<S: Simulation> GameController<S> {
    pub fn new(
        game_id: impl Into<String>,
        config: GameConfig,
        sim: S,
        collaborators: Collaborators<S::Model>,
    ) -> Self {
        let game_id = game_id.into();
        let high_score = collaborators.scores.get_high_score(&game_id);
        log::info!("{}: created, stored high score {}", game_id, high_score);

        Self {
            game_id,
            config,
            sim,
            state: GameState::new(high_score),
            ended: false,
            last_time: 0.0,
            frame: None,
            input: InputQueue::default(),
            events: Vec::new(),
            notices: Vec::new(),
            timer: collaborators.timer,
            renderer: collaborators.renderer,
            audio: collaborators.audio,
            particles: collaborators.particles,
            scores: collaborators.scores,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn simulation(&self) -> &S {
        &self.sim
    }

    pub fn status(&self) -> RunStatus {
        match (self.state.running, self.state.paused, self.ended) {
            (true, true, _) => RunStatus::Paused,
            (true, false, _) => RunStatus::Running,
            (false, _, true) => RunStatus::Stopped,
            (false, _, false) => RunStatus::Idle,
        }
    }

    /// Whether a frame subscription is outstanding
    pub fn has_pending_frame(&self) -> bool {
        self.frame.is_some()
    }

    /// Drain notifications raised since the last call
    pub fn take_notices(&mut self) -> Vec<GameNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Begin (or resume after reset) a run. No-op while running.
    pub fn start(&mut self) {
        if self.state.running {
            return;
        }
        if self.ended || self.sim.is_over() {
            log::debug!("{}: start ignored, reset first", self.game_id);
            return;
        }
        self.state.running = true;
        self.state.paused = false;
        self.last_time = self.timer.now();
        self.request_frame();
        self.play(SoundEffect::Start);
        log::info!("{}: started", self.game_id);
    }

    /// Toggle pause. Only meaningful while running.
    pub fn pause(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.paused = !self.state.paused;
        self.play(SoundEffect::Pause);
        log::info!(
            "{}: {}",
            self.game_id,
            if self.state.paused { "paused" } else { "resumed" }
        );
        if self.state.paused {
            // Ticks skip drawing while paused; put the overlay up now
            self.render(0.0);
        }
    }

    /// End the run and cancel the frame subscription. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.timer.cancel_frame(handle);
        }
        if self.state.running {
            log::info!("{}: stopped", self.game_id);
            self.ended = true;
        }
        self.state.running = false;
        self.state.paused = false;
    }

    /// Stop, clear the run, and rebuild the simulation. Leaves the game idle.
    pub fn reset(&mut self) {
        self.stop();
        self.state.clear_run();
        self.sim.init();
        self.input.clear();
        self.events.clear();
        self.ended = false;
        log::info!("{}: reset", self.game_id);
    }

    /// Hand an intent to the game.
    ///
    /// While running, intents are queued and applied at the next tick.
    /// Otherwise lifecycle intents apply at once and turns are dropped.
    pub fn submit(&mut self, intent: Intent) -> bool {
        if self.state.running {
            return self.input.push(intent);
        }
        match intent {
            Intent::Start => self.start(),
            Intent::Reset => self.reset(),
            Intent::TogglePause | Intent::Turn(_) => return false,
        }
        true
    }

    /// One frame from the timing source
    pub fn tick(&mut self, now: f64) {
        if !self.state.running {
            return;
        }
        // The frame that triggered this tick has been delivered
        self.frame = None;

        self.drain_input();

        if self.state.running && !self.state.paused {
            let dt = now - self.last_time;
            self.sim.update(dt, &mut self.events);
            self.apply_events();
            // Also draws the frame that ended the run
            self.render(dt);
        }

        self.last_time = now;
        if self.state.running {
            self.request_frame();
        }
    }

    /// Draw the current model without advancing anything.
    ///
    /// Lets the host keep effects animating after the loop has stopped.
    pub fn redraw(&mut self, delta_ms: f64) {
        self.render(delta_ms);
    }

    fn request_frame(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(self.timer.request_frame());
        }
    }

    fn drain_input(&mut self) {
        // Snapshot first: a reset clears the queue mid-drain
        let intents: Vec<Intent> = std::iter::from_fn(|| self.input.pop()).collect();
        for intent in intents {
            match intent {
                Intent::TogglePause => self.pause(),
                Intent::Reset => self.reset(),
                Intent::Start => self.start(),
                Intent::Turn(_) if !self.state.running || self.state.paused => {
                    log::debug!("{}: turn ignored, run not active", self.game_id);
                }
                Intent::Turn(_) => self.sim.handle_input(intent),
            }
        }
    }

    fn apply_events(&mut self) {
        let mut events = std::mem::take(&mut self.events);
        let mut eaten_at = None;
        for event in events.drain(..) {
            match event {
                SimEvent::Scored { points, at } => {
                    self.state.add_score(points);
                    self.play(SoundEffect::Eat);
                    let at = self.cell_center(at);
                    self.particles.emit(at, Burst::Food);
                    eaten_at = Some(at);
                }
                SimEvent::LevelUp { level, move_interval } => {
                    self.state.raise_level(level);
                    log::info!(
                        "{}: level {} (step every {}ms)",
                        self.game_id,
                        level,
                        move_interval
                    );
                    self.play(SoundEffect::LevelUp);
                    let at = eaten_at.unwrap_or_else(|| self.board_center());
                    self.particles.emit(at, Burst::LevelUp);
                    self.notices.push(GameNotice::LevelUp { level });
                }
                SimEvent::GameOver { reason, at } => {
                    let at = self.cell_center(at);
                    self.finish(reason, at);
                }
            }
        }
        self.events = events;
    }

    /// Finalize a run: persist the high score, notify, and stop the loop
    fn finish(&mut self, reason: GameOverReason, at: Vec2) {
        let score = self.state.score;
        let new_high_score = self.scores.set_high_score_if_higher(&self.game_id, score);
        let stored = self.scores.get_high_score(&self.game_id);
        self.state.high_score = self.state.high_score.max(stored).max(score);

        log::info!(
            "{}: game over ({:?}), score {}, best {}",
            self.game_id,
            reason,
            score,
            self.state.high_score
        );

        self.particles.emit(at, Burst::Death);
        self.play(if new_high_score {
            SoundEffect::HighScore
        } else {
            SoundEffect::GameOver
        });
        self.notices.push(GameNotice::GameOver {
            reason,
            score,
            high_score: self.state.high_score,
            new_high_score,
        });
        self.stop();
    }

    fn render(&mut self, delta_ms: f64) {
        let frame = RenderFrame {
            model: self.sim.model(),
            state: &self.state,
            config: &self.config,
            delta_ms,
        };
        if let Err(e) = self.renderer.draw(&frame) {
            log::warn!("{}: render failed: {}", self.game_id, e);
        }
    }

    fn play(&mut self, effect: SoundEffect) {
        if let Err(e) = self.audio.play(effect) {
            log::warn!("{}: sound {:?} failed: {}", self.game_id, effect, e);
        }
    }

    fn cell_center(&self, cell: glam::IVec2) -> Vec2 {
        cell.as_vec2() + Vec2::splat(self.config.grid_size() as f32 / 2.0)
    }

    fn board_center(&self) -> Vec2 {
        Vec2::new(self.config.width() as f32, self.config.height() as f32) / 2.0
    }
}

impl<S: Simulation> Drop for GameController<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.timer.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::IVec2;
    use proptest::prelude::*;

    use super::*;
    use crate::audio::AudioError;
    use crate::consts::*;
    use crate::platform::{ManualClock, MemoryStorage};
    use crate::renderer::RenderError;
    use crate::sim::{Board, Collision, Direction, SnakeSim, SnakeState};

    const FRAME: f64 = 16.0;

    #[derive(Clone, Default)]
    struct Recorder {
        frames: Rc<RefCell<Vec<(Vec<IVec2>, GameState)>>>,
        sounds: Rc<RefCell<Vec<SoundEffect>>>,
        bursts: Rc<RefCell<Vec<(Vec2, Burst)>>>,
        fail_render: bool,
        fail_audio: bool,
    }

    impl RenderSink<SnakeState> for Recorder {
        fn draw(&mut self, frame: &RenderFrame<'_, SnakeState>) -> Result<(), RenderError> {
            if self.fail_render {
                return Err(RenderError::ContextUnavailable);
            }
            let segments = frame.model.segments.iter().copied().collect();
            self.frames.borrow_mut().push((segments, *frame.state));
            Ok(())
        }
    }

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) -> Result<(), AudioError> {
            if self.fail_audio {
                return Err(AudioError::Unavailable);
            }
            self.sounds.borrow_mut().push(effect);
            Ok(())
        }
    }

    impl ParticleSink for Recorder {
        fn emit(&mut self, at: Vec2, burst: Burst) {
            self.bursts.borrow_mut().push((at, burst));
        }
    }

    fn default_board() -> Board {
        Board::try_from(&GameConfig::default()).unwrap()
    }

    fn sim_from(board: Board, segments: Vec<IVec2>, direction: Direction, food: IVec2) -> SnakeSim {
        let state = SnakeState::from_parts(&board, segments, direction, Some(food)).unwrap();
        SnakeSim::with_state(board, 3, state).unwrap()
    }

    struct Harness {
        game: GameController<SnakeSim>,
        clock: ManualClock,
        storage: MemoryStorage,
        recorder: Recorder,
    }

    impl Harness {
        fn with_sim(sim: SnakeSim, storage: MemoryStorage, recorder: Recorder) -> Self {
            let clock = ManualClock::new();
            clock.set(1000.0);
            let collaborators = Collaborators {
                timer: Box::new(clock.clone()),
                renderer: Box::new(recorder.clone()),
                audio: Box::new(recorder.clone()),
                particles: Box::new(recorder.clone()),
                scores: HighScoreStore::new(Box::new(storage.clone())),
            };
            let game = GameController::new(SNAKE_GAME_ID, GameConfig::default(), sim, collaborators);
            Self {
                game,
                clock,
                storage,
                recorder,
            }
        }

        fn new() -> Self {
            Self::with_sim(SnakeSim::new(default_board(), 11), MemoryStorage::new(), Recorder::default())
        }

        /// Snake from the default spawn heading right with food far away
        fn quiet() -> Self {
            Self::quiet_with(MemoryStorage::new(), Recorder::default())
        }

        fn quiet_with(storage: MemoryStorage, recorder: Recorder) -> Self {
            let sim = sim_from(
                default_board(),
                vec![
                    IVec2::new(100, 200),
                    IVec2::new(80, 200),
                    IVec2::new(60, 200),
                ],
                Direction::Right,
                IVec2::new(0, 0),
            );
            Self::with_sim(sim, storage, recorder)
        }

        /// Advance the clock and deliver a frame if one is pending
        fn frame(&mut self, ms: f64) -> bool {
            self.clock.advance(ms);
            match self.clock.deliver() {
                Some(now) => {
                    self.game.tick(now);
                    true
                }
                None => false,
            }
        }

        fn head(&self) -> IVec2 {
            self.game.simulation().state().head()
        }
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut h = Harness::new();
        assert_eq!(h.game.status(), RunStatus::Idle);
        assert!(!h.game.has_pending_frame());

        h.game.start();
        assert_eq!(h.game.status(), RunStatus::Running);
        assert_eq!(h.clock.pending_frames(), 1);

        h.game.pause();
        assert_eq!(h.game.status(), RunStatus::Paused);
        h.game.pause();
        assert_eq!(h.game.status(), RunStatus::Running);

        h.game.stop();
        assert_eq!(h.game.status(), RunStatus::Stopped);
        assert_eq!(h.clock.pending_frames(), 0);

        h.game.reset();
        assert_eq!(h.game.status(), RunStatus::Idle);
        h.game.start();
        assert_eq!(h.game.status(), RunStatus::Running);
    }

    #[test]
    fn test_transitions_are_total() {
        let mut h = Harness::new();
        // Everything from idle
        h.game.pause();
        h.game.stop();
        h.game.stop();
        assert_eq!(h.game.status(), RunStatus::Idle);

        h.game.start();
        h.game.start();
        assert_eq!(h.clock.pending_frames(), 1);

        h.game.reset();
        h.game.reset();
        assert_eq!(h.game.status(), RunStatus::Idle);
        assert_eq!(h.clock.pending_frames(), 0);

        // Ticks while not running do nothing
        h.game.tick(5000.0);
        assert_eq!(h.clock.pending_frames(), 0);
    }

    #[test]
    fn test_stop_cancels_delivery() {
        let mut h = Harness::quiet();
        h.game.start();
        assert!(h.frame(FRAME));
        h.game.stop();
        assert!(!h.frame(FRAME));
        assert!(!h.frame(FRAME));
    }

    #[test]
    fn test_tick_steps_and_renders() {
        let recorder = Recorder::default();
        let mut h = Harness::quiet_with(MemoryStorage::new(), recorder.clone());
        h.game.start();
        for _ in 0..8 {
            h.frame(FRAME);
        }
        // 128ms elapsed -> one step
        assert_eq!(h.head(), IVec2::new(120, 200));
        assert_eq!(recorder.frames.borrow().len(), 8);
        assert_eq!(h.clock.pending_frames(), 1);
    }

    #[test]
    fn test_paused_ticks_freeze_everything() {
        let recorder = Recorder::default();
        let mut h = Harness::quiet_with(MemoryStorage::new(), recorder.clone());
        h.game.start();
        h.frame(100.0);
        h.game.pause();

        let model = h.game.simulation().state().clone();
        let timer = h.game.simulation().move_timer();
        let state = *h.game.state();
        let rendered = recorder.frames.borrow().len();

        for _ in 0..50 {
            assert!(h.frame(FRAME));
        }
        assert_eq!(h.game.simulation().state(), &model);
        assert_eq!(h.game.simulation().move_timer(), timer);
        assert_eq!(h.game.state(), &state);
        assert_eq!(recorder.frames.borrow().len(), rendered);
    }

    #[test]
    fn test_paused_time_is_discarded() {
        let mut h = Harness::quiet();
        h.game.start();
        h.frame(100.0);
        h.game.pause();
        h.frame(10_000.0);
        h.game.pause();

        // Only 100 + 16 ms count toward the move timer: no step yet
        h.frame(FRAME);
        assert_eq!(h.head(), IVec2::new(100, 200));
        assert_eq!(h.game.simulation().move_timer(), 116.0);
        h.frame(FRAME);
        assert_eq!(h.head(), IVec2::new(120, 200));
    }

    #[test]
    fn test_queued_intents_apply_in_order_at_tick() {
        let mut h = Harness::quiet();
        h.game.start();
        assert!(h.game.submit(Intent::Turn(Direction::Up)));
        // Queued, not yet applied
        assert_eq!(h.game.simulation().state().direction.pending(), None);

        h.frame(120.0);
        assert_eq!(h.head(), IVec2::new(100, 180));

        // Pause then a turn: the turn is dropped while paused
        h.game.submit(Intent::TogglePause);
        h.game.submit(Intent::Turn(Direction::Left));
        h.frame(FRAME);
        assert_eq!(h.game.status(), RunStatus::Paused);
        assert_eq!(h.game.simulation().state().direction.pending(), None);
    }

    #[test]
    fn test_reversal_intent_never_reaches_step() {
        let mut h = Harness::quiet();
        h.game.start();
        h.game.submit(Intent::Turn(Direction::Left));
        h.frame(120.0);
        assert_eq!(h.head(), IVec2::new(120, 200));
    }

    #[test]
    fn test_submit_when_not_running() {
        let mut h = Harness::quiet();
        assert!(!h.game.submit(Intent::Turn(Direction::Up)));
        assert!(!h.game.submit(Intent::TogglePause));
        assert!(h.game.submit(Intent::Start));
        assert_eq!(h.game.status(), RunStatus::Running);
    }

    #[test]
    fn test_eating_updates_score_and_effects() {
        let recorder = Recorder::default();
        let sim = sim_from(
            default_board(),
            vec![
                IVec2::new(100, 200),
                IVec2::new(80, 200),
                IVec2::new(60, 200),
            ],
            Direction::Right,
            IVec2::new(120, 200),
        );
        let mut h = Harness::with_sim(
            sim,
            MemoryStorage::new(),
            recorder.clone(),
        );
        h.game.start();
        h.frame(120.0);

        assert_eq!(h.game.state().score, 10);
        assert_eq!(h.game.state().high_score, 10);
        assert_eq!(h.game.simulation().state().len(), 4);
        assert!(recorder.sounds.borrow().contains(&SoundEffect::Eat));
        assert_eq!(
            recorder.bursts.borrow().as_slice(),
            &[(Vec2::new(130.0, 210.0), Burst::Food)]
        );
    }

    #[test]
    fn test_level_up_through_controller() {
        let recorder = Recorder::default();
        let mut h = Harness::quiet_with(MemoryStorage::new(), recorder.clone());
        h.game.start();

        let mut notices = Vec::new();
        for _ in 0..5 {
            let ahead = h.head() + IVec2::new(20, 0);
            h.game.sim.state_mut().food = Some(ahead);
            let interval = h.game.simulation().move_interval();
            h.frame(interval);
            notices.extend(h.game.take_notices());
        }

        assert_eq!(h.game.state().score, 50);
        assert_eq!(h.game.state().level, 2);
        assert_eq!(h.game.simulation().move_interval(), 110.0);
        assert_eq!(notices, vec![GameNotice::LevelUp { level: 2 }]);
        assert!(recorder.sounds.borrow().contains(&SoundEffect::LevelUp));
        // The level-up burst goes off where the food was eaten
        let bursts = recorder.bursts.borrow();
        let (eaten_at, _) = bursts[bursts.len() - 2];
        assert_eq!(bursts.last(), Some(&(eaten_at, Burst::LevelUp)));
        assert_eq!(
            bursts.iter().filter(|(_, b)| *b == Burst::LevelUp).count(),
            1
        );
    }

    #[test]
    fn test_game_over_notifies_once_and_persists() {
        let storage = MemoryStorage::new();
        let recorder = Recorder::default();
        let sim = sim_from(
            default_board(),
            vec![IVec2::new(20, 200), IVec2::new(40, 200), IVec2::new(60, 200)],
            Direction::Left,
            IVec2::new(0, 200),
        );
        let mut h = Harness::with_sim(
            sim,
            storage.clone(),
            recorder.clone(),
        );
        h.game.start();

        // Eat at x=0, then hit the left wall at x=-20
        h.frame(120.0);
        assert_eq!(h.game.state().score, 10);
        h.frame(120.0);

        let notices = h.game.take_notices();
        assert_eq!(
            notices,
            vec![GameNotice::GameOver {
                reason: GameOverReason::Collision(Collision::Wall),
                score: 10,
                high_score: 10,
                new_high_score: true,
            }]
        );
        assert_eq!(h.game.status(), RunStatus::Stopped);
        assert_eq!(h.clock.pending_frames(), 0);
        assert_eq!(
            HighScoreStore::new(Box::new(storage)).get_high_score(SNAKE_GAME_ID),
            10
        );
        assert!(recorder.sounds.borrow().contains(&SoundEffect::HighScore));
        assert_eq!(recorder.bursts.borrow().last().unwrap().1, Burst::Death);

        // Nothing more is delivered or reported
        let model = h.game.simulation().state().clone();
        assert!(!h.frame(120.0));
        h.game.tick(99_999.0);
        assert!(h.game.take_notices().is_empty());
        assert_eq!(h.game.simulation().state(), &model);

        // A dead run cannot be restarted without a reset
        h.game.start();
        assert_eq!(h.game.status(), RunStatus::Stopped);
    }

    #[test]
    fn test_reset_clears_run_but_keeps_high_score() {
        let mut h = Harness::quiet();
        h.game.start();
        h.game.state.add_score(30);
        h.game.state.raise_level(2);
        h.frame(500.0);

        h.game.reset();
        assert_eq!(h.game.state().score, 0);
        assert_eq!(h.game.state().level, 1);
        assert_eq!(h.game.state().high_score, 30);
        assert_eq!(h.game.simulation().move_interval(), BASE_MOVE_INTERVAL);
        assert_eq!(h.game.simulation().state().len(), INITIAL_LENGTH);
        assert!(h.game.simulation().state().food.is_some());
        assert_eq!(h.clock.pending_frames(), 0);
    }

    #[test]
    fn test_reset_intent_then_start() {
        let mut h = Harness::quiet();
        h.game.start();
        h.frame(240.0);
        h.game.submit(Intent::Reset);
        h.game.submit(Intent::Start);
        h.frame(FRAME);
        assert_eq!(h.game.status(), RunStatus::Running);
        assert_eq!(h.game.state().score, 0);
        assert_eq!(h.clock.pending_frames(), 1);
    }

    #[test]
    fn test_turn_queued_after_reset_is_dropped() {
        let mut h = Harness::quiet();
        h.game.start();
        h.frame(FRAME);
        h.game.submit(Intent::Reset);
        h.game.submit(Intent::Turn(Direction::Up));
        h.frame(FRAME);

        assert_eq!(h.game.status(), RunStatus::Idle);
        assert_eq!(h.game.simulation().state().direction.pending(), None);

        // The next run starts heading right as spawned
        h.game.start();
        h.frame(BASE_MOVE_INTERVAL);
        let spawn = SnakeState::spawn(&default_board()).head();
        assert_eq!(h.head(), spawn + IVec2::new(20, 0));
    }

    #[test]
    fn test_filling_the_board_ends_the_run() {
        let storage = MemoryStorage::new();
        let recorder = Recorder::default();
        let sim = sim_from(
            Board::new(80, 20, 20).unwrap(),
            vec![IVec2::new(40, 0), IVec2::new(20, 0), IVec2::new(0, 0)],
            Direction::Right,
            IVec2::new(60, 0),
        );
        let mut h = Harness::with_sim(sim, storage.clone(), recorder.clone());
        h.game.start();
        h.frame(BASE_MOVE_INTERVAL);

        assert_eq!(
            h.game.take_notices(),
            vec![GameNotice::GameOver {
                reason: GameOverReason::BoardFull,
                score: 10,
                high_score: 10,
                new_high_score: true,
            }]
        );
        assert_eq!(h.game.state().score, 10);
        assert_eq!(h.game.status(), RunStatus::Stopped);
        assert_eq!(h.clock.pending_frames(), 0);
        assert!(!h.frame(FRAME));
        assert_eq!(
            HighScoreStore::new(Box::new(storage)).get_high_score(SNAKE_GAME_ID),
            10
        );
        let bursts = recorder.bursts.borrow();
        assert_eq!(
            bursts.iter().map(|(_, b)| *b).collect::<Vec<_>>(),
            vec![Burst::Food, Burst::Death]
        );
    }

    #[test]
    fn test_pausing_draws_the_overlay_once() {
        let recorder = Recorder::default();
        let mut h = Harness::quiet_with(MemoryStorage::new(), recorder.clone());
        h.game.start();
        h.frame(FRAME);
        let before = recorder.frames.borrow().len();

        h.game.pause();
        assert_eq!(recorder.frames.borrow().len(), before + 1);
        assert!(recorder.frames.borrow().last().unwrap().1.paused);

        for _ in 0..10 {
            h.frame(FRAME);
        }
        assert_eq!(recorder.frames.borrow().len(), before + 1);

        // Resuming does not draw until the next tick
        h.game.pause();
        assert_eq!(recorder.frames.borrow().len(), before + 1);
        h.frame(FRAME);
        assert_eq!(recorder.frames.borrow().len(), before + 2);
    }

    #[test]
    fn test_redraw_after_game_over_leaves_model_alone() {
        let recorder = Recorder::default();
        let sim = sim_from(
            default_board(),
            vec![IVec2::new(0, 200), IVec2::new(20, 200), IVec2::new(40, 200)],
            Direction::Left,
            IVec2::new(300, 0),
        );
        let mut h = Harness::with_sim(sim, MemoryStorage::new(), recorder.clone());
        h.game.start();
        h.frame(BASE_MOVE_INTERVAL);
        assert_eq!(h.game.status(), RunStatus::Stopped);

        let model = h.game.simulation().state().clone();
        let state = *h.game.state();
        let drawn = recorder.frames.borrow().len();
        for _ in 0..3 {
            h.game.redraw(FRAME);
        }
        assert_eq!(recorder.frames.borrow().len(), drawn + 3);
        assert_eq!(h.game.simulation().state(), &model);
        assert_eq!(h.game.state(), &state);
        assert_eq!(h.clock.pending_frames(), 0);
        assert_eq!(h.game.take_notices().len(), 1);
    }

    #[test]
    fn test_collaborator_failures_do_not_halt_loop() {
        let recorder = Recorder {
            fail_render: true,
            fail_audio: true,
            ..Recorder::default()
        };
        let mut h = Harness::quiet_with(MemoryStorage::new(), recorder);
        h.game.start();
        for _ in 0..16 {
            assert!(h.frame(FRAME));
        }
        assert_eq!(h.head(), IVec2::new(140, 200));
        assert_eq!(h.game.status(), RunStatus::Running);
    }

    #[test]
    fn test_stored_high_score_loaded_at_construction() {
        let storage = MemoryStorage::new();
        HighScoreStore::new(Box::new(storage.clone())).set_high_score_if_higher(SNAKE_GAME_ID, 120);
        let h = Harness::quiet_with(storage, Recorder::default());
        assert_eq!(h.game.state().high_score, 120);
    }

    #[test]
    fn test_drop_cancels_pending_frame() {
        let mut h = Harness::quiet();
        h.game.start();
        let clock = h.clock.clone();
        drop(h);
        assert_eq!(clock.pending_frames(), 0);
    }

    /// Play one run on a fresh controller sharing `storage`; returns the final score
    fn play_run(storage: &MemoryStorage, food_ahead: usize) -> u64 {
        let mut h = Harness::quiet_with(storage.clone(), Recorder::default());
        h.game.start();
        let mut eaten = 0;
        while h.game.status() == RunStatus::Running {
            // Feed the next cell until the quota is used, then run into the wall
            let food = if eaten < food_ahead {
                eaten += 1;
                h.head() + IVec2::new(20, 0)
            } else {
                IVec2::new(0, 0)
            };
            h.game.sim.state_mut().food = Some(food);
            let interval = h.game.simulation().move_interval();
            h.frame(interval);
        }
        h.game.state().score
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn stored_high_score_is_max_of_runs(foods in prop::collection::vec(0usize..6, 1..5)) {
            let storage = MemoryStorage::new();
            let mut best = 0;
            for food in foods {
                let score = play_run(&storage, food);
                prop_assert_eq!(score, food as u64 * FOOD_REWARD);
                best = best.max(score);
                let stored = HighScoreStore::new(Box::new(storage.clone())).get_high_score(SNAKE_GAME_ID);
                prop_assert_eq!(stored, best);
            }
        }
    }
}
