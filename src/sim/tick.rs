//! Snake stepping
//!
//! Elapsed time accumulates into a move timer; every full move interval
//! performs exactly one grid step. Leftover time carries into the next
//! update, so uneven frame timing never loses or invents steps.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::check_head;
use super::grid::{Board, Direction};
use super::state::{Life, ModelError, SnakeState};
use super::{GameOverReason, SimEvent, Simulation};
use crate::consts::*;
use crate::game::Intent;
use crate::game::scoring::{level_for_points, move_interval_for_level};

/// Snake simulation: entity model plus timers and progression
#[derive(Debug, Clone)]
pub struct SnakeSim {
    board: Board,
    rng: Pcg32,
    state: SnakeState,
    move_timer: f64,
    move_interval: f64,
    points: u64,
    level: u32,
}

impl SnakeSim {
    /// Create a simulation with a freshly spawned snake
    pub fn new(board: Board, seed: u64) -> Self {
        let mut sim = Self {
            board,
            rng: Pcg32::seed_from_u64(seed),
            state: SnakeState::spawn(&board),
            move_timer: 0.0,
            move_interval: BASE_MOVE_INTERVAL,
            points: 0,
            level: 1,
        };
        sim.init();
        sim
    }

    /// Create a simulation around a prepared entity model, checked against `board`
    pub fn with_state(board: Board, seed: u64, state: SnakeState) -> Result<Self, ModelError> {
        state.validate(&board)?;
        Ok(Self {
            board,
            rng: Pcg32::seed_from_u64(seed),
            state,
            move_timer: 0.0,
            move_interval: BASE_MOVE_INTERVAL,
            points: 0,
            level: 1,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &SnakeState {
        &self.state
    }

    pub fn move_interval(&self) -> f64 {
        self.move_interval
    }

    pub fn move_timer(&self) -> f64 {
        self.move_timer
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut SnakeState {
        &mut self.state
    }

    /// Request a turn; reversals are refused here and never reach stepping
    pub fn turn(&mut self, direction: Direction) -> bool {
        if !self.state.is_alive() {
            return false;
        }
        self.state.direction.latch(direction)
    }

    /// One discrete grid step. Returns false once the run is over.
    fn step(&mut self, events: &mut Vec<SimEvent>) -> bool {
        let direction = self.state.direction.advance();
        let head = self.state.head() + direction.unit() * self.board.grid();

        if let Some(collision) = check_head(head, &self.state.segments, &self.board) {
            log::debug!("Collision {:?} at {:?}", collision, head);
            self.die(GameOverReason::Collision(collision), head, events);
            return false;
        }

        self.state.segments.push_front(head);

        if self.state.food != Some(head) {
            self.state.segments.pop_back();
            return true;
        }

        self.points += FOOD_REWARD;
        events.push(SimEvent::Scored {
            points: FOOD_REWARD,
            at: head,
        });

        let level = level_for_points(self.points);
        while self.level < level {
            self.level += 1;
            self.move_interval = move_interval_for_level(self.level);
            log::debug!(
                "Level {} reached, move interval now {}ms",
                self.level,
                self.move_interval
            );
            events.push(SimEvent::LevelUp {
                level: self.level,
                move_interval: self.move_interval,
            });
        }

        if self.state.place_food(&self.board, &mut self.rng).is_none() {
            self.die(GameOverReason::BoardFull, head, events);
            return false;
        }
        true
    }

    fn die(&mut self, reason: GameOverReason, at: glam::IVec2, events: &mut Vec<SimEvent>) {
        self.state.life = Life::Dead;
        self.move_timer = 0.0;
        events.push(SimEvent::GameOver { reason, at });
    }
}

impl Simulation for SnakeSim {
    type Model = SnakeState;

    fn init(&mut self) {
        self.state = SnakeState::spawn(&self.board);
        self.state.place_food(&self.board, &mut self.rng);
        self.move_timer = 0.0;
        self.move_interval = BASE_MOVE_INTERVAL;
        self.points = 0;
        self.level = 1;
    }

    fn update(&mut self, dt: f64, events: &mut Vec<SimEvent>) {
        if !self.state.is_alive() {
            return;
        }
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Ignoring invalid frame delta {}", dt);
            return;
        }

        self.move_timer += dt;
        while self.move_timer >= self.move_interval {
            self.move_timer -= self.move_interval;
            if !self.step(events) {
                break;
            }
        }
    }

    fn handle_input(&mut self, intent: Intent) {
        if let Intent::Turn(direction) = intent {
            self.turn(direction);
        }
    }

    fn model(&self) -> &SnakeState {
        &self.state
    }

    fn is_over(&self) -> bool {
        !self.state.is_alive()
    }
}
