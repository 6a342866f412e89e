//! Deterministic simulation module
//!
//! Each game implements [`Simulation`] and is injected into the lifecycle
//! controller. Simulations must be pure and deterministic:
//! - Time only arrives through `update`
//! - Seeded RNG only
//! - No rendering, audio, or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod grid;
pub mod state;
pub mod tick;

use glam::IVec2;

use crate::game::Intent;

pub use collision::{Collision, check_head};
pub use grid::{Board, Direction, DirectionBuffer};
pub use state::{Life, ModelError, SnakeState};
pub use tick::SnakeSim;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    Collision(Collision),
    /// The snake filled every cell
    BoardFull,
}

/// Something the controller has to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    /// Points earned at a position (playfield units)
    Scored { points: u64, at: IVec2 },
    /// Speed progression reached a new level
    LevelUp { level: u32, move_interval: f64 },
    /// Terminal transition; emitted at most once per run
    GameOver { reason: GameOverReason, at: IVec2 },
}

/// Capability contract every game in the collection implements
pub trait Simulation {
    /// Entity model handed to the render sink
    type Model;

    /// (Re)build the entity model at default speed
    fn init(&mut self);

    /// Advance by `dt` milliseconds, appending anything notable to `events`
    fn update(&mut self, dt: f64, events: &mut Vec<SimEvent>);

    /// Apply a game-specific intent (lifecycle intents never reach here)
    fn handle_input(&mut self, intent: Intent);

    /// Current entity model
    fn model(&self) -> &Self::Model;

    /// True once the run has reached its terminal state
    fn is_over(&self) -> bool;
}
