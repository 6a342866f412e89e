//! Game lifecycle
//!
//! The controller owns the [`GameState`], drives a pluggable
//! [`Simulation`](crate::sim::Simulation) from frame ticks, and forwards
//! scoring and game-over events to persistence, audio, and particles.

pub mod controller;
pub mod input;
pub mod scoring;
pub mod state;

pub use controller::{Collaborators, GameController, GameNotice};
pub use input::{InputQueue, Intent};
pub use state::{GameState, RunStatus};
