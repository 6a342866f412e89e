//! Rendering module
//!
//! Frames are first turned into a backend-neutral draw list
//! ([`scene::build_draw_list`]); the canvas backend then replays it on a 2D
//! context. The core only knows the [`RenderSink`] contract.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use thiserror::Error;

use crate::config::GameConfig;
use crate::game::GameState;

pub use scene::{Color, DrawCommand, DrawOptions, build_draw_list};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering context is not available")]
    ContextUnavailable,
    #[error("render backend error: {0}")]
    Backend(String),
}

/// Everything a render sink may read for one frame
pub struct RenderFrame<'a, M> {
    pub model: &'a M,
    pub state: &'a GameState,
    pub config: &'a GameConfig,
    /// Time since the previous rendered frame (milliseconds)
    pub delta_ms: f64,
}

/// Consumes snapshots; never mutates them
pub trait RenderSink<M> {
    fn draw(&mut self, frame: &RenderFrame<'_, M>) -> Result<(), RenderError>;
}

/// Sink that draws nothing (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl<M> RenderSink<M> for NullRenderer {
    fn draw(&mut self, _frame: &RenderFrame<'_, M>) -> Result<(), RenderError> {
        Ok(())
    }
}
