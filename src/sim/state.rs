//! Snake entity model
//!
//! Segments (head first) plus the single food item. Everything the renderer
//! draws for Snake lives here.

use std::collections::{HashSet, VecDeque};

use glam::IVec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::{Board, Direction, DirectionBuffer};
use crate::consts::*;

/// Reasons a hand-built entity model is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("the snake needs at least one segment")]
    Empty,
    #[error("segment {0} is outside the board")]
    OffBoard(IVec2),
    #[error("segment {0} is not on a grid cell")]
    Misaligned(IVec2),
    #[error("two segments share cell {0}")]
    Overlap(IVec2),
    #[error("food at {0} is not on a free grid cell")]
    BadFood(IVec2),
}

/// Whether the current run can still move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Life {
    Alive,
    Dead,
}

/// Complete Snake entity model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Grid-aligned segments, head at index 0
    pub segments: VecDeque<IVec2>,
    /// Food position; `None` only once the board is completely filled
    pub food: Option<IVec2>,
    /// Heading plus latched turn
    pub direction: DirectionBuffer,
    pub life: Life,
}

impl SnakeState {
    /// Spawn a fresh snake heading right, centered vertically.
    ///
    /// Food is not placed; call [`SnakeState::place_food`] afterwards.
    pub fn spawn(board: &Board) -> Self {
        let head_column = INITIAL_HEAD_COLUMN.min(board.columns() - 1);
        let row = board.rows() / 2;
        let segments = (0..INITIAL_LENGTH as i32)
            .map(|i| board.cell(head_column - i, row))
            .collect();

        Self {
            segments,
            food: None,
            direction: DirectionBuffer::new(Direction::Right),
            life: Life::Alive,
        }
    }

    /// Build a model from explicit parts (custom layouts, replays, tests)
    pub fn from_parts(
        board: &Board,
        segments: Vec<IVec2>,
        direction: Direction,
        food: Option<IVec2>,
    ) -> Result<Self, ModelError> {
        let state = Self {
            segments: segments.into(),
            food,
            direction: DirectionBuffer::new(direction),
            life: Life::Alive,
        };
        state.validate(board)?;
        Ok(state)
    }

    /// Check the model fits `board`: at least one segment, every segment
    /// a distinct in-bounds grid cell, food on a free grid cell
    pub fn validate(&self, board: &Board) -> Result<(), ModelError> {
        if self.segments.is_empty() {
            return Err(ModelError::Empty);
        }
        let mut seen = HashSet::with_capacity(self.segments.len());
        for &segment in &self.segments {
            if !board.contains(segment) {
                return Err(ModelError::OffBoard(segment));
            }
            if segment % board.grid() != IVec2::ZERO {
                return Err(ModelError::Misaligned(segment));
            }
            if !seen.insert(segment) {
                return Err(ModelError::Overlap(segment));
            }
        }
        if let Some(food) = self.food {
            let on_grid = board.contains(food) && food % board.grid() == IVec2::ZERO;
            if !on_grid || seen.contains(&food) {
                return Err(ModelError::BadFood(food));
            }
        }
        Ok(())
    }

    pub fn head(&self) -> IVec2 {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_alive(&self) -> bool {
        self.life == Life::Alive
    }

    pub fn occupies(&self, pos: IVec2) -> bool {
        self.segments.contains(&pos)
    }

    /// Move food to a uniformly random free cell.
    ///
    /// Rejection-samples a bounded number of times, then falls back to
    /// picking from the full list of free cells. Returns `None` (and clears
    /// the food) when the snake covers the whole board.
    pub fn place_food<R: Rng>(&mut self, board: &Board, rng: &mut R) -> Option<IVec2> {
        self.food = None;
        if self.segments.len() >= board.cell_count() {
            log::info!("Board is full, no room for food");
            return None;
        }

        for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
            let candidate = board.cell(
                rng.random_range(0..board.columns()),
                rng.random_range(0..board.rows()),
            );
            if !self.occupies(candidate) {
                self.food = Some(candidate);
                return self.food;
            }
        }

        let occupied: HashSet<IVec2> = self.segments.iter().copied().collect();
        let free: Vec<IVec2> = board.cells().filter(|c| !occupied.contains(c)).collect();
        log::debug!("Food placement fell back to scanning {} free cells", free.len());
        self.food = free.choose(rng).copied();
        self.food
    }
}
