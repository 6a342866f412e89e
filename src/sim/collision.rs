//! Collision checks for grid movement
//!
//! Pure functions of position state: the same head, body, and board always
//! give the same verdict.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::grid::Board;

/// What the head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Wall,
    Body,
}

/// True if the position lies outside the playfield
pub fn hits_wall(pos: IVec2, board: &Board) -> bool {
    !board.contains(pos)
}

/// True if the position coincides with any segment
pub fn hits_body<'a>(pos: IVec2, segments: impl IntoIterator<Item = &'a IVec2>) -> bool {
    segments.into_iter().any(|&segment| segment == pos)
}

/// Check a prospective head cell against walls first, then the body.
///
/// Every current segment counts, the tail included: the tail only moves
/// after the new head has been accepted.
pub fn check_head<'a>(
    head: IVec2,
    segments: impl IntoIterator<Item = &'a IVec2>,
    board: &Board,
) -> Option<Collision> {
    if hits_wall(head, board) {
        Some(Collision::Wall)
    } else if hits_body(head, segments) {
        Some(Collision::Body)
    } else {
        None
    }
}
