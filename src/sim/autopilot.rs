//! Greedy steering for demo runs
//!
//! Looks one step ahead: never reverses, never picks a move that collides,
//! and prefers moves that keep enough open space for the body before
//! heading for the food.

use std::collections::{HashSet, VecDeque};

use glam::IVec2;

use super::collision::check_head;
use super::grid::{Board, Direction};
use super::state::SnakeState;

/// Pick the next heading, or `None` when every legal move collides
pub fn choose_direction(state: &SnakeState, board: &Board) -> Option<Direction> {
    if !state.is_alive() || state.is_empty() {
        return None;
    }
    let current = state.direction.current();
    let head = state.head();

    let mut best: Option<(Direction, (bool, i32, bool))> = None;
    for direction in candidates(current) {
        let next = head + direction.unit() * board.grid();
        if check_head(next, &state.segments, board).is_some() {
            continue;
        }
        let cramped = open_area(next, state, board) < state.len();
        let distance = state
            .food
            .map(|food| manhattan(next, food) / board.grid())
            .unwrap_or(0);
        // Lower is better; ties keep the current heading
        let key = (cramped, distance, direction != current);
        if best.is_none_or(|(_, best_key)| key < best_key) {
            best = Some((direction, key));
        }
    }
    best.map(|(direction, _)| direction)
}

/// Current heading first, then its two perpendiculars
fn candidates(current: Direction) -> impl Iterator<Item = Direction> {
    Direction::ALL
        .into_iter()
        .filter(move |&d| d != current.opposite())
}

fn manhattan(a: IVec2, b: IVec2) -> i32 {
    let d = (a - b).abs();
    d.x + d.y
}

/// Free cells reachable from `start`, counting at most `state.len()`
fn open_area(start: IVec2, state: &SnakeState, board: &Board) -> usize {
    let limit = state.len();
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        if seen.len() >= limit {
            break;
        }
        for direction in Direction::ALL {
            let next = cell + direction.unit() * board.grid();
            if board.contains(next) && !state.occupies(next) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen.len().min(limit)
}
