//! Scoring and speed progression rules

use crate::consts::*;

/// Level reached after accumulating `points` in a run (level 1 at zero)
pub fn level_for_points(points: u64) -> u32 {
    1 + (points / POINTS_PER_LEVEL) as u32
}

/// Step interval for a level: one fixed decrement per level, never below the floor
pub fn move_interval_for_level(level: u32) -> f64 {
    let steps = level.saturating_sub(1) as f64;
    (BASE_MOVE_INTERVAL - steps * MOVE_INTERVAL_STEP).max(MIN_MOVE_INTERVAL)
}
