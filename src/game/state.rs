//! Run status and the per-game state record

use serde::{Deserialize, Serialize};

/// Where the lifecycle controller currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Constructed or reset, waiting for `start`
    Idle,
    /// Ticks advance the simulation
    Running,
    /// Ticks arrive but the simulation is frozen
    Paused,
    /// Run ended (stop or game over); `reset` returns to idle
    Stopped,
}

/// Score and status owned by the lifecycle controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub running: bool,
    pub paused: bool,
    pub score: u64,
    pub high_score: u64,
    pub level: u32,
}

impl GameState {
    pub fn new(high_score: u64) -> Self {
        Self {
            running: false,
            paused: false,
            score: 0,
            high_score,
            level: 1,
        }
    }

    /// Add points, keeping the high score at or above the score
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.high_score = self.high_score.max(self.score);
    }

    /// Raise the level; lower values are ignored so the level never drops mid-run
    pub fn raise_level(&mut self, level: u32) {
        self.level = self.level.max(level);
    }

    /// Clear per-run values (high score survives)
    pub fn clear_run(&mut self) {
        self.score = 0;
        self.level = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_score_tracks_score() {
        let mut state = GameState::new(30);
        state.add_score(10);
        assert_eq!(state.high_score, 30);
        state.add_score(30);
        assert_eq!(state.score, 40);
        assert_eq!(state.high_score, 40);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut state = GameState::new(0);
        state.raise_level(3);
        state.raise_level(2);
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_clear_run_keeps_high_score() {
        let mut state = GameState::new(0);
        state.add_score(70);
        state.raise_level(2);
        state.clear_run();
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.high_score, 70);
    }
}
