//! Canvas Arcade - a small collection of browser arcade games
//!
//! Core modules:
//! - `game`: Lifecycle controller, game state, scoring rules, input queue
//! - `sim`: Deterministic per-game simulations (Snake)
//! - `renderer`: Backend-neutral draw lists and the canvas 2D renderer
//! - `platform`: Browser/native abstractions (frame timing, storage, keys)
//! - `persistence`: Versioned JSON blobs on top of key-value storage
//! - `highscores`: Per-game high score bookkeeping
//! - `audio` / `effects`: Fire-and-forget feedback collaborators

pub mod audio;
pub mod config;
pub mod effects;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use config::{ConfigError, GameConfig};
pub use game::{Collaborators, GameController, GameNotice, GameState, Intent, RunStatus};
pub use highscores::HighScoreStore;
pub use settings::Settings;
pub use sim::{Board, Direction, SnakeSim, SnakeState};

/// Game configuration constants
pub mod consts {
    /// Default size of one grid cell, in playfield units (pixels)
    pub const GRID_SIZE: i32 = 20;

    /// Default playfield dimensions
    pub const DEFAULT_WIDTH: i32 = 600;
    pub const DEFAULT_HEIGHT: i32 = 400;
    pub const DEFAULT_BACKGROUND: &str = "#1a1a2e";
    pub const DEFAULT_TARGET_FPS: u32 = 60;

    /// Points awarded per food item
    pub const FOOD_REWARD: u64 = 10;
    /// Every this many cumulative points the snake speeds up one level
    pub const POINTS_PER_LEVEL: u64 = 50;

    /// Step interval at level 1 (milliseconds)
    pub const BASE_MOVE_INTERVAL: f64 = 120.0;
    /// Interval reduction per level (milliseconds)
    pub const MOVE_INTERVAL_STEP: f64 = 10.0;
    /// Fastest allowed step interval (milliseconds)
    pub const MIN_MOVE_INTERVAL: f64 = 50.0;

    /// Snake length at spawn
    pub const INITIAL_LENGTH: usize = 3;
    /// Column of the head at spawn (clamped to the board)
    pub const INITIAL_HEAD_COLUMN: i32 = 5;

    /// Largest board, in cells, a configuration may describe
    pub const MAX_CELLS: usize = 1 << 20;

    /// Random attempts before food placement falls back to a free-cell scan
    pub const FOOD_PLACEMENT_ATTEMPTS: u32 = 256;

    /// Pending intents kept between ticks
    pub const INPUT_QUEUE_CAPACITY: usize = 16;

    /// Identity used to key Snake's persisted high score
    pub const SNAKE_GAME_ID: &str = "snake";
}
