//! Playfield configuration
//!
//! Validated once at construction and immutable afterwards. Invalid boards
//! are rejected, never clamped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Board;

/// Reasons a configuration is refused
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveDimension { name: &'static str, value: i32 },
    #[error("grid size must be positive, got {0}")]
    NonPositiveGrid(i32),
    #[error("{name} ({value}) is not a multiple of the grid size ({grid})")]
    Misaligned {
        name: &'static str,
        value: i32,
        grid: i32,
    },
    #[error("a {columns}x{rows} board cannot hold the starting snake and its food")]
    BoardTooSmall { columns: i32, rows: i32 },
    #[error("a {columns}x{rows} board exceeds the {max} cell limit")]
    BoardTooLarge { columns: i32, rows: i32, max: usize },
    #[error("target frame rate must be positive")]
    InvalidFrameRate,
    #[error("background color {0:?} is not a #rrggbb value")]
    InvalidColor(String),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Board dimensions and presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    width: i32,
    height: i32,
    grid_size: i32,
    background_color: String,
    target_fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            grid_size: GRID_SIZE,
            background_color: DEFAULT_BACKGROUND.to_string(),
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl GameConfig {
    /// Build a validated configuration with default presentation settings
    pub fn new(width: i32, height: i32, grid_size: i32) -> Result<Self, ConfigError> {
        Self {
            width,
            height,
            grid_size,
            ..Self::default()
        }
        .validated()
    }

    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        Board::new(self.width, self.height, self.grid_size)?;
        if self.target_fps == 0 {
            return Err(ConfigError::InvalidFrameRate);
        }
        if parse_hex_color(&self.background_color).is_none() {
            return Err(ConfigError::InvalidColor(self.background_color));
        }
        Ok(self)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn grid_size(&self) -> i32 {
        self.grid_size
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Number of grid columns
    pub fn columns(&self) -> i32 {
        self.width / self.grid_size
    }

    /// Number of grid rows
    pub fn rows(&self) -> i32 {
        self.height / self.grid_size
    }

    /// Duration of one frame at the target frame rate (milliseconds)
    pub fn frame_duration_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64
    }
}

/// Parse `#rrggbb` into its components
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}
