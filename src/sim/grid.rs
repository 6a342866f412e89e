//! Grid geometry: board bounds, headings, and the two-slot direction buffer

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GameConfig};
use crate::consts::{INITIAL_LENGTH, MAX_CELLS};

/// Playfield bounds in playfield units, snapped to a grid.
///
/// Only constructed through [`Board::new`], so every board has a positive,
/// aligned size with room for the starting snake and a bounded cell count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    grid: i32,
}

impl TryFrom<&GameConfig> for Board {
    type Error = ConfigError;

    fn try_from(config: &GameConfig) -> Result<Self, ConfigError> {
        Board::new(config.width(), config.height(), config.grid_size())
    }
}

impl Board {
    pub fn new(width: i32, height: i32, grid: i32) -> Result<Self, ConfigError> {
        if width <= 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "width",
                value: width,
            });
        }
        if height <= 0 {
            return Err(ConfigError::NonPositiveDimension {
                name: "height",
                value: height,
            });
        }
        if grid <= 0 {
            return Err(ConfigError::NonPositiveGrid(grid));
        }
        for (name, value) in [("width", width), ("height", height)] {
            if value % grid != 0 {
                return Err(ConfigError::Misaligned { name, value, grid });
            }
        }

        let board = Self {
            width,
            height,
            grid,
        };
        let (columns, rows) = (board.columns(), board.rows());
        // Room for the spawn row plus one free cell ahead of the head
        if columns < INITIAL_LENGTH as i32 + 1 {
            return Err(ConfigError::BoardTooSmall { columns, rows });
        }
        match (columns as usize).checked_mul(rows as usize) {
            Some(cells) if cells <= MAX_CELLS => Ok(board),
            _ => Err(ConfigError::BoardTooLarge {
                columns,
                rows,
                max: MAX_CELLS,
            }),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Cell edge length
    pub fn grid(&self) -> i32 {
        self.grid
    }

    pub fn columns(&self) -> i32 {
        self.width / self.grid
    }

    pub fn rows(&self) -> i32 {
        self.height / self.grid
    }

    /// Never overflows: `new` caps the product at `MAX_CELLS`
    pub fn cell_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Top-left corner of the cell at (column, row)
    pub fn cell(&self, column: i32, row: i32) -> IVec2 {
        IVec2::new(column * self.grid, row * self.grid)
    }

    /// Whether a position lies inside `[0, width) x [0, height)`
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Iterate every cell, row-major
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.rows()).flat_map(move |row| (0..self.columns()).map(move |col| self.cell(col, row)))
    }
}

/// Heading of the snake (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit vector in grid steps
    pub fn unit(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// Current heading plus the turn requested for the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionBuffer {
    current: Direction,
    pending: Option<Direction>,
}

impl DirectionBuffer {
    pub fn new(current: Direction) -> Self {
        Self {
            current,
            pending: None,
        }
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Latch a requested turn. Returns false (and leaves the buffer alone)
    /// when the turn would reverse the current heading.
    pub fn latch(&mut self, direction: Direction) -> bool {
        if direction == self.current.opposite() {
            log::debug!("Rejected reversal {:?} -> {:?}", self.current, direction);
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Adopt the pending turn (if any) and return the heading for this step
    pub fn advance(&mut self) -> Direction {
        if let Some(next) = self.pending.take() {
            self.current = next;
        }
        self.current
    }
}
