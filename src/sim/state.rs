//! Game state and core simulation types
//!
//! Everything an external renderer needs to draw a frame lives here.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh engine, waiting for the first start
    NotStarted,
    /// Active gameplay, ticks advance the snake
    Running,
    /// Ticks are gated off until resumed
    Paused,
    /// Run ended (collision or full board)
    GameOver,
}

/// Cardinal direction the snake travels in
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

    /// Returns the opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Returns the (dx, dy) delta for this direction (y grows downward).
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Where a fresh snake starts
    pub const fn origin() -> Self {
        Self::new(ORIGIN_X, ORIGIN_Y)
    }

    /// The neighbouring cell one step in `dir`. May lie off the grid.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn in_bounds(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }

    pub fn manhattan(&self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Complete game state (serializable snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Snake body, head first
    pub snake: VecDeque<Cell>,
    /// Current food cell
    pub food: Cell,
    /// Direction applied on the most recent tick
    pub direction: Direction,
    /// Direction the next tick will apply (single slot, last writer wins)
    pub pending_direction: Direction,
    /// Food eaten this run
    pub score: u32,
    /// Best score seen, never decreases
    pub high_score: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Applied ticks this run
    pub ticks: u64,
}

impl GameState {
    /// Fresh run state with a one-cell snake at the origin.
    ///
    /// `food` must already avoid the origin cell.
    pub fn fresh(food: Cell, high_score: u32, phase: GamePhase) -> Self {
        let mut snake = VecDeque::with_capacity(GRID_CELLS);
        snake.push_back(Cell::origin());
        Self {
            snake,
            food,
            direction: Direction::Right,
            pending_direction: Direction::Right,
            score: 0,
            high_score,
            phase,
            ticks: 0,
        }
    }

    pub fn head(&self) -> Cell {
        // Length >= 1 is a construction invariant
        self.snake.front().copied().unwrap_or_else(Cell::origin)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }
}
