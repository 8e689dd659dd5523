//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// A simulation turn. One turn = one pass of the scheduler loop.
pub type Turn = u64;

/// Score carried by pacman, accumulated across levels.
pub type Points = u32;

/// A grid coordinate. Rows grow downwards, columns to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The neighbouring position one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.delta();
        Self { row: self.row + dr, col: self.col + dc }
    }
}

/// The four movement directions, keyed by their script letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left, // A
    Right, // D
    Up,    // W
    Down,  // S
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Left => (0, -1),
            Self::Right => (0, 1),
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Self::Left),
            'D' => Some(Self::Right),
            'W' => Some(Self::Up),
            'S' => Some(Self::Down),
            _ => None,
        }
    }
}
