use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::GridPosition;

/// Eight-way facing. The numeric codes are shared with renderers and must not
/// change: 0 faces -y, codes increase clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("direction code {0} is outside 0..=7")]
pub struct InvalidDirectionCode(pub u8);

impl Direction {
    /// Neighbor expansion order used by the pathfinder.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// Facing for a single grid step. Anything that is not a unit step faces
    /// south.
    pub fn from_delta(dx: i32, dy: i32) -> Self {
        match (dx, dy) {
            (0, -1) => Self::North,
            (1, -1) => Self::NorthEast,
            (1, 0) => Self::East,
            (1, 1) => Self::SouthEast,
            (0, 1) => Self::South,
            (-1, 1) => Self::SouthWest,
            (-1, 0) => Self::West,
            (-1, -1) => Self::NorthWest,
            _ => Self::South,
        }
    }

    pub fn between(from: GridPosition, to: GridPosition) -> Self {
        Self::from_delta(to.x - from.x, to.y - from.y)
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction.code()
    }
}

impl TryFrom<u8> for Direction {
    type Error = InvalidDirectionCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(InvalidDirectionCode(code))
    }
}
