//! Board model and move resolution.
//!
//! - [`state`]: the 4x4 [`Board`] of identified [`Tile`]s, plus random spawning.
//! - [`ops`]: [`resolve_move`] (slide/merge with a transition plan) and [`can_move`].
//!
//! ```
//! use merge_2048::engine::{resolve_move, Board, Move};
//! use merge_2048::source::SequentialIds;
//!
//! let mut ids = SequentialIds::starting_at(100);
//! let mut board = Board::from_values([
//!     [2, 2, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//!     [0, 0, 0, 0],
//! ], &mut ids);
//! let res = resolve_move(&mut board, Move::Left, &mut ids);
//! assert!(res.moved);
//! assert_eq!(res.gained, 4);
//! assert_eq!(board.values()[0], [4, 0, 0, 0]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod ops;
pub mod state;

pub use ops::{can_move, resolve_move, MergedTile, MoveResult, TileTransition};
pub use state::{random_empty_cell, spawn_tile, Board, Pos, Tile, TileId, MAX_TILE_VALUE, SIZE};

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("invalid direction: {0:?} (expected up, down, left or right)")]
    InvalidDirection(String),
}

impl FromStr for Move {
    type Err = MoveParseError;

    /// Accepts full names and WASD shorthands, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Move::Up),
            "down" | "s" => Ok(Move::Down),
            "left" | "a" => Ok(Move::Left),
            "right" | "d" => Ok(Move::Right),
            _ => Err(MoveParseError::InvalidDirection(s.to_string())),
        }
    }
}
