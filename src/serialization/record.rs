use std::num::ParseIntError;

use serde::{Deserialize, Serialize};

use crate::engine::Board;
use crate::history::UndoSnapshot;
use crate::leaderboard::LeaderboardRecord;

/// Persisted form of a session: `{ board, score, best, undoStack }`.
///
/// `undo_stack` is oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    pub board: Board,
    #[serde(default)]
    pub score: u64,
    #[serde(default)]
    pub best: u64,
    #[serde(default)]
    pub undo_stack: Vec<UndoSnapshot>,
}

impl SavedSession {
    /// Every board must hold valid tile values with unique ids.
    pub fn validate(&self) -> Result<(), RecordError> {
        if !self.board.is_well_formed() {
            return Err(RecordError::InvalidBoard("current board"));
        }
        if self.undo_stack.iter().any(|s| !s.board.is_well_formed()) {
            return Err(RecordError::InvalidBoard("undo snapshot"));
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid integer: {0}")]
    Integer(#[from] ParseIntError),
    #[error("invalid tiles in {0}")]
    InvalidBoard(&'static str),
}

pub fn encode_session(saved: &SavedSession) -> Result<String, RecordError> {
    Ok(serde_json::to_string(saved)?)
}

/// Decode and validate a saved session.
pub fn decode_session(s: &str) -> Result<SavedSession, RecordError> {
    let saved: SavedSession = serde_json::from_str(s)?;
    saved.validate()?;
    Ok(saved)
}

pub fn encode_best(best: u64) -> String {
    best.to_string()
}

pub fn decode_best(s: &str) -> Result<u64, RecordError> {
    Ok(s.trim().parse::<u64>()?)
}

pub fn encode_leaderboard(records: &[LeaderboardRecord]) -> Result<String, RecordError> {
    Ok(serde_json::to_string(records)?)
}

pub fn decode_leaderboard(s: &str) -> Result<Vec<LeaderboardRecord>, RecordError> {
    Ok(serde_json::from_str(s)?)
}
