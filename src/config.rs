//! Tunables for sessions, persistence and the leaderboard.

use crate::engine::state::DEFAULT_FOUR_PROBABILITY;
use crate::history::DEFAULT_UNDO_LIMIT;
use crate::leaderboard::{DEFAULT_LEADERBOARD_SIZE, DEFAULT_NAME_MAX_CHARS};

/// Configurable knobs for a game. Defaults match classic 2048.
///
/// - `undo_limit`: snapshots kept before the oldest is evicted.
/// - `start_tiles`: tiles spawned by a new game.
/// - `four_probability`: chance that a spawned tile is a 4.
/// - `gate_on_animation`: after a committed move, drop further moves until
///   the presentation reports its animation finished.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub undo_limit: usize,
    pub start_tiles: usize,
    pub four_probability: f64,
    pub gate_on_animation: bool,
    pub leaderboard_size: usize,
    pub name_max_chars: usize,
    pub keys: StorageKeys,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            undo_limit: DEFAULT_UNDO_LIMIT,
            start_tiles: 2,
            four_probability: DEFAULT_FOUR_PROBABILITY,
            gate_on_animation: true,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            name_max_chars: DEFAULT_NAME_MAX_CHARS,
            keys: StorageKeys::default(),
        }
    }
}

/// Keys of the three independent persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub best: String,
    pub state: String,
    pub leaderboard: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            best: "2048-best".to_string(),
            state: "2048-game-state".to_string(),
            leaderboard: "2048-leaderboard".to_string(),
        }
    }
}
