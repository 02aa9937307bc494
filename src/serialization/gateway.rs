use tracing::warn;

use super::record::{self, RecordError, SavedSession};
use super::store::{KeyValueStore, StoreError};
use crate::config::StorageKeys;
use crate::leaderboard::{
    normalize_name,
    Leaderboard,
    LeaderboardRecord,
    DEFAULT_LEADERBOARD_SIZE,
    DEFAULT_NAME_MAX_CHARS,
};
use crate::session::Session;
use crate::source::{IdSource, RandomSource};

#[derive(thiserror::Error, Debug)]
pub enum PersistenceError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("encode error: {0}")]
    Encode(#[from] RecordError),
}

/// Reads and writes the three persisted records: best score, session state and leaderboard.
///
/// Reads never fail: absent or malformed data means "nothing saved" and is logged.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
    keys: StorageKeys,
    leaderboard_size: usize,
    name_max_chars: usize,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S, keys: StorageKeys) -> Self {
        Self {
            store,
            keys,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            name_max_chars: DEFAULT_NAME_MAX_CHARS,
        }
    }

    pub fn with_leaderboard_size(mut self, size: usize) -> Self {
        self.leaderboard_size = size;
        self
    }

    pub fn with_name_max_chars(mut self, max_chars: usize) -> Self {
        self.name_max_chars = max_chars;
        self
    }

    pub fn save_state<R, I>(&mut self, session: &Session<R, I>) -> Result<(), PersistenceError>
    where
        R: RandomSource,
        I: IdSource,
    {
        self.save_saved(&session.to_saved())
    }

    pub fn save_saved(&mut self, saved: &SavedSession) -> Result<(), PersistenceError> {
        let encoded = record::encode_session(saved)?;
        self.store.set(&self.keys.state, &encoded)?;
        Ok(())
    }

    pub fn load_state(&self) -> Option<SavedSession> {
        let raw = self.read(&self.keys.state)?;
        match record::decode_session(&raw) {
            Ok(saved) => Some(saved),
            Err(e) => {
                warn!(key = %self.keys.state, error = %e, "discarding unreadable saved session");
                None
            }
        }
    }

    pub fn clear_state(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(&self.keys.state)?;
        Ok(())
    }

    pub fn save_best(&mut self, best: u64) -> Result<(), PersistenceError> {
        self.store.set(&self.keys.best, &record::encode_best(best))?;
        Ok(())
    }

    /// 0 when absent or unreadable.
    pub fn load_best(&self) -> u64 {
        let Some(raw) = self.read(&self.keys.best) else {
            return 0;
        };
        record::decode_best(&raw).unwrap_or_else(|e| {
            warn!(key = %self.keys.best, error = %e, "ignoring unreadable best score");
            0
        })
    }

    /// Empty when absent or unreadable. Stored names are normalized again on the way in.
    pub fn load_leaderboard(&self) -> Leaderboard {
        let mut records: Vec<LeaderboardRecord> = self
            .read(&self.keys.leaderboard)
            .and_then(|raw| match record::decode_leaderboard(&raw) {
                Ok(records) => Some(records),
                Err(e) => {
                    warn!(key = %self.keys.leaderboard, error = %e, "ignoring unreadable leaderboard");
                    None
                }
            })
            .unwrap_or_default();
        for r in &mut records {
            r.name = normalize_name(&r.name, self.name_max_chars);
        }
        Leaderboard::from_records(records, self.leaderboard_size)
    }

    pub fn save_leaderboard(&mut self, leaderboard: &Leaderboard) -> Result<(), PersistenceError> {
        let encoded = record::encode_leaderboard(leaderboard.records())?;
        self.store.set(&self.keys.leaderboard, &encoded)?;
        Ok(())
    }

    /// Insert into the stored leaderboard and write it back, capped at its size.
    ///
    /// Returns the record's 0-based rank, `None` if it did not place.
    pub fn record_score(&mut self, record: LeaderboardRecord) -> Result<Option<usize>, PersistenceError> {
        let mut leaderboard = self.load_leaderboard();
        let rank = leaderboard.insert(record);
        if rank.is_some() {
            self.save_leaderboard(&leaderboard)?;
        }
        Ok(rank)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "store read failed");
                None
            }
        }
    }
}
