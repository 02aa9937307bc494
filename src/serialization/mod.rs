//! Persistence surfaces.
//!
//! Three independent records live in a string [`KeyValueStore`]:
//! - best score, as a plain decimal string;
//! - the session (`{ board, score, best, undoStack }`) as JSON;
//! - the leaderboard, as a JSON array of at most ten records.
//!
//! [`Persistence`] is the gateway the game talks to. Its reads never fail:
//! missing or malformed data reads as "nothing saved".

mod gateway;
mod record;
mod store;

pub use gateway::{Persistence, PersistenceError};
pub use record::{
    decode_best,
    decode_leaderboard,
    decode_session,
    encode_best,
    encode_leaderboard,
    encode_session,
    RecordError,
    SavedSession,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
