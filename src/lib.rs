//! merge-2048: a 2048 game engine with animation plans, undo and persistence
//!
//! This crate provides:
//! - A 4x4 `Board` of identified tiles and `resolve_move`, which slides/merges
//!   a board in place and returns the score gained plus a per-tile transition
//!   plan (`engine` module)
//! - A `Session` state machine with a bounded undo stack and best-score tracking (`session`)
//! - A persistence gateway over any string key-value store (`serialization`)
//! - A top-10 leaderboard (`leaderboard`)
//! - `Game`, the facade a presentation layer drives (`game`)
//!
//! Randomness and tile identity are injected (`source`), so every game can be
//! replayed exactly.
//!
//! Quick start:
//! ```
//! use merge_2048::config::GameConfig;
//! use merge_2048::engine::Move;
//! use merge_2048::game::Game;
//! use merge_2048::serialization::MemoryStore;
//! use merge_2048::source::{RngSource, SequentialIds};
//!
//! let mut game = Game::open(
//!     MemoryStore::new(),
//!     GameConfig::default(),
//!     RngSource::seeded(42),
//!     SequentialIds::new(),
//! );
//! game.on_move_resolved(|ev| {
//!     for t in &ev.result.plan {
//!         // hand `t.from -> t.to` to the animation layer
//!         let _ = (t.id, t.from, t.to, t.removed);
//!     }
//! });
//! for dir in [Move::Left, Move::Up, Move::Right, Move::Down] {
//!     if game.request_move(dir).is_some() {
//!         game.animation_finished();
//!     }
//! }
//! println!("{}score: {}  best: {}", game.board(), game.score(), game.best());
//! ```
//!
pub mod config;
pub mod engine;
pub mod game;
pub mod history;
pub mod leaderboard;
pub mod serialization;
pub mod session;
pub mod source;
