//! The collaborator-facing game: a [`Session`] whose every change is persisted.
//!
//! Writes are best effort. A failing store is logged and otherwise ignored, so
//! storage trouble never interrupts play.
//!
//! ```
//! use merge_2048::config::GameConfig;
//! use merge_2048::engine::Move;
//! use merge_2048::game::Game;
//! use merge_2048::serialization::MemoryStore;
//! use merge_2048::source::{RngSource, SequentialIds};
//!
//! let mut game = Game::open(MemoryStore::new(), GameConfig::default(), RngSource::seeded(1), SequentialIds::new());
//! assert_eq!(game.board().tile_count(), 2);
//! let moved = Move::ALL.into_iter().any(|m| game.request_move(m).is_some());
//! assert!(moved);
//! game.animation_finished();
//! assert!(game.request_undo());
//! ```

use tracing::warn;

use crate::config::GameConfig;
use crate::engine::{Board, Move, MoveResult};
use crate::leaderboard::{Leaderboard, LeaderboardRecord};
use crate::serialization::{KeyValueStore, Persistence};
use crate::session::{MoveResolved, Phase, Session};
use crate::source::{IdSource, RandomSource};

pub struct Game<S, R, I> {
    session: Session<R, I>,
    persistence: Persistence<S>,
}

impl<S, R, I> Game<S, R, I>
where
    S: KeyValueStore,
    R: RandomSource,
    I: IdSource,
{
    /// Resume the saved session from `store`, or start a new game if there is none.
    pub fn open(store: S, config: GameConfig, rng: R, ids: I) -> Self {
        let persistence = Persistence::new(store, config.keys.clone())
            .with_leaderboard_size(config.leaderboard_size)
            .with_name_max_chars(config.name_max_chars);
        let mut session = Session::new(config, rng, ids);
        let stored_best = persistence.load_best();
        session.raise_best(stored_best);

        let saved = persistence.load_state();
        let resumed = saved.is_some();
        match saved {
            Some(saved) => session.restore(saved),
            None => session.new_game(),
        }

        let mut game = Game { session, persistence };
        // The session record can carry a higher best than the best key.
        if game.session.best() > stored_best {
            game.persist_best();
        }
        if !resumed {
            game.persist();
        }
        game
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn score(&self) -> u64 {
        self.session.score()
    }

    pub fn best(&self) -> u64 {
        self.session.best()
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn is_game_over(&self) -> bool {
        self.session.is_game_over()
    }

    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    pub fn can_undo(&self) -> bool {
        self.session.can_undo()
    }

    /// `None` when the move was a no-op or was dropped.
    pub fn request_move(&mut self, dir: Move) -> Option<MoveResult> {
        let best_before = self.session.best();
        let phase_before = self.session.phase();
        let result = self.session.apply_move(dir);
        if self.session.best() > best_before {
            self.persist_best();
        }
        if result.is_some() || self.session.phase() != phase_before {
            self.persist();
        }
        result
    }

    /// False when there was nothing to undo.
    pub fn request_undo(&mut self) -> bool {
        let undone = self.session.undo();
        if undone {
            self.persist();
        }
        undone
    }

    pub fn request_new_game(&mut self) {
        self.session.new_game();
        self.persist();
    }

    pub fn on_move_resolved<F>(&mut self, observer: F)
    where
        F: FnMut(&MoveResolved<'_>) + 'static,
    {
        self.session.on_move_resolved(observer);
    }

    pub fn animation_finished(&mut self) {
        self.session.animation_finished();
    }

    /// Record the current score on the leaderboard under `name`.
    ///
    /// Returns the 0-based rank, or `None` if the score did not place or could not be saved.
    pub fn submit_score(&mut self, name: &str) -> Option<usize> {
        let max_chars = self.session.config().name_max_chars;
        let record = LeaderboardRecord::now(name, self.session.score(), max_chars);
        match self.persistence.record_score(record) {
            Ok(rank) => rank,
            Err(e) => {
                warn!(error = %e, "failed to save leaderboard");
                None
            }
        }
    }

    pub fn leaderboard(&self) -> Leaderboard {
        self.persistence.load_leaderboard()
    }

    pub fn session(&self) -> &Session<R, I> {
        &self.session
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save_state(&self.session) {
            warn!(error = %e, "failed to save session");
        }
    }

    fn persist_best(&mut self) {
        if let Err(e) = self.persistence.save_best(self.session.best()) {
            warn!(error = %e, "failed to save best score");
        }
    }
}
