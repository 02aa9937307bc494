//! Game lifecycle: new game, moves with undo snapshots, undo, best score.
//!
//! A [`Session`] owns everything that changes during play. It never touches
//! storage; see [`crate::game::Game`] for the persisted facade.
//!
//! ```
//! use merge_2048::config::GameConfig;
//! use merge_2048::engine::Move;
//! use merge_2048::session::{Phase, Session};
//! use merge_2048::source::{RngSource, SequentialIds};
//!
//! let mut session = Session::new(GameConfig::default(), RngSource::seeded(42), SequentialIds::new());
//! assert_eq!(session.phase(), Phase::Idle);
//! session.new_game();
//! assert_eq!(session.board().tile_count(), 2);
//!
//! for dir in Move::ALL {
//!     if session.apply_move(dir).is_some() {
//!         session.animation_finished();
//!         assert!(session.can_undo());
//!         break;
//!     }
//! }
//! ```

use std::fmt;

use tracing::{debug, info};

use crate::config::GameConfig;
use crate::engine::{can_move, resolve_move, spawn_tile, Board, Move, MoveResult, Pos, Tile};
use crate::history::{UndoSnapshot, UndoStack};
use crate::serialization::SavedSession;
use crate::source::{IdSource, RandomSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No game started or restored yet.
    Idle,
    InProgress,
    /// No direction can change the board. Only undo or a new game leave this state.
    GameOver,
}

/// Everything a presentation layer needs to animate one committed move.
#[derive(Debug, Clone, Copy)]
pub struct MoveResolved<'a> {
    pub direction: Move,
    pub result: &'a MoveResult,
    pub spawned: Option<(Pos, Tile)>,
    pub phase: Phase,
}

pub type MoveObserver = Box<dyn FnMut(&MoveResolved<'_>)>;

pub struct Session<R, I> {
    board: Board,
    score: u64,
    best: u64,
    undo: UndoStack,
    phase: Phase,
    busy: bool,
    rng: R,
    ids: I,
    config: GameConfig,
    observers: Vec<MoveObserver>,
}

impl<R: RandomSource, I: IdSource> Session<R, I> {
    pub fn new(config: GameConfig, rng: R, ids: I) -> Self {
        Self {
            board: Board::empty(),
            score: 0,
            best: 0,
            undo: UndoStack::new(config.undo_limit),
            phase: Phase::Idle,
            busy: false,
            rng,
            ids,
            config,
            observers: Vec::new(),
        }
    }

    /// Reset board, score and undo history, then spawn the starting tiles.
    pub fn new_game(&mut self) {
        self.board = Board::empty();
        self.score = 0;
        self.undo.clear();
        self.busy = false;
        for _ in 0..self.config.start_tiles {
            spawn_tile(&mut self.board, &mut self.rng, &mut self.ids, self.config.four_probability);
        }
        self.phase = if can_move(&self.board) { Phase::InProgress } else { Phase::GameOver };
        info!(best = self.best, "new game");
    }

    /// Rebuild from persisted state.
    ///
    /// The id source is advanced past every restored id, and `best` only ever goes up.
    pub fn restore(&mut self, saved: SavedSession) {
        let max_id = std::iter::once(&saved.board)
            .chain(saved.undo_stack.iter().map(|s| &s.board))
            .filter_map(Board::max_id)
            .max();
        if let Some(id) = max_id {
            self.ids.reserve_past(id);
        }
        self.board = saved.board;
        self.score = saved.score;
        self.best = self.best.max(saved.best).max(saved.score);
        self.undo = UndoStack::from_entries(saved.undo_stack, self.config.undo_limit);
        self.busy = false;
        self.phase = if can_move(&self.board) { Phase::InProgress } else { Phase::GameOver };
        info!(score = self.score, undo = self.undo.len(), phase = ?self.phase, "restored session");
    }

    /// Persistable copy of the current state.
    pub fn to_saved(&self) -> SavedSession {
        SavedSession {
            board: self.board.clone(),
            score: self.score,
            best: self.best,
            undo_stack: self.undo.iter().cloned().collect(),
        }
    }

    /// Attempt a move.
    ///
    /// Returns `None` when nothing happened: the session is not in progress, a
    /// previous move is still animating, or the direction changes nothing. A
    /// no-op on a board that cannot move at all ends the game.
    pub fn apply_move(&mut self, dir: Move) -> Option<MoveResult> {
        if self.phase != Phase::InProgress {
            debug!(%dir, phase = ?self.phase, "move ignored");
            return None;
        }
        if self.busy {
            debug!(%dir, "move dropped while animating");
            return None;
        }

        let evicted = self.undo.push(UndoSnapshot { board: self.board.clone(), score: self.score });
        let result = resolve_move(&mut self.board, dir, &mut self.ids);

        if !result.moved {
            self.undo.unpush(evicted);
            if !can_move(&self.board) {
                self.phase = Phase::GameOver;
                info!(score = self.score, "game over");
            }
            debug!(%dir, "no-op move");
            return None;
        }

        self.score += result.gained;
        if self.score > self.best {
            self.best = self.score;
        }
        let spawned = spawn_tile(&mut self.board, &mut self.rng, &mut self.ids, self.config.four_probability);
        if !can_move(&self.board) {
            self.phase = Phase::GameOver;
            info!(score = self.score, "game over");
        }
        if self.config.gate_on_animation {
            self.busy = true;
        }
        debug!(%dir, gained = result.gained, score = self.score, "move committed");

        let event = MoveResolved { direction: dir, result: &result, spawned, phase: self.phase };
        for observer in self.observers.iter_mut() {
            observer(&event);
        }
        Some(result)
    }

    /// Restore the board and score from before the most recent move.
    ///
    /// Returns false when there is nothing to undo. `best` is left alone.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        self.board = snapshot.board;
        self.score = snapshot.score;
        self.phase = if can_move(&self.board) { Phase::InProgress } else { Phase::GameOver };
        debug!(score = self.score, remaining = self.undo.len(), "undo");
        true
    }

    /// Called by the presentation layer once the last move's animation completes.
    pub fn animation_finished(&mut self) {
        self.busy = false;
    }

    /// Register a callback for every committed move.
    pub fn on_move_resolved<F>(&mut self, observer: F)
    where
        F: FnMut(&MoveResolved<'_>) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Seed `best` from storage. Never lowers it.
    pub fn raise_best(&mut self, best: u64) {
        self.best = self.best.max(best);
    }
}

impl<R, I> Session<R, I> {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl<R, I> fmt::Debug for Session<R, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("board", &self.board)
            .field("score", &self.score)
            .field("best", &self.best)
            .field("undo", &self.undo.len())
            .field("phase", &self.phase)
            .field("busy", &self.busy)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::TileId;
    use crate::source::{SequenceSource, SequentialIds};

    type TestSession = Session<SequenceSource, SequentialIds>;

    fn ungated() -> GameConfig {
        GameConfig { gate_on_animation: false, ..GameConfig::default() }
    }

    fn session(draws: &[f64]) -> TestSession {
        Session::new(ungated(), SequenceSource::new(draws.iter().copied()), SequentialIds::new())
    }

    fn with_board(draws: &[f64], values: [[u32; 4]; 4], score: u64) -> TestSession {
        let mut s = session(draws);
        let mut ids = SequentialIds::starting_at(1000);
        s.restore(SavedSession {
            board: Board::from_values(values, &mut ids),
            score,
            best: score,
            undo_stack: Vec::new(),
        });
        s
    }

    #[test]
    fn new_game_spawns_two_tiles() {
        let mut s = session(&[0.0]);
        s.new_game();
        assert_eq!(s.phase(), Phase::InProgress);
        assert_eq!(s.board().values()[0], [2, 2, 0, 0]);
        assert_eq!(s.score(), 0);
        assert!(!s.can_undo());
    }

    #[test]
    fn move_commits_score_and_spawns() {
        let mut s = session(&[0.0]);
        s.new_game();
        let res = s.apply_move(Move::Left).unwrap();
        assert!(res.moved);
        assert_eq!(res.gained, 4);
        assert_eq!(s.score(), 4);
        assert_eq!(s.best(), 4);
        assert_eq!(s.board().values()[0], [4, 2, 0, 0]);
        assert_eq!(s.undo_len(), 1);
    }

    #[test]
    fn noop_move_leaves_no_snapshot() {
        let mut s = session(&[0.0]);
        s.new_game();
        s.apply_move(Move::Left).unwrap();
        let before = s.board().clone();
        // [4, 2, _, _] is already compacted to the left
        assert!(s.apply_move(Move::Left).is_none());
        assert_eq!(s.board(), &before);
        assert_eq!(s.undo_len(), 1);
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn noop_at_capacity_keeps_oldest_snapshot() {
        let config = GameConfig { undo_limit: 2, ..ungated() };
        let mut s = Session::new(config, SequenceSource::new([0.0]), SequentialIds::new());
        let mut ids = SequentialIds::starting_at(1000);
        s.restore(SavedSession {
            board: Board::from_values([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]], &mut ids),
            score: 0,
            best: 0,
            undo_stack: Vec::new(),
        });
        for i in 0..6 {
            let dir = if i % 2 == 0 { Move::Right } else { Move::Left };
            assert!(s.apply_move(dir).is_some(), "move {i} should change the board");
        }
        assert_eq!(s.board().values()[0], [4, 8, 4, 2]);
        let history = s.to_saved().undo_stack;
        assert_eq!(history.len(), 2);
        assert!(s.apply_move(Move::Right).is_none());
        assert_eq!(s.to_saved().undo_stack, history);
    }

    #[test]
    fn undo_round_trip() {
        let mut s = session(&[0.0]);
        s.new_game();
        let board_before = s.board().clone();
        let score_before = s.score();
        s.apply_move(Move::Left).unwrap();
        assert!(s.undo());
        assert_eq!(s.board(), &board_before);
        assert_eq!(s.score(), score_before);
        assert!(!s.undo());
    }

    #[test]
    fn best_survives_undo() {
        let mut s = session(&[0.0]);
        s.new_game();
        s.apply_move(Move::Left).unwrap();
        assert_eq!(s.best(), 4);
        s.undo();
        assert_eq!(s.score(), 0);
        assert_eq!(s.best(), 4);
    }

    #[test]
    fn undo_history_is_capped() {
        let start = [[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]];
        let mut s = with_board(&[0.5], start, 0);
        let cycle = [Move::Down, Move::Right, Move::Up, Move::Left];
        for i in 0..31 {
            assert!(s.apply_move(cycle[i % 4]).is_some(), "move {i} should change the board");
            assert!(s.undo_len() <= 30);
        }
        assert_eq!(s.undo_len(), 30);
        let mut undone = 0;
        while s.undo() {
            undone += 1;
        }
        assert_eq!(undone, 30);
        // the snapshot of the starting board was evicted
        assert_ne!(s.board().values(), start);
    }

    #[test]
    fn stuck_board_is_game_over_on_next_attempt() {
        let stuck = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        for dir in Move::ALL {
            let mut s = with_board(&[0.5], stuck, 100);
            // restoring already detects it
            assert_eq!(s.phase(), Phase::GameOver);
            assert!(s.apply_move(dir).is_none());
            assert!(s.is_game_over());
            assert!(!s.can_undo());
        }
    }

    #[test]
    fn last_spawn_can_end_the_game() {
        let mut s = with_board(&[0.95], [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 4, 2, 0]], 0);
        assert_eq!(s.phase(), Phase::InProgress);
        let res = s.apply_move(Move::Right).unwrap();
        assert_eq!(res.gained, 0);
        assert_eq!(s.board().values()[3], [4, 2, 4, 2]);
        assert!(s.is_game_over());
        assert!(s.apply_move(Move::Left).is_none());

        // undo brings the game back
        assert!(s.undo());
        assert_eq!(s.phase(), Phase::InProgress);
    }

    #[test]
    fn new_game_after_game_over() {
        let mut s = with_board(&[0.0], [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]], 100);
        assert!(s.is_game_over());
        s.new_game();
        assert_eq!(s.phase(), Phase::InProgress);
        assert_eq!(s.score(), 0);
        assert_eq!(s.best(), 100);
    }

    #[test]
    fn idle_session_ignores_moves() {
        let mut s = session(&[0.0]);
        assert!(s.apply_move(Move::Up).is_none());
        assert!(!s.can_undo());
        assert_eq!(s.phase(), Phase::Idle);
    }

    #[test]
    fn busy_gate_drops_moves_until_acknowledged() {
        let mut s = Session::new(GameConfig::default(), SequenceSource::new([0.0]), SequentialIds::new());
        s.new_game();
        assert!(s.apply_move(Move::Left).is_some());
        assert!(s.is_busy());
        assert!(s.apply_move(Move::Right).is_none());
        assert_eq!(s.undo_len(), 1);
        s.animation_finished();
        assert!(s.apply_move(Move::Right).is_some());
    }

    #[test]
    fn observers_receive_plan_and_spawn() {
        let seen: Rc<RefCell<Vec<(Move, usize, bool)>>> = Rc::default();
        let mut s = session(&[0.0]);
        let sink = Rc::clone(&seen);
        s.on_move_resolved(move |ev| {
            sink.borrow_mut().push((ev.direction, ev.result.plan.len(), ev.spawned.is_some()));
        });
        s.new_game();
        s.apply_move(Move::Left).unwrap();
        assert!(s.apply_move(Move::Left).is_none());
        assert_eq!(*seen.borrow(), vec![(Move::Left, 2, true)]);
    }

    #[test]
    fn restore_reserves_ids() {
        let mut s = session(&[0.0]);
        let mut ids = SequentialIds::starting_at(500);
        let board = Board::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]], &mut ids);
        let older = Board::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]], &mut ids);
        s.restore(SavedSession {
            board,
            score: 12,
            best: 8,
            undo_stack: vec![UndoSnapshot { board: older, score: 10 }],
        });
        assert_eq!(s.best(), 12);
        assert_eq!(s.undo_len(), 1);
        let res = s.apply_move(Move::Left).unwrap();
        assert_eq!(res.merged[0].tile.id, TileId(503));
    }
}
