//! Bounded undo history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::engine::Board;

/// Default number of snapshots kept.
pub const DEFAULT_UNDO_LIMIT: usize = 30;

/// Board and score as they were before a move was attempted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoSnapshot {
    pub board: Board,
    pub score: u64,
}

/// LIFO stack of snapshots that evicts its oldest entry once full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoStack {
    entries: VecDeque<UndoSnapshot>,
    limit: usize,
}

impl UndoStack {
    pub fn new(limit: usize) -> Self {
        assert!(limit > 0, "undo limit must be positive");
        Self { entries: VecDeque::with_capacity(limit), limit }
    }

    /// Rebuild from oldest-first entries, keeping only the newest `limit`.
    pub fn from_entries(entries: impl IntoIterator<Item = UndoSnapshot>, limit: usize) -> Self {
        let mut stack = UndoStack::new(limit);
        for e in entries {
            stack.push(e);
        }
        stack
    }

    /// Returns the evicted snapshot, if the stack was full.
    pub fn push(&mut self, snapshot: UndoSnapshot) -> Option<UndoSnapshot> {
        let evicted = if self.entries.len() == self.limit { self.entries.pop_front() } else { None };
        self.entries.push_back(snapshot);
        evicted
    }

    pub fn pop(&mut self) -> Option<UndoSnapshot> {
        self.entries.pop_back()
    }

    /// Take back the latest push, putting back whatever it evicted.
    pub fn unpush(&mut self, evicted: Option<UndoSnapshot>) -> Option<UndoSnapshot> {
        let top = self.entries.pop_back();
        if let Some(e) = evicted {
            self.entries.push_front(e);
        }
        top
    }

    pub fn peek(&self) -> Option<&UndoSnapshot> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &UndoSnapshot> {
        self.entries.iter()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        UndoStack::new(DEFAULT_UNDO_LIMIT)
    }
}
