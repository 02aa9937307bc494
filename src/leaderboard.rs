//! Top scores, best first.
//!
//! Records are ordered by score descending, then by timestamp ascending (the
//! earlier of two equal scores ranks higher), and truncated to the capacity.

use std::fmt;

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
pub const DEFAULT_NAME_MAX_CHARS: usize = 24;

const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRecord {
    pub name: String,
    pub score: u64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Calendar date of `timestamp`, `YYYY-MM-DD`.
    pub date: String,
}

impl LeaderboardRecord {
    pub fn at<Tz>(name: &str, score: u64, at: &DateTime<Tz>, max_chars: usize) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self {
            name: normalize_name(name, max_chars),
            score,
            timestamp: at.timestamp_millis(),
            date: at.format("%Y-%m-%d").to_string(),
        }
    }

    /// Stamped with the local wall clock.
    pub fn now(name: &str, score: u64, max_chars: usize) -> Self {
        Self::at(name, score, &Local::now(), max_chars)
    }

    /// True if `self` ranks strictly above `other`.
    fn outranks(&self, other: &Self) -> bool {
        (self.score, std::cmp::Reverse(self.timestamp)) > (other.score, std::cmp::Reverse(other.timestamp))
    }
}

/// Trim, cut to `max_chars` characters, and fall back to a placeholder when empty.
pub fn normalize_name(name: &str, max_chars: usize) -> String {
    let trimmed: String = name.trim().chars().take(max_chars).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    records: Vec<LeaderboardRecord>,
    capacity: usize,
}

impl Leaderboard {
    pub fn new(capacity: usize) -> Self {
        Self { records: Vec::with_capacity(capacity + 1), capacity }
    }

    /// Sorts and truncates whatever it is given.
    pub fn from_records(mut records: Vec<LeaderboardRecord>, capacity: usize) -> Self {
        records.sort_by(|a, b| b.score.cmp(&a.score).then(a.timestamp.cmp(&b.timestamp)));
        records.truncate(capacity);
        Self { records, capacity }
    }

    /// Insert a record; returns its 0-based rank, or `None` if it did not make the cut.
    pub fn insert(&mut self, record: LeaderboardRecord) -> Option<usize> {
        let rank = self.records.partition_point(|r| !record.outranks(r));
        if rank >= self.capacity {
            return None;
        }
        self.records.insert(rank, record);
        self.records.truncate(self.capacity);
        Some(rank)
    }

    /// Would a score recorded now make the board?
    pub fn qualifies(&self, score: u64) -> bool {
        self.records.len() < self.capacity
            || self.records.last().is_some_and(|last| score > last.score)
    }

    pub fn records(&self) -> &[LeaderboardRecord] {
        &self.records
    }

    pub fn top(&self) -> Option<&LeaderboardRecord> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Leaderboard::new(DEFAULT_LEADERBOARD_SIZE)
    }
}

impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, r) in self.records.iter().enumerate() {
            writeln!(f, "{:>2}. {:<24} {:>8}  {}", i + 1, r.name, r.score, r.date)?;
        }
        Ok(())
    }
}
