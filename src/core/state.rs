//! Game state and the read-only views handed to collaborators.
//!
//! ## GameState
//!
//! The mutable aggregate owned by one `Engine`:
//! - Board
//! - Score, level, cumulative gems and matches, combo streak
//! - Lifecycle flags, pending selection, difficulty
//! - Unlocked achievements (append-only, no duplicates)
//! - Timestamps on the engine's logical clock and the remaining time budget
//!
//! ## GameStats / GameSnapshot
//!
//! Serializable copies for renderers and persistence layers. Snapshots are
//! cheap because the board and the achievement list are `im` structures.

use std::time::Duration;

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Position};

/// Lifecycle phase derived from the state flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Board generated, clock not started.
    Ready,
    /// Accepting moves.
    Running,
    /// Running but frozen.
    Paused,
    /// Time ran out or the host ended the game.
    Ended,
}

/// Mutable game state.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Current board.
    pub board: Board,

    /// Total score. Never decreases.
    pub score: u64,

    /// Current level, starting at 1. Never decreases.
    pub level: u32,

    /// Gems cleared so far (overlapping matches count a shared cell twice).
    pub gems: u64,

    /// Matches cleared so far.
    pub matches_made: u64,

    /// Consecutive resolution steps that found a match.
    pub combo: u32,

    /// Longest combo seen this game.
    pub best_combo: u32,

    pub is_running: bool,
    pub is_paused: bool,
    pub is_ended: bool,

    /// Pending first click of a swap.
    pub selected: Option<Position>,

    /// Active difficulty id.
    pub difficulty: String,

    /// Unlocked achievement ids in unlock order.
    pub achievements: Vector<String>,

    /// Logical clock reading when the game started.
    pub started_at: Option<Duration>,

    /// Logical clock reading of the last committed swap.
    pub last_move_at: Option<Duration>,

    /// Logical clock reading when the current level began.
    pub level_started_at: Option<Duration>,

    /// Quickest time any level took to complete.
    pub fastest_level: Option<Duration>,

    /// Seconds left on the countdown.
    pub time_remaining_secs: u32,

    /// Rejected swaps this game.
    pub invalid_moves: u32,

    /// Rejected swaps since the last level-up.
    pub invalid_moves_this_level: u32,

    /// Levels reached without a rejected swap.
    pub perfect_levels: u32,
}

impl GameState {
    /// Create a fresh state around a generated board.
    #[must_use]
    pub fn new(board: Board, difficulty: impl Into<String>, time_limit_secs: u32) -> Self {
        Self {
            board,
            score: 0,
            level: 1,
            gems: 0,
            matches_made: 0,
            combo: 0,
            best_combo: 0,
            is_running: false,
            is_paused: false,
            is_ended: false,
            selected: None,
            difficulty: difficulty.into(),
            achievements: Vector::new(),
            started_at: None,
            last_move_at: None,
            level_started_at: None,
            fastest_level: None,
            time_remaining_secs: time_limit_secs,
            invalid_moves: 0,
            invalid_moves_this_level: 0,
            perfect_levels: 0,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn status(&self) -> GameStatus {
        match (self.is_running, self.is_paused, self.is_ended) {
            (true, true, _) => GameStatus::Paused,
            (true, false, _) => GameStatus::Running,
            (false, _, true) => GameStatus::Ended,
            (false, _, false) => GameStatus::Ready,
        }
    }

    /// Whether moves are currently accepted.
    #[must_use]
    pub fn accepts_moves(&self) -> bool {
        self.is_running && !self.is_paused
    }

    /// Check if an achievement is unlocked.
    #[must_use]
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    /// Record an achievement.
    ///
    /// Returns false if it was already unlocked.
    pub fn unlock_achievement(&mut self, id: &str) -> bool {
        if self.has_achievement(id) {
            return false;
        }
        self.achievements.push_back(id.to_string());
        true
    }

    /// Close the current level at `now` and open the next one.
    ///
    /// The level's duration only counts once a start time is known.
    pub fn record_level_completion(&mut self, now: Duration) {
        if let Some(start) = self.level_started_at {
            let took = now.saturating_sub(start);
            self.fastest_level = Some(self.fastest_level.map_or(took, |best| best.min(took)));
        }
        self.level_started_at = Some(now);
    }

    /// Read-only statistics.
    #[must_use]
    pub fn stats(&self) -> GameStats {
        GameStats {
            score: self.score,
            level: self.level,
            gems: self.gems,
            matches_made: self.matches_made,
            combo: self.combo,
            best_combo: self.best_combo,
            time_remaining_secs: self.time_remaining_secs,
            status: self.status(),
            is_running: self.is_running,
            is_paused: self.is_paused,
            difficulty: self.difficulty.clone(),
            achievements: self.achievements.iter().cloned().collect(),
            invalid_moves: self.invalid_moves,
            selected: self.selected,
            fastest_level: self.fastest_level,
        }
    }

    /// Statistics plus the board.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            stats: self.stats(),
            board: self.board.clone(),
            started_at: self.started_at,
            last_move_at: self.last_move_at,
        }
    }
}

/// Statistics exposed to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    pub level: u32,
    pub gems: u64,
    pub matches_made: u64,
    pub combo: u32,
    pub best_combo: u32,
    pub time_remaining_secs: u32,
    pub status: GameStatus,
    pub is_running: bool,
    pub is_paused: bool,
    pub difficulty: String,
    pub achievements: Vec<String>,
    pub invalid_moves: u32,
    pub selected: Option<Position>,
    pub fastest_level: Option<Duration>,
}

impl GameStats {
    /// Number of unlocked achievements.
    #[must_use]
    pub fn achievement_count(&self) -> usize {
        self.achievements.len()
    }
}

/// Full read-only snapshot for renderers and persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub stats: GameStats,
    pub board: Board,
    pub started_at: Option<Duration>,
    pub last_move_at: Option<Duration>,
}
