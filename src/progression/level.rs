//! Level thresholds.
//!
//! `thresholds[i]` is the score needed to be at level `i + 1`. The table is
//! ascending, so the level for a score is the number of thresholds it meets.

use std::time::Duration;

use crate::core::GameState;

/// Level a score earns on its own, never below 1.
#[must_use]
pub fn level_for_score(score: u64, thresholds: &[u64]) -> u32 {
    let met = thresholds.iter().take_while(|&&t| t <= score).count();
    met.max(1) as u32
}

/// Raise `state.level` past every threshold the score now meets.
///
/// Several levels may be gained at once. Each level reached without a
/// rejected swap since the previous level-up counts as a perfect level.
/// `now` closes the level timer once per call, so a multi-level jump counts
/// as a single completion. Returns the number of levels gained.
pub fn check_level_up(state: &mut GameState, thresholds: &[u64], now: Duration) -> u32 {
    let mut gained = 0;
    while let Some(&next) = thresholds.get(state.level as usize) {
        if state.score < next {
            break;
        }
        state.level += 1;
        gained += 1;
        if state.invalid_moves_this_level == 0 {
            state.perfect_levels += 1;
        }
        state.invalid_moves_this_level = 0;
        tracing::info!(level = state.level, score = state.score, "level up");
    }
    if gained > 0 {
        state.record_level_completion(now);
    }
    gained
}
