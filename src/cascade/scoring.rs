//! Match scoring.
//!
//! - Base score by run length: 3, 4 and 5 use the table; longer runs score
//!   `match5 * (len - 4)`. Runs shorter than 3 (possible when the minimum
//!   match length is 2) score as a 3-run.
//! - The base is multiplied by the rarity multiplier of the match's gem kind
//!   and floored.
//! - A resolution step sums its match scores and multiplies the sum by the
//!   combo multiplier, floored again.

use crate::core::{EngineConfig, ScoreTable};
use crate::matching::Match;

/// Base score for a run of `len` gems.
#[must_use]
pub fn base_score(len: usize, table: &ScoreTable) -> u64 {
    match len {
        0..=3 => table.match3,
        4 => table.match4,
        5 => table.match5,
        n => table.match5 * (n as u64 - 4),
    }
}

/// Score of one match before the combo multiplier.
#[must_use]
pub fn calculate_match_score(m: &Match, config: &EngineConfig) -> u64 {
    let base = base_score(m.len(), &config.scoring);
    apply_multiplier(base, config.rarity_multiplier(m.kind()))
}

/// Multiplier for the `combo`-th consecutive step (1-indexed).
///
/// Saturates at the last table entry; an empty table yields 1.0.
#[must_use]
pub fn combo_multiplier(combo: u32, table: &[f64]) -> f64 {
    let idx = (combo.saturating_sub(1) as usize).min(table.len().saturating_sub(1));
    table.get(idx).copied().unwrap_or(1.0)
}

/// Multiply and floor.
#[must_use]
pub fn apply_multiplier(score: u64, multiplier: f64) -> u64 {
    (score as f64 * multiplier).floor() as u64
}
