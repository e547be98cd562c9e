//! Cascade resolution.
//!
//! One resolution step:
//! 1. Detect all matches. None: the combo resets and the cascade is stable.
//! 2. Score each match, clear its cells, bump the combo, apply the combo
//!    multiplier to the summed score and add it to the total.
//! 3. Apply gravity and refill the board.
//! 4. Update levels and achievements.
//!
//! Steps repeat synchronously until a step finds nothing. Each step is
//! recorded with a board snapshot so a renderer can replay the chain with its
//! own timing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell};
use crate::core::{EngineConfig, GameState, KindSource};
use crate::matching::{find_all_matches, Match};
use crate::progression::update_progression;

use super::gravity::{apply_gravity, refill};
use super::scoring::{apply_multiplier, calculate_match_score, combo_multiplier};

/// One step of a cascade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CascadeStep {
    /// Matches cleared in this step.
    pub matches: Vec<Match>,

    /// Combo value after this step (1 for the first step of a chain).
    pub combo: u32,

    /// Sum of the match scores before the combo multiplier.
    pub base_score: u64,

    /// Combo multiplier applied.
    pub multiplier: f64,

    /// Points added by the matches (achievement rewards excluded).
    pub score_delta: u64,

    /// Gems cleared.
    pub gems_cleared: u64,

    /// Level after the step.
    pub level: u32,

    /// Achievements unlocked by the step.
    pub unlocked: Vec<String>,

    /// Board after gravity and refill.
    pub board: Board,
}

/// Every step of one cascade chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub steps: Vec<CascadeStep>,

    /// Score before the chain started.
    pub score_before: u64,

    /// Score after the chain, rewards included.
    pub score_after: u64,

    /// True if the chain was cut off by the step cap with matches left.
    pub capped: bool,
}

impl CascadeReport {
    /// Number of resolution steps that cleared something.
    #[must_use]
    pub fn chain_length(&self) -> usize {
        self.steps.len()
    }

    /// Total score gained, rewards included.
    #[must_use]
    pub fn score_gained(&self) -> u64 {
        self.score_after - self.score_before
    }

    /// Total gems cleared.
    #[must_use]
    pub fn gems_cleared(&self) -> u64 {
        self.steps.iter().map(|s| s.gems_cleared).sum()
    }

    /// Achievements unlocked anywhere in the chain.
    pub fn unlocked(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().flat_map(|s| s.unlocked.iter().map(String::as_str))
    }
}

/// Run the cascade to a fixpoint.
///
/// `kind_count` is the active difficulty's kind count, used for refills.
/// `now` is the engine's logical clock; a level-up closes the level timer at it.
pub fn resolve_cascade<R: KindSource + ?Sized>(
    state: &mut GameState,
    config: &EngineConfig,
    kind_count: usize,
    source: &mut R,
    now: Duration,
) -> CascadeReport {
    let mut report = CascadeReport {
        score_before: state.score,
        ..CascadeReport::default()
    };

    loop {
        if report.steps.len() >= config.max_cascade_steps as usize {
            tracing::warn!(
                steps = report.steps.len(),
                "cascade hit its step cap; board may still hold matches"
            );
            report.capped = true;
            break;
        }
        match resolve_step(state, config, kind_count, source, now) {
            Some(step) => report.steps.push(step),
            None => break,
        }
    }

    report.score_after = state.score;
    report
}

/// Run a single resolution step.
///
/// Returns `None` (and resets the combo) when the board holds no match.
pub fn resolve_step<R: KindSource + ?Sized>(
    state: &mut GameState,
    config: &EngineConfig,
    kind_count: usize,
    source: &mut R,
    now: Duration,
) -> Option<CascadeStep> {
    let matches = find_all_matches(&state.board, config.min_match_length);
    if matches.is_empty() {
        state.combo = 0;
        return None;
    }

    let mut base_score = 0;
    let mut gems_cleared = 0;
    for m in &matches {
        base_score += calculate_match_score(m, config);
        gems_cleared += m.len() as u64;
        for &pos in m.positions() {
            state.board.set(pos, Cell::Empty);
        }
    }

    state.combo += 1;
    state.best_combo = state.best_combo.max(state.combo);
    let multiplier = combo_multiplier(state.combo, &config.scoring.combo_multipliers);
    let score_delta = apply_multiplier(base_score, multiplier);
    state.score += score_delta;
    state.gems += gems_cleared;
    state.matches_made += matches.len() as u64;

    apply_gravity(&mut state.board);
    refill(&mut state.board, kind_count, source);

    let progress = update_progression(state, config, now);

    tracing::debug!(
        combo = state.combo,
        matches = matches.len(),
        score_delta,
        score = state.score,
        "resolution step"
    );

    Some(CascadeStep {
        matches,
        combo: state.combo,
        base_score,
        multiplier,
        score_delta,
        gems_cleared,
        level: state.level,
        unlocked: progress.unlocked,
        board: state.board.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{GemKind, Position};
    use crate::progression::{AchievementDefinition, AchievementKind};

    /// Replays a fixed sequence of kinds, then repeats the last one.
    struct Script(Vec<u8>);

    impl KindSource for Script {
        fn next_kind(&mut self, _kind_count: usize) -> GemKind {
            let k = if self.0.len() > 1 { self.0.remove(0) } else { self.0[0] };
            GemKind::new(k)
        }
    }

    fn config() -> EngineConfig {
        EngineConfig::default()
            .with_grid_size(4)
            .with_achievements(vec![])
    }

    fn state(board: Board) -> GameState {
        GameState::new(board, "medium", 90)
    }

    #[test]
    fn test_stable_board_resets_combo() {
        let board = Board::from_kinds(&[
            &[0, 1, 0, 1],
            &[1, 0, 1, 0],
            &[0, 1, 0, 1],
            &[1, 0, 1, 0],
        ])
        .unwrap();
        let mut state = state(board.clone());
        state.combo = 3;

        let report = resolve_cascade(&mut state, &config(), 4, &mut Script(vec![2]), Duration::ZERO);

        assert_eq!(report.chain_length(), 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.score, 0);
        assert_eq!(state.board, board);
    }

    #[test]
    fn test_single_step() {
        // Top row of rubies clears; refills alternate 2/3 so nothing new matches
        let board = Board::from_kinds(&[
            &[0, 0, 0, 1],
            &[1, 2, 1, 2],
            &[2, 1, 2, 1],
            &[1, 2, 1, 2],
        ])
        .unwrap();
        let mut state = state(board);

        let report = resolve_cascade(&mut state, &config(), 4, &mut Script(vec![3, 2, 3, 2]), Duration::ZERO);

        assert_eq!(report.chain_length(), 1);
        let step = &report.steps[0];
        assert_eq!(step.combo, 1);
        assert_eq!(step.base_score, 30);
        assert_eq!(step.multiplier, 1.0);
        assert_eq!(step.score_delta, 30);
        assert_eq!(step.gems_cleared, 3);
        assert_eq!(state.score, 30);
        assert_eq!(state.gems, 3);
        assert_eq!(state.matches_made, 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.best_combo, 1);
        assert!(state.board.is_full());
        assert_eq!(state.board.kind_at(Position::new(0, 0)), Some(GemKind::new(3)));
        assert_eq!(state.board.kind_at(Position::new(0, 3)), Some(GemKind::new(1)));
        assert!(find_all_matches(&state.board, 3).is_empty());
        assert_eq!(report.score_gained(), 30);
    }

    #[test]
    fn test_cascade_applies_combo_multiplier() {
        // Clearing the bottom row drops column 0 into a vertical run of 1s.
        // Refill then produces 2, 3, 2, 3 ... which never lines up.
        let board = Board::from_kinds(&[
            &[1, 2, 3, 2],
            &[1, 3, 2, 3],
            &[3, 2, 3, 2],
            &[0, 0, 0, 1],
        ])
        .unwrap();
        let mut state = state(board);
        let refills = vec![1, 2, 3, 2, 3, 2, 3, 2, 3, 2, 3, 2, 3];

        let report = resolve_cascade(&mut state, &config(), 4, &mut Script(refills), Duration::ZERO);

        assert!(report.chain_length() >= 2, "expected a cascade, got {:?}", report.steps);
        assert_eq!(report.steps[0].combo, 1);
        assert_eq!(report.steps[1].combo, 2);
        assert_eq!(report.steps[1].multiplier, 1.2);
        assert_eq!(state.combo, 0);
        assert_eq!(state.best_combo as usize, report.chain_length());
        let summed: u64 = report.steps.iter().map(|s| s.score_delta).sum();
        assert_eq!(state.score, summed);
    }

    #[test]
    fn test_overlapping_matches_both_cleared() {
        // Row 1 and column 1 share (1, 1)
        let board = Board::from_kinds(&[
            &[0, 2, 0, 1],
            &[2, 2, 2, 0],
            &[1, 2, 1, 0],
            &[0, 1, 0, 1],
        ])
        .unwrap();
        let mut state = state(board);

        let step = resolve_step(&mut state, &config(), 4, &mut Script(vec![3]), Duration::ZERO).unwrap();

        assert_eq!(step.matches.len(), 2);
        assert_eq!(step.gems_cleared, 6);
        assert_eq!(step.base_score, 45 + 45);
        assert!(state.board.is_full());
    }

    #[test]
    fn test_step_cap() {
        // Refills of a single kind keep matching forever
        let board = Board::from_kinds(&[
            &[0, 0, 0, 1],
            &[1, 2, 1, 2],
            &[2, 1, 2, 1],
            &[1, 2, 1, 2],
        ])
        .unwrap();
        let mut state = state(board);
        let config = config().with_max_cascade_steps(5);

        let report = resolve_cascade(&mut state, &config, 4, &mut Script(vec![0]), Duration::ZERO);

        assert!(report.capped);
        assert_eq!(report.chain_length(), 5);
        assert_eq!(state.combo, 5);
    }

    #[test]
    fn test_level_and_achievement_within_step() {
        let board = Board::from_kinds(&[
            &[0, 0, 0, 1],
            &[1, 2, 1, 2],
            &[2, 1, 2, 1],
            &[1, 2, 1, 2],
        ])
        .unwrap();
        let mut state = state(board);
        let config = config()
            .with_level_thresholds(vec![0, 20, 35])
            .with_achievements(vec![
                AchievementDefinition::new("first", "First", AchievementKind::Matches, 1).with_reward(10),
            ]);

        let report = resolve_cascade(&mut state, &config, 4, &mut Script(vec![3, 2, 3, 2]), Duration::ZERO);

        let step = &report.steps[0];
        assert_eq!(step.unlocked, vec!["first"]);
        assert_eq!(state.score, 40);
        assert_eq!(step.level, 3);
        assert_eq!(report.score_gained(), 40);
        assert_eq!(report.unlocked().collect::<Vec<_>>(), vec!["first"]);
    }
}
