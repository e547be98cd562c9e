//! Progression update run after every resolution step and at game end.

use std::time::Duration;

use crate::core::{EngineConfig, GameState};

use super::achievements::check_achievements;
use super::level::check_level_up;

/// What one progression update changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Levels gained.
    pub levels_gained: u32,

    /// Achievements unlocked, in unlock order.
    pub unlocked: Vec<String>,
}

/// Apply level thresholds and achievements until neither changes anything.
///
/// Rewards raise the score and level-ups feed level-based achievements, so
/// each pass can enable the next. Every achievement unlocks at most once and
/// levels are bounded by the threshold table, so the loop ends.
pub fn update_progression(state: &mut GameState, config: &EngineConfig, now: Duration) -> ProgressUpdate {
    let mut update = ProgressUpdate::default();
    loop {
        let levels = check_level_up(state, &config.level_thresholds, now);
        let unlocked = check_achievements(state, &config.achievements);
        update.levels_gained += levels;
        let settled = levels == 0 && unlocked.is_empty();
        update.unlocked.extend(unlocked);
        if settled {
            return update;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::progression::{AchievementDefinition, AchievementKind};

    #[test]
    fn test_reward_can_level_up() {
        let config = EngineConfig::default()
            .with_level_thresholds(vec![0, 100])
            .with_achievements(vec![
                AchievementDefinition::new("first", "First", AchievementKind::Matches, 1).with_reward(60),
            ]);
        let mut state = GameState::new(Board::new(3), "medium", 90);
        state.score = 50;
        state.matches_made = 1;

        let update = update_progression(&mut state, &config, Duration::ZERO);

        assert_eq!(update.unlocked, vec!["first"]);
        assert_eq!(update.levels_gained, 1);
        assert_eq!(state.score, 110);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_reward_level_up_unlocks_level_achievement() {
        let config = EngineConfig::default()
            .with_level_thresholds(vec![0, 35, 180])
            .with_achievements(vec![
                AchievementDefinition::new("first", "First", AchievementKind::Matches, 1).with_reward(10),
                AchievementDefinition::new("perfect", "Perfect", AchievementKind::PerfectLevel, 1).with_reward(150),
            ]);
        let mut state = GameState::new(Board::new(3), "medium", 90);
        state.score = 30;
        state.matches_made = 1;

        let update = update_progression(&mut state, &config, Duration::ZERO);

        // first pays 10 -> level 2 -> perfect pays 150 -> level 3
        assert_eq!(update.unlocked, vec!["first", "perfect"]);
        assert_eq!(update.levels_gained, 2);
        assert_eq!(state.score, 190);
        assert_eq!(state.level, 3);
        assert_eq!(state.perfect_levels, 2);

        // A second update has nothing left to pay out
        assert_eq!(update_progression(&mut state, &config, Duration::ZERO), ProgressUpdate::default());
    }

    #[test]
    fn test_nothing_to_do() {
        let config = EngineConfig::default();
        let mut state = GameState::new(Board::new(3), "medium", 90);

        assert_eq!(update_progression(&mut state, &config, Duration::ZERO), ProgressUpdate::default());
    }
}
