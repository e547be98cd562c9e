//! Achievements.
//!
//! Each definition carries a typed predicate over the game state. Evaluation
//! walks the definitions in declaration order; rewards are added to the score
//! as soon as an achievement unlocks, so a later predicate sees the updated
//! state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::GameState;

/// What an achievement measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    /// Matches cleared ≥ requirement.
    Matches,
    /// Gems cleared ≥ requirement.
    GemsCollected,
    /// Current combo ≥ requirement.
    Combo,
    /// Some level completed within requirement seconds.
    TimeLimit,
    /// Perfect levels ≥ requirement.
    PerfectLevel,
}

/// An achievement definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Unique identifier, recorded in the game state when unlocked.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Predicate type.
    pub kind: AchievementKind,

    /// Threshold compared by the predicate.
    pub requirement: u64,

    /// Points added to the score on unlock.
    pub reward: u64,
}

impl AchievementDefinition {
    /// Create an achievement with no reward.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: AchievementKind, requirement: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            requirement,
            reward: 0,
        }
    }

    /// Set the reward (builder pattern).
    #[must_use]
    pub fn with_reward(mut self, reward: u64) -> Self {
        self.reward = reward;
        self
    }

    /// Evaluate the predicate.
    #[must_use]
    pub fn is_met(&self, state: &GameState) -> bool {
        match self.kind {
            AchievementKind::Matches => state.matches_made >= self.requirement,
            AchievementKind::GemsCollected => state.gems >= self.requirement,
            AchievementKind::Combo => u64::from(state.combo) >= self.requirement,
            AchievementKind::TimeLimit => state
                .fastest_level
                .is_some_and(|took| took <= Duration::from_secs(self.requirement)),
            AchievementKind::PerfectLevel => u64::from(state.perfect_levels) >= self.requirement,
        }
    }
}

/// Unlock every achievement whose predicate now holds.
///
/// Already unlocked achievements are skipped, so repeated calls on an
/// unchanged state neither duplicate ids nor pay rewards twice. Returns the
/// newly unlocked ids in declaration order.
pub fn check_achievements(state: &mut GameState, achievements: &[AchievementDefinition]) -> Vec<String> {
    let mut unlocked = Vec::new();

    for achievement in achievements {
        if state.has_achievement(&achievement.id) || !achievement.is_met(state) {
            continue;
        }
        state.unlock_achievement(&achievement.id);
        state.score += achievement.reward;
        tracing::info!(
            id = %achievement.id,
            reward = achievement.reward,
            score = state.score,
            "achievement unlocked"
        );
        unlocked.push(achievement.id.clone());
    }

    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn state() -> GameState {
        GameState::new(Board::new(3), "medium", 90)
    }

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_predicates() {
        let mut state = state();
        state.fastest_level = Some(secs(30));
        state.matches_made = 2;
        state.gems = 7;
        state.combo = 3;
        state.perfect_levels = 1;

        let check = |kind, requirement| AchievementDefinition::new("a", "A", kind, requirement).is_met(&state);

        assert!(check(AchievementKind::Matches, 2));
        assert!(!check(AchievementKind::Matches, 3));
        assert!(check(AchievementKind::GemsCollected, 7));
        assert!(!check(AchievementKind::GemsCollected, 8));
        assert!(check(AchievementKind::Combo, 3));
        assert!(!check(AchievementKind::Combo, 4));
        assert!(check(AchievementKind::PerfectLevel, 1));
        assert!(check(AchievementKind::TimeLimit, 30));
        assert!(!check(AchievementKind::TimeLimit, 29));
    }

    #[test]
    fn test_time_limit_needs_completed_level() {
        let mut state = state();
        state.started_at = Some(secs(0));
        state.matches_made = 5;
        let def = AchievementDefinition::new("fast", "Fast", AchievementKind::TimeLimit, 30);

        assert!(!def.is_met(&state));

        state.fastest_level = Some(Duration::from_millis(30_001));
        assert!(!def.is_met(&state));
    }

    #[test]
    fn test_unlock_adds_reward_once() {
        let mut state = state();
        state.gems = 150;
        let defs = vec![
            AchievementDefinition::new("collector", "Collector", AchievementKind::GemsCollected, 100)
                .with_reward(50),
        ];

        assert_eq!(check_achievements(&mut state, &defs), vec!["collector"]);
        assert_eq!(state.score, 50);

        assert!(check_achievements(&mut state, &defs).is_empty());
        assert_eq!(state.score, 50);
        assert_eq!(state.achievements.len(), 1);
    }

    #[test]
    fn test_declaration_order() {
        let mut state = state();
        state.matches_made = 1;
        state.gems = 3;
        let defs = vec![
            AchievementDefinition::new("second", "Second", AchievementKind::GemsCollected, 3).with_reward(5),
            AchievementDefinition::new("first", "First", AchievementKind::Matches, 1).with_reward(10),
            AchievementDefinition::new("never", "Never", AchievementKind::Combo, 9).with_reward(99),
        ];

        let unlocked = check_achievements(&mut state, &defs);

        assert_eq!(unlocked, vec!["second", "first"]);
        assert_eq!(state.achievements.iter().cloned().collect::<Vec<_>>(), vec!["second", "first"]);
        assert_eq!(state.score, 15);
    }

    #[test]
    fn test_serde_kind_names() {
        let json = r#"{"id":"c","name":"C","kind":"gems_collected","requirement":5,"reward":1}"#;
        let def: AchievementDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.kind, AchievementKind::GemsCollected);
    }
}
