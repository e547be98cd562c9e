//! Engine configuration.
//!
//! Hosts hand the engine a complete `EngineConfig` at construction:
//! - `GemDefinition`: the gem catalog, in declaration order
//! - `DifficultyConfig`: how many catalog kinds are in play and the time budget
//! - `ScoreTable`: per-length base scores, rarity and combo multipliers
//! - level thresholds and achievement definitions
//!
//! `EngineConfig::default()` reproduces the stock game data. Every field has a
//! serde default, so a partial JSON document only needs to override what it
//! changes.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::board::GemKind;
use crate::progression::{AchievementDefinition, AchievementKind};

/// Rarity tier of a gem kind. Only consulted for scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// One entry of the gem catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GemDefinition {
    /// Stable identifier ("ruby").
    pub id: String,

    /// Display name.
    pub name: String,

    /// Rarity tier used for the scoring multiplier.
    pub rarity: Rarity,
}

impl GemDefinition {
    /// Create a new gem definition.
    pub fn new(id: impl Into<String>, name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rarity,
        }
    }
}

/// A selectable difficulty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Identifier passed to `Engine::set_difficulty`.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Number of catalog kinds in play, taken from the front of the catalog.
    pub kind_count: usize,

    /// Countdown budget in seconds.
    pub time_limit_secs: u32,
}

impl DifficultyConfig {
    /// Create a new difficulty.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind_count: usize, time_limit_secs: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind_count,
            time_limit_secs,
        }
    }
}

/// Score multiplier per rarity tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RarityMultipliers {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub legendary: f64,
}

impl RarityMultipliers {
    /// Multiplier for a tier.
    #[must_use]
    pub fn get(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Legendary => self.legendary,
        }
    }
}

impl Default for RarityMultipliers {
    fn default() -> Self {
        Self {
            common: 1.0,
            uncommon: 1.5,
            rare: 2.0,
            legendary: 3.0,
        }
    }
}

/// Scoring tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreTable {
    /// Base score of a 3-run (and of anything shorter, when the minimum allows it).
    pub match3: u64,

    /// Base score of a 4-run.
    pub match4: u64,

    /// Base score of a 5-run. Longer runs score `match5 * (len - 4)`.
    pub match5: u64,

    /// Multiplier per combo step; the last entry applies to every longer chain.
    pub combo_multipliers: Vec<f64>,

    /// Multiplier per rarity tier.
    pub rarity_multipliers: RarityMultipliers,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self {
            match3: 30,
            match4: 60,
            match5: 120,
            combo_multipliers: vec![1.0, 1.2, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0],
            rarity_multipliers: RarityMultipliers::default(),
        }
    }
}

/// Complete engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Side length of the square board.
    pub grid_size: usize,

    /// Shortest run that counts as a match.
    pub min_match_length: usize,

    /// Gem catalog. Difficulties draw from its first `kind_count` entries.
    pub catalog: Vec<GemDefinition>,

    /// Selectable difficulties.
    pub difficulties: Vec<DifficultyConfig>,

    /// Difficulty used at construction and after `reset`.
    pub default_difficulty: String,

    /// Scoring tables.
    pub scoring: ScoreTable,

    /// Score needed to reach level `i + 1`, ascending.
    pub level_thresholds: Vec<u64>,

    /// Achievements, evaluated in declaration order.
    pub achievements: Vec<AchievementDefinition>,

    /// Redraw rounds the board generator may spend removing initial matches.
    pub generation_attempts: u32,

    /// Resolution steps one cascade chain may run before it is cut off.
    pub max_cascade_steps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: 8,
            min_match_length: 3,
            catalog: vec![
                GemDefinition::new("ruby", "Ruby", Rarity::Common),
                GemDefinition::new("emerald", "Emerald", Rarity::Common),
                GemDefinition::new("sapphire", "Sapphire", Rarity::Uncommon),
                GemDefinition::new("diamond", "Diamond", Rarity::Rare),
                GemDefinition::new("amethyst", "Amethyst", Rarity::Uncommon),
            ],
            difficulties: vec![
                DifficultyConfig::new("easy", "Easy", 3, 120),
                DifficultyConfig::new("medium", "Medium", 4, 90),
                DifficultyConfig::new("hard", "Hard", 5, 60),
            ],
            default_difficulty: "medium".to_string(),
            scoring: ScoreTable::default(),
            level_thresholds: vec![0, 100, 250, 500, 1000, 2000, 4000, 8000],
            achievements: vec![
                AchievementDefinition::new("first_match", "First Match", AchievementKind::Matches, 1)
                    .with_reward(10),
                AchievementDefinition::new("gem_collector", "Gem Collector", AchievementKind::GemsCollected, 100)
                    .with_reward(50),
                AchievementDefinition::new("speed_demon", "Speed Demon", AchievementKind::TimeLimit, 30)
                    .with_reward(100),
                AchievementDefinition::new("combo_master", "Combo Master", AchievementKind::Combo, 5)
                    .with_reward(75),
                AchievementDefinition::new("perfectionist", "Perfectionist", AchievementKind::PerfectLevel, 1)
                    .with_reward(150),
            ],
            generation_attempts: 100,
            max_cascade_steps: 1000,
        }
    }
}

impl EngineConfig {
    /// Set the board size.
    #[must_use]
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }

    /// Set the minimum match length.
    #[must_use]
    pub fn with_min_match_length(mut self, len: usize) -> Self {
        self.min_match_length = len;
        self
    }

    /// Replace the gem catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Vec<GemDefinition>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the difficulty table and pick the default.
    #[must_use]
    pub fn with_difficulties(mut self, difficulties: Vec<DifficultyConfig>, default: impl Into<String>) -> Self {
        self.difficulties = difficulties;
        self.default_difficulty = default.into();
        self
    }

    /// Replace the scoring tables.
    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoreTable) -> Self {
        self.scoring = scoring;
        self
    }

    /// Replace the level thresholds.
    #[must_use]
    pub fn with_level_thresholds(mut self, thresholds: Vec<u64>) -> Self {
        self.level_thresholds = thresholds;
        self
    }

    /// Replace the achievement list.
    #[must_use]
    pub fn with_achievements(mut self, achievements: Vec<AchievementDefinition>) -> Self {
        self.achievements = achievements;
        self
    }

    /// Set the generator's redraw cap.
    #[must_use]
    pub fn with_generation_attempts(mut self, attempts: u32) -> Self {
        self.generation_attempts = attempts;
        self
    }

    /// Set the cascade step cap.
    #[must_use]
    pub fn with_max_cascade_steps(mut self, steps: u32) -> Self {
        self.max_cascade_steps = steps;
        self
    }

    // === Lookup ===

    /// Look up a difficulty by id.
    #[must_use]
    pub fn difficulty(&self, id: &str) -> Option<&DifficultyConfig> {
        self.difficulties.iter().find(|d| d.id == id)
    }

    /// The default difficulty.
    pub fn default_difficulty_config(&self) -> Result<&DifficultyConfig, ConfigError> {
        self.difficulty(&self.default_difficulty)
            .ok_or_else(|| ConfigError::UnknownDefaultDifficulty(self.default_difficulty.clone()))
    }

    /// Catalog entry for a gem kind.
    #[must_use]
    pub fn gem(&self, kind: GemKind) -> Option<&GemDefinition> {
        self.catalog.get(kind.index())
    }

    /// Gem kind for a catalog id.
    #[must_use]
    pub fn gem_kind(&self, id: &str) -> Option<GemKind> {
        self.catalog
            .iter()
            .position(|g| g.id == id)
            .map(|index| GemKind::new(index as u8))
    }

    /// Rarity multiplier applied to matches of `kind`. Unknown kinds score at 1.0.
    #[must_use]
    pub fn rarity_multiplier(&self, kind: GemKind) -> f64 {
        self.gem(kind)
            .map_or(1.0, |gem| self.scoring.rarity_multipliers.get(gem.rarity))
    }

    // === Validation ===

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_match_length < 2 {
            return Err(ConfigError::MinMatchTooShort(self.min_match_length));
        }
        if self.grid_size < self.min_match_length {
            return Err(ConfigError::GridTooSmall {
                size: self.grid_size,
                min_match: self.min_match_length,
            });
        }

        if self.catalog.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        if self.catalog.len() > usize::from(u8::MAX) + 1 {
            return Err(ConfigError::CatalogTooLarge(self.catalog.len()));
        }
        let mut seen = FxHashSet::default();
        for gem in &self.catalog {
            if !seen.insert(gem.id.as_str()) {
                return Err(ConfigError::DuplicateGem(gem.id.clone()));
            }
        }

        let mut seen = FxHashSet::default();
        for difficulty in &self.difficulties {
            if !seen.insert(difficulty.id.as_str()) {
                return Err(ConfigError::DuplicateDifficulty(difficulty.id.clone()));
            }
            if difficulty.kind_count < 2 || difficulty.kind_count > self.catalog.len() {
                return Err(ConfigError::KindCountOutOfRange {
                    difficulty: difficulty.id.clone(),
                    kind_count: difficulty.kind_count,
                    catalog: self.catalog.len(),
                });
            }
            if difficulty.time_limit_secs == 0 {
                return Err(ConfigError::ZeroTimeLimit(difficulty.id.clone()));
            }
        }
        self.default_difficulty_config()?;

        self.validate_scoring()?;

        if self.level_thresholds.is_empty() {
            return Err(ConfigError::EmptyLevelThresholds);
        }
        if !self.level_thresholds.windows(2).all(|w| w[0] < w[1]) {
            return Err(ConfigError::LevelThresholdsNotAscending);
        }

        let mut seen = FxHashSet::default();
        for achievement in &self.achievements {
            if !seen.insert(achievement.id.as_str()) {
                return Err(ConfigError::DuplicateAchievement(achievement.id.clone()));
            }
        }

        if self.generation_attempts == 0 {
            return Err(ConfigError::ZeroGenerationAttempts);
        }
        if self.max_cascade_steps == 0 {
            return Err(ConfigError::ZeroCascadeSteps);
        }

        Ok(())
    }

    fn validate_scoring(&self) -> Result<(), ConfigError> {
        let combo = &self.scoring.combo_multipliers;
        if combo.is_empty() {
            return Err(ConfigError::EmptyComboTable);
        }
        for (i, &value) in combo.iter().enumerate() {
            check_multiplier(&format!("combo[{i}]"), value)?;
        }
        if !combo.windows(2).all(|w| w[0] <= w[1]) {
            return Err(ConfigError::ComboTableNotMonotonic);
        }

        let rarity = &self.scoring.rarity_multipliers;
        check_multiplier("common", rarity.common)?;
        check_multiplier("uncommon", rarity.uncommon)?;
        check_multiplier("rare", rarity.rare)?;
        check_multiplier("legendary", rarity.legendary)?;
        Ok(())
    }
}

fn check_multiplier(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidMultiplier {
            name: name.to_string(),
            value,
        })
    }
}
