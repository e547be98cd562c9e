//! Error types.
//!
//! Two families exist:
//! - `ConfigError`: the supplied configuration is unusable. Raised once, when an
//!   engine is constructed, because it points at a programming error.
//! - `EngineError`: a runtime request the engine cannot honour, such as an
//!   unknown difficulty id or a poisoned `SharedEngine` lock.
//!
//! Ordinary gameplay mis-clicks are not errors; they surface as `false` or as a
//! `SelectOutcome` variant.

/// Invalid engine configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid size {size} is smaller than the minimum match length {min_match}")]
    GridTooSmall { size: usize, min_match: usize },

    #[error("minimum match length must be at least 2 (got {0})")]
    MinMatchTooShort(usize),

    #[error("gem catalog is empty")]
    EmptyCatalog,

    #[error("gem catalog holds {0} kinds; at most 256 are supported")]
    CatalogTooLarge(usize),

    #[error("duplicate gem id '{0}'")]
    DuplicateGem(String),

    #[error("duplicate difficulty id '{0}'")]
    DuplicateDifficulty(String),

    #[error("default difficulty '{0}' is not configured")]
    UnknownDefaultDifficulty(String),

    #[error(
        "difficulty '{difficulty}' requests {kind_count} gem kinds; \
         expected between 2 and the catalog size {catalog}"
    )]
    KindCountOutOfRange {
        difficulty: String,
        kind_count: usize,
        catalog: usize,
    },

    #[error("difficulty '{0}' has a zero time limit")]
    ZeroTimeLimit(String),

    #[error("combo multiplier table is empty")]
    EmptyComboTable,

    #[error("combo multiplier table must be non-decreasing")]
    ComboTableNotMonotonic,

    #[error("multiplier '{name}' must be finite and non-negative (got {value})")]
    InvalidMultiplier { name: String, value: f64 },

    #[error("level threshold table is empty")]
    EmptyLevelThresholds,

    #[error("level thresholds must be strictly ascending")]
    LevelThresholdsNotAscending,

    #[error("duplicate achievement id '{0}'")]
    DuplicateAchievement(String),

    #[error("generation attempt cap must be at least 1")]
    ZeroGenerationAttempts,

    #[error("cascade step cap must be at least 1")]
    ZeroCascadeSteps,
}

/// Runtime request the engine cannot honour.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    #[error("engine lock poisoned by a panicking thread")]
    LockPoisoned,
}
