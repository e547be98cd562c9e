//! # gem-cascade
//!
//! Rules engine for a match-3 gem puzzle.
//!
//! ## Design Principles
//!
//! 1. **Engine owns the state**: one `Engine` holds one `GameState` and every
//!    mutation goes through its public operations.
//!
//! 2. **Host drives time**: no timers or threads inside. The host calls
//!    `tick(elapsed)`; cascades resolve synchronously and come back as an
//!    ordered list of steps the host may animate at its own pace.
//!
//! 3. **Configuration over convention**: board size, gem catalog,
//!    difficulties, score tables, levels and achievements are all data in
//!    `EngineConfig`, validated once at construction.
//!
//! ## Modules
//!
//! - `core`: configuration, errors, RNG, game state
//! - `board`: board, gem kinds, positions, initial generation
//! - `matching`: run detection and swap legality
//! - `cascade`: scoring, gravity, refill and the resolution loop
//! - `progression`: levels and achievements
//! - `engine`: the `Engine` and `SharedEngine`

pub mod board;
pub mod cascade;
pub mod core;
pub mod engine;
pub mod matching;
pub mod progression;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, EngineError,
    EngineConfig, GemDefinition, DifficultyConfig, Rarity, ScoreTable, RarityMultipliers,
    GameRng, GameRngState, KindSource,
    GameState, GameStats, GameSnapshot, GameStatus,
};

pub use crate::board::{Board, BoardShapeError, Cell, GemKind, Position, Generator, GenerationReport};

pub use crate::matching::{Match, Axis, find_all_matches, find_valid_swap};

pub use crate::cascade::{CascadeReport, CascadeStep, resolve_cascade};

pub use crate::progression::{AchievementDefinition, AchievementKind, ProgressUpdate};

pub use crate::engine::{Engine, SelectOutcome, SharedEngine};
