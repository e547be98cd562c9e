//! Core engine types: configuration, errors, RNG, game state.
//!
//! Nothing in here knows how matches are found or scored; those rules live
//! in `matching`, `cascade` and `progression` and operate on these types.

pub mod config;
pub mod error;
pub mod rng;
pub mod state;

pub use config::{DifficultyConfig, EngineConfig, GemDefinition, Rarity, RarityMultipliers, ScoreTable};
pub use error::{ConfigError, EngineError};
pub use rng::{GameRng, GameRngState, KindSource};
pub use state::{GameSnapshot, GameState, GameStats, GameStatus};
