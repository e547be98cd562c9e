//! Cascade resolution: scoring, gravity, refill and the resolution loop.
//!
//! ## Key Features
//!
//! - **Fixpoint loop**: `resolve_cascade` repeats resolution steps until the
//!   board is stable, bounded by `EngineConfig::max_cascade_steps`
//! - **Step reports**: every step carries the matches it cleared, the combo
//!   multiplier and a board snapshot for animation replay
//! - **Pluggable refills**: new gems come from any `KindSource`

pub mod gravity;
pub mod resolver;
pub mod scoring;

pub use gravity::{apply_gravity, refill};
pub use resolver::{resolve_cascade, resolve_step, CascadeReport, CascadeStep};
pub use scoring::{apply_multiplier, base_score, calculate_match_score, combo_multiplier};
