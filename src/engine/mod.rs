//! The public game engine and its thread-safe handle.

pub mod game;
pub mod shared;

pub use game::{Engine, SelectOutcome};
pub use shared::SharedEngine;
