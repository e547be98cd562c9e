//! Progression: levels and achievements.
//!
//! Both read the score and counters the cascade produces and may raise the
//! score further (achievement rewards). Neither ever lowers anything.

pub mod achievements;
pub mod level;
pub mod tracker;

pub use achievements::{check_achievements, AchievementDefinition, AchievementKind};
pub use level::{check_level_up, level_for_score};
pub use tracker::{update_progression, ProgressUpdate};
