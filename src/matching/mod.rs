//! Match detection: runs of equal gems along rows and columns.

pub mod detector;

pub use detector::{find_all_matches, find_valid_swap, has_match, swap_creates_match, Axis, Match};
