//! The gem grid and its generator.

pub mod generator;
pub mod grid;

pub use generator::{GenerationReport, Generator};
pub use grid::{Board, BoardShapeError, Cell, GemKind, Position};
