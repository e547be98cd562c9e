//! Initial board generation.
//!
//! The board is filled with uniform draws, then every cell that belongs to a
//! match is redrawn until no match remains. Nothing bounds how many rounds
//! that takes for an arbitrary kind count, so the loop stops after
//! `max_attempts` rounds. A board returned after hitting the cap may still
//! contain matches; the report says so and a warning is logged.

use crate::core::KindSource;
use crate::matching::find_all_matches;

use super::grid::{Board, Cell, Position};

/// Result of one generation run.
#[derive(Clone, Debug)]
pub struct GenerationReport {
    /// Generated board. Always full.
    pub board: Board,

    /// Redraw rounds spent removing matches.
    pub attempts: u32,

    /// False if the cap was hit with matches still on the board.
    pub converged: bool,
}

/// Board generator.
///
/// ```
/// use gem_cascade::board::Generator;
/// use gem_cascade::core::GameRng;
/// use gem_cascade::matching::find_all_matches;
///
/// let report = Generator::new(8, 4).generate(&mut GameRng::new(42));
/// assert!(report.converged);
/// assert!(find_all_matches(&report.board, 3).is_empty());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Generator {
    size: usize,
    kind_count: usize,
    min_match_length: usize,
    max_attempts: u32,
}

impl Generator {
    /// Create a generator for a `size` x `size` board drawing from the first
    /// `kind_count` catalog kinds.
    #[must_use]
    pub fn new(size: usize, kind_count: usize) -> Self {
        Self {
            size,
            kind_count,
            min_match_length: 3,
            max_attempts: 100,
        }
    }

    /// Set the minimum match length.
    #[must_use]
    pub fn with_min_match_length(mut self, len: usize) -> Self {
        self.min_match_length = len;
        self
    }

    /// Set the redraw cap.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Generate a board.
    pub fn generate<R: KindSource + ?Sized>(&self, source: &mut R) -> GenerationReport {
        let mut board = Board::new(self.size);
        for row in 0..self.size {
            for col in 0..self.size {
                board.set(Position::new(row, col), Cell::Gem(source.next_kind(self.kind_count)));
            }
        }

        let mut attempts = 0;
        loop {
            let matches = find_all_matches(&board, self.min_match_length);
            if matches.is_empty() {
                return GenerationReport {
                    board,
                    attempts,
                    converged: true,
                };
            }
            if attempts >= self.max_attempts {
                tracing::warn!(
                    attempts,
                    remaining_matches = matches.len(),
                    "board generation hit its redraw cap; board still holds matches"
                );
                return GenerationReport {
                    board,
                    attempts,
                    converged: false,
                };
            }
            for m in &matches {
                for &pos in m.positions() {
                    board.set(pos, Cell::Gem(source.next_kind(self.kind_count)));
                }
            }
            attempts += 1;
        }
    }
}
