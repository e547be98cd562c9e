//! Match detection.
//!
//! Every row is scanned left to right and every column top to bottom. Each
//! scan walks maximal runs of one gem kind; a run of at least the minimum
//! length is a `Match`. Both axes are scanned unconditionally, so a cell may
//! belong to one horizontal and one vertical match (L, T and cross shapes).
//! Maximal runs on different axes never cover the same cell set, so no
//! de-duplication pass is needed.
//!
//! Results are ordered: horizontal matches row by row, then vertical matches
//! column by column.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::{Board, Cell, GemKind, Position};

/// Direction of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A run of equal gems along one axis.
///
/// Positions are ordered and contiguous; all share `kind`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    kind: GemKind,
    axis: Axis,
    positions: SmallVec<[Position; 8]>,
}

impl Match {
    /// Gem kind of every member.
    #[must_use]
    pub fn kind(&self) -> GemKind {
        self.kind
    }

    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Member positions in scan order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Run length.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True if the match holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Check if a position is part of this match.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.positions.contains(&pos)
    }
}

/// Find every match on the board.
///
/// ```
/// use gem_cascade::board::{Board, Position};
/// use gem_cascade::matching::find_all_matches;
///
/// let board = Board::from_kinds(&[
///     &[0, 0, 0, 1],
///     &[1, 2, 1, 2],
///     &[2, 1, 2, 1],
///     &[1, 2, 1, 2],
/// ]).unwrap();
///
/// let matches = find_all_matches(&board, 3);
/// assert_eq!(matches.len(), 1);
/// assert_eq!(
///     matches[0].positions(),
///     &[Position::new(0, 0), Position::new(0, 1), Position::new(0, 2)]
/// );
/// ```
#[must_use]
pub fn find_all_matches(board: &Board, min_len: usize) -> Vec<Match> {
    let mut matches = Vec::new();
    for row in 0..board.size() {
        scan_line(board, min_len, Axis::Horizontal, row, &mut matches);
    }
    for col in 0..board.size() {
        scan_line(board, min_len, Axis::Vertical, col, &mut matches);
    }
    matches
}

/// Check if the board holds at least one match.
#[must_use]
pub fn has_match(board: &Board, min_len: usize) -> bool {
    (0..board.size()).any(|line| {
        longest_run(board, Axis::Horizontal, line) >= min_len
            || longest_run(board, Axis::Vertical, line) >= min_len
    })
}

/// Decide whether swapping two cells would create a match.
///
/// The swap is applied, the board checked and the swap reverted, so the
/// board is unchanged on return. Non-adjacent or off-board pairs are never
/// legal.
pub fn swap_creates_match(board: &mut Board, a: Position, b: Position, min_len: usize) -> bool {
    if !a.is_adjacent(b) || !board.contains(a) || !board.contains(b) {
        return false;
    }
    board.swap(a, b);
    let legal = has_match(board, min_len);
    board.swap(a, b);
    legal
}

/// First legal swap in row-major order, if any.
///
/// Hosts use this for hints and to detect boards with no moves left.
#[must_use]
pub fn find_valid_swap(board: &Board, min_len: usize) -> Option<(Position, Position)> {
    let mut scratch = board.clone();
    let size = board.size();
    for pos in board.positions() {
        let right = Position::new(pos.row, pos.col + 1);
        let down = Position::new(pos.row + 1, pos.col);
        for other in [right, down] {
            if other.row < size && other.col < size && swap_creates_match(&mut scratch, pos, other, min_len) {
                return Some((pos, other));
            }
        }
    }
    None
}

#[inline]
fn line_position(axis: Axis, line: usize, offset: usize) -> Position {
    match axis {
        Axis::Horizontal => Position::new(line, offset),
        Axis::Vertical => Position::new(offset, line),
    }
}

/// Walk one row or column and collect its qualifying runs.
fn scan_line(board: &Board, min_len: usize, axis: Axis, line: usize, out: &mut Vec<Match>) {
    let size = board.size();
    let mut start = 0;
    while start < size {
        let cell = board.get(line_position(axis, line, start)).unwrap_or_default();
        let mut end = start + 1;
        if let Cell::Gem(kind) = cell {
            while end < size && board.get(line_position(axis, line, end)) == Some(cell) {
                end += 1;
            }
            if end - start >= min_len {
                out.push(Match {
                    kind,
                    axis,
                    positions: (start..end).map(|offset| line_position(axis, line, offset)).collect(),
                });
            }
        }
        start = end;
    }
}

fn longest_run(board: &Board, axis: Axis, line: usize) -> usize {
    let mut best = 0;
    let mut run = 0;
    let mut previous = Cell::Empty;
    for offset in 0..board.size() {
        let cell = board.get(line_position(axis, line, offset)).unwrap_or_default();
        run = if cell.is_empty() {
            0
        } else if cell == previous {
            run + 1
        } else {
            1
        };
        previous = cell;
        best = best.max(run);
    }
    best
}
