//! Square gem grid.
//!
//! Row 0 is the top of the board; gravity pulls towards the highest row index.
//! Cells are stored row-major in an `im::Vector`, so cloning a board for a
//! cascade snapshot is O(1).

use im::Vector;
use serde::{Deserialize, Serialize};

/// Gem kind: an index into the configured catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GemKind(pub u8);

impl GemKind {
    /// Create a new gem kind.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Catalog index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for GemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Gem({})", self.0)
    }
}

/// Single cell: empty or holding a gem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Gem(GemKind),
}

impl Cell {
    /// The gem in this cell, if any.
    #[must_use]
    pub fn gem(self) -> Option<GemKind> {
        match self {
            Cell::Gem(kind) => Some(kind),
            Cell::Empty => None,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Board coordinate, 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// True if `other` is exactly one step away horizontally or vertically.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Square grid of cells.
///
/// Deserialisation checks that the cell list fills exactly `size * size`
/// slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vector<Cell>,
}

/// Serialised board before its shape is checked.
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vector<Cell>,
}

/// A serialised board whose cell count does not match its size.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("board of size {size} needs {size}x{size} cells (got {cells})")]
pub struct BoardShapeError {
    pub size: usize,
    pub cells: usize,
}

impl TryFrom<RawBoard> for Board {
    type Error = BoardShapeError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        if raw.size.checked_mul(raw.size) != Some(raw.cells.len()) {
            return Err(BoardShapeError {
                size: raw.size,
                cells: raw.cells.len(),
            });
        }
        Ok(Self {
            size: raw.size,
            cells: raw.cells,
        })
    }
}

impl Board {
    /// Create an empty board.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: std::iter::repeat(Cell::Empty).take(size * size).collect(),
        }
    }

    /// Build a board from rows of cells.
    ///
    /// Returns `None` unless the rows form a square.
    #[must_use]
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.iter().flatten().copied().collect(),
        })
    }

    /// Build a full board from rows of raw kind indices.
    ///
    /// ```
    /// use gem_cascade::board::{Board, GemKind, Position};
    ///
    /// let board = Board::from_kinds(&[
    ///     &[0, 1, 0],
    ///     &[1, 0, 1],
    ///     &[0, 1, 0],
    /// ]).unwrap();
    ///
    /// assert_eq!(board.kind_at(Position::new(1, 0)), Some(GemKind::new(1)));
    /// ```
    #[must_use]
    pub fn from_kinds(rows: &[&[u8]]) -> Option<Self> {
        let rows: Vec<Vec<Cell>> = rows
            .iter()
            .map(|row| row.iter().map(|&k| Cell::Gem(GemKind::new(k))).collect())
            .collect();
        Self::from_rows(&rows)
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if a position lies on the board.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Cell at a position, or `None` off the board.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.contains(pos) {
            self.cells.get(self.index(pos)).copied()
        } else {
            None
        }
    }

    /// Gem at a position, or `None` for empty or off-board cells.
    #[must_use]
    pub fn kind_at(&self, pos: Position) -> Option<GemKind> {
        self.get(pos).and_then(Cell::gem)
    }

    /// Overwrite a cell. Off-board writes are ignored.
    pub fn set(&mut self, pos: Position, cell: Cell) {
        if self.contains(pos) {
            let idx = self.index(pos);
            self.cells.set(idx, cell);
        }
    }

    /// Exchange two cells. Off-board positions are ignored.
    pub fn swap(&mut self, a: Position, b: Position) {
        if self.contains(a) && self.contains(b) {
            let (ia, ib) = (self.index(a), self.index(b));
            self.cells.swap(ia, ib);
        }
    }

    /// Iterate over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// Number of empty cells.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    /// True when no cell is empty.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Raw kind indices per row; `None` marks an empty cell.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<Option<u8>>> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| self.kind_at(Position::new(row, col)).map(GemKind::raw))
                    .collect()
            })
            .collect()
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.to_rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| cell.map_or_else(|| ".".to_string(), |k| k.to_string()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
