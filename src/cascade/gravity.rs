//! Gravity and refill.

use crate::board::{Board, Cell, Position};
use crate::core::KindSource;

/// Compact every column downward.
///
/// Gems keep their relative order; empty cells end up at the top of the
/// column. Returns the number of gems that moved.
pub fn apply_gravity(board: &mut Board) -> usize {
    let size = board.size();
    let mut moved = 0;

    for col in 0..size {
        let mut write = size;
        for row in (0..size).rev() {
            let pos = Position::new(row, col);
            let cell = board.get(pos).unwrap_or_default();
            if cell.is_empty() {
                continue;
            }
            write -= 1;
            if write != row {
                board.set(Position::new(write, col), cell);
                board.set(pos, Cell::Empty);
                moved += 1;
            }
        }
    }

    moved
}

/// Fill every empty cell with a fresh draw.
///
/// New gems may line up into matches; that is what keeps a cascade going.
/// Returns the number of cells filled.
pub fn refill<R: KindSource + ?Sized>(board: &mut Board, kind_count: usize, source: &mut R) -> usize {
    let empty: Vec<Position> = board
        .positions()
        .filter(|&pos| board.get(pos).is_some_and(Cell::is_empty))
        .collect();

    for &pos in &empty {
        board.set(pos, Cell::Gem(source.next_kind(kind_count)));
    }

    empty.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GemKind;
    use crate::core::GameRng;

    fn gem(k: u8) -> Cell {
        Cell::Gem(GemKind::new(k))
    }

    #[test]
    fn test_gravity_preserves_order() {
        let mut board = Board::from_rows(&[
            vec![gem(1), gem(4), Cell::Empty],
            vec![Cell::Empty, gem(5), Cell::Empty],
            vec![gem(2), Cell::Empty, Cell::Empty],
        ])
        .unwrap();

        let moved = apply_gravity(&mut board);

        let expected = Board::from_rows(&[
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
            vec![gem(1), gem(4), Cell::Empty],
            vec![gem(2), gem(5), Cell::Empty],
        ])
        .unwrap();
        assert_eq!(board, expected);
        assert_eq!(moved, 3);
    }

    #[test]
    fn test_gravity_on_full_board_is_noop() {
        let mut board = Board::from_kinds(&[&[0, 1], &[1, 0]]).unwrap();
        let before = board.clone();

        assert_eq!(apply_gravity(&mut board), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_refill_fills_only_empty_cells() {
        let mut board = Board::from_rows(&[
            vec![Cell::Empty, gem(1)],
            vec![gem(0), gem(1)],
        ])
        .unwrap();

        let filled = refill(&mut board, 2, &mut GameRng::new(3));

        assert_eq!(filled, 1);
        assert!(board.is_full());
        assert_eq!(board.get(Position::new(0, 1)), Some(gem(1)));
        assert_eq!(board.get(Position::new(1, 0)), Some(gem(0)));
        assert!(board.kind_at(Position::new(0, 0)).unwrap().index() < 2);
    }
}
