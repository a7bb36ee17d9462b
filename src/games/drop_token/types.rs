//! Core domain types for drop token.

use serde::{Deserialize, Serialize};

/// Which seat a token belongs to.
///
/// The first seat moves first and counts `+1` in the line totals,
/// the second seat counts `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Token of the first player (player A).
    First,
    /// Token of the second player (player B).
    Second,
}

impl Token {
    /// Returns the signed unit value used for line-total accounting.
    pub fn value(self) -> i32 {
        match self {
            Token::First => 1,
            Token::Second => -1,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a token.
    Occupied(Token),
}

/// Where a dropped token came to rest (zero-indexed, row 0 is the top row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    /// Row of the token.
    pub row: usize,
    /// Column of the token.
    pub column: usize,
}

/// Square N×N board with running line totals.
///
/// The grid and every total change together inside [`Board::drop_token`];
/// nothing else writes to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    /// Cells in row-major order.
    cells: Vec<Cell>,
    row_totals: Vec<i32>,
    col_totals: Vec<i32>,
    /// Main diagonal, then anti-diagonal.
    diagonal_totals: [i32; 2],
    filled: usize,
}

impl Board {
    /// Creates an empty `size`×`size` board.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
            row_totals: vec![0; size],
            col_totals: vec![0; size],
            diagonal_totals: [0, 0],
            filled: 0,
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Gets the cell at `(row, column)`, zero-indexed.
    pub fn get(&self, row: usize, column: usize) -> Option<Cell> {
        if row >= self.size || column >= self.size {
            return None;
        }
        self.cells.get(row * self.size + column).copied()
    }

    /// Finds the lowest empty row in a zero-indexed column.
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        if column >= self.size {
            return None;
        }
        (0..self.size)
            .rev()
            .find(|&row| self.cells[row * self.size + column] == Cell::Empty)
    }

    /// Drops a token into a zero-indexed column and updates every line total
    /// it touches. Returns `None` when the column is full or out of range.
    pub(super) fn drop_token(&mut self, column: usize, token: Token) -> Option<Placement> {
        let row = self.landing_row(column)?;
        let value = token.value();

        self.cells[row * self.size + column] = Cell::Occupied(token);
        self.row_totals[row] += value;
        self.col_totals[column] += value;
        if row == column {
            self.diagonal_totals[0] += value;
        }
        if row + column == self.size - 1 {
            self.diagonal_totals[1] += value;
        }
        self.filled += 1;

        Some(Placement { row, column })
    }

    /// Returns true if any line touched by `placement` is owned end to end by one token.
    pub fn completes_line(&self, placement: Placement) -> bool {
        let n = self.size as i32;
        let Placement { row, column } = placement;

        self.row_totals[row].abs() == n
            || self.col_totals[column].abs() == n
            || (row == column && self.diagonal_totals[0].abs() == n)
            || (row + column == self.size - 1 && self.diagonal_totals[1].abs() == n)
    }

    /// Returns true if no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.filled == self.cells.len()
    }

    /// Number of occupied cells.
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Per-row token sums.
    pub fn row_totals(&self) -> &[i32] {
        &self.row_totals
    }

    /// Per-column token sums.
    pub fn col_totals(&self) -> &[i32] {
        &self.col_totals
    }

    /// Main and anti-diagonal token sums.
    pub fn diagonal_totals(&self) -> [i32; 2] {
        self.diagonal_totals
    }

    /// Copies the grid out as rows, top row first.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size.max(1)).map(<[Cell]>::to_vec).collect()
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..self.size {
            for column in 0..self.size {
                let symbol = match self.cells[row * self.size + column] {
                    Cell::Empty => '.',
                    Cell::Occupied(Token::First) => 'A',
                    Cell::Occupied(Token::Second) => 'B',
                };
                result.push(symbol);
                if column + 1 < self.size {
                    result.push(' ');
                }
            }
            if row + 1 < self.size {
                result.push('\n');
            }
        }
        result
    }
}

/// Current status of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    /// Game is ongoing.
    #[display("IN_PROGRESS")]
    InProgress,
    /// Game has ended (win, draw or quit).
    #[display("DONE")]
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_stack_from_the_bottom() {
        let mut board = Board::new(4);
        let first = board.drop_token(0, Token::First).unwrap();
        let second = board.drop_token(0, Token::Second).unwrap();

        assert_eq!(first, Placement { row: 3, column: 0 });
        assert_eq!(second, Placement { row: 2, column: 0 });
        assert_eq!(board.get(3, 0), Some(Cell::Occupied(Token::First)));
        assert_eq!(board.get(2, 0), Some(Cell::Occupied(Token::Second)));
        assert_eq!(board.filled(), 2);
    }

    #[test]
    fn test_full_column_rejects_drop() {
        let mut board = Board::new(2);
        assert!(board.drop_token(1, Token::First).is_some());
        assert!(board.drop_token(1, Token::Second).is_some());
        assert_eq!(board.drop_token(1, Token::First), None);
        assert_eq!(board.filled(), 2);
    }

    #[test]
    fn test_out_of_range_column() {
        let mut board = Board::new(3);
        assert_eq!(board.landing_row(3), None);
        assert_eq!(board.drop_token(3, Token::First), None);
    }

    #[test]
    fn test_totals_track_both_diagonals() {
        let mut board = Board::new(3);
        // Bottom-left corner sits on the anti-diagonal only.
        board.drop_token(0, Token::First);
        assert_eq!(board.diagonal_totals(), [0, 1]);
        // Bottom-right corner sits on the main diagonal only.
        board.drop_token(2, Token::Second);
        assert_eq!(board.diagonal_totals(), [-1, 1]);
        assert_eq!(board.row_totals(), &[0, 0, 0]);
        assert_eq!(board.col_totals(), &[1, 0, -1]);
    }

    #[test]
    fn test_centre_of_odd_board_counts_on_both_diagonals() {
        let mut board = Board::new(3);
        board.drop_token(1, Token::Second);
        board.drop_token(1, Token::First);
        assert_eq!(board.diagonal_totals(), [1, 1]);
    }

    #[test]
    fn test_completes_line_on_bottom_row() {
        let mut board = Board::new(2);
        board.drop_token(0, Token::First);
        let placement = board.drop_token(1, Token::First).unwrap();
        assert!(board.completes_line(placement));
    }

    #[test]
    fn test_display() {
        let mut board = Board::new(2);
        board.drop_token(0, Token::First);
        board.drop_token(1, Token::Second);
        assert_eq!(board.display(), ". .\nA B");
    }

    #[test]
    fn test_rows_are_copies() {
        let mut board = Board::new(2);
        let before = board.rows();
        board.drop_token(0, Token::First);
        assert_eq!(before, vec![vec![Cell::Empty; 2]; 2]);
        assert_eq!(board.rows()[1][0], Cell::Occupied(Token::First));
    }
}
