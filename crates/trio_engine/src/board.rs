//! Core domain types for the 3x3 board.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// A player's mark.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Mark {
    /// X goes first.
    X,
    /// O goes second.
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing placed yet.
    Empty,
    /// Claimed by a player.
    Taken(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Taken(mark) => Some(mark),
        }
    }
}

/// The 8 winning index-triples, in fixed evaluation order:
/// rows, then columns, then diagonals.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Errors from attempting an illegal move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The target cell is already claimed.
    #[display("cell is already taken")]
    CellTaken,
    /// The index is outside 0..9.
    #[display("index out of bounds")]
    IndexOutOfBounds,
}

/// 3x3 tic-tac-toe board, cells in row-major order.
///
/// A cell, once taken, is never cleared; a fresh game gets a fresh
/// board. Move application is pure - `with_move` leaves the receiver
/// untouched and hands the caller a new board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks whether the cell at `index` is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Checks whether every cell is taken.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the indices of all empty cells, in ascending order.
    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns a new board with `mark` placed at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::CellTaken`] if the cell is occupied, or
    /// [`MoveError::IndexOutOfBounds`] if `index` is not in 0..9.
    pub fn with_move(&self, index: usize, mark: Mark) -> Result<Board, MoveError> {
        match self.get(index) {
            None => Err(MoveError::IndexOutOfBounds),
            Some(Cell::Taken(_)) => Err(MoveError::CellTaken),
            Some(Cell::Empty) => {
                let mut next = self.clone();
                next.cells[index] = Cell::Taken(mark);
                Ok(next)
            }
        }
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let index = row * 3 + col;
                let symbol = match self.cells[index] {
                    Cell::Empty => (index + 1).to_string(),
                    Cell::Taken(Mark::X) => "X".to_string(),
                    Cell::Taken(Mark::O) => "O".to_string(),
                };
                out.push_str(&symbol);
                if col < 2 {
                    out.push('|');
                }
            }
            if row < 2 {
                out.push_str("\n-+-+-\n");
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
