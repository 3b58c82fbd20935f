//! Win and draw evaluation.

use crate::board::{Board, Cell, Mark, LINES};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The result of evaluating a board position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves remain and no line is complete.
    InProgress,
    /// A player completed a line.
    Won {
        /// The winning mark.
        mark: Mark,
        /// The completed index-triple.
        line: [usize; 3],
    },
    /// All cells taken, no line complete.
    Draw,
}

impl Outcome {
    /// Whether the game has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Evaluates a board position.
///
/// Checks the 8 lines in the fixed order of [`LINES`]; the first
/// uniformly-marked line wins. Only one mark advances per move, so at
/// most one line can complete in a legally reached position - the
/// fixed order just keeps evaluation deterministic.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    for line in LINES {
        let [a, b, c] = line;
        if let Some(Cell::Taken(mark)) = board.get(a) {
            if board.get(b) == board.get(a) && board.get(c) == board.get(a) {
                return Outcome::Won { mark, line };
            }
        }
    }

    if board.is_full() {
        Outcome::Draw
    } else {
        Outcome::InProgress
    }
}
