//! Pure tic-tac-toe game logic.
//!
//! This crate holds the side-effect-free core of the game: the board
//! representation, win/draw evaluation, and the computer opponent's
//! move heuristic. No I/O, no clocks, no async - orchestration lives
//! in `trio_session`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
pub mod rules;
mod strategy;

pub use board::{Board, Cell, Mark, MoveError, LINES};
pub use rules::Outcome;
pub use strategy::{HeuristicOpponent, IndexChooser, RandomChooser};
