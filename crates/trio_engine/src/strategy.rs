//! Computer opponent move selection.
//!
//! A three-tier heuristic: take an immediate win, otherwise block the
//! opponent's immediate win, otherwise pick a random empty cell. The
//! random source is injected so tests can pin the fallback.

use crate::board::{Board, Mark};
use crate::rules::{evaluate, Outcome};
use rand::Rng;
use tracing::{debug, instrument};

/// Picks one index out of a non-empty candidate list.
///
/// Injected into [`HeuristicOpponent`] so the random fallback can be
/// replaced with a deterministic source in tests.
pub trait IndexChooser {
    /// Returns one element of `candidates`. `candidates` is never empty.
    fn pick(&mut self, candidates: &[usize]) -> usize;
}

impl<T: IndexChooser + ?Sized> IndexChooser for Box<T> {
    fn pick(&mut self, candidates: &[usize]) -> usize {
        (**self).pick(candidates)
    }
}

/// Uniformly-random chooser backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandomChooser;

impl IndexChooser for RandomChooser {
    fn pick(&mut self, candidates: &[usize]) -> usize {
        let mut rng = rand::rng();
        candidates[rng.random_range(0..candidates.len())]
    }
}

/// The computer opponent: win, block, then random.
#[derive(Debug, derive_new::new)]
pub struct HeuristicOpponent<C: IndexChooser> {
    chooser: C,
}

impl<C: IndexChooser> HeuristicOpponent<C> {
    /// Selects a move for `mark` on `board`.
    ///
    /// Priority: an immediately winning index for `mark`, else an
    /// index that denies the opposing mark an immediate win, else a
    /// chooser-picked empty index. Never returns a taken index.
    /// Returns `None` only when the board has no empty cell, which the
    /// caller rules out by checking the outcome before asking.
    #[instrument(skip(self, board), fields(mark = %mark))]
    pub fn select(&mut self, board: &Board, mark: Mark) -> Option<usize> {
        let empties = board.empty_indices();
        if empties.is_empty() {
            return None;
        }

        if let Some(index) = Self::winning_index(board, &empties, mark) {
            debug!(index, "taking winning move");
            return Some(index);
        }

        if let Some(index) = Self::winning_index(board, &empties, mark.opponent()) {
            debug!(index, "blocking opponent win");
            return Some(index);
        }

        let index = self.chooser.pick(&empties);
        debug!(index, "random fallback");
        Some(index)
    }

    /// Finds an empty index that completes a line for `mark`, if any.
    fn winning_index(board: &Board, empties: &[usize], mark: Mark) -> Option<usize> {
        empties.iter().copied().find(|&index| {
            let probe = board
                .with_move(index, mark)
                .expect("empty index must accept a mark");
            matches!(evaluate(&probe), Outcome::Won { mark: winner, .. } if winner == mark)
        })
    }
}
