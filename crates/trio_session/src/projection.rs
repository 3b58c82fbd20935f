//! Read-only state projection for rendering layers.

use crate::{GameMode, Score, TurnState};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use trio_engine::Mark;

/// Snapshot of everything a rendering layer needs.
///
/// Produced by [`crate::GameHandle::snapshot`]; the renderer never
/// reaches into the controller directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Projection {
    /// Cells in row-major order, `None` where empty.
    pub(crate) board: [Option<Mark>; 9],
    /// Whose turn it is, or game over.
    pub(crate) turn: TurnState,
    /// Human-readable status line.
    pub(crate) status_text: String,
    /// The completed line, once somebody won.
    pub(crate) winning_line: Option<[usize; 3]>,
    /// The most recent move, until the highlight clears.
    pub(crate) highlight: Option<usize>,
    /// Session score counters.
    pub(crate) score: Score,
    /// Active game mode.
    pub(crate) mode: GameMode,
}
