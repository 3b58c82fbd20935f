//! Turn sequencing state machine.

use serde::{Deserialize, Serialize};
use trio_engine::{Mark, Outcome};

/// Whose turn it is, or whether the game has ended.
///
/// Transitions: a non-terminal move flips `XTurn` and `OTurn`; a
/// terminal move enters `GameOver` from either turn. Nothing leaves
/// `GameOver` except a restart, which re-enters `XTurn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// X to move. Initial state.
    XTurn,
    /// O to move.
    OTurn,
    /// Terminal. Only restart leaves this state.
    GameOver,
}

impl TurnState {
    /// The mark expected to move, or `None` once the game is over.
    pub fn mark(self) -> Option<Mark> {
        match self {
            TurnState::XTurn => Some(Mark::X),
            TurnState::OTurn => Some(Mark::O),
            TurnState::GameOver => None,
        }
    }

    /// Advances the state after a move that produced `outcome`.
    pub fn advance(self, outcome: &Outcome) -> Self {
        if outcome.is_terminal() {
            return TurnState::GameOver;
        }
        match self {
            TurnState::XTurn => TurnState::OTurn,
            TurnState::OTurn => TurnState::XTurn,
            TurnState::GameOver => TurnState::GameOver,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState::XTurn
    }
}
