//! Game mode selection.

use serde::{Deserialize, Serialize};

/// Game mode - who plays O?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans sharing the board.
    HumanVsHuman,
    /// Human plays X, the computer plays O.
    HumanVsAi,
}

impl GameMode {
    /// Returns display name.
    pub fn name(&self) -> &str {
        match self {
            GameMode::HumanVsHuman => "Human vs Human",
            GameMode::HumanVsAi => "Human vs AI",
        }
    }
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::HumanVsHuman
    }
}
