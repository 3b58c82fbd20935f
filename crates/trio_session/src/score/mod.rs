//! Session score counters with durable persistence.

mod error;
mod store;
mod tracker;

pub use error::StoreError;
pub use store::{JsonFileStore, MemoryStore, ScoreStore};
pub use tracker::ScoreTracker;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Per-session score counters.
///
/// Counters only grow within a mode session; the sole way down is an
/// explicit reset on mode change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Score {
    /// Games won by X.
    x_wins: u32,
    /// Games won by O.
    o_wins: u32,
    /// Drawn games.
    draws: u32,
}

impl Score {
    /// Sum of all counters - the number of completed games recorded.
    pub fn total(&self) -> u32 {
        self.x_wins + self.o_wins + self.draws
    }

    pub(crate) fn add_x_win(&mut self) {
        self.x_wins += 1;
    }

    pub(crate) fn add_o_win(&mut self) {
        self.o_wins += 1;
    }

    pub(crate) fn add_draw(&mut self) {
        self.draws += 1;
    }
}
