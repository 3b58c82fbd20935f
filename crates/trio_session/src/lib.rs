//! Game orchestration for the trio engine.
//!
//! Wires the pure logic from `trio_engine` into a playable session:
//! turn sequencing, per-session score counters with durable
//! persistence, and a controller that owns the deferred opponent move.
//! Rendering layers talk to the controller exclusively through
//! commands in ([`GameHandle`]) and a projection out ([`Projection`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod controller;
mod mode;
mod projection;
mod score;
mod turn;

pub use controller::{
    GameController, GameHandle, HIGHLIGHT_CLEAR_DELAY, OPPONENT_DELAY, SCORE_RESET_DELAY,
};
pub use mode::GameMode;
pub use projection::Projection;
pub use score::{JsonFileStore, MemoryStore, Score, ScoreStore, ScoreTracker, StoreError};
pub use turn::TurnState;
