//! Score aggregation over completed games.

use super::{Score, ScoreStore};
use tracing::{debug, info, instrument, warn};
use trio_engine::{Mark, Outcome};

/// Session score counters backed by a [`ScoreStore`].
///
/// The in-memory counters are authoritative; persistence is
/// best-effort. A failed save is logged and swallowed, and the next
/// successful save overwrites whatever the store held.
pub struct ScoreTracker {
    score: Score,
    store: Box<dyn ScoreStore>,
}

impl ScoreTracker {
    /// Creates a tracker over `store`, seeding counters from the
    /// persisted snapshot.
    ///
    /// A missing or unreadable snapshot seeds all-zero counters; the
    /// failure is logged, never propagated.
    #[instrument(skip(store))]
    pub fn load(store: Box<dyn ScoreStore>) -> Self {
        let score = match store.load() {
            Ok(Some(score)) => {
                info!(?score, "score snapshot restored");
                score
            }
            Ok(None) => {
                debug!("no score snapshot, starting from zero");
                Score::default()
            }
            Err(err) => {
                warn!(%err, "score snapshot unreadable, starting from zero");
                Score::default()
            }
        };
        Self { score, store }
    }

    /// Current counters.
    pub fn score(&self) -> Score {
        self.score
    }

    /// Folds a completed game into the counters and persists.
    ///
    /// `InProgress` is a no-op. Each terminal outcome bumps exactly
    /// one counter, then the full snapshot is written synchronously.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::InProgress => return,
            Outcome::Won { mark: Mark::X, .. } => self.score.add_x_win(),
            Outcome::Won { mark: Mark::O, .. } => self.score.add_o_win(),
            Outcome::Draw => self.score.add_draw(),
        }
        info!(score = ?self.score, "game recorded");
        self.persist();
    }

    /// Zeroes all counters and persists the zeroed snapshot.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.score = Score::default();
        info!("score reset");
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.score) {
            warn!(%err, "score snapshot not persisted");
        }
    }
}

impl std::fmt::Debug for ScoreTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTracker")
            .field("score", &self.score)
            .finish_non_exhaustive()
    }
}
