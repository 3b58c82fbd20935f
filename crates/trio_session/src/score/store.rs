//! Durable storage for the score snapshot.

use super::{Score, StoreError};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Durable storage for a single score snapshot.
///
/// One logical key, written in full on every save. Injected into
/// [`super::ScoreTracker`] so there is no hidden global state and
/// tests can observe every write.
pub trait ScoreStore: Send {
    /// Reads the snapshot. `Ok(None)` means nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the stored value exists but cannot be
    /// read or parsed.
    fn load(&self) -> Result<Option<Score>, StoreError>;

    /// Writes the full snapshot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the value cannot be written.
    fn save(&self, score: &Score) -> Result<(), StoreError>;
}

/// Score snapshot persisted as a single JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is created on first save; a missing file loads as
    /// `None`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Option<Score>, StoreError> {
        if !self.path.exists() {
            debug!("no snapshot file");
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let score = serde_json::from_str(&raw)?;
        debug!(?score, "snapshot loaded");
        Ok(Some(score))
    }

    #[instrument(skip(self, score), fields(path = %self.path.display()))]
    fn save(&self, score: &Score) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string(score)?;
        std::fs::write(&self.path, raw)?;
        debug!("snapshot written");
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
///
/// Clones share the same slot, so a test can keep one handle and hand
/// another to the tracker.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<Score>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the currently persisted snapshot, if any.
    pub fn persisted(&self) -> Option<Score> {
        *self.slot.lock().expect("score slot poisoned")
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<Score>, StoreError> {
        Ok(*self.slot.lock().expect("score slot poisoned"))
    }

    fn save(&self, score: &Score) -> Result<(), StoreError> {
        *self.slot.lock().expect("score slot poisoned") = Some(*score);
        Ok(())
    }
}
