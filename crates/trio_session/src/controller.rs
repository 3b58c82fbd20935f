//! Game controller: the sole command surface over the engine.
//!
//! [`GameController`] owns board, turn state, mode, score tracker, and
//! the deferred tasks (opponent move, highlight clear, score reset).
//! [`GameHandle`] shares it behind `Arc<Mutex<_>>` so deferred tasks
//! re-enter the same pipeline that user commands go through.

use crate::projection::Projection;
use crate::score::{ScoreStore, ScoreTracker};
use crate::{GameMode, TurnState};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};
use trio_engine::{rules, Board, HeuristicOpponent, IndexChooser, Outcome, RandomChooser};

/// Pause before the computer opponent moves, so its reply reads as a
/// turn rather than an instant flicker.
pub const OPPONENT_DELAY: Duration = Duration::from_millis(650);

/// How long the last-move highlight stays in the projection.
pub const HIGHLIGHT_CLEAR_DELAY: Duration = Duration::from_millis(300);

/// Grace period between a mode change's restart and its score reset,
/// so the zeroed score lands after the board transition settles.
pub const SCORE_RESET_DELAY: Duration = Duration::from_millis(350);

type BoxedChooser = Box<dyn IndexChooser + Send>;

/// What the caller of [`GameController::play`] must schedule afterwards.
#[derive(Debug, Clone, Copy, Default)]
struct PlayEffects {
    /// A move landed; refresh the highlight-clear task.
    applied: Option<usize>,
    /// The new turn belongs to the computer; schedule its move.
    opponent_due: bool,
    /// Game generation the effects belong to.
    game_epoch: u64,
}

/// Orchestrates one game session.
///
/// All mutation goes through discrete command handlers; the deferred
/// tasks re-enter those same handlers. Two generation counters guard
/// tasks that wake up late: `game_epoch` advances on every restart or
/// mode change and fences the opponent and highlight tasks;
/// `mode_epoch` advances on mode changes only and fences the deferred
/// score reset (a plain restart must not cancel it).
pub struct GameController {
    board: Board,
    turn: TurnState,
    mode: GameMode,
    winner: Option<trio_engine::Mark>,
    winning_line: Option<[usize; 3]>,
    highlight: Option<usize>,
    tracker: ScoreTracker,
    opponent: HeuristicOpponent<BoxedChooser>,
    game_epoch: u64,
    mode_epoch: u64,
    opponent_task: Option<JoinHandle<()>>,
    highlight_task: Option<JoinHandle<()>>,
    reset_task: Option<JoinHandle<()>>,
}

impl GameController {
    fn new(mode: GameMode, store: Box<dyn ScoreStore>, chooser: BoxedChooser) -> Self {
        Self {
            board: Board::new(),
            turn: TurnState::XTurn,
            mode,
            winner: None,
            winning_line: None,
            highlight: None,
            tracker: ScoreTracker::load(store),
            opponent: HeuristicOpponent::new(chooser),
            game_epoch: 0,
            mode_epoch: 0,
            opponent_task: None,
            highlight_task: None,
            reset_task: None,
        }
    }

    /// Applies a move for whoever's turn it is.
    ///
    /// Occupied cell, out-of-range index, or game over: silent no-op,
    /// nothing changes. Otherwise the board advances, the outcome is
    /// evaluated, and on a terminal outcome the score is recorded and
    /// persisted.
    #[instrument(skip(self), fields(turn = ?self.turn))]
    fn play(&mut self, index: usize) -> PlayEffects {
        let effects = PlayEffects {
            game_epoch: self.game_epoch,
            ..PlayEffects::default()
        };

        let Some(mark) = self.turn.mark() else {
            debug!("move ignored, game is over");
            return effects;
        };

        let next = match self.board.with_move(index, mark) {
            Ok(board) => board,
            Err(err) => {
                debug!(%err, "move ignored");
                return effects;
            }
        };
        self.board = next;
        self.highlight = Some(index);

        let outcome = rules::evaluate(&self.board);
        self.turn = self.turn.advance(&outcome);

        match outcome {
            Outcome::InProgress => {}
            Outcome::Won { mark, line } => {
                info!(%mark, ?line, "game won");
                self.winner = Some(mark);
                self.winning_line = Some(line);
                self.tracker.record(&outcome);
            }
            Outcome::Draw => {
                info!("game drawn");
                self.tracker.record(&outcome);
            }
        }

        PlayEffects {
            applied: Some(index),
            opponent_due: self.mode == GameMode::HumanVsAi && self.turn == TurnState::OTurn,
            game_epoch: self.game_epoch,
        }
    }

    /// Asks the opponent heuristic for its move on the current board.
    fn select_opponent_move(&mut self) -> Option<usize> {
        self.turn
            .mark()
            .and_then(|mark| self.opponent.select(&self.board, mark))
    }

    /// Fresh board, X to move. Score untouched.
    #[instrument(skip(self))]
    fn restart(&mut self) {
        self.board = Board::new();
        self.turn = TurnState::XTurn;
        self.winner = None;
        self.winning_line = None;
        self.highlight = None;
        self.game_epoch += 1;
        self.abort_game_tasks();
        info!(epoch = self.game_epoch, "game restarted");
    }

    /// Restart plus a mode switch. The score reset is scheduled by the
    /// handle after the grace delay, not performed here.
    #[instrument(skip(self))]
    fn set_mode(&mut self, mode: GameMode) {
        self.restart();
        self.mode = mode;
        self.mode_epoch += 1;
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
        info!(mode = mode.name(), "mode changed");
    }

    fn abort_game_tasks(&mut self) {
        if let Some(task) = self.opponent_task.take() {
            task.abort();
        }
        if let Some(task) = self.highlight_task.take() {
            task.abort();
        }
    }

    fn status_text(&self) -> String {
        match (self.turn, self.winner) {
            (TurnState::GameOver, Some(mark)) => format!("{} wins!", mark),
            (TurnState::GameOver, None) => "Draw!".to_string(),
            (TurnState::XTurn, _) => "X to move".to_string(),
            (TurnState::OTurn, _) => "O to move".to_string(),
        }
    }

    fn snapshot(&self) -> Projection {
        let mut board = [None; 9];
        for (slot, cell) in board.iter_mut().zip(self.board.cells()) {
            *slot = cell.mark();
        }
        Projection {
            board,
            turn: self.turn,
            status_text: self.status_text(),
            winning_line: self.winning_line,
            highlight: self.highlight,
            score: self.tracker.score(),
            mode: self.mode,
        }
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        self.abort_game_tasks();
        if let Some(task) = self.reset_task.take() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("turn", &self.turn)
            .field("mode", &self.mode)
            .field("game_epoch", &self.game_epoch)
            .finish_non_exhaustive()
    }
}

/// Shared handle to a [`GameController`].
///
/// This is the command surface the rendering layer holds. Cloning is
/// cheap; all clones drive the same session. Must live inside a tokio
/// runtime, since commands schedule deferred tasks. Deferred tasks
/// hold only weak references, so dropping the last handle tears the
/// session down and anything still pending fizzles instead of firing.
#[derive(Debug, Clone)]
pub struct GameHandle {
    inner: Arc<Mutex<GameController>>,
}

impl GameHandle {
    fn upgrade(weak: &std::sync::Weak<Mutex<GameController>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Creates a session with the production random opponent.
    pub fn new(mode: GameMode, store: Box<dyn ScoreStore>) -> Self {
        Self::with_chooser(mode, store, Box::new(RandomChooser))
    }

    /// Creates a session with an injected fallback chooser.
    pub fn with_chooser(
        mode: GameMode,
        store: Box<dyn ScoreStore>,
        chooser: BoxedChooser,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(GameController::new(mode, store, chooser))),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, GameController> {
        self.inner.lock().expect("controller lock poisoned")
    }

    /// Plays at `index` for whoever's turn it is. Illegal commands are
    /// silently ignored.
    pub fn play(&self, index: usize) {
        let effects = self.lock().play(index);
        self.run_effects(effects);
    }

    /// Restarts the current game. Score is untouched; a pending
    /// opponent move is cancelled.
    pub fn restart(&self) {
        self.lock().restart();
    }

    /// Switches mode: restart immediately, zero the score after the
    /// grace delay. A later mode change supersedes a pending reset.
    pub fn set_mode(&self, mode: GameMode) {
        let mode_epoch = {
            let mut ctl = self.lock();
            ctl.set_mode(mode);
            ctl.mode_epoch
        };

        let weak = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(SCORE_RESET_DELAY).await;
            let Some(handle) = GameHandle::upgrade(&weak) else {
                return;
            };
            let mut ctl = handle.lock();
            if ctl.mode_epoch == mode_epoch {
                ctl.tracker.reset();
            }
        });
        self.lock().reset_task = Some(task);
    }

    /// Current state projection for the rendering layer.
    pub fn snapshot(&self) -> Projection {
        self.lock().snapshot()
    }

    fn run_effects(&self, effects: PlayEffects) {
        if let Some(index) = effects.applied {
            self.schedule_highlight_clear(index, effects.game_epoch);
        }
        if effects.opponent_due {
            self.schedule_opponent(effects.game_epoch);
        }
    }

    fn schedule_opponent(&self, game_epoch: u64) {
        let weak = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(OPPONENT_DELAY).await;
            let Some(handle) = GameHandle::upgrade(&weak) else {
                return;
            };
            let effects = {
                let mut ctl = handle.lock();
                // A restart, mode change, or interleaved command may
                // have raced the wakeup; the reply only stands while
                // the board generation matches and O is still to move.
                if ctl.game_epoch != game_epoch || ctl.turn != TurnState::OTurn {
                    debug!("opponent move dropped, state moved on");
                    return;
                }
                let Some(index) = ctl.select_opponent_move() else {
                    return;
                };
                debug!(index, "opponent plays");
                ctl.play(index)
            };
            handle.run_effects(effects);
        });
        self.lock().opponent_task = Some(task);
    }

    fn schedule_highlight_clear(&self, index: usize, game_epoch: u64) {
        let weak = Arc::downgrade(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(HIGHLIGHT_CLEAR_DELAY).await;
            let Some(handle) = GameHandle::upgrade(&weak) else {
                return;
            };
            let mut ctl = handle.lock();
            if ctl.game_epoch == game_epoch && ctl.highlight == Some(index) {
                ctl.highlight = None;
            }
        });
        let mut ctl = self.lock();
        // Supersedes any clear still pending for the previous move.
        if let Some(old) = ctl.highlight_task.replace(task) {
            old.abort();
        }
    }
}
