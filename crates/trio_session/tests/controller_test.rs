//! Integration tests for the game controller pipeline.
//!
//! Timer-driven behavior runs under paused tokio time, so the 650ms
//! opponent delay and friends elapse deterministically.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use trio_engine::{IndexChooser, Mark};
use trio_session::{
    GameHandle, GameMode, MemoryStore, Score, ScoreStore, StoreError, TurnState,
    HIGHLIGHT_CLEAR_DELAY, OPPONENT_DELAY, SCORE_RESET_DELAY,
};

/// Deterministic fallback: always the lowest empty index.
struct FirstChooser;

impl IndexChooser for FirstChooser {
    fn pick(&mut self, candidates: &[usize]) -> usize {
        candidates[0]
    }
}

/// Store that keeps every snapshot it was asked to write.
#[derive(Clone, Default)]
struct RecordingStore {
    saves: Arc<Mutex<Vec<Score>>>,
}

impl RecordingStore {
    fn zeroed_saves(&self) -> usize {
        self.saves
            .lock()
            .unwrap()
            .iter()
            .filter(|s| **s == Score::default())
            .count()
    }
}

impl ScoreStore for RecordingStore {
    fn load(&self) -> Result<Option<Score>, StoreError> {
        Ok(None)
    }

    fn save(&self, score: &Score) -> Result<(), StoreError> {
        self.saves.lock().unwrap().push(*score);
        Ok(())
    }
}

fn human_game(store: &MemoryStore) -> GameHandle {
    GameHandle::new(GameMode::HumanVsHuman, Box::new(store.clone()))
}

fn ai_game(store: &MemoryStore) -> GameHandle {
    GameHandle::with_chooser(
        GameMode::HumanVsAi,
        Box::new(store.clone()),
        Box::new(FirstChooser),
    )
}

/// X takes the top row: 0,1,2 against O at 3,4.
fn play_x_wins(game: &GameHandle) {
    for index in [0, 3, 1, 4, 2] {
        game.play(index);
    }
}

#[tokio::test(start_paused = true)]
async fn test_turns_alternate_until_terminal() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    assert_eq!(*game.snapshot().turn(), TurnState::XTurn);
    game.play(0);
    assert_eq!(*game.snapshot().turn(), TurnState::OTurn);
    game.play(4);
    assert_eq!(*game.snapshot().turn(), TurnState::XTurn);
}

#[tokio::test(start_paused = true)]
async fn test_win_records_line_status_and_score() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);

    let snap = game.snapshot();
    assert_eq!(*snap.turn(), TurnState::GameOver);
    assert_eq!(*snap.winning_line(), Some([0, 1, 2]));
    assert_eq!(snap.status_text(), "X wins!");
    assert_eq!(*snap.score().x_wins(), 1);
    assert_eq!(store.persisted().unwrap().total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_occupied_cell_is_silent_noop() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    game.play(0);
    let before = game.snapshot();
    game.play(0);
    assert_eq!(game.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_index_is_silent_noop() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    let before = game.snapshot();
    game.play(42);
    assert_eq!(game.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn test_moves_after_game_over_are_ignored() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);
    let before = game.snapshot();
    game.play(5);
    game.play(8);
    assert_eq!(game.snapshot(), before);
    assert_eq!(store.persisted().unwrap().total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_clears_game_but_not_score() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);
    game.restart();

    let snap = game.snapshot();
    assert!(snap.board().iter().all(Option::is_none));
    assert_eq!(*snap.turn(), TurnState::XTurn);
    assert_eq!(*snap.winning_line(), None);
    assert_eq!(*snap.score().x_wins(), 1);
    assert_eq!(store.persisted().unwrap().total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_game_leaves_snapshot_unchanged() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);
    game.restart();
    game.play(4);
    game.play(0);
    game.restart();

    assert_eq!(store.persisted().unwrap().total(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_completed_games_sum_to_game_count() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    for _ in 0..3 {
        play_x_wins(&game);
        game.restart();
    }
    // One draw: X 0,1,5,6,8 / O 2,3,4,7.
    for index in [0, 2, 1, 4, 5, 3, 6, 7, 8] {
        game.play(index);
    }

    let score = game.snapshot().score().clone();
    assert_eq!(score.total(), 4);
    assert_eq!(*score.x_wins(), 3);
    assert_eq!(*score.draws(), 1);
    assert_eq!(store.persisted(), Some(score));
}

#[tokio::test(start_paused = true)]
async fn test_set_mode_resets_score_after_grace_delay() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);
    game.set_mode(GameMode::HumanVsAi);

    // Restart is immediate, the score reset is not.
    let snap = game.snapshot();
    assert!(snap.board().iter().all(Option::is_none));
    assert_eq!(*snap.score().x_wins(), 1);

    tokio::time::sleep(SCORE_RESET_DELAY + Duration::from_millis(10)).await;
    assert_eq!(game.snapshot().score(), &Score::default());
    assert_eq!(store.persisted(), Some(Score::default()));
}

#[tokio::test(start_paused = true)]
async fn test_set_mode_to_same_mode_still_resets_score() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);
    game.set_mode(GameMode::HumanVsHuman);
    tokio::time::sleep(SCORE_RESET_DELAY + Duration::from_millis(10)).await;
    assert_eq!(store.persisted(), Some(Score::default()));
}

#[tokio::test(start_paused = true)]
async fn test_restart_does_not_cancel_pending_score_reset() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);
    game.set_mode(GameMode::HumanVsAi);
    game.restart();

    tokio::time::sleep(SCORE_RESET_DELAY + Duration::from_millis(10)).await;
    assert_eq!(game.snapshot().score(), &Score::default());
}

#[tokio::test(start_paused = true)]
async fn test_second_set_mode_supersedes_pending_reset() {
    let store = RecordingStore::default();
    let game = GameHandle::new(GameMode::HumanVsHuman, Box::new(store.clone()));

    play_x_wins(&game);
    game.set_mode(GameMode::HumanVsAi);
    tokio::time::sleep(Duration::from_millis(100)).await;
    game.set_mode(GameMode::HumanVsHuman);

    // Past both deadlines: only the second change's reset may land.
    tokio::time::sleep(SCORE_RESET_DELAY + Duration::from_millis(10)).await;
    assert_eq!(store.zeroed_saves(), 1);
    assert_eq!(game.snapshot().score(), &Score::default());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_last_handle_cancels_pending_reset() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    play_x_wins(&game);
    game.set_mode(GameMode::HumanVsAi);
    drop(game);

    tokio::time::sleep(SCORE_RESET_DELAY * 2).await;
    assert_eq!(
        store.persisted().unwrap().total(),
        1,
        "score reset applied after teardown"
    );
}

#[tokio::test(start_paused = true)]
async fn test_opponent_move_lands_after_thinking_delay() {
    let store = MemoryStore::new();
    let game = ai_game(&store);

    game.play(0);
    let snap = game.snapshot();
    assert_eq!(*snap.turn(), TurnState::OTurn);
    assert_eq!(snap.board().iter().flatten().count(), 1);

    tokio::time::sleep(OPPONENT_DELAY + Duration::from_millis(10)).await;
    let snap = game.snapshot();
    assert_eq!(*snap.turn(), TurnState::XTurn);
    assert_eq!(snap.board()[0], Some(Mark::X));
    // FirstChooser fallback: lowest empty index.
    assert_eq!(snap.board()[1], Some(Mark::O));
    assert_eq!(snap.board().iter().flatten().count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_opponent_blocks_immediate_threat() {
    let store = MemoryStore::new();
    let game = ai_game(&store);

    game.play(0);
    tokio::time::sleep(OPPONENT_DELAY + Duration::from_millis(10)).await;
    // Board: X0 O1. X threatens 0,3,6.
    game.play(3);
    tokio::time::sleep(OPPONENT_DELAY + Duration::from_millis(10)).await;

    assert_eq!(game.snapshot().board()[6], Some(Mark::O));
}

#[tokio::test(start_paused = true)]
async fn test_restart_cancels_pending_opponent_move() {
    let store = MemoryStore::new();
    let game = ai_game(&store);

    game.play(0);
    game.restart();

    tokio::time::sleep(OPPONENT_DELAY * 2).await;
    let snap = game.snapshot();
    assert!(snap.board().iter().all(Option::is_none), "stale opponent move applied");
    assert_eq!(*snap.turn(), TurnState::XTurn);
}

#[tokio::test(start_paused = true)]
async fn test_mode_change_cancels_pending_opponent_move() {
    let store = MemoryStore::new();
    let game = ai_game(&store);

    game.play(0);
    game.set_mode(GameMode::HumanVsHuman);

    tokio::time::sleep(OPPONENT_DELAY * 2).await;
    assert!(game.snapshot().board().iter().all(Option::is_none));
}

#[tokio::test(start_paused = true)]
async fn test_highlight_follows_last_move_then_clears() {
    let store = MemoryStore::new();
    let game = human_game(&store);

    game.play(4);
    assert_eq!(*game.snapshot().highlight(), Some(4));

    game.play(0);
    assert_eq!(*game.snapshot().highlight(), Some(0));

    tokio::time::sleep(HIGHLIGHT_CLEAR_DELAY + Duration::from_millis(10)).await;
    assert_eq!(*game.snapshot().highlight(), None);
}

#[tokio::test(start_paused = true)]
async fn test_ai_win_is_scored_for_o() {
    let store = MemoryStore::new();
    let game = ai_game(&store);

    // X 8 -> O falls back to 0; X 5 threatens 2,5,8 -> O blocks at 2,
    // quietly building the top row; X 7 -> O wins at 1.
    for index in [8, 5, 7] {
        game.play(index);
        tokio::time::sleep(OPPONENT_DELAY + Duration::from_millis(10)).await;
    }

    let snap = game.snapshot();
    assert_eq!(snap.status_text(), "O wins!");
    assert_eq!(*snap.winning_line(), Some([0, 1, 2]));
    assert_eq!(*snap.score().o_wins(), 1);
    assert_eq!(store.persisted().unwrap().total(), 1);
}
