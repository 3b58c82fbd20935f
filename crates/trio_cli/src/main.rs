//! Trio - terminal tic-tac-toe.
//!
//! A thin frontend over the session controller: reads commands from
//! stdin, prints the projection after every change. All game logic
//! lives behind the command/projection boundary.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use trio_session::{GameHandle, GameMode, JsonFileStore, Projection, TurnState};

/// Terminal tic-tac-toe with session scores.
#[derive(Parser, Debug)]
#[command(name = "trio")]
#[command(about = "Terminal tic-tac-toe with session scores", long_about = None)]
#[command(version)]
struct Cli {
    /// Play against the computer instead of a second human.
    #[arg(long)]
    vs_ai: bool,

    /// Path of the score snapshot file.
    #[arg(long, default_value = "trio_scores.json")]
    score_file: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let mode = if cli.vs_ai {
        GameMode::HumanVsAi
    } else {
        GameMode::HumanVsHuman
    };

    info!(mode = mode.name(), score_file = %cli.score_file.display(), "starting session");

    let game = GameHandle::new(mode, Box::new(JsonFileStore::new(cli.score_file)));

    println!("trio - {}", mode.name());
    println!("Commands: 1-9 play, r restart, m toggle mode, q quit");
    render(&game.snapshot());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "q" => break,
            "r" => game.restart(),
            "m" => {
                let next = match *game.snapshot().mode() {
                    GameMode::HumanVsHuman => GameMode::HumanVsAi,
                    GameMode::HumanVsAi => GameMode::HumanVsHuman,
                };
                game.set_mode(next);
                println!("Mode: {}", next.name());
            }
            cmd => match cmd.parse::<usize>() {
                Ok(slot @ 1..=9) => {
                    game.play(slot - 1);
                    // Give a scheduled computer reply time to land
                    // before redrawing.
                    if awaiting_ai_reply(&game.snapshot()) {
                        tokio::time::sleep(trio_session::OPPONENT_DELAY * 2).await;
                    }
                }
                _ => {
                    println!("Unknown command: {}", cmd);
                    continue;
                }
            },
        }
        render(&game.snapshot());
    }

    Ok(())
}

/// True while a computer reply is still pending: O to move and the
/// computer plays O.
fn awaiting_ai_reply(projection: &Projection) -> bool {
    *projection.mode() == GameMode::HumanVsAi && *projection.turn() == TurnState::OTurn
}

/// Prints the projection as a grid plus a status/score line.
fn render(projection: &Projection) {
    println!();
    for row in 0..3 {
        let mut cells = Vec::with_capacity(3);
        for col in 0..3 {
            let index = row * 3 + col;
            cells.push(match projection.board()[index] {
                Some(mark) => mark.to_string(),
                None => (index + 1).to_string(),
            });
        }
        println!(" {} ", cells.join(" | "));
        if row < 2 {
            println!("---+---+---");
        }
    }
    let score = projection.score();
    println!(
        "\n{}   [X {} / O {} / draws {}]",
        projection.status_text(),
        score.x_wins(),
        score.o_wins(),
        score.draws()
    );
    if *projection.turn() == TurnState::GameOver {
        println!("Press r to play again.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use trio_session::{GameHandle, MemoryStore, OPPONENT_DELAY};

    #[tokio::test(start_paused = true)]
    async fn test_waits_only_while_computer_reply_pending() {
        let game = GameHandle::new(GameMode::HumanVsAi, Box::new(MemoryStore::new()));
        assert!(!awaiting_ai_reply(&game.snapshot()));

        game.play(0);
        assert!(awaiting_ai_reply(&game.snapshot()));

        // An occupied-cell no-op changes nothing, the reply stays due.
        game.play(0);
        assert!(awaiting_ai_reply(&game.snapshot()));

        tokio::time::sleep(OPPONENT_DELAY + Duration::from_millis(10)).await;
        assert!(!awaiting_ai_reply(&game.snapshot()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_human_mode_never_waits() {
        let game = GameHandle::new(GameMode::HumanVsHuman, Box::new(MemoryStore::new()));
        game.play(0);
        assert!(!awaiting_ai_reply(&game.snapshot()));
    }
}
