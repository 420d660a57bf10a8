//! Command line front end: prints the move the engine picks for a board.
//!
//! ```text
//! minimax --board "0,0,0;0,1,0;0,0,-1" --player -1 --depth 3 --scores
//! ```

use anyhow::{Context, Result};
use clap::Parser;

use minimax_lib::board::{Board, Player};
use minimax_lib::minimax::{DEFAULT_DEPTH_BOUND, MinimaxTree};

/// Depth-limited minimax move picker for grid boards
#[derive(Parser)]
#[command(name = "minimax")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board rows separated by ';', cells by ',' or spaces (0 = empty)
    #[arg(short, long)]
    board: String,

    /// Player to move, a nonzero sign value
    #[arg(short, long, default_value_t = 1, allow_hyphen_values = true)]
    player: i32,

    /// Number of plies to expand
    #[arg(short, long, default_value_t = DEFAULT_DEPTH_BOUND)]
    depth: usize,

    /// Also print the score of every available move
    #[arg(short, long)]
    scores: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let board: Board = cli.board.parse().context("failed to parse board")?;
    let player = Player::new(cli.player).context("failed to read player")?;

    println!("{board}");
    let tree = MinimaxTree::builder(board, player)
        .with_depth_bound(cli.depth)
        .build();

    if cli.scores {
        for scored in tree.scored_moves()? {
            println!("Move: {:?} = {}", scored.cell, scored.score);
        }
    }

    match tree.get_move()? {
        Some((row, col)) => println!("{row} {col}"),
        None => println!("no move"),
    }
    Ok(())
}
