extern crate minimax_lib;

use minimax_lib::board::{Board, Player};
use minimax_lib::minimax::MinimaxTree;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    // Create a 3x3 board holding a few of the opponent's pieces
    let mut rng = StdRng::seed_from_u64(7);
    let board = random_opponent_position(&mut rng, 3, 3, 3);
    println!("{board}");

    // Build the full tree four plies deep
    let tree = MinimaxTree::from_board(board, Player::FIRST);
    println!("Nodes: {}", tree.node_count().unwrap());

    // Print the score of every move
    for scored in tree.scored_moves().unwrap() {
        println!("Move: {:?} = {}", scored.cell, scored.score);
    }

    // Get the most promising move
    let best_move = tree.get_move().unwrap();
    println!("The best move is: {:?}", best_move);
}

/// Places `pieces` opposing pieces on an empty board, some of them as winning markers.
fn random_opponent_position(rng: &mut StdRng, height: usize, width: usize, pieces: usize) -> Board {
    let mut board = Board::new(height, width).unwrap();
    let mut placed = 0;
    while placed < pieces {
        let row = rng.random_range(0..height);
        let col = rng.random_range(0..width);
        if board.get(row, col).unwrap() != 0 {
            continue;
        }
        let value = if rng.random_bool(0.3) { -4 } else { -1 };
        board.set(row, col, value).unwrap();
        placed += 1;
    }
    board
}
