//! A small and simple library for depth-limited minimax search on grid boards.
//!
//! Given a rectangular board of integers (`0` for empty, the sign for ownership) and the
//! player to move, the library eagerly builds every continuation up to a depth bound and
//! backs up a heuristic evaluation by minimax to choose the next move.
//!
//! There is no pruning, memoization or move ordering: the tree grows with the product of
//! the empty cells at each level, so keep boards and depth bounds small.
//!
//! # Example
//!
//! ```rust
//! use minimax_lib::board::{Board, Player};
//! use minimax_lib::minimax::{MinimaxTree, DEFAULT_DEPTH_BOUND};
//!
//! // Create a 1x2 board with both cells empty
//! let board = Board::from_rows(vec![vec![0, 0]]).unwrap();
//!
//! // Build the tree, one ply deep
//! let mut tree = MinimaxTree::builder(board, Player::FIRST)
//!     .with_depth_bound(1)
//!     .build();
//!
//! // Both moves score the same, so the first one wins
//! let best_move = tree.get_move().unwrap();
//! assert_eq!(best_move, Some((0, 0)));
//!
//! // Release the tree once done with it
//! tree.clear();
//! # assert!(DEFAULT_DEPTH_BOUND > 1);
//! ```

/// Contains the `Board` grid, the `Player` sign and the `Move` coordinate type.
pub mod board;
/// Error types shared across the crate.
pub mod error;
/// The heuristic used to score boards.
pub mod evaluator;
/// The core module of the library, containing the `MinimaxTree` implementation.
pub mod minimax;
/// Contains the `MinimaxNode` struct, which represents a node in the search tree.
pub mod minimax_node;

pub use error::{Error, Result};
