//! Error types for the minimax crate.

use thiserror::Error;

/// Errors surfaced by board construction and tree search.
#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error("board must have at least one row and one column")]
    EmptyBoard,

    #[error("row {row} has {got} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("invalid player {value}: a player must be a nonzero sign value with an opponent")]
    InvalidPlayer { value: i32 },

    #[error("cell ({row}, {col}) is outside a {height}x{width} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
    },

    #[error("invalid cell '{token}' in row {row}")]
    InvalidCell { token: String, row: usize },

    #[error("the tree has been cleared")]
    TreeCleared,
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
