use crate::board::{Board, Move, Player};

/// Represents a single position in the minimax search tree.
///
/// Children are not stored here: the owning [`ego_tree::Tree`] keeps them, so every
/// node owns its subtree through the arena and is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimaxNode {
    /// The position at this node. Each node owns an independent copy.
    pub board: Board,
    /// The number of plies from the root. The root has depth 0.
    pub depth: usize,
    /// The player to move at this node.
    pub player: Player,
}

impl MinimaxNode {
    /// Creates a node holding `board` at `depth` with `player` to move.
    pub fn new(board: Board, depth: usize, player: Player) -> Self {
        MinimaxNode {
            board,
            depth,
            player,
        }
    }

    /// Builds the child reached when the player to move takes `cell`.
    pub fn play(&self, cell: Move) -> Self {
        let mut board = self.board.clone();
        board.place(cell, self.player.value());
        MinimaxNode::new(board, self.depth + 1, self.player.opponent())
    }
}
