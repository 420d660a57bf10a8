use crate::board::{Board, Move, Player};
use crate::error::{Error, Result};
use crate::evaluator::{Score, evaluate};
use crate::minimax_node::MinimaxNode;
use ego_tree::{NodeMut, NodeRef, Tree};
use log::{debug, trace};

/// The number of plies the tree is expanded to unless configured otherwise.
pub const DEFAULT_DEPTH_BOUND: usize = 4;

/// Depth at which the scorer stops descending and evaluates the board directly.
///
/// This is fixed and does not follow the configured depth bound, so with a bound
/// above 3 the deeper levels are built but never scored.
pub const CUTOFF_DEPTH: usize = 3;

/// A move available from the root together with its backed-up score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    /// The cell recovered from the child board.
    pub cell: Move,
    /// The backed-up minimax score of the child.
    pub score: Score,
}

/// A fully materialized, depth-limited game tree used to pick a move by minimax.
///
/// The whole tree is built eagerly on construction. Every node owns its board, so
/// dropping the tree (or calling [`MinimaxTree::clear`]) releases all of it at once.
pub struct MinimaxTree {
    tree: Option<Tree<MinimaxNode>>,
    player: Player,
    depth_bound: usize,
}

/// A builder for creating instances of `MinimaxTree`.
pub struct MinimaxTreeBuilder {
    board: Board,
    player: Player,
    depth_bound: usize,
}

impl MinimaxTreeBuilder {
    /// Creates a new builder for the given position and the player to advise.
    pub fn new(board: Board, player: Player) -> Self {
        Self {
            board,
            player,
            depth_bound: DEFAULT_DEPTH_BOUND,
        }
    }

    /// Sets how many plies below the root are materialized.
    pub fn with_depth_bound(mut self, depth_bound: usize) -> Self {
        self.depth_bound = depth_bound;
        self
    }

    /// Builds the tree with the configured parameters.
    pub fn build(self) -> MinimaxTree {
        MinimaxTree::new(self.board, self.player, self.depth_bound)
    }
}

impl MinimaxTree {
    /// Returns a new builder for `MinimaxTree`.
    pub fn builder(board: Board, player: Player) -> MinimaxTreeBuilder {
        MinimaxTreeBuilder::new(board, player)
    }

    /// Builds the tree for `board` with `player` to move, expanding `depth_bound` plies.
    pub fn new(board: Board, player: Player, depth_bound: usize) -> Self {
        let mut tree = Tree::new(MinimaxNode::new(board, 0, player));
        expand(tree.root_mut(), depth_bound);
        debug!(
            "built minimax tree: {} nodes, depth bound {}, player {}",
            tree.nodes().count(),
            depth_bound,
            player.value()
        );

        Self {
            tree: Some(tree),
            player,
            depth_bound,
        }
    }

    /// Builds the tree with [`DEFAULT_DEPTH_BOUND`].
    pub fn from_board(board: Board, player: Player) -> Self {
        MinimaxTreeBuilder::new(board, player).build()
    }

    /// The player this tree was built to advise.
    pub fn player(&self) -> Player {
        self.player
    }

    /// The number of plies materialized below the root.
    pub fn depth_bound(&self) -> usize {
        self.depth_bound
    }

    /// Returns `true` once [`MinimaxTree::clear`] has released the tree.
    pub fn is_cleared(&self) -> bool {
        self.tree.is_none()
    }

    /// Wraps an already built tree.
    #[cfg(test)]
    fn from_tree(tree: Tree<MinimaxNode>, player: Player, depth_bound: usize) -> Self {
        Self {
            tree: Some(tree),
            player,
            depth_bound,
        }
    }

    /// Returns an immutable view of the root node.
    pub fn root(&self) -> Result<NodeRef<'_, MinimaxNode>> {
        self.tree
            .as_ref()
            .map(|tree| tree.root())
            .ok_or(Error::TreeCleared)
    }

    /// Returns the number of nodes in the tree, the root included.
    pub fn node_count(&self) -> Result<usize> {
        let tree = self.tree.as_ref().ok_or(Error::TreeCleared)?;
        Ok(tree.nodes().count())
    }

    /// Backs up the score of `node` by minimax.
    ///
    /// Leaves and nodes at [`CUTOFF_DEPTH`] are evaluated from the perspective of the
    /// tree's player, whoever is to move there. Otherwise the best child score is taken
    /// when `maximizing`, the worst one when not, alternating on every level.
    pub fn score(&self, node: NodeRef<'_, MinimaxNode>, maximizing: bool) -> Score {
        minimax(node, self.player, maximizing)
    }

    /// Returns every move available from the root with its backed-up score, in
    /// row-major order.
    pub fn scored_moves(&self) -> Result<Vec<ScoredMove>> {
        let root = self.root()?;
        Ok(root
            .children()
            .map(|child| ScoredMove {
                cell: recover_move(&child.value().board, self.player),
                score: self.score(child, false),
            })
            .collect())
    }

    /// Picks the move with the highest backed-up score.
    ///
    /// Each child of the root is scored with the next level minimizing. On equal scores
    /// the first child in row-major order wins. Returns `Ok(None)` when the board is full.
    /// Fails with [`Error::TreeCleared`] after [`MinimaxTree::clear`].
    pub fn get_move(&self) -> Result<Option<Move>> {
        let root = self.root()?;
        let scores = root.children().map(|child| self.score(child, false));
        Ok(self.select(root, scores))
    }

    /// Same as [`MinimaxTree::get_move`], but scores the root's children on the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn get_move_parallel(&self) -> Result<Option<Move>> {
        use rayon::prelude::*;

        let root = self.root()?;
        let children: Vec<_> = root.children().collect();
        let scores: Vec<Score> = children
            .par_iter()
            .map(|&child| self.score(child, false))
            .collect();
        Ok(self.select(root, scores))
    }

    /// Releases the whole tree. The tree must not be queried afterwards.
    pub fn clear(&mut self) {
        if self.tree.take().is_some() {
            debug!("cleared minimax tree for player {}", self.player.value());
        }
    }

    fn select(
        &self,
        root: NodeRef<'_, MinimaxNode>,
        scores: impl IntoIterator<Item = Score>,
    ) -> Option<Move> {
        let mut best: Option<ScoredMove> = None;
        for (child, score) in root.children().zip(scores) {
            trace!("root child scored {}", score);
            if best.is_none_or(|b| score > b.score) {
                best = Some(ScoredMove {
                    cell: recover_move(&child.value().board, self.player),
                    score,
                });
            }
        }

        if let Some(best) = best {
            debug!(
                "selected move {:?} with score {} for player {}",
                best.cell,
                best.score,
                self.player.value()
            );
        }
        best.map(|b| b.cell)
    }
}

/// Appends a child for every empty cell, recursively, until `depth_bound` is reached.
fn expand(mut node: NodeMut<'_, MinimaxNode>, depth_bound: usize) {
    if node.value().depth >= depth_bound {
        return;
    }

    let cells: Vec<Move> = node.value().board.empty_cells().collect();
    for cell in cells {
        let child = node.value().play(cell);
        expand(node.append(child), depth_bound);
    }
}

fn minimax(node: NodeRef<'_, MinimaxNode>, perspective: Player, maximizing: bool) -> Score {
    let data = node.value();
    if !node.has_children() || data.depth == CUTOFF_DEPTH {
        return evaluate(&data.board, perspective);
    }

    let scores = node
        .children()
        .map(|child| minimax(child, perspective, !maximizing));
    let backed_up = if maximizing { scores.max() } else { scores.min() };
    backed_up.unwrap_or_else(|| evaluate(&data.board, perspective))
}

/// Locates the cell maximizing `value * player`, first in row-major order on ties.
///
/// One ply below the root the only new piece is the player's own, so this recovers the
/// move that produced `board` as long as the root holds no other pieces of that player.
fn recover_move(board: &Board, player: Player) -> Move {
    let player = i64::from(player.value());
    let mut best = (0, 0);
    let mut max_value = i64::MIN;
    for (row, col, cell) in board.cells() {
        let value = i64::from(cell) * player;
        if value > max_value {
            max_value = value;
            best = (row, col);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Player};
    use crate::error::Error;
    use crate::minimax::{
        CUTOFF_DEPTH, DEFAULT_DEPTH_BOUND, MinimaxTree, ScoredMove, recover_move,
    };
    use crate::minimax_node::MinimaxNode;
    use ego_tree::Tree;

    fn board(rows: Vec<Vec<i32>>) -> Board {
        Board::from_rows(rows).unwrap()
    }

    fn node(cells: [i32; 4], depth: usize) -> MinimaxNode {
        let player = if depth % 2 == 0 {
            Player::FIRST
        } else {
            Player::SECOND
        };
        MinimaxNode::new(board(vec![cells.to_vec()]), depth, player)
    }

    /// Adds a root move with two replies, each answered by two cutoff positions.
    fn append_move(tree: &mut Tree<MinimaxNode>, cells: [i32; 4], replies: [[[i32; 4]; 2]; 2]) {
        let mut root = tree.root_mut();
        let mut child = root.append(node(cells, 1));
        for answers in replies {
            let mut reply = child.append(node([0; 4], 2));
            for answer in answers {
                reply.append(node(answer, 3));
            }
        }
    }

    /// Three plies on a 1x4 board, cutoff positions scoring (for the first player):
    ///
    /// ```text
    /// root ─ (0, 0) ─ reply ─ 3, 2
    ///      │        └ reply ─ 4, 0
    ///      └ (0, 1) ─ reply ─ 4, -1
    ///               └ reply ─ 4, -2
    /// ```
    ///
    /// Trees grown from a real position score the same across a level, so the
    /// alternation is only visible on positions placed by hand.
    fn hand_built_tree() -> MinimaxTree {
        let mut tree = Tree::new(node([0; 4], 0));
        append_move(
            &mut tree,
            [1, 0, 0, 0],
            [
                [[1, 1, 1, 0], [1, 1, 0, 0]],
                [[1, 1, 1, 1], [0, 0, 0, 0]],
            ],
        );
        append_move(
            &mut tree,
            [0, 1, 0, 0],
            [
                [[1, 1, 1, 1], [-1, 0, 0, 0]],
                [[1, 1, 1, 1], [-1, -1, 0, 0]],
            ],
        );
        MinimaxTree::from_tree(tree, Player::FIRST, 3)
    }

    #[test]
    fn builder_defaults_to_four_plies() {
        let tree = MinimaxTree::builder(board(vec![vec![1, -1]]), Player::FIRST).build();
        assert_eq!(tree.depth_bound(), DEFAULT_DEPTH_BOUND);
        assert_eq!(tree.player(), Player::FIRST);
    }

    #[test]
    fn expansion_alternates_the_mover() {
        // arrange
        let tree = MinimaxTree::builder(board(vec![vec![0, 0]]), Player::FIRST)
            .with_depth_bound(2)
            .build();

        // act
        let root = tree.root().unwrap();
        let first = root.first_child().unwrap();
        let grandchild = first.first_child().unwrap();

        // assert
        assert_eq!(root.children().count(), 2);
        assert_eq!(first.value().board.to_rows(), vec![vec![1, 0]]);
        assert_eq!(first.value().player, Player::SECOND);
        assert_eq!(grandchild.value().board.to_rows(), vec![vec![1, -1]]);
        assert_eq!(grandchild.value().depth, 2);
        assert_eq!(grandchild.value().player, Player::FIRST);
        assert!(!grandchild.has_children());
    }

    #[test]
    fn full_board_stops_expansion_before_depth_bound() {
        let tree = MinimaxTree::builder(board(vec![vec![0]]), Player::FIRST)
            .with_depth_bound(5)
            .build();
        assert_eq!(tree.node_count(), Ok(2));
    }

    #[test]
    fn depth_bound_zero_builds_a_bare_root() {
        let tree = MinimaxTree::builder(board(vec![vec![0, 0]]), Player::FIRST)
            .with_depth_bound(0)
            .build();
        assert_eq!(tree.node_count(), Ok(1));
        assert_eq!(tree.get_move(), Ok(None));
    }

    #[test]
    fn scoring_stops_at_fixed_cutoff_depth() {
        // arrange: 5 empty cells and 5 plies, but only 3 are looked at
        let tree = MinimaxTree::builder(board(vec![vec![0; 5]]), Player::FIRST)
            .with_depth_bound(5)
            .build();
        let root = tree.root().unwrap();
        let cutoff_node = root
            .first_child()
            .and_then(|n| n.first_child())
            .and_then(|n| n.first_child())
            .unwrap();

        // act
        let score = tree.score(cutoff_node, true);

        // assert: [1, -1, 1, 0, 0] has children, yet is evaluated directly
        assert_eq!(cutoff_node.value().depth, CUTOFF_DEPTH);
        assert!(cutoff_node.has_children());
        assert_eq!(score, 1);
    }

    #[test]
    fn levels_alternate_between_max_and_min() {
        // arrange
        let tree = hand_built_tree();
        let root = tree.root().unwrap();
        let first = root.first_child().unwrap();
        let second = root.last_child().unwrap();

        // act + assert: minimizing over replies that each maximize
        assert_eq!(tree.score(first, false), 3);
        assert_eq!(tree.score(second, false), 4);

        // maximizing over replies that each minimize
        assert_eq!(tree.score(first, true), 2);
        assert_eq!(tree.score(second, true), -1);
    }

    #[test]
    fn reply_level_picks_its_best_answer() {
        let tree = hand_built_tree();
        let root = tree.root().unwrap();
        let reply = root.first_child().and_then(|n| n.first_child()).unwrap();

        assert_eq!(tree.score(reply, true), 3);
        assert_eq!(tree.score(reply, false), 2);
    }

    #[test]
    fn root_moves_are_scored_with_a_minimizing_reply() {
        // arrange
        let tree = hand_built_tree();

        // act
        let scored = tree.scored_moves().unwrap();

        // assert: the second move survives the opponent's best reply better
        assert_eq!(
            scored,
            vec![
                ScoredMove {
                    cell: (0, 0),
                    score: 3
                },
                ScoredMove {
                    cell: (0, 1),
                    score: 4
                },
            ]
        );
        assert_eq!(tree.get_move(), Ok(Some((0, 1))));
    }

    #[test]
    fn grown_trees_score_every_root_move_alike() {
        let tree = MinimaxTree::builder(board(vec![vec![0, 0, 0]]), Player::FIRST)
            .with_depth_bound(3)
            .build();
        let scores: Vec<_> = tree.scored_moves().unwrap().iter().map(|m| m.score).collect();
        assert_eq!(scores, vec![1, 1, 1]);
        assert_eq!(tree.get_move(), Ok(Some((0, 0))));
    }

    #[test]
    fn equal_scores_keep_the_first_move() {
        // arrange: the opponent's marker counts for nothing from our side
        let tree = MinimaxTree::builder(board(vec![vec![-4, 0, 0]]), Player::FIRST)
            .with_depth_bound(2)
            .build();

        // act
        let scored = tree.scored_moves().unwrap();

        // assert: every line ends with one piece each beside the marker, score 0
        assert_eq!(scored.len(), 2);
        assert!(scored.iter().all(|m| m.score == 0));
        assert_eq!(scored[0].cell, (0, 1));
        assert_eq!(tree.get_move(), Ok(Some((0, 1))));
    }

    #[test]
    fn move_recovery_follows_the_largest_own_marker() {
        // arrange: an own winning marker already sits on the board
        let tree = MinimaxTree::builder(board(vec![vec![0, 4, 0]]), Player::FIRST)
            .with_depth_bound(1)
            .build();

        // act
        let scored = tree.scored_moves().unwrap();

        // assert: recovery lands on the existing marker since it outweighs the new piece
        assert_eq!(scored[0].score, 101);
        assert_eq!(scored[0].cell, (0, 1));
        assert_eq!(tree.get_move(), Ok(Some((0, 1))));
    }

    #[test]
    fn recover_move_finds_the_players_piece() {
        let child = board(vec![vec![0, 0], vec![0, -1]]);
        assert_eq!(recover_move(&child, Player::SECOND), (1, 1));
        assert_eq!(recover_move(&child, Player::FIRST), (0, 0));
    }

    #[test]
    fn cleared_tree_refuses_queries() {
        // arrange
        let mut tree = MinimaxTree::from_board(board(vec![vec![0, 0]]), Player::FIRST);
        assert!(!tree.is_cleared());

        // act
        tree.clear();

        // assert
        assert!(tree.is_cleared());
        assert!(tree.root().is_err());
        assert_eq!(tree.get_move(), Err(Error::TreeCleared));
        assert_eq!(tree.node_count(), Err(Error::TreeCleared));
        assert_eq!(tree.scored_moves(), Err(Error::TreeCleared));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_selection_follows_the_alternation() {
        let tree = hand_built_tree();
        assert_eq!(tree.get_move_parallel(), Ok(Some((0, 1))));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_selection_matches_sequential() {
        let position = board(vec![vec![0, -1, 0], vec![0, 4, 0]]);
        let tree = MinimaxTree::builder(position, Player::SECOND).build();
        assert_eq!(tree.get_move_parallel(), tree.get_move());
    }
}
