use crate::board::{Board, Player};

/// Heuristic score of a board. Positive values favour the perspective player.
pub type Score = i64;

/// Multiple of a player's marker that counts as a decided position.
const WIN_MARKER_MULTIPLIER: i64 = 4;
/// Weight of a single decided cell.
const WIN_SCORE: i64 = 100;

/// Scores `board` from the point of view of `player`.
///
/// A cell holding `4 * player` is treated as a winning marker and adds `100 * player`.
/// Otherwise own pieces add 1 and opposing pieces subtract 1. Empty cells and any
/// other magnitudes are ignored.
pub fn evaluate(board: &Board, player: Player) -> Score {
    let player = i64::from(player.value());
    board
        .cells()
        .map(|(_, _, cell)| {
            let cell = i64::from(cell);
            if cell == WIN_MARKER_MULTIPLIER * player {
                WIN_SCORE * player
            } else if cell == player {
                1
            } else if cell == -player {
                -1
            } else {
                0
            }
        })
        .sum()
}
