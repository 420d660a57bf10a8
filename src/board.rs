use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A move on the board, as a `(row, column)` pair.
pub type Move = (usize, usize);

/// One of the two opposing sides of a game.
///
/// A player is identified by a nonzero sign value. Cells owned by a player hold
/// that value (or a multiple of it), cells owned by the opponent hold its negation.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Player(i32);

impl Player {
    /// The side marked with `+1`.
    pub const FIRST: Player = Player(1);
    /// The side marked with `-1`.
    pub const SECOND: Player = Player(-1);

    /// Creates a player from its sign value. Zero is reserved for empty cells, and
    /// `i32::MIN` has no opponent.
    pub fn new(value: i32) -> Result<Self> {
        if value == 0 || value == i32::MIN {
            return Err(Error::InvalidPlayer { value });
        }
        Ok(Player(value))
    }

    /// Returns the raw marker value of this player.
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns the opposing side.
    pub const fn opponent(self) -> Player {
        Player(-self.0)
    }
}

impl TryFrom<i32> for Player {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Player::new(value)
    }
}

/// A dense rectangular grid of cells.
///
/// `0` marks an empty cell, any other value encodes ownership by its sign.
/// Cloning a board produces a fully independent copy.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Board {
    height: usize,
    width: usize,
    cells: Vec<i32>,
}

impl Board {
    /// Creates an all-empty board.
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::EmptyBoard);
        }
        Ok(Self {
            height,
            width,
            cells: vec![0; height * width],
        })
    }

    /// Creates a board from its rows, rejecting empty and ragged grids.
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(Error::EmptyBoard);
        }

        let mut cells = Vec::with_capacity(height * width);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != width {
                return Err(Error::RaggedRow {
                    row,
                    expected: width,
                    got: values.len(),
                });
            }
            cells.extend(values);
        }

        Ok(Self {
            height,
            width,
            cells,
        })
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the value at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<i32> {
        let idx = self.idx(row, col)?;
        Ok(self.cells[idx])
    }

    /// Overwrites the value at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: i32) -> Result<()> {
        let idx = self.idx(row, col)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Iterates over every cell in row-major order as `(row, col, value)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &value)| (i / width, i % width, value))
    }

    /// Iterates over the coordinates of empty cells in row-major order.
    pub fn empty_cells(&self) -> impl Iterator<Item = Move> + '_ {
        self.cells()
            .filter(|&(_, _, value)| value == 0)
            .map(|(row, col, _)| (row, col))
    }

    /// Returns `true` when no cell is empty.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&value| value != 0)
    }

    /// Returns a copy with the sign of every cell flipped. `i32::MIN` stays as is.
    pub fn negated(&self) -> Board {
        Board {
            height: self.height,
            width: self.width,
            cells: self.cells.iter().map(|value| value.wrapping_neg()).collect(),
        }
    }

    /// Returns the cells as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        self.cells
            .chunks(self.width)
            .map(<[i32]>::to_vec)
            .collect()
    }

    /// Places `value` on a cell already known to be on the board.
    pub(crate) fn place(&mut self, (row, col): Move, value: i32) {
        self.cells[row * self.width + col] = value;
    }

    fn idx(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.height || col >= self.width {
            return Err(Error::OutOfBounds {
                row,
                col,
                height: self.height,
                width: self.width,
            });
        }
        Ok(row * self.width + col)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line = row
                .iter()
                .map(|value| format!("{value:>3}"))
                .collect::<String>();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses rows separated by newlines or `;`, cells separated by commas or whitespace.
    fn from_str(s: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for line in s.split(['\n', ';']) {
            if line.trim().is_empty() {
                continue;
            }
            let row = rows.len();
            let values = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<i32>().map_err(|_| Error::InvalidCell {
                        token: token.to_string(),
                        row,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(values);
        }
        Board::from_rows(rows)
    }
}
