mod lines;
mod slot;

use std::collections::BTreeSet;

pub use lines::*;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
pub use slot::*;

use crate::{IllegalMove, MalformedBoard};

pub const DEFAULT_WIDTH: usize = 7;
pub const DEFAULT_HEIGHT: usize = 6;

/// A rectangular grid that tokens are dropped into, one at a time.
///
/// It is stored as a list of columns, each listing its slots from the bottom
/// (row 0) upwards. Tokens always fill a column from the bottom, so within a
/// column all tokens come before all empty slots.
///
/// A `Board` is a value: it is never modified once built, and
/// [`Self::apply_move()`] returns a new board instead.
//
// The columns are never empty and all have the same length, so the height is
// the length of the first column.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Slot>>", into = "Vec<Vec<Slot>>")]
pub struct Board {
    columns: Vec<Vec<Slot>>,
}

/// How a finished game turned out.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

impl Board {
    /// A standard empty board, 7 columns wide and 6 rows high.
    pub fn empty() -> Self {
        Self {
            columns: vec![vec![Slot::Empty; DEFAULT_HEIGHT]; DEFAULT_WIDTH],
        }
    }

    /// An empty board of arbitrary size.
    pub fn with_size(width: usize, height: usize) -> Result<Self, MalformedBoard> {
        if width == 0 || height == 0 {
            return Err(MalformedBoard::ZeroSize);
        }
        Ok(Self {
            columns: vec![vec![Slot::Empty; height]; width],
        })
    }

    /// Builds a board from its columns, checking that it could have come up in a game.
    ///
    /// A board is accepted if
    /// - it is non-empty and rectangular,
    /// - there are no empty slots below a token,
    /// - player one has as many tokens as player two, or exactly one more,
    /// - at most one player has a winning line.
    pub fn from_columns(columns: Vec<Vec<Slot>>) -> Result<Self, MalformedBoard> {
        let height = columns.first().map_or(0, Vec::len);
        if height == 0 {
            return Err(MalformedBoard::ZeroSize);
        }
        for (c, column) in columns.iter().enumerate() {
            if column.len() != height {
                return Err(MalformedBoard::NotRectangular {
                    column: c,
                    expected: height,
                    found: column.len(),
                });
            }
            if let Some(row) = column.iter().position(|slot| slot.is_empty()) {
                if let Some(floating) = column[row..].iter().position(|slot| !slot.is_empty()) {
                    return Err(MalformedBoard::FloatingToken {
                        column: c,
                        row: row + floating,
                    });
                }
            }
        }

        let board = Self { columns };
        let player_1 = board.num_tokens(Player::One);
        let player_2 = board.num_tokens(Player::Two);
        if player_1 != player_2 && player_1 != player_2 + 1 {
            return Err(MalformedBoard::TokenImbalance { player_1, player_2 });
        }
        if board.is_winning_for(Player::One) && board.is_winning_for(Player::Two) {
            return Err(MalformedBoard::BothPlayersWinning);
        }
        Ok(board)
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.columns[0].len()
    }

    /// `(width, height)`
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// The columns of the board, each from the bottom up.
    pub fn columns(&self) -> &[Vec<Slot>] {
        &self.columns
    }

    /// Returns `None` if the coordinates are outside of the board.
    pub fn get(&self, column: usize, row: usize) -> Option<Slot> {
        self.columns.get(column)?.get(row).copied()
    }

    pub fn num_tokens(&self, player: Player) -> usize {
        self.columns
            .iter()
            .flatten()
            .filter(|&&slot| slot == Slot::Token(player))
            .count()
    }

    /// Indices of all columns that still have room for a token, in ascending order.
    pub fn free_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.contains(&Slot::Empty))
            .map(|(c, _)| c)
            .collect()
    }

    /// Whose turn it is.
    ///
    /// This is worked out from the tokens on the board each time: if both
    /// players have the same number of tokens, player one is to move.
    pub fn player_to_move(&self) -> Player {
        if self.num_tokens(Player::One) == self.num_tokens(Player::Two) {
            Player::One
        } else {
            Player::Two
        }
    }

    /// Drops a token of `player` into the column, and returns the resulting board.
    ///
    /// The move is rejected if the game is over, if it's not `player`'s turn, or
    /// if the column doesn't exist or is full.
    pub fn apply_move(&self, player: Player, column: usize) -> Result<Board, IllegalMove> {
        if self.is_ended() {
            return Err(IllegalMove::GameEnded);
        }
        let expected = self.player_to_move();
        if player != expected {
            return Err(IllegalMove::NotPlayersTurn { expected });
        }
        let row = self
            .columns
            .get(column)
            .ok_or(IllegalMove::ColumnOutOfBounds {
                column,
                width: self.width(),
            })?
            .iter()
            .position(|slot| slot.is_empty())
            .ok_or(IllegalMove::ColumnFull { column })?;

        let mut columns = self.columns.clone();
        columns[column][row] = Slot::Token(player);
        Ok(Board { columns })
    }

    /// The game is over when a player has won or the board is full.
    pub fn is_ended(&self) -> bool {
        self.outcome().is_some()
    }

    /// Does `player` have four (or more) tokens in a row, in any direction?
    pub fn is_winning_for(&self, player: Player) -> bool {
        self.winning_runs().iter().any(|run| run.player == player)
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        if let Some(run) = self.winning_runs().first() {
            Some(GameOutcome::Winner(run.player))
        } else if self.free_columns().is_empty() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    /// All lines of four or more tokens of the same player on this board.
    pub fn winning_runs(&self) -> Vec<WinningRun> {
        winning_runs(&self.columns)
    }

    /// The `(column, row)` coordinates of every slot that is part of a winning line.
    ///
    /// This can be more than four slots, when a line is longer than four or there
    /// are several lines. Slots where lines cross are only listed once. Empty if
    /// nobody has won.
    pub fn winning_slots(&self) -> BTreeSet<(usize, usize)> {
        self.winning_runs()
            .into_iter()
            .flat_map(|run| run.slots)
            .collect()
    }

    /// Picks a legal column uniformly at random, or `None` when the game is over.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        if self.is_ended() {
            return None;
        }
        self.free_columns().choose(rng).copied()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Vec<Vec<Slot>>> for Board {
    type Error = MalformedBoard;

    fn try_from(columns: Vec<Vec<Slot>>) -> Result<Self, Self::Error> {
        Board::from_columns(columns)
    }
}

impl From<Board> for Vec<Vec<Slot>> {
    fn from(board: Board) -> Self {
        board.columns
    }
}
