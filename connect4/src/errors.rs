use crate::Player;

/// The error type for [`Board::apply_move()`](crate::Board::apply_move), i.e. for a single ply.
///
/// Illegal moves are routine (a click on a full column, a click out of turn), so
/// they are reported as values and leave the board untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalMove {
    GameEnded,
    NotPlayersTurn { expected: Player },
    ColumnOutOfBounds { column: usize, width: usize },
    ColumnFull { column: usize },
}

impl std::error::Error for IllegalMove {}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::GameEnded => write!(f, "The game has already ended"),
            IllegalMove::NotPlayersTurn { expected } => {
                write!(f, "It is not this player's turn, {} is to move", expected)
            }
            IllegalMove::ColumnOutOfBounds { column, width } => write!(
                f,
                "Column {} does not exist on a board that is {} columns wide",
                column, width
            ),
            IllegalMove::ColumnFull { column } => write!(f, "Column {} is full", column),
        }
    }
}

/// The error type for building a [`Board`](crate::Board) from untrusted data.
///
/// The engine never produces a malformed board from a valid one, so this only
/// comes up when boards are constructed or deserialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MalformedBoard {
    ZeroSize,
    NotRectangular {
        column: usize,
        expected: usize,
        found: usize,
    },
    InvalidToken {
        value: u8,
    },
    FloatingToken {
        column: usize,
        row: usize,
    },
    TokenImbalance {
        player_1: usize,
        player_2: usize,
    },
    BothPlayersWinning,
}

impl std::error::Error for MalformedBoard {}

impl std::fmt::Display for MalformedBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedBoard::ZeroSize => write!(f, "The board must have at least one row and one column"),
            MalformedBoard::NotRectangular { column, expected, found } => write!(
                f,
                "The board is not rectangular: column {} has {} slots, expected {}",
                column, found, expected
            ),
            MalformedBoard::InvalidToken { value } => {
                write!(f, "The board contains an invalid token {}", value)
            }
            MalformedBoard::FloatingToken { column, row } => write!(
                f,
                "There is an empty slot below a filled one in column {} at row {}",
                column, row
            ),
            MalformedBoard::TokenImbalance { player_1, player_2 } => write!(
                f,
                "There is an imbalance of tokens on the board. Player 1 has {}, Player 2 has {}",
                player_1, player_2
            ),
            MalformedBoard::BothPlayersWinning => {
                write!(f, "The board is winning for both players")
            }
        }
    }
}
