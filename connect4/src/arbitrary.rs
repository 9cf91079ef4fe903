use quickcheck::{Arbitrary, Gen};

use crate::Board;

/// A board reached from an empty board by a sequence of legal moves.
#[derive(Clone, Debug)]
pub struct PlayedBoard {
    pub board: Board,
    pub num_moves: usize,
}

impl Arbitrary for PlayedBoard {
    fn arbitrary(g: &mut Gen) -> Self {
        // Either a standard board, or one of up to 8 x 8 slots
        let mut board = if bool::arbitrary(g) {
            Board::empty()
        } else {
            let width = usize::arbitrary(g) % 8 + 1;
            let height = usize::arbitrary(g) % 8 + 1;
            Board::with_size(width, height).unwrap()
        };

        let max_moves = usize::arbitrary(g) % (board.width() * board.height() + 1);
        let mut num_moves = 0;
        while num_moves < max_moves && !board.is_ended() {
            let free_columns = board.free_columns();
            let column = *g.choose(&free_columns).unwrap();
            board = board.apply_move(board.player_to_move(), column).unwrap();
            num_moves += 1;
        }

        PlayedBoard { board, num_moves }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::Player;

    quickcheck! {
        fn token_count_matches_moves(input: PlayedBoard) -> bool {
            let board = &input.board;
            board.num_tokens(Player::One) + board.num_tokens(Player::Two) == input.num_moves
        }
    }
}
