use std::collections::BTreeMap;

use connect4::{Board, GameOutcome};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, trace};

use crate::{GameResult, RatingTracker, Statistics};

/// A finished game between two players that pick random legal moves.
pub struct PlayedGame {
    pub board: Board,
    pub outcome: GameOutcome,
    pub num_moves: usize,
}

/// Plays one game on an empty board of the given size, both players picking
/// uniformly among the free columns.
pub fn play_random_game(
    rng: &mut StdRng,
    width: usize,
    height: usize,
) -> anyhow::Result<PlayedGame> {
    let mut board = Board::with_size(width, height)?;
    let mut num_moves = 0;
    while let Some(column) = board.random_move(rng) {
        board = board.apply_move(board.player_to_move(), column)?;
        num_moves += 1;
        trace!(num_moves, column, "Ply");
    }
    // random_move() only returns None once the game is over
    let Some(outcome) = board.outcome() else {
        anyhow::bail!("Game stopped before it ended:\n{}", board);
    };
    Ok(PlayedGame {
        board,
        outcome,
        num_moves,
    })
}

/// Plays `num_games` games between random pairs of the named players, and
/// records each result with the tracker.
///
/// Returns the final statistics of every named player.
pub fn play_tournament(
    rng: &mut StdRng,
    tracker: &RatingTracker,
    names: &[String],
    num_games: usize,
    width: usize,
    height: usize,
) -> anyhow::Result<BTreeMap<String, Statistics>> {
    if names.len() < 2 {
        anyhow::bail!("At least two players are needed, got {}", names.len());
    }

    for game_idx in 0..num_games {
        // Pick two different players, and who of them moves first
        let mut pair: Vec<&String> = names.choose_multiple(rng, 2).collect();
        pair.shuffle(rng);
        let (player_1, player_2) = (pair[0], pair[1]);

        let game = play_random_game(rng, width, height)?;
        let result = GameResult::from(game.outcome);
        debug!(
            game_idx,
            player_1 = %player_1,
            player_2 = %player_2,
            result = u8::from(result),
            num_moves = game.num_moves,
            "Game finished"
        );
        trace!("Final board:\n{}", game.board);
        tracker.record_game(player_1, player_2, result)?;
    }

    Ok(tracker.get_statistics(names))
}
