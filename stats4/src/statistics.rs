use connect4::{GameOutcome, Player};
use serde::{Deserialize, Serialize};

use crate::TrackerError;

/// The rating everybody starts out with.
pub const INITIAL_ELO: f64 = 100.0;
/// How far a single game can move a rating.
pub const K_FACTOR: f64 = 40.0;

/// The running record of a single named player.
///
/// Results are split by seat: `player_1_*` counts the games this player moved
/// first in, `player_2_*` the games they moved second in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// The Elo rating, see <https://en.wikipedia.org/wiki/Elo_rating_system>.
    pub elo: f64,
    pub player_1_wins: u32,
    pub player_1_losses: u32,
    pub player_1_draws: u32,
    pub player_2_wins: u32,
    pub player_2_losses: u32,
    pub player_2_draws: u32,
    /// Games won since the last loss or draw.
    pub current_streak: u32,
    /// The most games ever won in a row.
    pub longest_streak: u32,
}

/// How a game between two named players ended.
///
/// On the wire, this is the number of the winning seat, or `0` for a draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GameResult {
    Draw,
    Player1Won,
    Player2Won,
}

impl Statistics {
    pub fn new(initial_elo: f64) -> Self {
        Self {
            elo: initial_elo,
            player_1_wins: 0,
            player_1_losses: 0,
            player_1_draws: 0,
            player_2_wins: 0,
            player_2_losses: 0,
            player_2_draws: 0,
            current_streak: 0,
            longest_streak: 0,
        }
    }

    pub fn games_played(&self) -> u32 {
        self.player_1_wins
            + self.player_1_losses
            + self.player_1_draws
            + self.player_2_wins
            + self.player_2_losses
            + self.player_2_draws
    }

    /// Counts a game played from `seat`, and updates the streaks.
    ///
    /// This does not touch the rating, which depends on the opponent.
    pub fn record(&mut self, seat: Player, result: GameResult) {
        let (wins, losses, draws) = match seat {
            Player::One => (
                &mut self.player_1_wins,
                &mut self.player_1_losses,
                &mut self.player_1_draws,
            ),
            Player::Two => (
                &mut self.player_2_wins,
                &mut self.player_2_losses,
                &mut self.player_2_draws,
            ),
        };
        match result.winner() {
            Some(winner) if winner == seat => {
                *wins += 1;
                self.current_streak += 1;
                self.longest_streak = self.longest_streak.max(self.current_streak);
            }
            Some(_) => {
                *losses += 1;
                self.current_streak = 0;
            }
            None => {
                *draws += 1;
                self.current_streak = 0;
            }
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new(INITIAL_ELO)
    }
}

impl GameResult {
    pub fn winner(self) -> Option<Player> {
        match self {
            GameResult::Draw => None,
            GameResult::Player1Won => Some(Player::One),
            GameResult::Player2Won => Some(Player::Two),
        }
    }

    /// The score the player in `seat` gets: 1 for a win, 0.5 for a draw, 0 for a loss.
    pub fn score(self, seat: Player) -> f64 {
        match self.winner() {
            None => 0.5,
            Some(winner) if winner == seat => 1.0,
            Some(_) => 0.0,
        }
    }
}

impl From<GameOutcome> for GameResult {
    fn from(outcome: GameOutcome) -> Self {
        match outcome {
            GameOutcome::Draw => GameResult::Draw,
            GameOutcome::Winner(Player::One) => GameResult::Player1Won,
            GameOutcome::Winner(Player::Two) => GameResult::Player2Won,
        }
    }
}

impl From<GameResult> for u8 {
    fn from(result: GameResult) -> u8 {
        match result {
            GameResult::Draw => 0,
            GameResult::Player1Won => 1,
            GameResult::Player2Won => 2,
        }
    }
}

impl TryFrom<u8> for GameResult {
    type Error = TrackerError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(GameResult::Draw),
            1 => Ok(GameResult::Player1Won),
            2 => Ok(GameResult::Player2Won),
            _ => Err(TrackerError::InvalidResult { code }),
        }
    }
}

/// The probability that a player rated `own` beats a player rated `opponent`.
pub fn expected_score(own: f64, opponent: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - own) / 400.0))
}

/// The new rating of a player rated `own` after scoring `score` against `opponent`.
pub fn updated_elo(own: f64, opponent: f64, score: f64, k_factor: f64) -> f64 {
    own + k_factor * (score - expected_score(own, opponent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings() {
        assert_eq!(expected_score(100.0, 100.0), 0.5);
        assert_eq!(updated_elo(100.0, 100.0, 1.0, K_FACTOR), 120.0);
        assert_eq!(updated_elo(100.0, 100.0, 0.0, K_FACTOR), 80.0);
        assert_eq!(updated_elo(100.0, 100.0, 0.5, K_FACTOR), 100.0);
    }

    #[test]
    fn upset_moves_ratings_further() {
        // 400 points apart, the favourite is expected to score 10/11
        let favourite = expected_score(500.0, 100.0);
        assert!((favourite - 10.0 / 11.0).abs() < 1e-12);
        let underdog_gain = updated_elo(100.0, 500.0, 1.0, K_FACTOR) - 100.0;
        let favourite_gain = updated_elo(500.0, 100.0, 1.0, K_FACTOR) - 500.0;
        assert!(underdog_gain > favourite_gain);
    }

    #[test]
    fn streaks() {
        let mut stats = Statistics::default();
        stats.record(Player::One, GameResult::Player1Won);
        stats.record(Player::Two, GameResult::Player2Won);
        stats.record(Player::One, GameResult::Player1Won);
        assert_eq!((stats.current_streak, stats.longest_streak), (3, 3));
        stats.record(Player::Two, GameResult::Player1Won);
        assert_eq!((stats.current_streak, stats.longest_streak), (0, 3));
        stats.record(Player::One, GameResult::Player1Won);
        stats.record(Player::One, GameResult::Draw);
        assert_eq!((stats.current_streak, stats.longest_streak), (0, 3));
        assert_eq!(stats.player_1_wins, 3);
        assert_eq!(stats.player_1_draws, 1);
        assert_eq!(stats.player_2_wins, 1);
        assert_eq!(stats.player_2_losses, 1);
        assert_eq!(stats.games_played(), 6);
    }

    #[test]
    fn result_codes() {
        assert_eq!(GameResult::try_from(2u8).unwrap(), GameResult::Player2Won);
        assert!(GameResult::try_from(3u8).is_err());
        assert_eq!(
            GameResult::from(GameOutcome::Winner(Player::One)),
            GameResult::Player1Won
        );
        assert_eq!(serde_json::to_string(&GameResult::Draw).unwrap(), "0");
    }

    #[test]
    fn flat_json_fields() {
        let json = serde_json::to_value(Statistics::default()).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "current_streak",
                "elo",
                "longest_streak",
                "player_1_draws",
                "player_1_losses",
                "player_1_wins",
                "player_2_draws",
                "player_2_losses",
                "player_2_wins",
            ]
        );
        assert_eq!(json["elo"], 100.0);
    }
}
