use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::Context;
use connect4::Player;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{updated_elo, GameResult, Statistics, TrackerError, INITIAL_ELO, K_FACTOR};

/// Parameters of the rating system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// The rating of a player that hasn't played yet.
    pub initial_elo: f64,
    /// The largest change in rating a single game can cause.
    pub k_factor: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_elo: INITIAL_ELO,
            k_factor: K_FACTOR,
        }
    }
}

impl RatingConfig {
    /// Reads the config from a JSON file. Missing keys keep their default value.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file '{}'", path.display()))?;
        let config: RatingConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Could not parse config file '{}'", path.display()))?;
        if config.k_factor <= 0.0 || !config.k_factor.is_finite() || !config.initial_elo.is_finite()
        {
            anyhow::bail!(
                "Invalid rating config: k_factor must be positive and initial_elo finite, got {:?}",
                config
            );
        }
        Ok(config)
    }
}

/// Keeps the statistics of every player that has finished a game.
///
/// Reads can happen concurrently. Recording a game holds the write lock for the
/// whole update, so games recorded at the same time never overwrite each other.
#[derive(Debug, Default)]
pub struct RatingTracker {
    config: RatingConfig,
    players: RwLock<HashMap<String, Statistics>>,
}

impl RatingTracker {
    pub fn new(config: RatingConfig) -> Self {
        Self {
            config,
            players: RwLock::new(HashMap::new()),
        }
    }

    /// The statistics of the requested players.
    ///
    /// Players without a recorded game get fresh statistics, which are not stored.
    pub fn get_statistics<S: AsRef<str>>(&self, names: &[S]) -> BTreeMap<String, Statistics> {
        let players = self.read_players();
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let stats = players
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| Statistics::new(self.config.initial_elo));
                (String::from(name), stats)
            })
            .collect()
    }

    /// Records a game where `player_1` moved first, and returns the updated
    /// statistics of both players.
    ///
    /// Both new ratings are computed from the ratings before this game.
    pub fn record_game(
        &self,
        player_1: &str,
        player_2: &str,
        result: GameResult,
    ) -> Result<BTreeMap<String, Statistics>, TrackerError> {
        if player_1 == player_2 {
            return Err(TrackerError::SamePlayer {
                name: String::from(player_1),
            });
        }

        let mut players = self.write_players();
        let mut stats_1 = players
            .get(player_1)
            .cloned()
            .unwrap_or_else(|| Statistics::new(self.config.initial_elo));
        let mut stats_2 = players
            .get(player_2)
            .cloned()
            .unwrap_or_else(|| Statistics::new(self.config.initial_elo));

        let elo_1 = updated_elo(
            stats_1.elo,
            stats_2.elo,
            result.score(Player::One),
            self.config.k_factor,
        );
        let elo_2 = updated_elo(
            stats_2.elo,
            stats_1.elo,
            result.score(Player::Two),
            self.config.k_factor,
        );
        stats_1.record(Player::One, result);
        stats_2.record(Player::Two, result);
        stats_1.elo = elo_1;
        stats_2.elo = elo_2;
        debug!(
            player_1,
            player_2,
            result = u8::from(result),
            elo_1,
            elo_2,
            "Recorded game"
        );

        players.insert(String::from(player_1), stats_1.clone());
        players.insert(String::from(player_2), stats_2.clone());
        Ok(BTreeMap::from([
            (String::from(player_1), stats_1),
            (String::from(player_2), stats_2),
        ]))
    }

    /// All players with at least one recorded game, best rated first.
    pub fn leaderboard(&self) -> Vec<(String, Statistics)> {
        let mut entries: Vec<(String, Statistics)> = self
            .read_players()
            .iter()
            .map(|(name, stats)| (name.clone(), stats.clone()))
            .collect();
        entries.sort_by(|(name_a, a), (name_b, b)| {
            b.elo.total_cmp(&a.elo).then_with(|| name_a.cmp(name_b))
        });
        entries
    }

    // An update is computed completely before anything is written, so a
    // poisoned lock still guards consistent data.
    fn read_players(&self) -> RwLockReadGuard<'_, HashMap<String, Statistics>> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_players(&self) -> RwLockWriteGuard<'_, HashMap<String, Statistics>> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn first_game_between_new_players() {
        let tracker = RatingTracker::default();
        let stats = tracker
            .record_game("A", "B", GameResult::Player1Won)
            .unwrap();
        let a = &stats["A"];
        let b = &stats["B"];
        assert_eq!(a.elo, 120.0);
        assert_eq!(b.elo, 80.0);
        assert_eq!(a.player_1_wins, 1);
        assert_eq!((a.current_streak, a.longest_streak), (1, 1));
        assert_eq!(b.player_2_losses, 1);
        assert_eq!(b.current_streak, 0);
        assert_eq!(tracker.get_statistics(&["A", "B"]), stats);
    }

    #[test]
    fn draw_between_equal_players_keeps_ratings() {
        let tracker = RatingTracker::default();
        let stats = tracker.record_game("A", "B", GameResult::Draw).unwrap();
        assert_eq!(stats["A"].elo, 100.0);
        assert_eq!(stats["B"].elo, 100.0);
        assert_eq!(stats["A"].player_1_draws, 1);
        assert_eq!(stats["B"].player_2_draws, 1);
    }

    #[test]
    fn streak_survives_until_a_loss() {
        let tracker = RatingTracker::default();
        for _ in 0..3 {
            tracker
                .record_game("A", "B", GameResult::Player1Won)
                .unwrap();
        }
        let stats = tracker.get_statistics(&["A"]);
        let a = &stats["A"];
        assert_eq!(a.longest_streak, 3);
        assert_eq!(a.current_streak, a.longest_streak);

        let stats = tracker
            .record_game("B", "A", GameResult::Player1Won)
            .unwrap();
        assert_eq!(stats["A"].current_streak, 0);
        assert_eq!(stats["A"].longest_streak, 3);
        assert_eq!(stats["A"].player_2_losses, 1);
        assert_eq!(stats["B"].player_1_wins, 1);
    }

    #[test]
    fn updates_use_ratings_from_before_the_game() {
        let tracker = RatingTracker::default();
        tracker
            .record_game("A", "B", GameResult::Player1Won)
            .unwrap();
        // A is at 120, B at 80 now.
        let stats = tracker
            .record_game("B", "A", GameResult::Player1Won)
            .unwrap();
        let expected_b = updated_elo(80.0, 120.0, 1.0, K_FACTOR);
        let expected_a = updated_elo(120.0, 80.0, 0.0, K_FACTOR);
        assert_eq!(stats["B"].elo, expected_b);
        assert_eq!(stats["A"].elo, expected_a);
        // The points won and lost add up
        assert!((stats["A"].elo + stats["B"].elo - 200.0).abs() < 1e-9);
    }

    #[test]
    fn reads_do_not_create_players() {
        let tracker = RatingTracker::default();
        let stats = tracker.get_statistics(&["nobody"]);
        assert_eq!(stats["nobody"], Statistics::default());
        assert!(tracker.leaderboard().is_empty());
    }

    #[test]
    fn same_player_on_both_seats() {
        let tracker = RatingTracker::default();
        assert_eq!(
            tracker.record_game("A", "A", GameResult::Draw),
            Err(TrackerError::SamePlayer {
                name: String::from("A")
            })
        );
        assert!(tracker.leaderboard().is_empty());
    }

    #[test]
    fn custom_config() {
        let tracker = RatingTracker::new(RatingConfig {
            initial_elo: 1000.0,
            k_factor: 20.0,
        });
        let stats = tracker
            .record_game("A", "B", GameResult::Player2Won)
            .unwrap();
        assert_eq!(stats["A"].elo, 990.0);
        assert_eq!(stats["B"].elo, 1010.0);
        let config: RatingConfig = serde_json::from_str(r#"{"k_factor": 32}"#).unwrap();
        assert_eq!(config.initial_elo, INITIAL_ELO);
        assert_eq!(config.k_factor, 32.0);
    }

    #[test]
    fn leaderboard_is_sorted_by_rating() {
        let tracker = RatingTracker::default();
        tracker
            .record_game("A", "B", GameResult::Player2Won)
            .unwrap();
        tracker.record_game("C", "A", GameResult::Draw).unwrap();
        let names: Vec<String> = tracker
            .leaderboard()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }

    #[test]
    fn concurrent_games_are_not_lost() {
        let tracker = Arc::new(RatingTracker::default());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    let opponent = format!("opponent {}", i);
                    for _ in 0..50 {
                        tracker
                            .record_game("champion", &opponent, GameResult::Player1Won)
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let stats = tracker.get_statistics(&["champion"]);
        assert_eq!(stats["champion"].player_1_wins, 400);
        assert_eq!(stats["champion"].longest_streak, 400);
    }
}
