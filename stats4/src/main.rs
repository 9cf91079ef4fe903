use std::path::PathBuf;

use clap::{Parser, Subcommand};
use connect4::TokenGlyphs;
use rand::rngs::StdRng;
use rand::SeedableRng;
use stats4::{play_random_game, play_tournament, rpc, RatingConfig, RatingTracker};
use tracing::{debug, info};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to a JSON file with the rating parameters ("initial_elo", "k_factor")
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info", global = true)]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Answer JSON-RPC requests from stdin, one per line, until EOF
    Serve,
    /// Let players making random moves play against each other, and record the results
    Selfplay {
        /// Names of the players
        #[clap(num_args(2..), value_delimiter = ' ')]
        players: Vec<String>,

        /// How many games to play
        #[arg(short, long, default_value_t = 100)]
        num_games: usize,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Number of columns of the board
        #[arg(long, default_value_t = connect4::DEFAULT_WIDTH)]
        width: usize,

        /// Number of rows of the board
        #[arg(long, default_value_t = connect4::DEFAULT_HEIGHT)]
        height: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let config = match &args.config {
        Some(path) => RatingConfig::load(path)?,
        None => RatingConfig::default(),
    };
    debug!(?config);
    let tracker = RatingTracker::new(config);

    match args.command {
        Command::Serve => {
            info!("Serving JSON-RPC on stdin/stdout");
            rpc::serve(&tracker, std::io::stdin().lock(), std::io::stdout().lock())?;
            info!("Input closed, shutting down");
        }
        Command::Selfplay {
            mut players,
            num_games,
            seed,
            width,
            height,
        } => {
            players.sort();
            players.dedup();

            // Get a random seed
            let seed = seed.unwrap_or_else(rand::random);
            info!(seed);
            let mut rng = StdRng::seed_from_u64(seed);

            let sample = play_random_game(&mut rng, width, height)?;
            info!(
                "Sample game, {:?} after {} moves:\n{}",
                sample.outcome,
                sample.num_moves,
                sample.board.render(&TokenGlyphs::DISKS)
            );

            play_tournament(&mut rng, &tracker, &players, num_games, width, height)?;
            print_leaderboard(&tracker);
        }
    }

    Ok(())
}

fn print_leaderboard(tracker: &RatingTracker) {
    println!(
        "\n {:19} | {:>8} | {:>14} | {:>14} | {:>7}",
        "player", "elo", "as p1 (w/l/d)", "as p2 (w/l/d)", "longest"
    );
    println!("{}", "-".repeat(78));
    for (name, stats) in tracker.leaderboard() {
        println!(
            " {:19} | {:8.1} | {:>14} | {:>14} | {:>7}",
            name,
            stats.elo,
            format!(
                "{}/{}/{}",
                stats.player_1_wins, stats.player_1_losses, stats.player_1_draws
            ),
            format!(
                "{}/{}/{}",
                stats.player_2_wins, stats.player_2_losses, stats.player_2_draws
            ),
            stats.longest_streak
        );
    }
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    // Stdout carries the JSON-RPC responses, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
