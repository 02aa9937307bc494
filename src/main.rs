use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use merge_2048::config::GameConfig;
use merge_2048::engine::Move;
use merge_2048::game::Game;
use merge_2048::serialization::FileStore;
use merge_2048::source::{RngSource, SequentialIds};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "merge-2048",
    version,
    about = "Play 2048 in the terminal, one command per invocation"
)]
struct Cli {
    /// Directory holding the saved game, best score and leaderboard
    #[arg(long = "data-dir", value_name = "DIR", env = "MERGE2048_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Seed tile spawns for this invocation (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board (default)
    Show,
    /// Abandon the current game and start over
    New,
    /// Apply one or more moves: up/down/left/right or w/s/a/d
    Move {
        #[arg(required = true, value_name = "DIR")]
        directions: Vec<Move>,
    },
    /// Take back the last move
    Undo,
    /// Record the current score on the leaderboard
    Submit {
        /// Player name (at most 24 characters are kept)
        name: String,
    },
    /// Print the leaderboard
    Scores,
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "merge-2048")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".merge-2048"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = Game::open(
        FileStore::new(&data_dir),
        GameConfig::default(),
        RngSource::new(rng),
        SequentialIds::new(),
    );

    match cli.cmd.unwrap_or(Command::Show) {
        Command::Show => {}
        Command::New => game.request_new_game(),
        Command::Move { directions } => {
            for dir in directions {
                if game.is_game_over() {
                    break;
                }
                match game.request_move(dir) {
                    Some(res) if res.gained > 0 => println!("{dir}: +{}", res.gained),
                    Some(_) => println!("{dir}"),
                    None => println!("{dir}: nothing moved"),
                }
                // No animation to wait for in a terminal.
                game.animation_finished();
            }
        }
        Command::Undo => {
            if !game.request_undo() {
                println!("nothing to undo");
            }
        }
        Command::Submit { name } => {
            match game.submit_score(&name) {
                Some(rank) => println!("ranked #{} with {}", rank + 1, game.score()),
                None => println!("{} did not make the leaderboard", game.score()),
            }
            return Ok(());
        }
        Command::Scores => {
            let lb = game.leaderboard();
            if lb.is_empty() {
                println!("no scores yet");
            } else {
                print!("{lb}");
            }
            return Ok(());
        }
    }

    println!("{}", game.board());
    println!("score: {}  best: {}", game.score(), game.best());
    if game.is_game_over() {
        println!("Game over! Final score: {}. Run `merge-2048 new` to play again.", game.score());
    }
    Ok(())
}
