use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::game_loop::DEFAULT_TICK;

/// What happens once a freshly spawned piece has nowhere to go.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RestartPolicy {
    /// Stop gravity and keep the final board on screen until the player
    /// restarts.
    #[default]
    Manual,
    /// Report the final score and start a new game right away.
    Auto,
}

#[derive(Parser, Debug)]
#[command(name = "falling-blocks", about = "Falling-block puzzle in the terminal")]
pub struct Args {
    /// Gravity interval in milliseconds
    #[arg(long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// RNG seed for the piece sequence (optional)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start a new game immediately after game over
    #[arg(long)]
    pub auto_restart: bool,

    /// Write logs to this file (filter via RUST_LOG, default info)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub tick: Duration,
    pub seed: Option<u64>,
    pub restart: RestartPolicy,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            seed: None,
            restart: RestartPolicy::Manual,
            log_file: None,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            tick: Duration::from_millis(args.tick_ms),
            seed: args.seed,
            restart: if args.auto_restart {
                RestartPolicy::Auto
            } else {
                RestartPolicy::Manual
            },
            log_file: args.log_file,
        }
    }
}
