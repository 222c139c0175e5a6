//! TICTAC CLI - Command-line interface
//!
//! Commands:
//! - interactive (default): `start <x-kind> <o-kind>` / `exit` command loop
//! - play: batch games between automated tiers

mod command;
mod interactive;
mod play_cmd;
mod render;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use interactive::Console;
use play_cmd::PlayArgs;

#[derive(Parser)]
#[command(name = "tictac")]
#[command(about = "Tic-tac-toe against random, heuristic and minimax opponents")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Read `start`/`exit` commands from stdin (default)
    Interactive,
    /// Play a series of games between automated tiers
    Play(PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the board
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let stdin = io::stdin();
            let mut console = Console::new(stdin.lock(), io::stdout());
            interactive::run(&mut console, cli.seed)
        }
        Commands::Play(args) => play_cmd::run(args, cli.seed),
    }
}
