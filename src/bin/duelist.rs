//! duelist CLI - train and evaluate board-game players
//!
//! This CLI provides:
//! - Monte Carlo self-play training on the reference game
//! - Head-to-head evaluation of random, search and trained players

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duelist")]
#[command(version, about = "Search and Monte Carlo players for two-player board games", long_about = None)]
struct Cli {
    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Monte Carlo agent by self-play
    Train(Box<duelist::cli::commands::train::TrainArgs>),

    /// Play games between two players and report results
    Evaluate(duelist::cli::commands::evaluate::EvaluateArgs),
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Train(args) => duelist::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => duelist::cli::commands::evaluate::execute(args),
    }
}
