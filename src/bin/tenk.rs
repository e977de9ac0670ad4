//! tenk - Train and evaluate Q-learning agents for the Ten Thousand dice game
//!
//! This CLI provides a unified interface for:
//! - Training an agent and saving its policy
//! - Evaluating a policy (or a baseline player) by turns to finish
//! - Sweeping hyperparameters

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tenk")]
#[command(version, about = "Q-learning for the Ten Thousand dice game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent
    Train(ten_thousand::cli::commands::train::TrainArgs),

    /// Evaluate a policy or a baseline player
    Evaluate(ten_thousand::cli::commands::evaluate::EvaluateArgs),

    /// Grid search over learning rate, discount factor and epsilon
    Sweep(ten_thousand::cli::commands::sweep::SweepArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => ten_thousand::cli::commands::train::execute(args),
        Commands::Evaluate(args) => ten_thousand::cli::commands::evaluate::execute(args),
        Commands::Sweep(args) => ten_thousand::cli::commands::sweep::execute(args),
    }
}
