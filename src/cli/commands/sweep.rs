//! Sweep command - Grid search over α, γ and ε

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{Report, thousands},
    pipeline::{SweepConfig, grid_search},
    q_learning::PolicyFile,
};

#[derive(Parser, Debug)]
#[command(about = "Search hyperparameters by mean turns to finish")]
pub struct SweepArgs {
    /// Learning rates to try
    #[arg(long, value_delimiter = ',', default_values_t = [0.05, 0.1, 0.2])]
    pub alphas: Vec<f64>,

    /// Discount factors to try
    #[arg(long, value_delimiter = ',', default_values_t = [0.75, 0.9, 1.0])]
    pub gammas: Vec<f64>,

    /// Exploration rates to try
    #[arg(long, value_delimiter = ',', default_values_t = [0.1, 0.2])]
    pub epsilons: Vec<f64>,

    /// Training episodes per combination
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Evaluation games per combination
    #[arg(long, short = 'g', default_value_t = 1_000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Where to save the best policy
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl SweepArgs {
    fn sweep_config(&self) -> SweepConfig {
        SweepConfig {
            learning_rates: self.alphas.clone(),
            discount_factors: self.gammas.clone(),
            epsilons: self.epsilons.clone(),
            episodes: self.episodes,
            evaluation_games: self.games,
            seed: self.seed,
            ..SweepConfig::default()
        }
    }
}

pub fn execute(args: SweepArgs) -> Result<()> {
    let config = args.sweep_config();
    let combinations =
        config.learning_rates.len() * config.discount_factors.len() * config.epsilons.len();
    Report::new("Hyperparameter sweep")
        .row("Combinations", thousands(combinations))
        .row("Episodes each", thousands(config.episodes))
        .row("Games each", thousands(config.evaluation_games))
        .row_opt("Seed", config.seed)
        .print();

    let outcome = grid_search(&config).context("Sweep failed")?;

    println!();
    println!(
        "  {:>8} {:>8} {:>8} {:>12}",
        "alpha", "gamma", "epsilon", "mean turns"
    );
    for result in &outcome.results {
        println!(
            "  {:>8} {:>8} {:>8} {:>12.2}",
            result.learning_rate, result.discount_factor, result.epsilon, result.mean_turns
        );
    }

    let best = outcome.best;
    Report::new("Best combination")
        .row("Learning rate", best.learning_rate)
        .row("Discount factor", best.discount_factor)
        .row("Epsilon", best.epsilon)
        .row("Mean turns", format!("{:.2}", best.mean_turns))
        .print();

    if let Some(path) = &args.output {
        PolicyFile::from_table(&outcome.best_table)
            .save_to_file(path)
            .with_context(|| format!("Failed to save policy to {}", path.display()))?;
        println!("\nBest policy saved to {}", path.display());
    }
    Ok(())
}
