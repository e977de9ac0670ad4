//! Train command - Train a Q-learning agent and save its policy

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::RunConfig,
    cli::output::{Report, thousands},
    pipeline::{NoopObserver, ProgressObserver, TrainingObserver},
    q_learning::TrainingSummary,
};

/// Episodes averaged for the "recent" figure in reports.
const RECENT_WINDOW: usize = 100;

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    episodes: usize,
    mean_turns: Option<f64>,
    recent_mean_turns: Option<f64>,
    truncated_episodes: usize,
    table_size: usize,
    policy: &'a Path,
    config: &'a RunConfig,
}

/// File the summary goes to. Directories get `training_summary.json`,
/// anything else is forced to a `.json` extension.
fn summary_file(raw: &Path) -> PathBuf {
    let names_directory = raw.as_os_str().to_string_lossy().ends_with(std::path::MAIN_SEPARATOR)
        || raw.file_name().is_none()
        || raw.is_dir();
    if names_directory {
        return raw.join("training_summary.json");
    }
    if raw
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        raw.to_path_buf()
    } else {
        raw.with_extension("json")
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent")]
pub struct TrainArgs {
    /// Number of training episodes (complete games)
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: usize,

    /// Learning rate α (0.0-1.0]
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ (0.0-1.0)
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Exploration rate ε (0.0-1.0)
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON run configuration; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output file for the Q-value policy (default: policy_<episodes>.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Also write the best action per state to this file
    #[arg(long)]
    pub best_actions: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,
}

impl TrainArgs {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(alpha) = self.alpha {
            config.agent.learning_rate = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.agent.discount_factor = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            config.agent.epsilon = epsilon;
        }
        if self.seed.is_some() {
            config.agent.seed = self.seed;
        }
        config.validate().context("Invalid training configuration")?;
        Ok(config)
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("policy_{}.json", self.episodes)))
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.run_config()?;
    let output = args.output_path();

    Report::new("Training Q-learning agent")
        .row("Episodes", thousands(args.episodes))
        .row("Learning rate", config.agent.learning_rate)
        .row("Discount factor", config.agent.discount_factor)
        .row("Epsilon", config.agent.epsilon)
        .row_opt("Seed", config.agent.seed)
        .print();

    let mut agent = config.build_agent().context("Failed to create agent")?;

    let mut observer: Box<dyn TrainingObserver> = if args.progress {
        Box::new(ProgressObserver::new())
    } else {
        Box::new(NoopObserver)
    };
    let summary = agent.train_with_observer(args.episodes, observer.as_mut())?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    agent
        .save_policy(&output)
        .with_context(|| format!("Failed to save policy to {}", output.display()))?;

    if let Some(path) = &args.best_actions {
        agent
            .save_best_actions(path)
            .with_context(|| format!("Failed to save best actions to {}", path.display()))?;
    }

    report(&summary);
    println!("\nPolicy saved to {}", output.display());
    if let Some(path) = &args.best_actions {
        println!("Best actions saved to {}", path.display());
    }

    if let Some(raw) = &args.summary {
        let summary_path = summary_file(raw);
        if let Some(parent) = summary_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = TrainingSummaryFile {
            episodes: summary.episodes,
            mean_turns: summary.mean_turns(),
            recent_mean_turns: summary.recent_mean_turns(RECENT_WINDOW),
            truncated_episodes: summary.truncated_episodes,
            table_size: summary.table_size,
            policy: &output,
            config: &config,
        };
        let writer = File::create(&summary_path)
            .with_context(|| format!("Failed to create {}", summary_path.display()))?;
        to_writer_pretty(writer, &file)?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}

fn report(summary: &TrainingSummary) {
    Report::new("Training Results")
        .row("Episodes", thousands(summary.episodes))
        .row_opt("Mean turns", summary.mean_turns().map(|m| format!("{m:.2}")))
        .row_opt(
            format!("Mean turns (last {RECENT_WINDOW})"),
            summary
                .recent_mean_turns(RECENT_WINDOW)
                .map(|m| format!("{m:.2}")),
        )
        .row("Truncated", thousands(summary.truncated_episodes))
        .row("Table entries", thousands(summary.table_size))
        .print();
}
