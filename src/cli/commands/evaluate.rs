//! Evaluate command - Measure how many turns a player needs to finish

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    cli::output::{Report, thousands},
    dice::{TARGET_SCORE, TenThousandGame},
    pipeline::{EvaluationResult, evaluate_in},
    players::{AlwaysStandPlayer, HumanPlayer, RandomPlayer, TrainedPolicyPlayer},
    ports::Player,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    /// Follow the policy file
    Trained,
    /// Coin flip between stand and roll
    Random,
    /// Bank the first scoring roll of every turn
    AlwaysStand,
    /// Ask on the terminal
    Human,
}

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained policy")]
pub struct EvaluateArgs {
    /// Policy file (q_values or best_actions)
    pub policy: Option<PathBuf>,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 1_000)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Player to evaluate
    #[arg(long, short = 'p', value_enum, default_value = "trained")]
    pub player: PlayerKind,

    /// Score that ends a game
    #[arg(long, default_value_t = TARGET_SCORE)]
    pub target: u32,

    /// Print the turn log of the first N games
    #[arg(long, default_value_t = 0)]
    pub show: usize,
}

impl EvaluateArgs {
    fn build_player(&self) -> Result<Box<dyn Player>> {
        Ok(match self.player {
            PlayerKind::Trained => {
                let path = self
                    .policy
                    .as_ref()
                    .context("A policy file is required for the trained player")?;
                let player = TrainedPolicyPlayer::new("trained", path)
                    .with_context(|| format!("Failed to load policy {}", path.display()))?;
                Box::new(player)
            }
            PlayerKind::Random => Box::new(match self.seed {
                Some(seed) => RandomPlayer::with_seed("random", seed.wrapping_add(1)),
                None => RandomPlayer::new("random"),
            }),
            PlayerKind::AlwaysStand => Box::new(AlwaysStandPlayer::new("always-stand")),
            PlayerKind::Human => Box::new(HumanPlayer::stdio("human")),
        })
    }
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let mut player = args.build_player()?;
    if let Some(path) = &args.policy {
        println!("Loaded policy from: {}", path.display());
    }

    let mut game = TenThousandGame::new(args.seed).with_target_score(args.target);
    let (result, logs) = evaluate_in(&mut game, player.as_mut(), args.games, args.show)
        .with_context(|| format!("Evaluation of {} failed", player.name()))?;

    for (index, record) in logs.iter().enumerate() {
        println!("\nGame {}:", index + 1);
        for line in &record.log {
            println!("{line}");
        }
    }

    report(&result);
    Ok(())
}

fn report(result: &EvaluationResult) {
    let unfinished = (result.unfinished > 0).then(|| thousands(result.unfinished));
    Report::new(format!("Evaluation: {}", result.player))
        .row("Games", thousands(result.games))
        .row("Target", result.target_score)
        .row("Mean turns", format!("{:.2}", result.mean_turns))
        .row("Fewest turns", result.min_turns)
        .row("Most turns", result.max_turns)
        .row_opt("Unfinished", unfinished)
        .print();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trained_player_needs_policy() {
        let args = EvaluateArgs::parse_from(["evaluate"]);
        assert_eq!(args.player, PlayerKind::Trained);
        assert!(args.build_player().is_err());
    }

    #[test]
    fn test_baselines_need_no_policy() {
        let args =
            EvaluateArgs::parse_from(["evaluate", "--player", "always-stand", "--games", "5"]);
        assert_eq!(args.games, 5);
        assert_eq!(args.target, 10_000);
        let player = args.build_player().unwrap();
        assert_eq!(player.name(), "always-stand");
    }
}
