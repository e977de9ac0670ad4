//! Hyperparameter grid search
//!
//! Trains one agent per (α, γ, ε) combination and ranks the frozen policies
//! by the mean number of turns they need to finish a game.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    app::{AgentConfig, RunConfig},
    dice::TenThousandGame,
    environment::EnvironmentConfig,
    pipeline::evaluation::evaluate_in,
    players::TrainedPolicyPlayer,
    q_learning::ValueTable,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub learning_rates: Vec<f64>,
    pub discount_factors: Vec<f64>,
    pub epsilons: Vec<f64>,
    /// Training episodes per combination
    pub episodes: usize,
    /// Games played to score each trained policy
    pub evaluation_games: usize,
    /// Base seed; combination `i` uses agent seed `seed + i`
    pub seed: Option<u64>,
    /// Settings shared by every combination other than α, γ and ε
    pub agent: AgentConfig,
    pub environment: EnvironmentConfig,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            learning_rates: vec![0.05, 0.1, 0.2],
            discount_factors: vec![0.75, 0.9, 1.0],
            epsilons: vec![0.1, 0.2],
            episodes: 10_000,
            evaluation_games: 1_000,
            seed: None,
            agent: AgentConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl SweepConfig {
    fn combinations(&self) -> Vec<(f64, f64, f64)> {
        let mut combos = Vec::new();
        for &alpha in &self.learning_rates {
            for &gamma in &self.discount_factors {
                for &epsilon in &self.epsilons {
                    combos.push((alpha, gamma, epsilon));
                }
            }
        }
        combos
    }
}

/// Score of one hyperparameter combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
    /// Mean turns to finish; infinite if the policy met a state it never stored
    pub mean_turns: f64,
}

pub struct SweepOutcome {
    /// One entry per combination, in grid order
    pub results: Vec<SweepResult>,
    pub best: SweepResult,
    /// Value table of the best combination
    pub best_table: ValueTable,
}

/// Train and evaluate every combination in the grid.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] for an empty grid, zero episodes
/// or zero evaluation games, or when a combination fails validation.
pub fn grid_search(config: &SweepConfig) -> Result<SweepOutcome> {
    let combos = config.combinations();
    if combos.is_empty() {
        return Err(Error::InvalidConfiguration {
            message: "sweep grid has no combinations".to_string(),
        });
    }
    if config.episodes == 0 || config.evaluation_games == 0 {
        return Err(Error::InvalidConfiguration {
            message: "sweep needs at least one training episode and one evaluation game"
                .to_string(),
        });
    }

    let mut results = Vec::with_capacity(combos.len());
    let mut best: Option<(SweepResult, ValueTable)> = None;

    for (index, (alpha, gamma, epsilon)) in combos.into_iter().enumerate() {
        let mut agent_config = config
            .agent
            .clone()
            .with_learning_rate(alpha)
            .with_discount_factor(gamma)
            .with_epsilon(epsilon);
        agent_config.seed = config.seed.map(|seed| seed.wrapping_add(index as u64));
        let run = RunConfig {
            agent: agent_config,
            environment: config.environment,
        };
        let mut agent = run.build_agent()?;
        agent.train(config.episodes);
        let table = agent.into_table();

        let mut player = TrainedPolicyPlayer::from_table("sweep", table.clone());
        let mut game = TenThousandGame::new(run.evaluation_seed())
            .with_target_score(config.environment.target_score);
        let evaluation = evaluate_in(&mut game, &mut player, config.evaluation_games, 0);
        let mean_turns = match evaluation {
            Ok((result, _)) => result.mean_turns,
            Err(Error::PolicyLookup { key }) => {
                tracing::warn!(alpha, gamma, epsilon, %key, "policy missing a state");
                f64::INFINITY
            }
            Err(e) => return Err(e),
        };

        let result = SweepResult {
            learning_rate: alpha,
            discount_factor: gamma,
            epsilon,
            mean_turns,
        };
        tracing::info!(alpha, gamma, epsilon, mean_turns, "combination evaluated");
        results.push(result);

        let improves = best
            .as_ref()
            .is_none_or(|(current, _)| mean_turns < current.mean_turns);
        if improves {
            best = Some((result, table));
        }
    }

    let Some((best, best_table)) = best else {
        return Err(Error::InvalidConfiguration {
            message: "sweep produced no results".to_string(),
        });
    };
    Ok(SweepOutcome {
        results,
        best,
        best_table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> SweepConfig {
        SweepConfig {
            learning_rates: vec![0.1, 0.5],
            discount_factors: vec![0.75],
            epsilons: vec![0.2],
            episodes: 20,
            evaluation_games: 5,
            seed: Some(3),
            ..SweepConfig::default()
        }
    }

    #[test]
    fn test_every_combination_scored() {
        let outcome = grid_search(&small()).unwrap();
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].learning_rate, 0.1);
        assert_eq!(outcome.results[1].learning_rate, 0.5);

        let lowest = outcome
            .results
            .iter()
            .map(|r| r.mean_turns)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(outcome.best.mean_turns, lowest);
        assert!(!outcome.best_table.is_empty());
    }

    #[test]
    fn test_empty_grid_rejected() {
        let config = SweepConfig {
            epsilons: Vec::new(),
            ..small()
        };
        assert!(matches!(
            grid_search(&config),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_invalid_combination_rejected() {
        let config = SweepConfig {
            learning_rates: vec![2.0],
            ..small()
        };
        assert!(grid_search(&config).is_err());
    }
}
