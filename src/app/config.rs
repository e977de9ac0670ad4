//! Configuration types for agent creation.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    dice::{StandardScoring, TURN_CAP},
    environment::{EnvironmentConfig, GameEnvironment},
    q_learning::{Discretizer, QLearningAgent, TableInit},
};

/// Configuration for creating a Q-learning agent.
///
/// # Examples
///
/// ```
/// use ten_thousand::app::AgentConfig;
/// use ten_thousand::q_learning::TableInit;
///
/// let config = AgentConfig::default()
///     .with_epsilon(0.1)
///     .with_table_init(TableInit::Lazy { value: -25.0 })
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,
    /// Discount factor γ, in [0, 1]
    pub discount_factor: f64,
    /// Exploration rate ε, in [0, 1]
    pub epsilon: f64,
    /// How table entries are created
    pub table_init: TableInit,
    /// Turn-score bucket width of the state key
    pub granularity: u32,
    /// Truncate an episode once its turn number passes this limit
    pub episode_turn_limit: Option<u32>,
    /// Seed for exploration and tie-breaking
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Set the learning rate α.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the discount factor γ.
    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    /// Set the exploration rate ε.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_table_init(mut self, table_init: TableInit) -> Self {
        self.table_init = table_init;
        self
    }

    pub fn with_granularity(mut self, granularity: u32) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_episode_turn_limit(mut self, limit: Option<u32>) -> Self {
        self.episode_turn_limit = limit;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn discretizer(&self) -> Discretizer {
        Discretizer::new(self.granularity)
    }

    /// Check every hyperparameter against its range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning rate {} must be in (0, 1]",
                self.learning_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return invalid(format!(
                "discount factor {} must be in [0, 1]",
                self.discount_factor
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return invalid(format!("epsilon {} must be in [0, 1]", self.epsilon));
        }
        if self.granularity == 0 {
            return invalid("granularity must be at least 1".to_string());
        }
        if !self.table_init.value().is_finite() {
            return invalid("initial table value must be finite".to_string());
        }
        if self.episode_turn_limit == Some(0) {
            return invalid("episode turn limit must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    /// Tuned defaults: α = 0.05, γ = 0.75, ε = 0.2, eager zero table.
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            discount_factor: 0.75,
            epsilon: 0.2,
            table_init: TableInit::default(),
            granularity: Discretizer::DEFAULT_GRANULARITY,
            episode_turn_limit: Some(TURN_CAP),
            seed: None,
        }
    }
}

/// Everything needed to start a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentConfig,
    pub environment: EnvironmentConfig,
}

impl RunConfig {
    /// Read a run configuration from a JSON file. Missing fields keep defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Seed of the environment's dice, one past the agent's seed.
    pub fn environment_seed(&self) -> Option<u64> {
        self.agent.seed.map(|seed| seed.wrapping_add(1))
    }

    /// Seed of the games that score a trained policy.
    pub fn evaluation_seed(&self) -> Option<u64> {
        self.agent.seed.map(|seed| seed.wrapping_add(2))
    }

    /// Validate, then build an agent in a standard-rules environment.
    ///
    /// The agent and the environment draw from separate streams derived from
    /// `agent.seed`, so equal configurations train equal tables.
    pub fn build_agent(&self) -> Result<QLearningAgent> {
        self.validate()?;
        let environment =
            GameEnvironment::new(StandardScoring, self.environment, self.environment_seed());
        QLearningAgent::from_config(environment, &self.agent)
    }

    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        if self.environment.target_score == 0 {
            return Err(Error::InvalidConfiguration {
                message: "target score must be positive".to_string(),
            });
        }
        Ok(())
    }
}
