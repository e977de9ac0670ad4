//! Q-learning agent
//!
//! The agent owns its environment and its value table and learns online:
//! every step is followed immediately by a one-step TD update.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    app::AgentConfig,
    dice::{ScoringOracle, StandardScoring},
    environment::GameEnvironment,
    ports::TrainingObserver,
    q_learning::{
        q_table::{TableInit, ValueTable},
        serialization::PolicyFile,
        state_key::{Discretizer, StateKey},
    },
    types::Action,
};

/// What happened in one training episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Turns needed to reach the target (the limit, if truncated)
    pub turns: u32,
    /// Actions taken
    pub steps: usize,
    /// Sum of rewards received
    pub total_reward: f64,
    /// Episode was cut off by the turn limit
    pub truncated: bool,
}

/// Aggregate of a training run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub episodes: usize,
    /// Turn count of every episode, in order
    pub turns_per_episode: Vec<u32>,
    pub truncated_episodes: usize,
    /// Table entries after training
    pub table_size: usize,
}

impl TrainingSummary {
    pub fn mean_turns(&self) -> Option<f64> {
        if self.turns_per_episode.is_empty() {
            return None;
        }
        let total: u64 = self.turns_per_episode.iter().map(|&t| u64::from(t)).sum();
        Some(total as f64 / self.turns_per_episode.len() as f64)
    }

    /// Mean turns over the last `window` episodes.
    pub fn recent_mean_turns(&self, window: usize) -> Option<f64> {
        let start = self.turns_per_episode.len().saturating_sub(window);
        let recent = &self.turns_per_episode[start..];
        if recent.is_empty() {
            return None;
        }
        let total: u64 = recent.iter().map(|&t| u64::from(t)).sum();
        Some(total as f64 / recent.len() as f64)
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Tabular Q-learning agent (off-policy TD control)
///
/// Action selection explores by deliberately taking the lower-valued action
/// with probability ε and otherwise takes its complement. With exactly two
/// actions the complement is the argmax.
pub struct QLearningAgent<S = StandardScoring> {
    table: ValueTable,
    environment: GameEnvironment<S>,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    episode_turn_limit: Option<u32>,
    rng: StdRng,
}

impl<S: ScoringOracle> QLearningAgent<S> {
    /// Create a new Q-learning agent
    ///
    /// Uses an eager zero-initialized table with the default granularity and
    /// the default episode turn limit. Hyperparameters are not range-checked;
    /// use [`QLearningAgent::from_config`] for validation.
    ///
    /// # Arguments
    ///
    /// * `environment` - Environment the agent trains in
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    /// * `epsilon` - Exploration rate
    pub fn new(
        environment: GameEnvironment<S>,
        learning_rate: f64,
        discount_factor: f64,
        epsilon: f64,
    ) -> Self {
        let defaults = AgentConfig::default();
        Self {
            table: ValueTable::new(defaults.discretizer(), defaults.table_init),
            environment,
            learning_rate,
            discount_factor,
            epsilon,
            episode_turn_limit: defaults.episode_turn_limit,
            rng: build_rng(None),
        }
    }

    /// Create an agent from a validated configuration.
    pub fn from_config(environment: GameEnvironment<S>, config: &AgentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            table: ValueTable::new(config.discretizer(), config.table_init),
            environment,
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            epsilon: config.epsilon,
            episode_turn_limit: config.episode_turn_limit,
            rng: build_rng(config.seed),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Replace the value table, e.g. with a different initialization.
    pub fn with_table(mut self, table: ValueTable) -> Self {
        self.table = table;
        self
    }

    /// Start over with a fresh table built from `discretizer` and `init`.
    pub fn with_table_init(self, discretizer: Discretizer, init: TableInit) -> Self {
        self.with_table(ValueTable::new(discretizer, init))
    }

    pub fn with_episode_turn_limit(mut self, limit: Option<u32>) -> Self {
        self.episode_turn_limit = limit;
        self
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn into_table(self) -> ValueTable {
        self.table
    }

    pub fn environment(&self) -> &GameEnvironment<S> {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut GameEnvironment<S> {
        &mut self.environment
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn discount_factor(&self) -> f64 {
        self.discount_factor
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Key of the environment's current state.
    pub fn current_state_key(&self) -> StateKey {
        self.environment.state_key(&self.table.discretizer())
    }

    /// ε-greedy action selection
    ///
    /// Tied values pick uniformly at random. Otherwise, when exploring
    /// (`greedy == false`) and a uniform draw falls below ε, the lower-valued
    /// action is returned; in every other case its complement is.
    pub fn select_action(&mut self, state: StateKey, greedy: bool) -> Action {
        let values = *self.table.entry(state);

        let Some(worse) = values.worse() else {
            return Action::ALL[self.rng.random_range(0..Action::ALL.len())];
        };

        if !greedy && self.rng.random::<f64>() < self.epsilon {
            worse
        } else {
            worse.other()
        }
    }

    /// Q-learning update for the transition that just happened.
    ///
    /// The successor state is read from the environment, and its value is
    /// taken at the action [`select_action`](Self::select_action) picks greedily.
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a*) - Q(s,a)]
    pub fn update(&mut self, state_before: StateKey, action: Action, reward: f64) {
        let state_after = self.current_state_key();
        let greedy_action = self.select_action(state_after, true);
        let next_q = self.table.entry(state_after).get(greedy_action);
        self.table.td_update(
            state_before,
            action,
            reward,
            next_q,
            self.learning_rate,
            self.discount_factor,
        );
    }

    /// Run `episodes` complete episodes of online Q-learning.
    pub fn train(&mut self, episodes: usize) -> TrainingSummary {
        let mut summary = TrainingSummary::default();
        tracing::info!(
            episodes,
            alpha = self.learning_rate,
            gamma = self.discount_factor,
            epsilon = self.epsilon,
            "training started"
        );

        for episode in 0..episodes {
            let result = self.run_episode(episode);
            Self::record(&mut summary, &result);
        }

        self.finish(summary)
    }

    /// Like [`train`](Self::train), reporting every episode to `observer`.
    pub fn train_with_observer(
        &mut self,
        episodes: usize,
        observer: &mut dyn TrainingObserver,
    ) -> Result<TrainingSummary> {
        let mut summary = TrainingSummary::default();
        observer.on_training_start(episodes)?;
        tracing::info!(
            episodes,
            alpha = self.learning_rate,
            gamma = self.discount_factor,
            epsilon = self.epsilon,
            "training started"
        );

        for episode in 0..episodes {
            let result = self.run_episode(episode);
            Self::record(&mut summary, &result);
            observer.on_episode_end(episode, &result)?;
        }

        let summary = self.finish(summary);
        observer.on_training_end(&summary)?;
        Ok(summary)
    }

    fn record(summary: &mut TrainingSummary, episode: &EpisodeSummary) {
        summary.episodes += 1;
        summary.turns_per_episode.push(episode.turns);
        if episode.truncated {
            summary.truncated_episodes += 1;
        }
    }

    fn finish(&self, mut summary: TrainingSummary) -> TrainingSummary {
        summary.table_size = self.table.len();
        tracing::info!(
            episodes = summary.episodes,
            mean_turns = summary.mean_turns().unwrap_or(0.0),
            truncated = summary.truncated_episodes,
            table_size = summary.table_size,
            "training finished"
        );
        summary
    }

    fn run_episode(&mut self, episode: usize) -> EpisodeSummary {
        self.environment.reset();
        let mut steps = 0;
        let mut total_reward = 0.0;

        loop {
            let turn_number = self.environment.state().turn_number;
            if let Some(limit) = self.episode_turn_limit.filter(|&limit| turn_number > limit) {
                tracing::warn!(episode, limit, "episode truncated at turn limit");
                self.environment.reset();
                return EpisodeSummary {
                    turns: limit,
                    steps,
                    total_reward,
                    truncated: true,
                };
            }

            let state = self.current_state_key();
            let action = self.select_action(state, false);
            let outcome = self.environment.step(action);
            self.update(state, action, outcome.reward);
            steps += 1;
            total_reward += outcome.reward;

            if outcome.episode_done {
                tracing::debug!(episode, turns = turn_number, steps, "episode finished");
                return EpisodeSummary {
                    turns: turn_number,
                    steps,
                    total_reward,
                    truncated: false,
                };
            }
        }
    }

    /// Write the value table as a `q_values` policy file.
    pub fn save_policy<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PolicyFile::from_table(&self.table).save_to_file(path)
    }

    /// Write only the preferred action per state, ties going to Stand.
    pub fn save_best_actions<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PolicyFile::best_actions(&self.table, Action::Stand).save_to_file(path)
    }

    /// Replace the value table with one read from a `q_values` policy file.
    ///
    /// Keys first seen after loading keep this agent's current default value.
    pub fn load_policy<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let default_value = self.table.default_value();
        self.table = PolicyFile::load_from_file(path)?.into_table(default_value, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dice::Scored,
        environment::{EnvironmentConfig, EpisodeState, TurnState},
        q_learning::ActionValues,
    };

    fn lazy_agent(epsilon: f64) -> QLearningAgent {
        QLearningAgent::new(GameEnvironment::standard(Some(1)), 0.5, 0.9, epsilon)
            .with_table_init(Discretizer::new(50), TableInit::Lazy { value: 0.0 })
            .with_seed(9)
    }

    #[test]
    fn test_greedy_takes_higher_value() {
        let mut agent = lazy_agent(1.0);
        let key = StateKey::new(4, 200);
        agent.table.set(key, ActionValues::new(5.0, 1.0));
        for _ in 0..50 {
            assert_eq!(agent.select_action(key, true), Action::Stand);
        }
    }

    #[test]
    fn test_full_exploration_takes_lower_value() {
        let mut agent = lazy_agent(1.0);
        let key = StateKey::new(4, 200);
        agent.table.set(key, ActionValues::new(5.0, 1.0));
        for _ in 0..50 {
            assert_eq!(agent.select_action(key, false), Action::Roll);
        }
    }

    #[test]
    fn test_zero_epsilon_never_explores() {
        let mut agent = lazy_agent(0.0);
        let key = StateKey::new(2, 50);
        agent.table.set(key, ActionValues::new(-3.0, 2.0));
        for _ in 0..50 {
            assert_eq!(agent.select_action(key, false), Action::Roll);
        }
    }

    #[test]
    fn test_unseen_state_created_lazily() {
        let mut agent = QLearningAgent::new(GameEnvironment::standard(Some(1)), 0.5, 0.9, 0.1)
            .with_table_init(Discretizer::new(50), TableInit::Lazy { value: -25.0 });
        let key = StateKey::new(3, 450);
        agent.select_action(key, false);
        assert_eq!(agent.table().get(&key), Some(ActionValues::splat(-25.0)));
    }

    #[test]
    fn test_update_uses_post_step_state() {
        // scores 100 per die and keeps the last die
        let oracle = |dice: &[u8]| Scored::new(100 * (dice.len() as u32 - 1), vec![dice[0]]);
        let environment = GameEnvironment::new(oracle, EnvironmentConfig::default(), Some(3));
        let mut agent = QLearningAgent::new(environment, 0.5, 0.9, 0.0)
            .with_table_init(Discretizer::new(50), TableInit::Lazy { value: 0.0 });

        let before = agent.current_state_key();
        agent.table.set(StateKey::new(1, 500), ActionValues::new(10.0, 4.0));

        let outcome = agent.environment_mut().step(Action::Roll);
        assert_eq!(outcome.reward, 0.0);
        assert_eq!(agent.environment().state().turn, TurnState::new(1, 500));
        agent.update(before, Action::Roll, outcome.reward);

        // 0 + 0.5 * (0 + 0.9 * 10 - 0) = 4.5
        let values = agent.table().get(&before).unwrap();
        assert!((values.roll - 4.5).abs() < 1e-12);
        assert_eq!(values.stand, 0.0);
    }

    #[test]
    fn test_training_reaches_target() {
        let mut agent = QLearningAgent::new(GameEnvironment::standard(Some(5)), 0.1, 0.75, 0.2)
            .with_seed(5);
        let summary = agent.train(20);
        assert_eq!(summary.episodes, 20);
        assert_eq!(summary.turns_per_episode.len(), 20);
        assert!(summary.turns_per_episode.iter().all(|&t| t >= 1));
        assert_eq!(*agent.environment().state(), EpisodeState::initial());
        assert!(summary.mean_turns().is_some());
    }

    #[test]
    fn test_always_bust_episode_is_truncated() {
        let bust = |_: &[u8]| Scored::new(0, Vec::new());
        let environment = GameEnvironment::new(bust, EnvironmentConfig::default(), Some(1));
        let mut agent = QLearningAgent::new(environment, 0.1, 0.9, 0.2)
            .with_seed(2)
            .with_episode_turn_limit(Some(10));
        let summary = agent.train(3);
        assert_eq!(summary.truncated_episodes, 3);
        assert_eq!(summary.turns_per_episode, vec![10, 10, 10]);
    }

    #[test]
    fn test_recent_mean_turns() {
        let summary = TrainingSummary {
            episodes: 4,
            turns_per_episode: vec![40, 30, 20, 10],
            truncated_episodes: 0,
            table_size: 0,
        };
        assert_eq!(summary.mean_turns(), Some(25.0));
        assert_eq!(summary.recent_mean_turns(2), Some(15.0));
        assert_eq!(TrainingSummary::default().recent_mean_turns(5), None);
    }
}
