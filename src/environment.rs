//! Training environment for Ten Thousand
//!
//! An episode is one full game for a single player, from zero to the target
//! score. Each [`GameEnvironment::step`] answers one Stand/Roll choice. The
//! environment resets itself when an episode ends, so the state observed
//! after a terminal step is already the start of the next episode.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    dice::{DICE_PER_TURN, ScoringOracle, StandardScoring, TARGET_SCORE, roll_dice},
    q_learning::{Discretizer, StateKey},
    types::Action,
};

/// Dice still in play and points accumulated in the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    pub dice_remaining: u8,
    pub turn_score: u32,
}

impl TurnState {
    pub const fn new(dice_remaining: u8, turn_score: u32) -> Self {
        Self {
            dice_remaining,
            turn_score,
        }
    }

    /// State at the start of every turn: six dice, no points.
    pub const fn fresh() -> Self {
        Self::new(DICE_PER_TURN, 0)
    }

    /// Clear the turn after a bust or a stand.
    pub fn end_turn(&mut self) {
        *self = Self::fresh();
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Full state of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EpisodeState {
    /// 1-based turn counter
    pub turn_number: u32,
    /// Banked points, never decreases within an episode
    pub total_score: u32,
    pub turn: TurnState,
}

impl EpisodeState {
    pub const fn initial() -> Self {
        Self {
            turn_number: 1,
            total_score: 0,
            turn: TurnState::fresh(),
        }
    }
}

impl Default for EpisodeState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Reward paid when an episode reaches the target score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminalReward {
    /// `scale / turn_number`: finishing in fewer turns pays more
    InverseTurns { scale: f64 },
    /// `-turn_number`
    NegativeTurns,
    /// The same bonus regardless of turn count
    Fixed { value: f64 },
}

impl TerminalReward {
    pub fn reward(&self, turn_number: u32) -> f64 {
        match *self {
            TerminalReward::InverseTurns { scale } => scale / f64::from(turn_number),
            TerminalReward::NegativeTurns => -f64::from(turn_number),
            TerminalReward::Fixed { value } => value,
        }
    }
}

impl Default for TerminalReward {
    fn default() -> Self {
        TerminalReward::InverseTurns {
            scale: f64::from(TARGET_SCORE),
        }
    }
}

/// Reward paid when a roll busts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BustPenalty {
    /// `-turn_score / dice_rolled`, dividing by six when no dice were thrown
    #[default]
    ScaledByDice,
    /// Busting costs nothing beyond the forfeited points
    None,
}

impl BustPenalty {
    pub fn reward(&self, forfeited: u32, dice_rolled: u8) -> f64 {
        match self {
            BustPenalty::ScaledByDice => {
                let divisor = if dice_rolled == 0 {
                    DICE_PER_TURN
                } else {
                    dice_rolled
                };
                -f64::from(forfeited) / f64::from(divisor)
            }
            BustPenalty::None => 0.0,
        }
    }
}

/// Reward shaping and rule variants of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Total score that ends an episode
    pub target_score: u32,
    pub terminal_reward: TerminalReward,
    pub bust_penalty: BustPenalty,
    /// Roll all six dice again once every die has scored
    pub hot_dice: bool,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            target_score: TARGET_SCORE,
            terminal_reward: TerminalReward::default(),
            bust_penalty: BustPenalty::default(),
            hot_dice: true,
        }
    }
}

/// Result of one environment step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub reward: f64,
    pub episode_done: bool,
}

/// Ten Thousand as a single-agent episodic environment.
pub struct GameEnvironment<S = StandardScoring> {
    state: EpisodeState,
    oracle: S,
    config: EnvironmentConfig,
    rng: StdRng,
}

impl GameEnvironment<StandardScoring> {
    /// Environment with standard scoring and default shaping.
    pub fn standard(seed: Option<u64>) -> Self {
        Self::new(StandardScoring, EnvironmentConfig::default(), seed)
    }
}

impl<S: ScoringOracle> GameEnvironment<S> {
    /// Create an environment. `seed = None` draws the dice from entropy.
    pub fn new(oracle: S, config: EnvironmentConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            state: EpisodeState::initial(),
            oracle,
            config,
            rng,
        }
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    /// Key of the current turn state under `discretizer`.
    pub fn state_key(&self, discretizer: &Discretizer) -> StateKey {
        discretizer.key(self.state.turn.dice_remaining, self.state.turn.turn_score)
    }

    /// Overwrite the current state, e.g. to start from a scenario.
    pub fn set_state(&mut self, state: EpisodeState) {
        self.state = state;
    }

    /// Start a new episode.
    pub fn reset(&mut self) {
        self.state = EpisodeState::initial();
    }

    /// Apply one action.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        match action {
            Action::Stand => self.stand(),
            Action::Roll => self.roll(),
        }
    }

    fn stand(&mut self) -> StepOutcome {
        self.state.total_score += self.state.turn.turn_score;

        if self.state.total_score >= self.config.target_score {
            let reward = self.config.terminal_reward.reward(self.state.turn_number);
            tracing::trace!(
                turns = self.state.turn_number,
                total = self.state.total_score,
                "episode reached target"
            );
            self.reset();
            return StepOutcome {
                reward,
                episode_done: true,
            };
        }

        self.next_turn();
        StepOutcome {
            reward: 0.0,
            episode_done: false,
        }
    }

    fn roll(&mut self) -> StepOutcome {
        let dice_rolled = self.dice_to_roll();
        let dice = roll_dice(&mut self.rng, usize::from(dice_rolled));
        let scored = self.oracle.score(&dice);

        if scored.is_bust() {
            let reward = self
                .config
                .bust_penalty
                .reward(self.state.turn.turn_score, dice_rolled);
            self.next_turn();
            return StepOutcome {
                reward,
                episode_done: false,
            };
        }

        self.state.turn.turn_score += scored.points;
        // leftover never exceeds the dice thrown
        self.state.turn.dice_remaining = scored.leftover.len().min(6) as u8;
        StepOutcome {
            reward: 0.0,
            episode_done: false,
        }
    }

    /// Dice thrown by the next roll. Zero dice left means hot dice when enabled.
    fn dice_to_roll(&self) -> u8 {
        match self.state.turn.dice_remaining {
            0 if self.config.hot_dice => DICE_PER_TURN,
            n => n,
        }
    }

    fn next_turn(&mut self) {
        self.state.turn.end_turn();
        self.state.turn_number += 1;
    }
}
