//! Tabular Q-learning
//!
//! The agent learns a value for each `(state, action)` pair, where the state
//! is the discretized `(dice_remaining, turn_score)` of the current turn and
//! the action is Stand or Roll. Updates are one-step and off-policy:
//!
//! Q(s,a) ← Q(s,a) + α[r + γ Q(s',a*) - Q(s,a)]
//!
//! ## Usage Example
//!
//! ```no_run
//! use ten_thousand::{environment::GameEnvironment, q_learning::QLearningAgent};
//!
//! let environment = GameEnvironment::standard(Some(42));
//! let mut agent = QLearningAgent::new(
//!     environment,
//!     0.05, // learning_rate
//!     0.75, // discount_factor
//!     0.2,  // epsilon
//! )
//! .with_seed(42);
//!
//! let summary = agent.train(10_000);
//! println!("mean turns: {:?}", summary.mean_turns());
//! agent.save_policy("policy_10000.json")?;
//! # Ok::<(), ten_thousand::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;
pub mod state_key;

// Public re-exports
pub use agent::{EpisodeSummary, QLearningAgent, TrainingSummary};
pub use q_table::{ActionValues, TableInit, ValueTable};
pub use serialization::PolicyFile;
pub use state_key::{Discretizer, StateKey};
