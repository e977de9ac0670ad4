//! Ten Thousand dice game with a tabular Q-learning agent
//!
//! This crate provides:
//! - The Ten Thousand scoring rules and a manual play driver
//! - A single-agent episodic environment over the game
//! - A Q-learning agent with policy persistence
//! - Baseline, interactive and trained players
//! - Evaluation and hyperparameter sweeps over those players

pub mod app;
pub mod cli;
pub mod dice;
pub mod environment;
pub mod error;
pub mod pipeline;
pub mod players;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use dice::{ScoringOracle, StandardScoring, TenThousandGame};
pub use environment::{EnvironmentConfig, GameEnvironment};
pub use error::{Error, Result};
pub use ports::{Player, TrainingObserver};
pub use q_learning::{QLearningAgent, StateKey, ValueTable};
pub use types::{Action, Decision};
