//! Training and evaluation pipeline
//!
//! This module provides:
//! - Observers for training runs (progress display)
//! - Evaluation of any player by the turns it needs to finish a game
//! - A grid search over Q-learning hyperparameters

pub mod evaluation;
pub mod observers;
pub mod sweep;

pub use evaluation::{EvaluationResult, average_turns, evaluate, evaluate_in};
pub use observers::{NoopObserver, ProgressObserver};
pub use sweep::{SweepConfig, SweepOutcome, SweepResult, grid_search};

pub use crate::ports::{Player, TrainingObserver};
