//! Observer port - watching a training run without steering it
//!
//! Training calls these hooks synchronously; an observer can record or
//! display progress but cannot cancel the run.

use crate::{
    Result,
    q_learning::{EpisodeSummary, TrainingSummary},
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. `on_episode_end(episode, summary)` - After every episode
/// 3. `on_training_end(summary)` - Once at the end
pub trait TrainingObserver {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after an episode finishes or is truncated.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the completed episode (0-based)
    /// * `summary` - Turn count and termination of that episode
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        Ok(())
    }
}
