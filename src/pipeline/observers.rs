//! Observers for training runs

use std::collections::VecDeque;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Result,
    ports::TrainingObserver,
    q_learning::{EpisodeSummary, TrainingSummary},
};

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl TrainingObserver for NoopObserver {}

/// Progress bar observer - Shows training progress
///
/// The message shows the mean turn count over the last `window` episodes.
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    window: usize,
    recent: VecDeque<u32>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self::with_window(100)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            progress_bar: None,
            window: window.max(1),
            recent: VecDeque::with_capacity(window.max(1)),
        }
    }

    fn recent_mean(&self) -> f64 {
        if self.recent.is_empty() {
            return 0.0;
        }
        self.recent.iter().map(|&t| f64::from(t)).sum::<f64>() / self.recent.len() as f64
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        self.recent.clear();
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        if self.recent.len() == self.window {
            self.recent.pop_front();
        }
        self.recent.push_back(summary.turns);

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(format!("avg turns {:.1}", self.recent_mean()));
        }
        Ok(())
    }

    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(format!("avg turns {:.1}", self.recent_mean()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(turns: u32) -> EpisodeSummary {
        EpisodeSummary {
            turns,
            steps: 0,
            total_reward: 0.0,
            truncated: false,
        }
    }

    #[test]
    fn test_window_keeps_latest_turns() {
        let mut observer = ProgressObserver::with_window(2);
        for (i, turns) in [10, 20, 30].into_iter().enumerate() {
            observer.on_episode_end(i, &episode(turns)).unwrap();
        }
        assert_eq!(observer.recent, [20, 30]);
        assert_eq!(observer.recent_mean(), 25.0);
    }
}
