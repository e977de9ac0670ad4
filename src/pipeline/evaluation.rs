//! Evaluation of players by game length
//!
//! A player is scored by the mean number of turns it needs to reach the
//! target. Lower is better.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    dice::{GameRecord, ScoringOracle, TenThousandGame},
    ports::Player,
};

/// Result of an evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub player: String,
    pub games: usize,
    pub target_score: u32,
    pub mean_turns: f64,
    pub min_turns: u32,
    pub max_turns: u32,
    /// Games abandoned at the turn cap
    pub unfinished: usize,
}

/// Play `games` standard games and summarize their lengths.
///
/// Game logs are kept for the first `keep_logs` games and returned alongside
/// the summary.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`] when `games` is zero, and
/// propagates any player failure.
pub fn evaluate(
    player: &mut dyn Player,
    games: usize,
    seed: Option<u64>,
    keep_logs: usize,
) -> Result<(EvaluationResult, Vec<GameRecord>)> {
    evaluate_in(&mut TenThousandGame::new(seed), player, games, keep_logs)
}

/// Like [`evaluate`], on a prepared game (custom target, oracle or turn cap).
pub fn evaluate_in<S: ScoringOracle>(
    game: &mut TenThousandGame<S>,
    player: &mut dyn Player,
    games: usize,
    keep_logs: usize,
) -> Result<(EvaluationResult, Vec<GameRecord>)> {
    if games == 0 {
        return Err(Error::InvalidConfiguration {
            message: "evaluation needs at least one game".to_string(),
        });
    }

    let mut total_turns = 0u64;
    let mut min_turns = u32::MAX;
    let mut max_turns = 0;
    let mut unfinished = 0;
    let mut logs = Vec::new();

    for index in 0..games {
        game.set_log(index < keep_logs);
        let record = game.play(player)?;
        total_turns += u64::from(record.turns);
        min_turns = min_turns.min(record.turns);
        max_turns = max_turns.max(record.turns);
        if !record.reached_target() {
            unfinished += 1;
        }
        if index < keep_logs {
            logs.push(record);
        }
    }

    let result = EvaluationResult {
        player: player.name().to_string(),
        games,
        target_score: game.target_score(),
        mean_turns: total_turns as f64 / games as f64,
        min_turns,
        max_turns,
        unfinished,
    };
    tracing::debug!(
        player = %result.player,
        games,
        mean_turns = result.mean_turns,
        "evaluation finished"
    );
    Ok((result, logs))
}

/// Mean number of turns `player` needs over `games` games.
pub fn average_turns(player: &mut dyn Player, games: usize, seed: Option<u64>) -> Result<f64> {
    evaluate(player, games, seed, 0).map(|(result, _)| result.mean_turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::{AlwaysStandPlayer, RandomPlayer};

    #[test]
    fn test_zero_games_rejected() {
        let mut player = AlwaysStandPlayer::new("stand");
        assert!(matches!(
            average_turns(&mut player, 0, Some(1)),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_always_stand_needs_many_turns() {
        let mut player = AlwaysStandPlayer::new("stand");
        let (result, logs) = evaluate(&mut player, 20, Some(7), 2).unwrap();
        assert_eq!(result.games, 20);
        assert_eq!(logs.len(), 2);
        assert!(!logs[0].log.is_empty());
        // a single roll rarely scores more than a few hundred points
        assert!(result.mean_turns > 10.0);
        assert!(result.min_turns <= result.max_turns);
    }

    #[test]
    fn test_lower_target_needs_fewer_turns() {
        let mut player = AlwaysStandPlayer::new("stand");
        let (standard, _) = evaluate(&mut player, 20, Some(7), 0).unwrap();
        let mut game = TenThousandGame::new(Some(7)).with_target_score(2_000);
        let (short, _) = evaluate_in(&mut game, &mut player, 20, 0).unwrap();
        assert_eq!(standard.target_score, 10_000);
        assert_eq!(short.target_score, 2_000);
        assert_eq!(short.unfinished, 0);
        assert!(short.mean_turns < standard.mean_turns);
    }

    #[test]
    fn test_same_seed_same_result() {
        let first = average_turns(&mut RandomPlayer::with_seed("a", 3), 10, Some(99)).unwrap();
        let second = average_turns(&mut RandomPlayer::with_seed("b", 3), 10, Some(99)).unwrap();
        assert_eq!(first, second);
    }
}
