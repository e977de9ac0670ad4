//! Baseline players

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Result,
    dice::{ScoringOracle, StandardScoring},
    ports::Player,
    types::Decision,
};

/// Banks the first scoring roll of every turn.
#[derive(Debug, Clone)]
pub struct AlwaysStandPlayer {
    name: String,
}

impl AlwaysStandPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Player for AlwaysStandPlayer {
    fn decide(&mut self, _turn_score: u32, _dice: &[u8]) -> Result<Decision> {
        Ok(Decision::stand())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Random policy player (baseline)
///
/// Flips a fair coin between standing and rolling every non-scoring die.
pub struct RandomPlayer<S = StandardScoring> {
    name: String,
    oracle: S,
    rng: StdRng,
}

impl RandomPlayer<StandardScoring> {
    /// Create a new random player
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_oracle(name, StandardScoring, random())
    }

    /// Create a new random player with a deterministic seed
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self::with_oracle(name, StandardScoring, seed)
    }
}

impl<S: ScoringOracle> RandomPlayer<S> {
    pub fn with_oracle(name: impl Into<String>, oracle: S, seed: u64) -> Self {
        Self {
            name: name.into(),
            oracle,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<S: ScoringOracle> Player for RandomPlayer<S> {
    fn decide(&mut self, _turn_score: u32, dice: &[u8]) -> Result<Decision> {
        if self.rng.random_bool(0.5) {
            Ok(Decision::stand())
        } else {
            Ok(Decision::roll(self.oracle.score(dice).leftover))
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    #[test]
    fn test_always_stand() {
        let mut player = AlwaysStandPlayer::new("stand");
        let decision = player.decide(0, &[1, 2, 3, 4, 6, 6]).unwrap();
        assert_eq!(decision, Decision::stand());
        assert_eq!(player.name(), "stand");
    }

    #[test]
    fn test_random_player_rolls_leftover() {
        let mut player = RandomPlayer::with_seed("random", 11);
        let mut stands = 0;
        for _ in 0..200 {
            let decision = player.decide(0, &[1, 2, 3, 3, 4, 6]).unwrap();
            match decision.action {
                Action::Stand => stands += 1,
                Action::Roll => assert_eq!(decision.reroll, vec![2, 3, 3, 4, 6]),
            }
        }
        assert!(stands > 50 && stands < 150);
    }
}
