//! Manual play driver
//!
//! Plays complete games for one [`Player`] under the full table rules,
//! including the hot dice re-roll. This is what evaluation measures a
//! trained policy with.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    DICE_PER_TURN, TARGET_SCORE,
    scoring::{ScoringOracle, StandardScoring, roll_dice, set_aside},
};
use crate::{Error, Result, ports::Player, types::Action};

/// Default number of turns after which a game is abandoned.
pub const TURN_CAP: u32 = 1000;

/// Outcome of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Turns played (equals the cap if the target was never reached)
    pub turns: u32,
    /// Banked score at the end of the game
    pub final_score: u32,
    /// Score the game was played to
    pub target_score: u32,
    /// One line per turn, only filled when logging is enabled
    pub log: Vec<String>,
}

impl GameRecord {
    pub fn reached_target(&self) -> bool {
        self.final_score >= self.target_score
    }
}

/// A single-player game of Ten Thousand.
pub struct TenThousandGame<S = StandardScoring> {
    oracle: S,
    rng: StdRng,
    target_score: u32,
    turn_cap: u32,
    record_log: bool,
}

impl TenThousandGame<StandardScoring> {
    /// Create a game with the standard rules.
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_oracle(StandardScoring, seed)
    }
}

impl<S: ScoringOracle> TenThousandGame<S> {
    pub fn with_oracle(oracle: S, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self {
            oracle,
            rng,
            target_score: TARGET_SCORE,
            turn_cap: TURN_CAP,
            record_log: false,
        }
    }

    /// Play to `target_score` instead of 10000.
    pub fn with_target_score(mut self, target_score: u32) -> Self {
        self.target_score = target_score;
        self
    }

    pub fn target_score(&self) -> u32 {
        self.target_score
    }

    pub fn with_turn_cap(mut self, turn_cap: u32) -> Self {
        self.turn_cap = turn_cap;
        self
    }

    /// Record a human-readable line per turn in [`GameRecord::log`].
    pub fn with_log(mut self, enabled: bool) -> Self {
        self.record_log = enabled;
        self
    }

    pub fn set_log(&mut self, enabled: bool) {
        self.record_log = enabled;
    }

    /// Play one game until the target score or the turn cap.
    ///
    /// # Errors
    ///
    /// Propagates player failures, and returns [`Error::InvalidDecision`] if a
    /// player keeps rolling dice it did not throw or sets aside dice that do
    /// not all score.
    pub fn play(&mut self, player: &mut dyn Player) -> Result<GameRecord> {
        let mut turns = 0;
        let mut total = 0;
        let mut log = Vec::new();

        while total < self.target_score && turns < self.turn_cap {
            turns += 1;
            let mut line = format!("turn {turns}:");
            let turn_score = self.play_turn(player, &mut line)?;
            total += turn_score;

            tracing::trace!(turn = turns, turn_score, total, "turn finished");
            if self.record_log {
                line.push_str(&format!(" --> {turn_score} points. TOTAL: {total}"));
                log.push(line);
            }
        }

        Ok(GameRecord {
            turns,
            final_score: total,
            target_score: self.target_score,
            log,
        })
    }

    fn play_turn(&mut self, player: &mut dyn Player, line: &mut String) -> Result<u32> {
        let mut turn_score = 0;
        let mut to_roll = usize::from(DICE_PER_TURN);

        loop {
            let dice = roll_dice(&mut self.rng, to_roll);
            let roll = self.oracle.score(&dice);
            line.push(' ');
            line.extend(dice.iter().map(|d| char::from(b'0' + d)));

            if roll.is_bust() {
                return Ok(0);
            }

            let decision = player.decide(turn_score, &dice)?;
            match decision.action {
                Action::Stand => {
                    line.push_str(" S");
                    return Ok(turn_score + roll.points);
                }
                Action::Roll => {
                    let aside = set_aside(&dice, &decision.reroll)?;
                    let kept = self.oracle.score(&aside);
                    if kept.is_bust() || !kept.leftover.is_empty() {
                        return Err(Error::InvalidDecision {
                            message: format!(
                                "{} set aside {aside:?}, which does not fully score",
                                player.name()
                            ),
                        });
                    }
                    turn_score += kept.points;

                    // hot dice: every die scored, throw all six again
                    to_roll = if decision.reroll.is_empty() {
                        usize::from(DICE_PER_TURN)
                    } else {
                        decision.reroll.len()
                    };
                    line.push_str(" R(");
                    line.extend(decision.reroll.iter().map(|d| char::from(b'0' + d)));
                    line.push(')');
                }
            }
        }
    }
}
