//! Scoring of a single roll
//!
//! The environment and the players only depend on the [`ScoringOracle`]
//! contract. [`StandardScoring`] is the rule set the binary plays with.

use rand::Rng;

use crate::{Error, Result};

/// Points earned by a roll and the dice that did not contribute to them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scored {
    pub points: u32,
    /// Non-scoring dice, a subsequence of the rolled dice.
    pub leftover: Vec<u8>,
}

impl Scored {
    pub fn new(points: u32, leftover: Vec<u8>) -> Self {
        Self { points, leftover }
    }

    /// A roll worth zero points ends the turn.
    pub fn is_bust(&self) -> bool {
        self.points == 0
    }
}

/// Maps a roll to its score and its leftover dice.
pub trait ScoringOracle {
    fn score(&self, dice: &[u8]) -> Scored;
}

impl<F> ScoringOracle for F
where
    F: Fn(&[u8]) -> Scored,
{
    fn score(&self, dice: &[u8]) -> Scored {
        self(dice)
    }
}

/// Common Ten Thousand rules.
///
/// - a 1-2-3-4-5-6 straight on six dice scores 1500
/// - three of a kind scores 1000 for ones and face × 100 otherwise, doubled
///   for every matching die beyond the third
/// - single ones score 100 and single fives 50
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScoring;

impl StandardScoring {
    const STRAIGHT: u32 = 1500;

    fn set_value(face: u8, count: u8) -> u32 {
        let base = if face == 1 { 1000 } else { u32::from(face) * 100 };
        base << (count - 3)
    }
}

impl ScoringOracle for StandardScoring {
    fn score(&self, dice: &[u8]) -> Scored {
        let mut counts = [0u8; 7];
        for &face in dice {
            if (1..=6).contains(&face) {
                counts[face as usize] += 1;
            }
        }

        if dice.len() == 6 && counts[1..].iter().all(|&c| c == 1) {
            return Scored::new(Self::STRAIGHT, Vec::new());
        }

        let mut points = 0;
        for face in 1..=6u8 {
            let count = counts[face as usize];
            points += match (face, count) {
                (_, c) if c >= 3 => Self::set_value(face, c),
                (1, c) => 100 * u32::from(c),
                (5, c) => 50 * u32::from(c),
                _ => 0,
            };
        }

        let leftover = dice
            .iter()
            .copied()
            .filter(|&face| {
                let count = counts.get(face as usize).copied().unwrap_or(0);
                face != 1 && face != 5 && count < 3
            })
            .collect();

        Scored::new(points, leftover)
    }
}

/// Throw `count` independent dice.
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u8> {
    (0..count).map(|_| rng.random_range(1..=6)).collect()
}

/// Dice a player puts aside when it keeps `keep_rolling` in play.
///
/// Computes the multiset difference `dice - keep_rolling`, preserving the
/// order of `dice`.
///
/// # Errors
///
/// Returns [`Error::InvalidDecision`] if `keep_rolling` is not contained in `dice`.
pub fn set_aside(dice: &[u8], keep_rolling: &[u8]) -> Result<Vec<u8>> {
    let mut remaining = [0usize; 7];
    for &face in keep_rolling {
        if !(1..=6).contains(&face) {
            return Err(Error::InvalidDecision {
                message: format!("die face {face} is out of range"),
            });
        }
        remaining[face as usize] += 1;
    }

    let mut aside = Vec::with_capacity(dice.len());
    for &face in dice {
        let slot = &mut remaining[face.min(6) as usize];
        if *slot > 0 {
            *slot -= 1;
        } else {
            aside.push(face);
        }
    }

    if remaining.iter().any(|&left| left > 0) {
        return Err(Error::InvalidDecision {
            message: format!("cannot keep rolling {keep_rolling:?} from roll {dice:?}"),
        });
    }
    Ok(aside)
}
