//! Discretized state keys for the value table

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Table key: dice left in play and the bucketed turn score.
///
/// Hashes as a plain pair. The `"<dice>:<bucket>"` text form exists only so
/// the key can be a JSON object key in policy files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    pub dice_remaining: u8,
    pub turn_score_bucket: u32,
}

impl StateKey {
    pub const fn new(dice_remaining: u8, turn_score_bucket: u32) -> Self {
        Self {
            dice_remaining,
            turn_score_bucket,
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.dice_remaining, self.turn_score_bucket)
    }
}

/// Error returned when a key string is not `"<dice>:<bucket>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStateKeyError(String);

impl fmt::Display for ParseStateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid state key '{}' (expected '<dice>:<turn score>')", self.0)
    }
}

impl std::error::Error for ParseStateKeyError {}

impl FromStr for StateKey {
    type Err = ParseStateKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseStateKeyError(s.to_string());
        let (dice, bucket) = s.split_once(':').ok_or_else(err)?;
        let dice_remaining: u8 = dice.parse().map_err(|_| err())?;
        if dice_remaining > 6 {
            return Err(err());
        }
        let turn_score_bucket = bucket.parse().map_err(|_| err())?;
        Ok(Self::new(dice_remaining, turn_score_bucket))
    }
}

impl Serialize for StateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for StateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Maps raw turn state onto the discretization grid.
///
/// The turn score is rounded down to a multiple of `granularity`; a
/// granularity of 1 keeps the exact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discretizer {
    granularity: u32,
}

impl Discretizer {
    pub const DEFAULT_GRANULARITY: u32 = 50;

    /// Create a discretizer. A granularity of 0 is treated as 1.
    pub fn new(granularity: u32) -> Self {
        Self {
            granularity: granularity.max(1),
        }
    }

    pub fn granularity(&self) -> u32 {
        self.granularity
    }

    pub fn key(&self, dice_remaining: u8, turn_score: u32) -> StateKey {
        StateKey::new(
            dice_remaining,
            turn_score / self.granularity * self.granularity,
        )
    }

    /// Every key of the grid up to `max_turn_score` (inclusive) for 0..=6 dice.
    pub fn grid(&self, max_turn_score: u32) -> impl Iterator<Item = StateKey> + '_ {
        (0..=6u8).flat_map(move |dice| {
            (0..=max_turn_score)
                .step_by(self.granularity as usize)
                .map(move |score| StateKey::new(dice, score))
        })
    }
}

impl Default for Discretizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GRANULARITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucketing_rounds_down() {
        let discretizer = Discretizer::new(50);
        assert_eq!(discretizer.key(3, 149), StateKey::new(3, 100));
        assert_eq!(discretizer.key(3, 150), StateKey::new(3, 150));
        assert_eq!(Discretizer::new(1).key(2, 149), StateKey::new(2, 149));
    }

    #[test]
    fn test_equal_fields_equal_keys() {
        let discretizer = Discretizer::default();
        assert_eq!(discretizer.key(6, 350), discretizer.key(6, 350));
    }

    #[test]
    fn test_zero_granularity_is_exact() {
        assert_eq!(Discretizer::new(0).granularity(), 1);
    }

    #[test]
    fn test_text_form() {
        let key = StateKey::new(4, 250);
        assert_eq!(key.to_string(), "4:250");
        assert_eq!("4:250".parse::<StateKey>().unwrap(), key);
        assert!("4-250".parse::<StateKey>().is_err());
        assert!("9:0".parse::<StateKey>().is_err());
        assert!("x:0".parse::<StateKey>().is_err());
    }

    #[test]
    fn test_grid_size() {
        let discretizer = Discretizer::new(50);
        assert_eq!(discretizer.grid(20_000).count(), 7 * 401);
    }
}
