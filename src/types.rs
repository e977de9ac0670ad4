//! Shared value types for the game and its agents.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What a player does after a scoring roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Bank the turn score and end the turn.
    Stand,
    /// Throw the remaining dice again.
    Roll,
}

impl Action {
    /// Both actions, in index order.
    pub const ALL: [Action; 2] = [Action::Stand, Action::Roll];

    /// Stable index used by value arrays (`Stand = 0`, `Roll = 1`).
    pub const fn index(self) -> usize {
        match self {
            Action::Stand => 0,
            Action::Roll => 1,
        }
    }

    /// Resolve an action from its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAction`] for any index other than 0 or 1.
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Action::Stand),
            1 => Ok(Action::Roll),
            other => Err(Error::InvalidAction {
                value: other.to_string(),
            }),
        }
    }

    /// The other action. With two actions this is the complement.
    pub const fn other(self) -> Self {
        match self {
            Action::Stand => Action::Roll,
            Action::Roll => Action::Stand,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Action::Stand => "stand",
            Action::Roll => "roll",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stand" | "s" => Ok(Action::Stand),
            "roll" | "r" => Ok(Action::Roll),
            other => match other.parse::<usize>() {
                Ok(index) => Action::from_index(index),
                Err(_) => Err(Error::InvalidAction {
                    value: other.to_string(),
                }),
            },
        }
    }
}

/// A player's answer to a scoring roll: the action and the dice to throw again.
///
/// `reroll` is empty when standing. When rolling it holds the dice the player
/// keeps in play; everything else from the roll is set aside for points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub action: Action,
    pub reroll: Vec<u8>,
}

impl Decision {
    pub fn stand() -> Self {
        Self {
            action: Action::Stand,
            reroll: Vec::new(),
        }
    }

    pub fn roll(reroll: Vec<u8>) -> Self {
        Self {
            action: Action::Roll,
            reroll,
        }
    }
}
