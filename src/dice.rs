//! Dice rolling, scoring and the manual play driver

pub mod game;
pub mod scoring;

pub use game::{GameRecord, TURN_CAP, TenThousandGame};
pub use scoring::{Scored, ScoringOracle, StandardScoring, roll_dice, set_aside};

/// Number of dice thrown at the start of every turn.
pub const DICE_PER_TURN: u8 = 6;

/// Score that ends a game.
pub const TARGET_SCORE: u32 = 10_000;
