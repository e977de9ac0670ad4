//! Player adapters
//!
//! Everything the game driver can seat at the table: simple baselines, the
//! frozen trained policy and an interactive human.

pub mod baseline;
pub mod human;
pub mod trained;

pub use baseline::{AlwaysStandPlayer, RandomPlayer};
pub use human::HumanPlayer;
pub use trained::TrainedPolicyPlayer;
