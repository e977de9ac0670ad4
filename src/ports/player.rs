//! Player port - the single decision a game driver asks of any player
//!
//! Baselines (random, always-stand), the trained policy and the interactive
//! human player are all adapters of this trait.

use crate::{Result, types::Decision};

/// Player trait - decide what to do after a scoring roll
///
/// # Examples
///
/// ```no_run
/// use ten_thousand::{Decision, Player, Result};
///
/// struct GreedyUntil500;
///
/// impl Player for GreedyUntil500 {
///     fn decide(&mut self, turn_score: u32, dice: &[u8]) -> Result<Decision> {
///         if turn_score >= 500 {
///             Ok(Decision::stand())
///         } else {
///             Ok(Decision::roll(dice.to_vec()))
///         }
///     }
///
///     fn name(&self) -> &str {
///         "greedy-until-500"
///     }
/// }
/// ```
pub trait Player {
    /// Choose an action for a roll.
    ///
    /// # Parameters
    ///
    /// * `turn_score` - Points banked earlier in this turn, excluding `dice`
    /// * `dice` - The roll just thrown (it scored at least one point)
    ///
    /// # Errors
    ///
    /// Adapters fail when they cannot produce a decision, e.g. a trained
    /// policy with no entry for the resulting state.
    fn decide(&mut self, turn_score: u32, dice: &[u8]) -> Result<Decision>;

    /// Get the player's name.
    ///
    /// Used for identification in evaluation reports and logging.
    fn name(&self) -> &str;
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn decide(&mut self, turn_score: u32, dice: &[u8]) -> Result<Decision> {
        (**self).decide(turn_score, dice)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
