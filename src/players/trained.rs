//! Player backed by a frozen policy file
//!
//! The policy is loaded once and never modified. Clones share it through an
//! [`Arc`], so any number of players can read the same table.

use std::{collections::HashMap, path::Path, sync::Arc};

use crate::{
    Error, Result,
    dice::{ScoringOracle, StandardScoring},
    ports::Player,
    q_learning::{ActionValues, Discretizer, PolicyFile, StateKey, ValueTable},
    types::{Action, Decision},
};

/// Read-only lookup structure behind a trained player.
#[derive(Debug)]
enum FrozenPolicy {
    Values(ValueTable),
    Actions {
        discretizer: Discretizer,
        actions: HashMap<StateKey, Action>,
    },
}

impl FrozenPolicy {
    /// Ties go to Stand.
    const TIE_ACTION: Action = Action::Stand;

    fn discretizer(&self) -> Discretizer {
        match self {
            FrozenPolicy::Values(table) => table.discretizer(),
            FrozenPolicy::Actions { discretizer, .. } => *discretizer,
        }
    }

    fn action(&self, key: &StateKey) -> Result<Action> {
        let found = match self {
            FrozenPolicy::Values(table) => table
                .get(key)
                .map(|values: ActionValues| values.best_or(Self::TIE_ACTION)),
            FrozenPolicy::Actions { actions, .. } => actions.get(key).copied(),
        };
        found.ok_or(Error::PolicyLookup { key: *key })
    }
}

impl From<PolicyFile> for FrozenPolicy {
    fn from(file: PolicyFile) -> Self {
        match file {
            PolicyFile::QValues {
                granularity,
                values,
                ..
            } => FrozenPolicy::Values(ValueTable::from_entries(
                Discretizer::new(granularity),
                0.0,
                values.into_iter().collect(),
            )),
            PolicyFile::BestActions {
                granularity,
                actions,
                ..
            } => FrozenPolicy::Actions {
                discretizer: Discretizer::new(granularity),
                actions: actions.into_iter().collect(),
            },
        }
    }
}

/// Plays by looking up the state after each roll in a trained policy.
///
/// No interpolation: a state missing from the policy is an error.
#[derive(Debug, Clone)]
pub struct TrainedPolicyPlayer<S = StandardScoring> {
    name: String,
    policy: Arc<FrozenPolicy>,
    oracle: S,
}

impl TrainedPolicyPlayer<StandardScoring> {
    /// Load a policy file for play under the standard rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PolicyLoad`] if the file is missing or cannot be parsed.
    pub fn new<P: AsRef<Path>>(name: impl Into<String>, policy_path: P) -> Result<Self> {
        Self::with_oracle(name, policy_path, StandardScoring)
    }

    /// Play from an in-memory table, e.g. right after training.
    pub fn from_table(name: impl Into<String>, table: ValueTable) -> Self {
        Self {
            name: name.into(),
            policy: Arc::new(FrozenPolicy::Values(table)),
            oracle: StandardScoring,
        }
    }
}

impl<S: ScoringOracle> TrainedPolicyPlayer<S> {
    pub fn with_oracle<P: AsRef<Path>>(
        name: impl Into<String>,
        policy_path: P,
        oracle: S,
    ) -> Result<Self> {
        let file = PolicyFile::load_from_file(policy_path).map_err(Error::into_policy_load)?;
        Ok(Self::from_policy(name, file, oracle))
    }

    pub fn from_policy(name: impl Into<String>, file: PolicyFile, oracle: S) -> Self {
        Self {
            name: name.into(),
            policy: Arc::new(file.into()),
            oracle,
        }
    }

    /// Key the policy is consulted with after scoring `dice`.
    pub fn state_key(&self, turn_score: u32, dice: &[u8]) -> (StateKey, Vec<u8>) {
        let scored = self.oracle.score(dice);
        let dice_remaining = scored.leftover.len().min(6) as u8;
        let key = self
            .policy
            .discretizer()
            .key(dice_remaining, turn_score + scored.points);
        (key, scored.leftover)
    }
}

impl<S: ScoringOracle> Player for TrainedPolicyPlayer<S> {
    fn decide(&mut self, turn_score: u32, dice: &[u8]) -> Result<Decision> {
        let (key, leftover) = self.state_key(turn_score, dice);
        match self.policy.action(&key)? {
            Action::Stand => Ok(Decision::stand()),
            Action::Roll => Ok(Decision::roll(leftover)),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::q_learning::TableInit;

    fn table() -> ValueTable {
        let mut table = ValueTable::new(Discretizer::new(50), TableInit::Lazy { value: 0.0 });
        // [1, 5, 2, 3, 4, 6] is a straight: 1500, no dice left
        table.set(StateKey::new(0, 1500), ActionValues::new(0.0, 9.0));
        // [1, 2, 2, 3, 4, 6] scores 100 and leaves five dice
        table.set(StateKey::new(5, 400), ActionValues::new(8.0, 2.0));
        table.set(StateKey::new(5, 100), ActionValues::new(1.0, 4.0));
        table.set(StateKey::new(5, 250), ActionValues::splat(3.0));
        table
    }

    #[test]
    fn test_rolls_leftover_when_roll_is_better() {
        let mut player = TrainedPolicyPlayer::from_table("trained", table());
        let decision = player.decide(0, &[1, 2, 2, 3, 4, 6]).unwrap();
        assert_eq!(decision, Decision::roll(vec![2, 2, 3, 4, 6]));
    }

    #[test]
    fn test_stands_when_stand_is_better() {
        let mut player = TrainedPolicyPlayer::from_table("trained", table());
        let decision = player.decide(300, &[1, 2, 2, 3, 4, 6]).unwrap();
        assert_eq!(decision, Decision::stand());
    }

    #[test]
    fn test_tie_goes_to_stand() {
        let mut player = TrainedPolicyPlayer::from_table("trained", table());
        let decision = player.decide(150, &[1, 2, 2, 3, 4, 6]).unwrap();
        assert_eq!(decision.action, Action::Stand);
    }

    #[test]
    fn test_hot_dice_key_has_zero_dice() {
        let mut player = TrainedPolicyPlayer::from_table("trained", table());
        let decision = player.decide(0, &[1, 5, 2, 3, 4, 6]).unwrap();
        assert_eq!(decision, Decision::roll(Vec::new()));
    }

    #[test]
    fn test_missing_key_is_lookup_error() {
        let mut player = TrainedPolicyPlayer::from_table("trained", table());
        let err = player.decide(1000, &[1, 2, 2, 3, 4, 6]).unwrap_err();
        assert!(matches!(
            err,
            Error::PolicyLookup { key } if key == StateKey::new(5, 1100)
        ));
    }

    #[test]
    fn test_best_action_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("actions.json");
        PolicyFile::best_actions(&table(), Action::Stand)
            .save_to_file(&path)
            .unwrap();

        let mut player = TrainedPolicyPlayer::new("actions", &path).unwrap();
        assert_eq!(
            player.decide(0, &[1, 2, 2, 3, 4, 6]).unwrap().action,
            Action::Roll
        );
        assert_eq!(
            player.decide(300, &[1, 2, 2, 3, 4, 6]).unwrap().action,
            Action::Stand
        );
    }

    #[test]
    fn test_unreadable_file_is_policy_load_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = TrainedPolicyPlayer::new("broken", &path).unwrap_err();
        assert!(matches!(err, Error::PolicyLoad { .. }));

        let err = TrainedPolicyPlayer::new("absent", dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::PolicyLoad { .. }));
    }

    #[test]
    fn test_clones_share_policy() {
        let player = TrainedPolicyPlayer::from_table("trained", table());
        let clone = player.clone();
        assert!(Arc::ptr_eq(&player.policy, &clone.policy));
    }
}
