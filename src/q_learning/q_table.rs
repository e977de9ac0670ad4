//! Value table for tabular Q-learning

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::state_key::{Discretizer, StateKey};
use crate::types::Action;

/// Action values of one state: `(q_stand, q_roll)`.
///
/// Serialized as a two-element array `[q_stand, q_roll]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ActionValues {
    pub stand: f64,
    pub roll: f64,
}

impl ActionValues {
    pub const fn new(stand: f64, roll: f64) -> Self {
        Self { stand, roll }
    }

    pub const fn splat(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn get(&self, action: Action) -> f64 {
        match action {
            Action::Stand => self.stand,
            Action::Roll => self.roll,
        }
    }

    pub fn get_mut(&mut self, action: Action) -> &mut f64 {
        match action {
            Action::Stand => &mut self.stand,
            Action::Roll => &mut self.roll,
        }
    }

    /// Exact equality, the only case treated as a tie.
    #[allow(clippy::float_cmp)]
    pub fn is_tied(&self) -> bool {
        self.stand == self.roll
    }

    /// The lower-valued action, or `None` on a tie.
    pub fn worse(&self) -> Option<Action> {
        if self.is_tied() {
            None
        } else if self.stand < self.roll {
            Some(Action::Stand)
        } else {
            Some(Action::Roll)
        }
    }

    /// The higher-valued action, falling back to `on_tie`.
    pub fn best_or(&self, on_tie: Action) -> Action {
        self.worse().map_or(on_tie, Action::other)
    }
}

impl From<[f64; 2]> for ActionValues {
    fn from([stand, roll]: [f64; 2]) -> Self {
        Self::new(stand, roll)
    }
}

impl From<ActionValues> for [f64; 2] {
    fn from(values: ActionValues) -> Self {
        [values.stand, values.roll]
    }
}

/// How entries come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TableInit {
    /// Pre-populate every grid key up to `max_turn_score` with `value`.
    Eager { value: f64, max_turn_score: u32 },
    /// Create entries with `value` on first lookup.
    Lazy { value: f64 },
}

impl TableInit {
    /// Value given to a key seen for the first time.
    pub fn value(&self) -> f64 {
        match *self {
            TableInit::Eager { value, .. } | TableInit::Lazy { value } => value,
        }
    }
}

impl Default for TableInit {
    fn default() -> Self {
        TableInit::Eager {
            value: 0.0,
            max_turn_score: 20_000,
        }
    }
}

/// Mapping from [`StateKey`] to [`ActionValues`].
///
/// The table carries its [`Discretizer`] so every key built against it uses
/// the same bucketing it was trained with.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    discretizer: Discretizer,
    default_value: f64,
    values: HashMap<StateKey, ActionValues>,
}

impl ValueTable {
    /// Create a table, pre-populating the grid for [`TableInit::Eager`].
    pub fn new(discretizer: Discretizer, init: TableInit) -> Self {
        let mut values = HashMap::new();
        if let TableInit::Eager {
            value,
            max_turn_score,
        } = init
        {
            values.extend(
                discretizer
                    .grid(max_turn_score)
                    .map(|key| (key, ActionValues::splat(value))),
            );
        }
        Self {
            discretizer,
            default_value: init.value(),
            values,
        }
    }

    /// Rebuild a table from persisted entries.
    pub fn from_entries(
        discretizer: Discretizer,
        default_value: f64,
        values: HashMap<StateKey, ActionValues>,
    ) -> Self {
        Self {
            discretizer,
            default_value,
            values,
        }
    }

    pub fn discretizer(&self) -> Discretizer {
        self.discretizer
    }

    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Look up a state without creating it.
    pub fn get(&self, key: &StateKey) -> Option<ActionValues> {
        self.values.get(key).copied()
    }

    /// Look up a state, creating it with the default value if unseen.
    pub fn entry(&mut self, key: StateKey) -> &mut ActionValues {
        let default = self.default_value;
        self.values
            .entry(key)
            .or_insert_with(|| ActionValues::splat(default))
    }

    pub fn set(&mut self, key: StateKey, values: ActionValues) {
        self.values.insert(key, values);
    }

    /// One-step TD update toward `reward + γ·next_q`.
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a*) - Q(s,a)]
    pub fn td_update(
        &mut self,
        key: StateKey,
        action: Action,
        reward: f64,
        next_q: f64,
        learning_rate: f64,
        discount_factor: f64,
    ) {
        let q = self.entry(key).get_mut(action);
        let td_error = reward + discount_factor * next_q - *q;
        *q += learning_rate * td_error;
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &ActionValues)> {
        self.values.iter()
    }

    /// Ordered copy of the entries, for stable output.
    pub fn sorted_entries(&self) -> BTreeMap<StateKey, ActionValues> {
        self.values.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Best action per state, resolving ties toward `on_tie`.
    pub fn best_actions(&self, on_tie: Action) -> BTreeMap<StateKey, Action> {
        self.values
            .iter()
            .map(|(key, values)| (*key, values.best_or(on_tie)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eager_init_fills_grid() {
        let table = ValueTable::new(
            Discretizer::new(50),
            TableInit::Eager {
                value: 0.0,
                max_turn_score: 1000,
            },
        );
        assert_eq!(table.len(), 7 * 21);
        assert_eq!(
            table.get(&StateKey::new(0, 1000)),
            Some(ActionValues::splat(0.0))
        );
    }

    #[test]
    fn test_lazy_init_creates_on_lookup() {
        let mut table = ValueTable::new(Discretizer::new(50), TableInit::Lazy { value: -25.0 });
        assert!(table.is_empty());
        let key = StateKey::new(6, 0);
        assert_eq!(table.get(&key), None);
        assert_eq!(*table.entry(key), ActionValues::splat(-25.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_worse_and_best() {
        let values = ActionValues::new(1.0, 2.0);
        assert_eq!(values.worse(), Some(Action::Stand));
        assert_eq!(values.best_or(Action::Stand), Action::Roll);

        let tied = ActionValues::splat(3.0);
        assert_eq!(tied.worse(), None);
        assert_eq!(tied.best_or(Action::Stand), Action::Stand);
    }

    #[test]
    fn test_td_update() {
        let mut table = ValueTable::new(Discretizer::new(50), TableInit::Lazy { value: 0.0 });
        let key = StateKey::new(6, 0);
        table.td_update(key, Action::Roll, 0.0, 2.0, 0.5, 0.99);

        // Q(s,roll) = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        let updated = table.get(&key).unwrap();
        assert!((updated.roll - 0.99).abs() < 1e-12);
        assert_eq!(updated.stand, 0.0);
    }

    #[test]
    fn test_td_update_zero_learning_rate() {
        let mut table = ValueTable::new(Discretizer::new(50), TableInit::Lazy { value: 0.0 });
        let key = StateKey::new(3, 150);
        table.set(key, ActionValues::new(12.5, -3.25));
        table.td_update(key, Action::Stand, 1000.0, 40.0, 0.0, 0.9);
        assert_eq!(table.get(&key), Some(ActionValues::new(12.5, -3.25)));
    }

    #[test]
    fn test_action_values_serialize_as_pair() {
        let json = serde_json::to_string(&ActionValues::new(1.5, -2.0)).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
    }
}
