//! Policy files
//!
//! A policy file is pretty-printed JSON holding either the full value table
//! (`"kind": "q_values"`) or only the best action per state
//! (`"kind": "best_actions"`). Keys are `"<dice>:<turn score bucket>"`.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use super::{
    q_table::{ActionValues, ValueTable},
    state_key::{Discretizer, StateKey},
};
use crate::{Error, Result, types::Action};

/// On-disk policy snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyFile {
    QValues {
        version: u32,
        granularity: u32,
        values: BTreeMap<StateKey, ActionValues>,
    },
    BestActions {
        version: u32,
        granularity: u32,
        actions: BTreeMap<StateKey, Action>,
    },
}

impl PolicyFile {
    pub const VERSION: u32 = 1;

    /// Snapshot every entry of a value table.
    pub fn from_table(table: &ValueTable) -> Self {
        PolicyFile::QValues {
            version: Self::VERSION,
            granularity: table.discretizer().granularity(),
            values: table.sorted_entries(),
        }
    }

    /// Snapshot only the preferred action of each state.
    pub fn best_actions(table: &ValueTable, on_tie: Action) -> Self {
        PolicyFile::BestActions {
            version: Self::VERSION,
            granularity: table.discretizer().granularity(),
            actions: table.best_actions(on_tie),
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            PolicyFile::QValues { version, .. } | PolicyFile::BestActions { version, .. } => {
                *version
            }
        }
    }

    pub fn discretizer(&self) -> Discretizer {
        match self {
            PolicyFile::QValues { granularity, .. }
            | PolicyFile::BestActions { granularity, .. } => Discretizer::new(*granularity),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PolicyFile::QValues { values, .. } => values.len(),
            PolicyFile::BestActions { actions, .. } => actions.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuild a value table. Only `q_values` files hold one.
    ///
    /// `path` is used for error reporting.
    pub fn into_table(self, default_value: f64, path: &Path) -> Result<ValueTable> {
        match self {
            PolicyFile::QValues {
                granularity,
                values,
                ..
            } => Ok(ValueTable::from_entries(
                Discretizer::new(granularity),
                default_value,
                values.into_iter().collect(),
            )),
            PolicyFile::BestActions { .. } => Err(Error::Persistence {
                path: path.to_path_buf(),
                reason: "policy holds best actions only, not action values".to_string(),
            }),
        }
    }

    /// Write the policy as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the file cannot be created or written.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let failed = |reason: String| Error::Persistence {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::create(path).map_err(|e| failed(format!("cannot create file: {e}")))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| failed(format!("cannot serialize policy: {e}")))?;
        writer
            .flush()
            .map_err(|e| failed(format!("cannot write file: {e}")))?;

        tracing::info!(path = %path.display(), entries = self.len(), "saved policy");
        Ok(())
    }

    /// Read and check a policy file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if the file is missing, is not valid
    /// policy JSON, has a malformed key, or has an unsupported version or
    /// granularity.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let failed = |reason: String| Error::Persistence {
            path: path.to_path_buf(),
            reason,
        };

        let file = File::open(path).map_err(|e| failed(format!("cannot open file: {e}")))?;
        let policy: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| failed(format!("malformed policy: {e}")))?;

        if policy.version() != Self::VERSION {
            return Err(failed(format!(
                "unsupported policy format version {}, expected {}",
                policy.version(),
                Self::VERSION
            )));
        }
        let granularity = match &policy {
            PolicyFile::QValues { granularity, .. }
            | PolicyFile::BestActions { granularity, .. } => *granularity,
        };
        if granularity == 0 {
            return Err(failed("granularity must be at least 1".to_string()));
        }

        tracing::info!(path = %path.display(), entries = policy.len(), "loaded policy");
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::q_learning::TableInit;

    fn sample_table() -> ValueTable {
        let mut table = ValueTable::new(Discretizer::new(50), TableInit::Lazy { value: 0.0 });
        table.set(StateKey::new(6, 0), ActionValues::new(-1.0 / 3.0, 0.1 + 0.2));
        table.set(StateKey::new(2, 350), ActionValues::new(17.25, 3.0e-17));
        table.set(StateKey::new(0, 1200), ActionValues::splat(-25.0));
        table
    }

    #[test]
    fn test_roundtrip_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("policy.json");
        let table = sample_table();

        PolicyFile::from_table(&table).save_to_file(&path).unwrap();
        let loaded = PolicyFile::load_from_file(&path)
            .unwrap()
            .into_table(0.0, &path)
            .unwrap();

        assert_eq!(loaded.len(), table.len());
        for (key, values) in table.iter() {
            let restored = loaded.get(key).unwrap();
            assert_eq!(restored.stand.to_bits(), values.stand.to_bits());
            assert_eq!(restored.roll.to_bits(), values.roll.to_bits());
        }
        assert_eq!(loaded.discretizer(), table.discretizer());
    }

    #[test]
    fn test_file_layout() {
        let json = serde_json::to_value(PolicyFile::from_table(&sample_table())).unwrap();
        assert_eq!(json["kind"], "q_values");
        assert_eq!(json["version"], 1);
        assert_eq!(json["granularity"], 50);
        assert_eq!(json["values"]["0:1200"][1], -25.0);
    }

    #[test]
    fn test_best_actions_file() {
        let policy = PolicyFile::best_actions(&sample_table(), Action::Stand);
        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["kind"], "best_actions");
        assert_eq!(json["actions"]["6:0"], "roll");
        assert_eq!(json["actions"]["2:350"], "stand");
        assert_eq!(json["actions"]["0:1200"], "stand");
    }

    #[test]
    fn test_best_actions_cannot_become_table() {
        let policy = PolicyFile::best_actions(&sample_table(), Action::Stand);
        let err = policy.into_table(0.0, Path::new("x.json")).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = PolicyFile::load_from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }

    #[test]
    fn test_malformed_inputs() {
        let dir = tempdir().unwrap();
        let cases = [
            ("not json", "garbage"),
            ("missing values", r#"{"kind":"q_values","version":1,"granularity":50}"#),
            (
                "bad key",
                r#"{"kind":"q_values","version":1,"granularity":50,"values":{"six:0":[0.0,0.0]}}"#,
            ),
            (
                "short pair",
                r#"{"kind":"q_values","version":1,"granularity":50,"values":{"6:0":[0.0]}}"#,
            ),
            (
                "wrong version",
                r#"{"kind":"q_values","version":9,"granularity":50,"values":{}}"#,
            ),
            (
                "unknown kind",
                r#"{"kind":"v_values","version":1,"granularity":50,"values":{}}"#,
            ),
            (
                "bad action label",
                r#"{"kind":"best_actions","version":1,"granularity":50,"actions":{"6:0":"hold"}}"#,
            ),
            (
                "zero granularity",
                r#"{"kind":"q_values","version":1,"granularity":0,"values":{}}"#,
            ),
        ];

        for (name, contents) in cases {
            let path = dir.path().join(format!("{}.json", name.replace(' ', "_")));
            std::fs::write(&path, contents).unwrap();
            let result = PolicyFile::load_from_file(&path);
            assert!(
                matches!(result, Err(Error::Persistence { .. })),
                "case '{name}' should fail to load"
            );
        }
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("policy.json");
        let err = PolicyFile::from_table(&sample_table())
            .save_to_file(&path)
            .unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
    }
}
