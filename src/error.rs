//! Error types for the Ten Thousand crate

use std::path::PathBuf;

use thiserror::Error;

use crate::q_learning::StateKey;

/// Main error type for the Ten Thousand crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid action '{value}' (expected one of: stand, roll, 0, 1)")]
    InvalidAction { value: String },

    #[error("policy has no entry for state {key}")]
    PolicyLookup { key: StateKey },

    #[error("failed to load policy from {}: {reason}", path.display())]
    PolicyLoad { path: PathBuf, reason: String },

    #[error("policy persistence failed for {}: {reason}", path.display())]
    Persistence { path: PathBuf, reason: String },

    #[error("invalid decision: {message}")]
    InvalidDecision { message: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}

impl Error {
    /// Re-tag a persistence failure as a policy load failure.
    ///
    /// Players report unreadable policy files as [`Error::PolicyLoad`]; the
    /// shared reader reports [`Error::Persistence`].
    pub(crate) fn into_policy_load(self) -> Self {
        match self {
            Error::Persistence { path, reason } => Error::PolicyLoad { path, reason },
            other => other,
        }
    }
}
