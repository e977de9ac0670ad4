//! Application configuration.
//!
//! Hyperparameters, table initialization and environment shaping are plain
//! serde types so a run can be described in one JSON file.
//!
//! # Usage
//!
//! ```
//! use ten_thousand::app::AgentConfig;
//!
//! let config = AgentConfig::default()
//!     .with_learning_rate(0.1)
//!     .with_seed(42);
//! config.validate()?;
//! # Ok::<(), ten_thousand::Error>(())
//! ```

pub mod config;

pub use config::{AgentConfig, RunConfig};
