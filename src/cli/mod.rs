//! CLI infrastructure for the `tenk` binary
//!
//! This module provides the command-line interface for training, evaluating
//! and tuning Ten Thousand agents.

pub mod commands;
pub mod output;
