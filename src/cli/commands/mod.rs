//! Subcommands of the `tenk` binary

pub mod evaluate;
pub mod sweep;
pub mod train;
