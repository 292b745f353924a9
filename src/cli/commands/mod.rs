//! Subcommands of the duelist binary.

pub mod evaluate;
pub mod train;
