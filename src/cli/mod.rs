//! CLI infrastructure for the duelist binary
//!
//! `train` runs Monte Carlo self-play on the reference game; `evaluate`
//! pits any two players against each other and reports per-seat results.

pub mod commands;
pub mod output;
