//! Adversarial search and Monte Carlo value learning for two-player board
//! games
//!
//! This crate provides:
//! - Rules and symmetry ports that keep the engines game-agnostic
//! - Minimax and alpha-beta search sharing a depth-aware transposition cache
//! - A Monte Carlo state-value learner with a self-play training loop
//! - An N x N tic-tac-toe rules engine with D4 symmetry reduction
//! - Versioned MessagePack persistence of trained players

pub mod baseline;
pub mod cli;
pub mod error;
pub mod monte_carlo;
pub mod persistence;
pub mod ports;
pub mod search;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
