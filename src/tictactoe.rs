//! Tic-tac-toe reference game on an N×N board

pub mod board;
pub mod lines;
pub mod rules;
pub mod symmetry;

pub use board::{BoardState, Cell};
pub use lines::LineAnalyzer;
pub use rules::TicTacToe;
pub use symmetry::D4Transform;
