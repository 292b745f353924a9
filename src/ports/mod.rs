//! Ports (trait boundaries) for external collaborators.
//!
//! The search engines and the Monte Carlo learner only talk to the game
//! through these traits. Rules engines, players and training observers are
//! implemented outside the core and plugged in here.

pub mod observer;
pub mod player;
pub mod rules;

pub use observer::Observer;
pub use player::Player;
pub use rules::{Rules, Symmetry, TransitionOf, canonicalize};
