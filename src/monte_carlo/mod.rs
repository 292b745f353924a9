//! Monte Carlo state-value learning
//!
//! A [`MonteCarloPlayer`] learns a table of values for the canonical states
//! it moves into. Each self-play episode records the learner's visited keys
//! in a [`Trajectory`]; once the game ends the terminal reward is backed up
//! through the trajectory with discounting and a constant step size.
//!
//! [`TrainingPipeline`] runs the episodes, alternating the learner's seat and
//! optionally switching to minimax opponents partway through.

pub mod agent;
pub mod config;
pub mod observers;
pub mod trajectory;
pub mod training;
pub mod value_table;

pub use agent::{MonteCarloPlayer, MonteCarloState, exploration_schedule};
pub use config::{AdversarialConfig, MonteCarloConfig};
pub use observers::{JsonlObserver, ProgressObserver};
pub use trajectory::Trajectory;
pub use training::{
    EpisodeSummary, REWARD_WINDOW, TrainingPipeline, TrainingResult, adversarial_switch_episode,
    learner_seat,
};
pub use value_table::StateValueTable;
