//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing Monte Carlo training,
//! allowing composable progress reporting and data export without coupling
//! the episode loop to specific output formats.

use crate::{Result, monte_carlo::EpisodeSummary};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. `on_episode_end(summary)` - After each episode's value update
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use duelist::{monte_carlo::EpisodeSummary, ports::Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> duelist::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after an episode has been played and backpropagated.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, flush files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
