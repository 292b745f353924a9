//! Monte Carlo agent hyperparameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Switch to search-based opponents partway through training.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdversarialConfig {
    /// Fraction of the episode budget after which both seats become minimax
    /// players
    pub switch_ratio: f64,
    /// Search depth of the minimax opponents
    pub depth: u32,
    /// Whether the minimax opponents search symmetry-reduced transitions
    pub symmetries: bool,
}

impl Default for AdversarialConfig {
    fn default() -> Self {
        Self {
            switch_ratio: 0.9,
            depth: 1,
            symmetries: false,
        }
    }
}

/// Configuration for a [`super::MonteCarloPlayer`] and its training loop.
///
/// # Examples
///
/// ```
/// use duelist::monte_carlo::{AdversarialConfig, MonteCarloConfig};
///
/// let config = MonteCarloConfig::default()
///     .with_episodes(50_000)
///     .with_exploration_decay_rate(1e-4)
///     .with_adversarial(AdversarialConfig::default());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Number of training episodes
    pub episodes: usize,
    /// Discount rate `gamma` applied to later rewards
    pub discount: f64,
    /// Constant step size `alpha` of the value update
    pub learning_rate: f64,
    /// Floor of the exploration schedule
    pub min_exploration_rate: f64,
    /// Exponential decay rate of the exploration schedule
    pub exploration_decay_rate: f64,
    /// Consecutive repeats of the learner's own action that end an episode
    /// as a draw
    pub max_repeated_actions: usize,
    /// Optional hard cap on moves per episode, counted over both seats
    pub max_episode_moves: Option<usize>,
    /// Optional one-time switch to minimax opponents
    pub adversarial: Option<AdversarialConfig>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            episodes: 200_000,
            discount: 0.95,
            learning_rate: 0.1,
            min_exploration_rate: 0.01,
            exploration_decay_rate: 3e-5,
            max_repeated_actions: 10,
            max_episode_moves: None,
            adversarial: None,
        }
    }
}

impl MonteCarloConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_min_exploration_rate(mut self, rate: f64) -> Self {
        self.min_exploration_rate = rate;
        self
    }

    pub fn with_exploration_decay_rate(mut self, rate: f64) -> Self {
        self.exploration_decay_rate = rate;
        self
    }

    pub fn with_max_repeated_actions(mut self, count: usize) -> Self {
        self.max_repeated_actions = count;
        self
    }

    pub fn with_max_episode_moves(mut self, moves: usize) -> Self {
        self.max_episode_moves = Some(moves);
        self
    }

    pub fn with_adversarial(mut self, adversarial: AdversarialConfig) -> Self {
        self.adversarial = Some(adversarial);
        self
    }

    /// Load a configuration from a JSON file; missing fields take their
    /// defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject hyperparameters outside their meaningful ranges.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(0.0..=1.0).contains(&self.discount) {
            return invalid(format!("discount must be in [0, 1], got {}", self.discount));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.min_exploration_rate) {
            return invalid(format!(
                "minimum exploration rate must be in [0, 1], got {}",
                self.min_exploration_rate
            ));
        }
        if !(self.exploration_decay_rate >= 0.0 && self.exploration_decay_rate.is_finite()) {
            return invalid(format!(
                "exploration decay rate must be a finite non-negative number, got {}",
                self.exploration_decay_rate
            ));
        }
        if self.max_repeated_actions == 0 {
            return invalid("max repeated actions must be at least 1".to_string());
        }
        if self.max_episode_moves == Some(0) {
            return invalid("max episode moves must be at least 1".to_string());
        }
        if let Some(adversarial) = &self.adversarial
            && !(0.0..=1.0).contains(&adversarial.switch_ratio)
        {
            return invalid(format!(
                "switch ratio must be in [0, 1], got {}",
                adversarial.switch_ratio
            ));
        }
        Ok(())
    }
}
