//! Monte Carlo state-value agent
//!
//! The agent scores the state *after* each of its candidate moves, keyed by
//! the canonical key of that successor from its own point of view. Training
//! moves are epsilon-greedy over those values; inference moves are greedy as
//! soon as any successor has been seen, and uniformly random otherwise.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::{config::MonteCarloConfig, trajectory::Trajectory, value_table::StateValueTable};
use crate::{
    Error, Result,
    persistence::{AgentKind, Saved},
    ports::{Player, Symmetry, TransitionOf},
    types::{PlayerId, Transition},
};

/// Durable part of a Monte Carlo player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: serde::de::DeserializeOwned + Eq + std::hash::Hash"
))]
pub struct MonteCarloState<K> {
    pub config: MonteCarloConfig,
    pub values: StateValueTable<K>,
    pub exploration_rate: f64,
    pub rewards: Vec<f64>,
    pub episodes_completed: usize,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Exploration rate after `episode`: `exp(-decay * episode)` clamped to
/// `[min_rate, 1]`.
pub fn exploration_schedule(decay_rate: f64, min_rate: f64, episode: usize) -> f64 {
    (-decay_rate * episode as f64).exp().clamp(min_rate, 1.0)
}

/// Player that learns a state-value function from self-play episodes.
#[derive(Debug, Clone)]
pub struct MonteCarloPlayer<G: Symmetry> {
    game: G,
    config: MonteCarloConfig,
    values: StateValueTable<G::Key>,
    exploration_rate: f64,
    rewards: Vec<f64>,
    episodes_completed: usize,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl<G: Symmetry> MonteCarloPlayer<G> {
    pub fn new(game: G, config: MonteCarloConfig) -> Self {
        Self {
            game,
            config,
            values: StateValueTable::new(),
            exploration_rate: 1.0,
            rewards: Vec::new(),
            episodes_completed: 0,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    pub fn values(&self) -> &StateValueTable<G::Key> {
        &self.values
    }

    pub fn exploration_rate(&self) -> f64 {
        self.exploration_rate
    }

    /// Per-episode rewards in training order.
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Mean of the last `window` rewards (fewer if training was shorter).
    pub fn mean_reward(&self, window: usize) -> Option<f64> {
        let start = self.rewards.len().saturating_sub(window);
        let tail = &self.rewards[start..];
        (!tail.is_empty()).then(|| tail.iter().sum::<f64>() / tail.len() as f64)
    }

    pub fn explored_states(&self) -> usize {
        self.values.len()
    }

    pub fn episodes_completed(&self) -> usize {
        self.episodes_completed
    }

    /// Legal moves for `player`, each keyed by the canonical key of its
    /// successor from `player`'s side.
    fn keyed_transitions(&self, state: &G::State, player: PlayerId) -> Vec<TransitionOf<G>> {
        self.game
            .possible_transitions(state, player)
            .into_iter()
            .map(|t| {
                let key = self.game.canonical_key(&t.state, player);
                Transition::new(t.action, t.state, key)
            })
            .collect()
    }

    /// First transition with the highest table value.
    fn greedy(&mut self, transitions: Vec<TransitionOf<G>>) -> Option<TransitionOf<G>> {
        let mut best: Option<(TransitionOf<G>, f64)> = None;
        for transition in transitions {
            let value = self.values.value(&transition.key);
            if best.as_ref().is_none_or(|(_, b)| value > *b) {
                best = Some((transition, value));
            }
        }
        best.map(|(transition, _)| transition)
    }

    /// Pick a training move for `player`: uniformly random with probability
    /// equal to the current exploration rate, greedy otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if `player` has no legal move.
    pub fn step_training(&mut self, state: &G::State, player: PlayerId) -> Result<TransitionOf<G>> {
        let transitions = self.keyed_transitions(state, player);
        if transitions.is_empty() {
            return Err(Error::NoValidMoves);
        }

        let explore = self.rng.random::<f64>() < self.exploration_rate;
        let chosen = if explore {
            let index = self.rng.random_range(0..transitions.len());
            transitions.into_iter().nth(index)
        } else {
            self.greedy(transitions)
        };
        chosen.ok_or(Error::NoValidMoves)
    }

    /// Record the episode's reward, back the trajectory up into the value
    /// table and advance the exploration schedule.
    pub fn finish_episode(&mut self, episode: usize, mut trajectory: Trajectory<G::Key>, reward: f64) {
        trajectory.set_terminal_reward(reward);
        self.rewards.push(reward);
        trajectory.backpropagate(
            &mut self.values,
            self.config.discount,
            self.config.learning_rate,
        );
        self.exploration_rate = exploration_schedule(
            self.config.exploration_decay_rate,
            self.config.min_exploration_rate,
            episode,
        );
        self.episodes_completed += 1;
    }

    pub fn export_state(&self) -> MonteCarloState<G::Key> {
        MonteCarloState {
            config: self.config.clone(),
            values: self.values.clone(),
            exploration_rate: self.exploration_rate,
            rewards: self.rewards.clone(),
            episodes_completed: self.episodes_completed,
            rng_seed: self.rng_seed,
        }
    }

    /// Replace the durable state in one step; the RNG restarts from the
    /// saved seed.
    pub fn restore_state(&mut self, state: MonteCarloState<G::Key>) {
        let MonteCarloState {
            config,
            values,
            exploration_rate,
            rewards,
            episodes_completed,
            rng_seed,
        } = state;
        self.config = config;
        self.values = values;
        self.exploration_rate = exploration_rate;
        self.rewards = rewards;
        self.episodes_completed = episodes_completed;
        self.rng = build_rng(rng_seed);
        self.rng_seed = rng_seed;
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Saved::new(AgentKind::MonteCarlo, self.export_state()).to_bytes()
    }

    /// Restore from bytes produced by [`MonteCarloPlayer::to_bytes`]. On
    /// error the player is left untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let saved = Saved::from_bytes(bytes, AgentKind::MonteCarlo)?;
        self.restore_state(saved.state);
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Saved::new(AgentKind::MonteCarlo, self.export_state()).save_to_file(path)
    }

    /// Restore from a file written by [`MonteCarloPlayer::save`]. On error
    /// the player is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let saved = Saved::load_from_file(path, AgentKind::MonteCarlo)?;
        self.restore_state(saved.state);
        Ok(())
    }
}

impl<G: Symmetry> Player<G> for MonteCarloPlayer<G> {
    fn make_move(&mut self, state: &G::State) -> Result<G::Action> {
        let player = self.game.current_player(state);
        let transitions = self.keyed_transitions(state, player);

        let seen = transitions.iter().any(|t| self.values.contains(&t.key));
        let chosen = if seen {
            self.greedy(transitions)
        } else {
            transitions.choose(&mut self.rng).cloned()
        };
        chosen.map(|t| t.action).ok_or(Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "montecarlo"
    }
}
