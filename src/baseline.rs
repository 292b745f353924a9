//! Baseline opponents.

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    ports::{Player, Rules},
};

/// Plays a uniformly random legal move.
#[derive(Debug, Clone)]
pub struct RandomPlayer<G: Rules> {
    game: G,
    rng: StdRng,
}

impl<G: Rules> RandomPlayer<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a random player with a deterministic seed
    pub fn with_seed(game: G, seed: u64) -> Self {
        Self {
            game,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<G: Rules> Player<G> for RandomPlayer<G> {
    fn make_move(&mut self, state: &G::State) -> Result<G::Action> {
        let player = self.game.current_player(state);
        self.game
            .possible_transitions(state, player)
            .choose(&mut self.rng)
            .map(|t| t.action.clone())
            .ok_or(Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "random"
    }
}
