//! Search-based player wrapping the minimax and alpha-beta engines.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    cache::TranspositionCache,
    config::{Algorithm, SearchConfig},
    searcher::{SearchOutcome, SearchStats, Searcher},
};
use crate::{
    Result,
    persistence::{AgentKind, Saved},
    ports::{Player, Rules},
    types::PlayerId,
};

/// Durable part of a search player: everything except the game and counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: serde::de::DeserializeOwned + Eq + std::hash::Hash"
))]
pub struct SearchState<K> {
    pub player_id: PlayerId,
    pub config: SearchConfig,
    pub cache: TranspositionCache<K>,
}

/// Player that picks moves by depth-bounded adversarial search.
///
/// The transposition cache lives as long as the player, so repeated searches
/// from related positions reuse earlier work.
///
/// # Examples
///
/// ```
/// use duelist::{
///     ports::Player,
///     search::SearchPlayer,
///     tictactoe::{BoardState, TicTacToe},
///     types::PlayerId,
/// };
///
/// let mut player = SearchPlayer::alpha_beta(TicTacToe::default(), PlayerId::FIRST, 3, false);
/// let state = BoardState::from_string("XX.OO....")?;
/// assert_eq!(player.make_move(&state)?, 2);
/// # Ok::<(), duelist::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SearchPlayer<G: Rules> {
    game: G,
    player_id: PlayerId,
    config: SearchConfig,
    cache: TranspositionCache<G::Key>,
    stats: SearchStats,
}

impl<G: Rules> SearchPlayer<G> {
    pub fn new(game: G, player_id: PlayerId, config: SearchConfig) -> Self {
        Self {
            game,
            player_id,
            config,
            cache: TranspositionCache::new(),
            stats: SearchStats::default(),
        }
    }

    /// Unpruned minimax player.
    pub fn minmax(game: G, player_id: PlayerId, depth: u32, symmetries: bool) -> Self {
        let config = SearchConfig::minmax()
            .with_depth(depth)
            .with_symmetries(symmetries);
        Self::new(game, player_id, config)
    }

    /// Alpha-beta player.
    pub fn alpha_beta(game: G, player_id: PlayerId, depth: u32, symmetries: bool) -> Self {
        let config = SearchConfig::alpha_beta()
            .with_depth(depth)
            .with_symmetries(symmetries);
        Self::new(game, player_id, config)
    }

    /// Run one root search from `state` for this player's seat.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidMoves`] if the seat has no legal move.
    pub fn search(&mut self, state: &G::State) -> Result<SearchOutcome<G::Action>> {
        let before = self.stats;
        let outcome = Searcher::new(
            &self.game,
            &self.config,
            self.player_id,
            &mut self.cache,
            &mut self.stats,
        )
        .search_root(state)?;

        debug!(
            player = %self.player_id,
            algorithm = ?self.config.algorithm,
            action = ?outcome.action,
            value = outcome.value,
            cache_hits = self.stats.cache_hits - before.cache_hits,
            expanded = self.stats.expanded - before.expanded,
            cutoffs = self.stats.cutoffs - before.cutoffs,
            cache_size = self.cache.len(),
            "search complete"
        );
        Ok(outcome)
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }

    /// Drop every cached entry.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn export_state(&self) -> SearchState<G::Key> {
        SearchState {
            player_id: self.player_id,
            config: self.config,
            cache: self.cache.clone(),
        }
    }

    /// Replace the durable state in one step and reset the counters.
    pub fn restore_state(&mut self, state: SearchState<G::Key>) {
        self.player_id = state.player_id;
        self.config = state.config;
        self.cache = state.cache;
        self.stats = SearchStats::default();
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Saved::new(AgentKind::Search, self.export_state()).to_bytes()
    }

    /// Restore from bytes produced by [`SearchPlayer::to_bytes`]. On error the
    /// player is left untouched.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let saved = Saved::from_bytes(bytes, AgentKind::Search)?;
        self.restore_state(saved.state);
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        Saved::new(AgentKind::Search, self.export_state()).save_to_file(path)
    }

    /// Restore from a file written by [`SearchPlayer::save`]. On error the
    /// player is left untouched.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let saved = Saved::load_from_file(path, AgentKind::Search)?;
        self.restore_state(saved.state);
        Ok(())
    }
}

impl<G: Rules> Player<G> for SearchPlayer<G> {
    fn make_move(&mut self, state: &G::State) -> Result<G::Action> {
        self.search(state).map(|outcome| outcome.action)
    }

    fn name(&self) -> &str {
        match self.config.algorithm {
            Algorithm::MinMax => "minmax",
            Algorithm::AlphaBeta => "alphabeta",
        }
    }
}
