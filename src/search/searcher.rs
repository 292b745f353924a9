//! Per-search context shared by the minimax and alpha-beta recursions.

use serde::{Deserialize, Serialize};

use super::{
    cache::{Bound, CacheEntry, EntryDepth, Role, TranspositionCache},
    config::{Algorithm, SearchConfig, TerminalReuse},
    evaluation::evaluate,
};
use crate::{
    Error, Result,
    ports::{Rules, TransitionOf},
    types::PlayerId,
};

/// Best root action and its backed-up value.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome<A> {
    pub action: A,
    pub value: f64,
}

/// Counters accumulated across searches until [`super::SearchPlayer::reset_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Queries answered from the cache without recursing
    pub cache_hits: u64,
    /// Interior nodes whose children were enumerated
    pub expanded: u64,
    /// Calls to the static evaluation
    pub evaluations: u64,
    /// Child loops stopped early by alpha-beta
    pub cutoffs: u64,
}

/// Borrows a player's cache and counters for the duration of one root search.
pub(crate) struct Searcher<'a, G: Rules> {
    game: &'a G,
    pub(super) config: &'a SearchConfig,
    max_player: PlayerId,
    pub(super) cache: &'a mut TranspositionCache<G::Key>,
    pub(super) stats: &'a mut SearchStats,
}

impl<'a, G: Rules> Searcher<'a, G> {
    pub(crate) fn new(
        game: &'a G,
        config: &'a SearchConfig,
        max_player: PlayerId,
        cache: &'a mut TranspositionCache<G::Key>,
        stats: &'a mut SearchStats,
    ) -> Self {
        Self {
            game,
            config,
            max_player,
            cache,
            stats,
        }
    }

    /// Score every root transition at `depth - 1` with min to move and keep
    /// the first one with the highest value.
    pub(crate) fn search_root(&mut self, state: &G::State) -> Result<SearchOutcome<G::Action>> {
        let child_depth = self.config.depth.saturating_sub(1);
        let mut best: Option<SearchOutcome<G::Action>> = None;

        for transition in self.transitions(state, Role::Max) {
            let value = match self.config.algorithm {
                Algorithm::MinMax => {
                    self.minmax(&transition.state, &transition.key, child_depth, Role::Min)
                }
                Algorithm::AlphaBeta => self.alpha_beta(
                    &transition.state,
                    &transition.key,
                    child_depth,
                    Role::Min,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                ),
            };
            if best.as_ref().is_none_or(|b| value > b.value) {
                best = Some(SearchOutcome {
                    action: transition.action,
                    value,
                });
            }
        }

        best.ok_or(Error::NoValidMoves)
    }

    /// Moves for the side to act at a node of the given role.
    pub(super) fn transitions(&self, state: &G::State, role: Role) -> Vec<TransitionOf<G>> {
        let player = match role {
            Role::Max => self.max_player,
            Role::Min => self.max_player.opponent(),
        };
        if self.config.symmetries {
            self.game.canonical_transitions(state, player)
        } else {
            self.game.possible_transitions(state, player)
        }
    }

    /// Evaluate and cache the node if the depth budget is spent or the game
    /// is over; `None` means the node must be expanded.
    pub(super) fn leaf_value(
        &mut self,
        state: &G::State,
        key: &G::Key,
        depth: u32,
        role: Role,
    ) -> Option<f64> {
        let terminal = self.game.is_terminal(state);
        if depth > 0 && !terminal {
            return None;
        }

        let value = evaluate(self.game, state, self.max_player, self.max_player.opponent());
        self.stats.evaluations += 1;

        let depth = if terminal && self.config.terminal_reuse == TerminalReuse::AnyDepth {
            EntryDepth::Unbounded
        } else {
            EntryDepth::Searched(0)
        };
        self.cache.store(
            role,
            key.clone(),
            CacheEntry {
                depth,
                value,
                bound: Bound::Exact,
            },
        );
        Some(value)
    }
}
