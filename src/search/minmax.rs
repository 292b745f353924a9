//! Unpruned bounded-depth minimax.

use super::{
    cache::{CacheEntry, Role},
    searcher::Searcher,
};
use crate::ports::Rules;

impl<G: Rules> Searcher<'_, G> {
    /// Backed-up value of `state` with `role` to move and `depth` plies left.
    pub(crate) fn minmax(&mut self, state: &G::State, key: &G::Key, depth: u32, role: Role) -> f64 {
        if let Some(entry) = self.cache.probe(role, key, depth) {
            self.stats.cache_hits += 1;
            return entry.value;
        }

        if let Some(value) = self.leaf_value(state, key, depth, role) {
            return value;
        }

        self.stats.expanded += 1;
        let mut best = role.worst();
        for transition in self.transitions(state, role) {
            let value = self.minmax(&transition.state, &transition.key, depth - 1, role.opposite());
            if role.improves(value, best) {
                best = value;
            }
        }

        self.cache
            .store(role, key.clone(), CacheEntry::exact(depth, best));
        best
    }
}
