//! Minimax with alpha-beta pruning over the same cache contract.

use super::{
    cache::{Bound, CacheEntry, EntryDepth, Role},
    config::CutoffCaching,
    searcher::Searcher,
};
use crate::ports::Rules;

impl<G: Rules> Searcher<'_, G> {
    /// Alpha-beta value of `state` inside the window `(alpha, beta)`.
    ///
    /// A max node stops once its best value reaches `beta`, a min node once
    /// its best value drops to `alpha`. Under [`CutoffCaching::Bounded`] the
    /// stored entry records whether the value is exact or only a bound.
    pub(crate) fn alpha_beta(
        &mut self,
        state: &G::State,
        key: &G::Key,
        depth: u32,
        role: Role,
        mut alpha: f64,
        mut beta: f64,
    ) -> f64 {
        if let Some(entry) = self.cache.probe(role, key, depth) {
            match entry.bound {
                Bound::Exact => {
                    self.stats.cache_hits += 1;
                    return entry.value;
                }
                Bound::Lower if entry.value >= beta => {
                    self.stats.cache_hits += 1;
                    return entry.value;
                }
                Bound::Lower => alpha = alpha.max(entry.value),
                Bound::Upper if entry.value <= alpha => {
                    self.stats.cache_hits += 1;
                    return entry.value;
                }
                Bound::Upper => beta = beta.min(entry.value),
            }
        }

        if let Some(value) = self.leaf_value(state, key, depth, role) {
            return value;
        }

        let (window_alpha, window_beta) = (alpha, beta);
        self.stats.expanded += 1;
        let mut best = role.worst();
        for transition in self.transitions(state, role) {
            let value = self.alpha_beta(
                &transition.state,
                &transition.key,
                depth - 1,
                role.opposite(),
                alpha,
                beta,
            );
            if role.improves(value, best) {
                best = value;
                match role {
                    Role::Max => alpha = alpha.max(best),
                    Role::Min => beta = beta.min(best),
                }
            }
            let cutoff = match role {
                Role::Max => best >= beta,
                Role::Min => best <= alpha,
            };
            if cutoff {
                self.stats.cutoffs += 1;
                break;
            }
        }

        let bound = match self.config.cutoff_caching {
            CutoffCaching::AsExact => Bound::Exact,
            CutoffCaching::Bounded if best <= window_alpha => Bound::Upper,
            CutoffCaching::Bounded if best >= window_beta => Bound::Lower,
            CutoffCaching::Bounded => Bound::Exact,
        };
        self.cache.store(
            role,
            key.clone(),
            CacheEntry {
                depth: EntryDepth::Searched(depth),
                value: best,
                bound,
            },
        );
        best
    }
}
