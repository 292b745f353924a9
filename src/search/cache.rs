//! Transposition cache shared by both search engines.
//!
//! One map serves both roles: entries are keyed by `(Role, Key)`, so a state
//! evaluated with max to move never answers a query with min to move.

use std::{collections::HashMap, hash::Hash};

use serde::{Deserialize, Serialize};

/// Which side is to move at a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Max,
    Min,
}

impl Role {
    pub fn opposite(self) -> Role {
        match self {
            Role::Max => Role::Min,
            Role::Min => Role::Max,
        }
    }

    /// Starting value of a node before any child is scored.
    pub fn worst(self) -> f64 {
        match self {
            Role::Max => f64::NEG_INFINITY,
            Role::Min => f64::INFINITY,
        }
    }

    /// Whether `candidate` strictly improves on `best` for this role.
    pub fn improves(self, candidate: f64, best: f64) -> bool {
        match self {
            Role::Max => candidate > best,
            Role::Min => candidate < best,
        }
    }
}

/// Remaining depth an entry was computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryDepth {
    Searched(u32),
    /// Terminal value, valid at any remaining depth.
    Unbounded,
}

/// How the cached value relates to the node's true value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound {
    Exact,
    /// The true value is at least the cached one (fail high).
    Lower,
    /// The true value is at most the cached one (fail low).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub depth: EntryDepth,
    pub value: f64,
    pub bound: Bound,
}

impl CacheEntry {
    pub fn exact(depth: u32, value: f64) -> Self {
        CacheEntry {
            depth: EntryDepth::Searched(depth),
            value,
            bound: Bound::Exact,
        }
    }

    /// An entry searched to depth `d` answers every query at depth `<= d`.
    pub fn answers(&self, requested: u32) -> bool {
        match self.depth {
            EntryDepth::Searched(searched) => requested <= searched,
            EntryDepth::Unbounded => true,
        }
    }
}

/// Memo of search results. Grows for the lifetime of its owner; call
/// [`TranspositionCache::clear`] to reclaim memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: serde::de::DeserializeOwned + Eq + Hash"
))]
pub struct TranspositionCache<K> {
    entries: HashMap<(Role, K), CacheEntry>,
}

impl<K: Clone + Eq + Hash> TranspositionCache<K> {
    pub fn new() -> Self {
        TranspositionCache {
            entries: HashMap::new(),
        }
    }

    /// Entry for `key` that can answer a query at `depth`.
    pub fn probe(&self, role: Role, key: &K, depth: u32) -> Option<CacheEntry> {
        self.entries
            .get(&(role, key.clone()))
            .filter(|entry| entry.answers(depth))
            .copied()
    }

    pub fn store(&mut self, role: Role, key: K, entry: CacheEntry) {
        self.entries.insert((role, key), entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Clone + Eq + Hash> Default for TranspositionCache<K> {
    fn default() -> Self {
        Self::new()
    }
}
