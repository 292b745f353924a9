//! State-value table learned by the Monte Carlo agent.

use std::{collections::HashMap, hash::Hash};

use serde::{Deserialize, Serialize};

/// Canonical state key -> learned value.
///
/// Unseen keys read as 0. Reading through [`StateValueTable::value`] also
/// inserts that 0, since membership decides between greedy and random play
/// at inference time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize",
    deserialize = "K: serde::de::DeserializeOwned + Eq + Hash"
))]
pub struct StateValueTable<K> {
    values: HashMap<K, f64>,
}

impl<K: Clone + Eq + Hash> StateValueTable<K> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Value of `key`, materializing a zero entry on a miss.
    pub fn value(&mut self, key: &K) -> f64 {
        *self.values.entry(key.clone()).or_insert(0.0)
    }

    /// Value of `key` without inserting anything.
    pub fn peek(&self, key: &K) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    /// Constant step-size update `V += lr * (target - V)`; returns the new value.
    pub fn update(&mut self, key: &K, target: f64, learning_rate: f64) -> f64 {
        let value = self.values.entry(key.clone()).or_insert(0.0);
        *value += learning_rate * (target - *value);
        *value
    }

    /// Number of explored states.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Clone + Eq + Hash> Default for StateValueTable<K> {
    fn default() -> Self {
        Self::new()
    }
}
