//! Per-episode record of the learner's visited states.

use std::hash::Hash;

use super::value_table::StateValueTable;

/// Ordered `(key, reward)` pairs for the learner's moves in one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<K> {
    steps: Vec<(K, f64)>,
}

impl<K: Clone + Eq + Hash> Trajectory<K> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn push(&mut self, key: K, reward: f64) {
        self.steps.push((key, reward));
    }

    /// Overwrite the reward of the last step with the episode outcome.
    /// Does nothing on an empty trajectory.
    pub fn set_terminal_reward(&mut self, reward: f64) {
        if let Some(last) = self.steps.last_mut() {
            last.1 = reward;
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[(K, f64)] {
        &self.steps
    }

    /// Walk the episode back to front accumulating `G = r + discount * G`
    /// and move each visited state's value toward its return.
    pub fn backpropagate(self, table: &mut StateValueTable<K>, discount: f64, learning_rate: f64) {
        let mut return_of_rewards = 0.0;
        for (key, reward) in self.steps.into_iter().rev() {
            return_of_rewards = reward + discount * return_of_rewards;
            table.update(&key, return_of_rewards, learning_rate);
        }
    }
}

impl<K: Clone + Eq + Hash> Default for Trajectory<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_reward_replaces_last_step() {
        let mut trajectory = Trajectory::new();
        trajectory.set_terminal_reward(10.0);
        assert!(trajectory.is_empty());

        trajectory.push("a", 0.0);
        trajectory.push("b", 0.0);
        trajectory.set_terminal_reward(-10.0);
        assert_eq!(trajectory.steps(), &[("a", 0.0), ("b", -10.0)]);
    }

    #[test]
    fn test_discounted_returns() {
        let mut trajectory = Trajectory::new();
        trajectory.push("a", 0.0);
        trajectory.push("b", 0.0);
        trajectory.push("c", 10.0);

        let mut table = StateValueTable::new();
        trajectory.backpropagate(&mut table, 0.5, 1.0);

        assert_eq!(table.peek(&"c"), Some(10.0));
        assert_eq!(table.peek(&"b"), Some(5.0));
        assert_eq!(table.peek(&"a"), Some(2.5));
    }

    #[test]
    fn test_repeated_replay_converges_monotonically() {
        let mut table = StateValueTable::new();
        let mut previous = table.value(&"s");
        for _ in 0..50 {
            let mut trajectory = Trajectory::new();
            trajectory.push("s", 0.0);
            trajectory.push("t", 10.0);
            trajectory.backpropagate(&mut table, 0.95, 0.1);

            let current = table.value(&"s");
            assert!(current > previous);
            assert!(current < 9.5);
            previous = current;
        }
    }

    #[test]
    fn test_every_visit_updates_twice() {
        let mut trajectory = Trajectory::new();
        trajectory.push("s", 0.0);
        trajectory.push("s", 1.0);

        let mut table = StateValueTable::new();
        trajectory.backpropagate(&mut table, 1.0, 0.5);

        // 0 -> 0.5 (G = 1) -> 0.75 (G = 1)
        assert_eq!(table.peek(&"s"), Some(0.75));
    }
}
