//! Newtype wrappers and shared value types used across the engines.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one of the two seats in a game (0 moves first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u8);

impl PlayerId {
    /// The player who opens the game.
    pub const FIRST: PlayerId = PlayerId(0);
    /// The player who replies.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a player id, validating it names one of the two seats.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if the id is not 0 or 1.
    pub fn new(value: u8) -> Result<Self, crate::Error> {
        if value < 2 {
            Ok(PlayerId(value))
        } else {
            Err(crate::Error::InvalidConfiguration {
                message: format!("player id must be 0 or 1, got {value}"),
            })
        }
    }

    /// Get the inner value.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Seat index usable for array lookups.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    pub fn opponent(self) -> PlayerId {
        PlayerId(1 - self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Square board snapshot handed out by a rules engine.
///
/// Each cell holds the owner of the piece on it, `None` being the neutral
/// value for an empty cell. Cells are stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<PlayerId>>,
}

impl Grid {
    /// Create a grid from row-major cells.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidGrid`] if `cells` does not hold exactly
    /// `size * size` entries.
    pub fn new(size: usize, cells: Vec<Option<PlayerId>>) -> Result<Self, crate::Error> {
        if cells.len() != size * size {
            return Err(crate::Error::InvalidGrid {
                size,
                expected: size * size,
                got: cells.len(),
            });
        }
        Ok(Grid { size, cells })
    }

    /// An all-neutral grid.
    pub fn empty(size: usize) -> Self {
        Grid {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Owner of the cell at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<PlayerId> {
        self.cells[row * self.size + col]
    }

    /// Every row, column and both main diagonals, `2N + 2` lines in total.
    pub fn lines(&self) -> impl Iterator<Item = Vec<Option<PlayerId>>> + '_ {
        line_indices(self.size)
            .into_iter()
            .map(|line| line.into_iter().map(|idx| self.cells[idx]).collect())
    }
}

/// Row-major cell indices of every row, column and both main diagonals of an
/// `size x size` board.
pub fn line_indices(size: usize) -> Vec<Vec<usize>> {
    let mut lines = Vec::with_capacity(2 * size + 2);
    for row in 0..size {
        lines.push((0..size).map(|col| row * size + col).collect());
    }
    for col in 0..size {
        lines.push((0..size).map(|row| row * size + col).collect());
    }
    lines.push((0..size).map(|i| i * size + i).collect());
    lines.push((0..size).map(|i| i * size + (size - 1 - i)).collect());
    lines
}

/// One legal move together with the state it produces.
///
/// `key` is either the raw hashable key of `state` or its canonical key,
/// depending on which enumeration produced the transition.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<A, S, K> {
    pub action: A,
    pub state: S,
    pub key: K,
}

impl<A, S, K> Transition<A, S, K> {
    /// Create a new transition.
    pub fn new(action: A, state: S, key: K) -> Self {
        Transition { action, state, key }
    }
}

/// Episode result from the learner's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Classify a finished game for `learner` given the reported winner.
    pub fn for_player(winner: Option<PlayerId>, learner: PlayerId) -> Self {
        match winner {
            None => Outcome::Draw,
            Some(w) if w == learner => Outcome::Win,
            Some(_) => Outcome::Loss,
        }
    }

    /// Terminal reward written into the trajectory.
    pub fn reward(self) -> f64 {
        match self {
            Outcome::Win => rewards::WIN,
            Outcome::Draw => rewards::DRAW,
            Outcome::Loss => rewards::LOSS,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Loss => write!(f, "loss"),
        }
    }
}

/// Terminal rewards. No other value is ever written as a terminal reward.
pub mod rewards {
    /// Reward when the learner is the reported winner.
    pub const WIN: f64 = 10.0;

    /// Reward for a drawn or stalled episode.
    pub const DRAW: f64 = -1.0;

    /// Reward when the opponent wins.
    pub const LOSS: f64 = -10.0;

    /// Reward recorded for every non-terminal learner step.
    pub const STEP: f64 = 0.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_validation() {
        assert!(PlayerId::new(0).is_ok());
        assert!(PlayerId::new(1).is_ok());
        assert!(PlayerId::new(2).is_err());
    }

    #[test]
    fn test_player_id_opponent() {
        assert_eq!(PlayerId::FIRST.opponent(), PlayerId::SECOND);
        assert_eq!(PlayerId::SECOND.opponent(), PlayerId::FIRST);
    }

    #[test]
    fn test_line_count() {
        for size in 1..=5 {
            assert_eq!(line_indices(size).len(), 2 * size + 2);
        }
    }

    #[test]
    fn test_lines_3x3() {
        let lines = line_indices(3);
        assert_eq!(lines[0], vec![0, 1, 2]);
        assert_eq!(lines[3], vec![0, 3, 6]);
        assert_eq!(lines[6], vec![0, 4, 8]);
        assert_eq!(lines[7], vec![2, 4, 6]);
    }

    #[test]
    fn test_grid_rejects_wrong_length() {
        assert!(Grid::new(3, vec![None; 8]).is_err());
        assert!(Grid::new(3, vec![None; 9]).is_ok());
    }

    #[test]
    fn test_outcome_rewards() {
        let me = PlayerId::FIRST;
        assert_eq!(Outcome::for_player(Some(me), me).reward(), 10.0);
        assert_eq!(Outcome::for_player(Some(me.opponent()), me).reward(), -10.0);
        assert_eq!(Outcome::for_player(None, me).reward(), -1.0);
    }
}
