//! [`Rules`] and [`Symmetry`] for N-in-a-row on an N×N board.

use serde::{Deserialize, Serialize};

use super::board::BoardState;
use crate::{
    ports::{Rules, Symmetry, TransitionOf, canonicalize},
    types::{Grid, PlayerId, Transition},
};

/// Tic-tac-toe generalized to an N×N board where N in a row wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToe {
    size: usize,
}

impl TicTacToe {
    /// Create a game on a `size x size` board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] for a zero-sized board.
    pub fn new(size: usize) -> crate::Result<Self> {
        if size == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: "board size must be at least 1".to_string(),
            });
        }
        Ok(TicTacToe { size })
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        TicTacToe { size: 3 }
    }
}

impl Rules for TicTacToe {
    type State = BoardState;
    type Action = usize;
    type Key = String;

    fn initial_state(&self) -> BoardState {
        BoardState::new(self.size)
    }

    fn winner(&self, state: &BoardState) -> Option<PlayerId> {
        state.winner()
    }

    fn board(&self, state: &BoardState) -> Grid {
        let cells = state.cells.iter().map(|cell| cell.owner()).collect();
        Grid::new(state.size(), cells).unwrap_or_else(|_| Grid::empty(state.size()))
    }

    fn current_player(&self, state: &BoardState) -> PlayerId {
        state.to_move
    }

    fn possible_transitions(&self, state: &BoardState, player: PlayerId) -> Vec<TransitionOf<Self>> {
        state
            .legal_moves()
            .into_iter()
            .filter_map(|pos| {
                let next = state.place(pos, player).ok()?;
                let key = next.perspective_key(player);
                Some(Transition::new(pos, next, key))
            })
            .collect()
    }

    fn canonical_transitions(&self, state: &BoardState, player: PlayerId) -> Vec<TransitionOf<Self>> {
        canonicalize(self, self.possible_transitions(state, player), player)
    }

    fn apply_move(&self, state: &mut BoardState, action: &usize, player: PlayerId) -> bool {
        if state.is_terminal() || player != state.to_move {
            return false;
        }
        match state.place(*action, player) {
            Ok(next) => {
                *state = next;
                true
            }
            Err(_) => false,
        }
    }

    fn is_terminal(&self, state: &BoardState) -> bool {
        state.is_terminal()
    }
}

impl Symmetry for TicTacToe {
    fn transformed_states(&self, state: &BoardState) -> Vec<BoardState> {
        state.symmetric_views()
    }

    fn hashable_key(&self, state: &BoardState, player: PlayerId) -> String {
        state.perspective_key(player)
    }
}
