//! Rules-engine and symmetry ports.
//!
//! The engines never look inside a game state. Everything they need (winner,
//! board contents, whose turn it is, successor enumeration and move
//! application) comes through [`Rules`]; canonicalization under board
//! symmetries comes through [`Symmetry`].

use std::{fmt::Debug, hash::Hash};

use serde::{Serialize, de::DeserializeOwned};

use crate::types::{Grid, PlayerId, Transition};

/// Transition type produced by a rules engine.
pub type TransitionOf<G> = Transition<<G as Rules>::Action, <G as Rules>::State, <G as Rules>::Key>;

/// Rules of a deterministic, perfect-information, two-player game.
///
/// # Examples
///
/// ```
/// use duelist::ports::Rules;
/// use duelist::tictactoe::TicTacToe;
/// use duelist::types::PlayerId;
///
/// let game = TicTacToe::default();
/// let state = game.initial_state();
/// assert_eq!(game.current_player(&state), PlayerId::FIRST);
/// assert_eq!(game.possible_transitions(&state, PlayerId::FIRST).len(), 9);
/// ```
pub trait Rules {
    /// Opaque game state.
    type State: Clone + Debug;
    /// A move as the rules engine understands it.
    type Action: Clone + PartialEq + Debug;
    /// Totally ordered, hashable state identity.
    type Key: Clone + Eq + Hash + Ord + Debug + Serialize + DeserializeOwned;

    /// State at the start of a game.
    fn initial_state(&self) -> Self::State;

    /// The winner, if any.
    fn winner(&self, state: &Self::State) -> Option<PlayerId>;

    /// Board contents with `None` as the neutral cell value.
    fn board(&self, state: &Self::State) -> Grid;

    /// The player whose turn it is.
    fn current_player(&self, state: &Self::State) -> PlayerId;

    /// Every legal move for `player`, keyed by the raw key of the successor.
    fn possible_transitions(
        &self,
        state: &Self::State,
        player: PlayerId,
    ) -> Vec<TransitionOf<Self>>;

    /// Legal moves for `player` with symmetry-equivalent successors merged,
    /// keyed by canonical key. Never longer than [`Rules::possible_transitions`].
    fn canonical_transitions(
        &self,
        state: &Self::State,
        player: PlayerId,
    ) -> Vec<TransitionOf<Self>>;

    /// Apply `action` for `player` in place; `false` if the move is illegal.
    fn apply_move(&self, state: &mut Self::State, action: &Self::Action, player: PlayerId)
    -> bool;

    /// Whether the game is over.
    fn is_terminal(&self, state: &Self::State) -> bool {
        self.winner(state).is_some()
    }
}

/// Board symmetries of a game.
pub trait Symmetry: Rules {
    /// Every symmetry-equivalent view of `state`, including `state` itself.
    fn transformed_states(&self, state: &Self::State) -> Vec<Self::State>;

    /// Hashable key of `state` as seen by `player`.
    fn hashable_key(&self, state: &Self::State, player: PlayerId) -> Self::Key;

    /// Minimal hashable key among all symmetry-equivalent views of `state`.
    fn canonical_key(&self, state: &Self::State, player: PlayerId) -> Self::Key {
        self.transformed_states(state)
            .iter()
            .map(|view| self.hashable_key(view, player))
            .min()
            .unwrap_or_else(|| self.hashable_key(state, player))
    }
}

/// Re-key `transitions` by canonical key and drop every transition whose
/// successor is equivalent to an earlier one.
///
/// Enumeration order is preserved, so the first transition of each
/// equivalence class is the one kept.
pub fn canonicalize<G: Symmetry + ?Sized>(
    game: &G,
    transitions: Vec<TransitionOf<G>>,
    player: PlayerId,
) -> Vec<TransitionOf<G>> {
    let mut seen = std::collections::HashSet::new();
    transitions
        .into_iter()
        .filter_map(|t| {
            let key = game.canonical_key(&t.state, player);
            seen.insert(key.clone())
                .then(|| Transition::new(t.action, t.state, key))
        })
        .collect()
}
