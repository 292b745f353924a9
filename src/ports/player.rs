//! Player port - abstraction over move-selection strategies
//!
//! Search players, the Monte Carlo learner and baselines all implement this
//! trait, so the training loop and the CLI can seat any of them.

use crate::{Result, ports::Rules};

/// A strategy that picks a move for the player to act in a given state.
///
/// # Examples
///
/// ```
/// use duelist::{
///     baseline::RandomPlayer,
///     ports::{Player, Rules},
///     tictactoe::TicTacToe,
/// };
///
/// let game = TicTacToe::default();
/// let mut player = RandomPlayer::with_seed(game, 7);
/// let state = game.initial_state();
/// let action = player.make_move(&state)?;
/// assert!(action < 9);
/// # Ok::<(), duelist::Error>(())
/// ```
pub trait Player<G: Rules> {
    /// Select a move for the player whose turn it is in `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if no valid moves are available.
    fn make_move(&mut self, state: &G::State) -> Result<G::Action>;

    /// Get the player's name.
    ///
    /// Used for identification in match reports and logging.
    fn name(&self) -> &str;
}

impl<G: Rules, P: Player<G> + ?Sized> Player<G> for Box<P> {
    fn make_move(&mut self, state: &G::State) -> Result<G::Action> {
        (**self).make_move(state)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
