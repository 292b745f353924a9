//! Static evaluation of a board from the maximizing player's side.

use crate::{ports::Rules, types::PlayerId};

/// Score `state` for `max` against `min`.
///
/// A won position is `+inf` for `max` and `-inf` for `min`. Anything else
/// scores the number of lines still open for `max` (no `min` piece on them)
/// minus the number of lines still open for `min`.
///
/// # Examples
///
/// ```
/// use duelist::{ports::Rules, search::evaluate, tictactoe::TicTacToe, types::PlayerId};
///
/// let game = TicTacToe::default();
/// let empty = game.initial_state();
/// assert_eq!(evaluate(&game, &empty, PlayerId::FIRST, PlayerId::SECOND), 0.0);
/// ```
pub fn evaluate<G: Rules + ?Sized>(game: &G, state: &G::State, max: PlayerId, min: PlayerId) -> f64 {
    match game.winner(state) {
        Some(winner) if winner == max => return f64::INFINITY,
        Some(winner) if winner == min => return f64::NEG_INFINITY,
        _ => {}
    }

    let (mut open_max, mut open_min) = (0i32, 0i32);
    for line in game.board(state).lines() {
        if !line.contains(&Some(min)) {
            open_max += 1;
        }
        if !line.contains(&Some(max)) {
            open_min += 1;
        }
    }
    f64::from(open_max - open_min)
}
