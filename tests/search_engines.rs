use duelist::{
    ports::{Player, Rules},
    search::{SearchConfig, SearchPlayer, TerminalReuse},
    tictactoe::{BoardState, TicTacToe},
    types::PlayerId,
};

const POSITIONS: &[&str] = &[
    ".........",
    "....X....",
    "X...O....",
    "XO..X....",
    "XO.OX....",
    "X.O.X.O..",
];

fn board(s: &str) -> BoardState {
    BoardState::from_string(s).unwrap()
}

#[test]
fn minmax_and_alphabeta_agree_on_action_and_value() {
    let game = TicTacToe::default();
    for &position in POSITIONS {
        let state = board(position);
        let seat = game.current_player(&state);
        for depth in 1..=4 {
            for symmetries in [false, true] {
                let mut minmax = SearchPlayer::minmax(game, seat, depth, symmetries);
                let mut alpha_beta = SearchPlayer::alpha_beta(game, seat, depth, symmetries);
                assert_eq!(
                    minmax.search(&state).unwrap(),
                    alpha_beta.search(&state).unwrap(),
                    "position {position}, depth {depth}, symmetries {symmetries}"
                );
            }
        }
    }
}

#[test]
fn only_alphabeta_prunes() {
    let game = TicTacToe::default();
    let state = game.initial_state();
    let mut minmax = SearchPlayer::minmax(game, PlayerId::FIRST, 5, false);
    let mut alpha_beta = SearchPlayer::alpha_beta(game, PlayerId::FIRST, 5, false);
    minmax.search(&state).unwrap();
    alpha_beta.search(&state).unwrap();

    assert!(alpha_beta.stats().cutoffs > 0);
    assert_eq!(minmax.stats().cutoffs, 0);
}

#[test]
fn full_depth_search_opens_in_the_first_corner() {
    let game = TicTacToe::default();
    let state = game.initial_state();
    for symmetries in [false, true] {
        let mut minmax = SearchPlayer::minmax(game, PlayerId::FIRST, 9, symmetries);
        let mut alpha_beta = SearchPlayer::alpha_beta(game, PlayerId::FIRST, 9, symmetries);
        assert_eq!(minmax.make_move(&state).unwrap(), 0);
        assert_eq!(alpha_beta.make_move(&state).unwrap(), 0);
    }
}

/// -1 for a forced loss, 0 for anything short of a forced result, 1 for a forced win.
fn outcome_class(value: f64) -> i8 {
    match value {
        v if v == f64::INFINITY => 1,
        v if v == f64::NEG_INFINITY => -1,
        _ => 0,
    }
}

#[test]
fn symmetry_reduction_keeps_the_outcome_class() {
    let game = TicTacToe::default();
    let positions = POSITIONS.iter().chain(&["XX..O.O..", "XO.XO....", "X.O.OX..."]);
    for &position in positions {
        let state = board(position);
        let seat = game.current_player(&state);
        let full = SearchPlayer::alpha_beta(game, seat, 9, false)
            .search(&state)
            .unwrap();
        let reduced = SearchPlayer::alpha_beta(game, seat, 9, true)
            .search(&state)
            .unwrap();
        assert_eq!(
            outcome_class(full.value),
            outcome_class(reduced.value),
            "position {position}"
        );

        let reduced_minmax = SearchPlayer::minmax(game, seat, 9, true)
            .search(&state)
            .unwrap();
        assert_eq!(
            outcome_class(full.value),
            outcome_class(reduced_minmax.value),
            "position {position}"
        );
    }
}

#[test]
fn depth_four_alphabeta_opens_in_the_centre_or_a_corner() {
    let game = TicTacToe::default();
    let state = game.initial_state();
    for symmetries in [false, true] {
        let mut player = SearchPlayer::alpha_beta(game, PlayerId::FIRST, 4, symmetries);
        let action = player.make_move(&state).unwrap();
        assert!([0, 2, 4, 6, 8].contains(&action), "symmetries {symmetries}: {action}");
    }
}

#[test]
fn terminal_reuse_only_changes_hit_counts() {
    let game = TicTacToe::default();
    let state = board("X...O....");
    let leaf_only = SearchConfig::alpha_beta().with_depth(7);
    let any_depth = leaf_only.with_terminal_reuse(TerminalReuse::AnyDepth);

    let mut a = SearchPlayer::new(game, PlayerId::FIRST, leaf_only);
    let mut b = SearchPlayer::new(game, PlayerId::FIRST, any_depth);
    assert_eq!(a.search(&state).unwrap(), b.search(&state).unwrap());
}

#[test]
fn canonical_transitions_never_outnumber_possible_ones() {
    let game = TicTacToe::default();
    for &position in POSITIONS {
        let state = board(position);
        let seat = game.current_player(&state);
        let possible = game.possible_transitions(&state, seat);
        let canonical = game.canonical_transitions(&state, seat);
        assert!(canonical.len() <= possible.len(), "position {position}");
        assert!(!canonical.is_empty());
    }
}

#[test]
fn search_players_take_wins_and_block_on_larger_boards() {
    let game = TicTacToe::new(4).unwrap();
    // X to move with three in the top row
    let state = board("XXX.OOO.........");
    let mut player = SearchPlayer::alpha_beta(game, PlayerId::FIRST, 2, true);
    assert_eq!(player.make_move(&state).unwrap(), 3);
}
