//! Evaluate command - play a batch of games between two players

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use serde::Serialize;

use crate::{
    baseline::RandomPlayer,
    cli::output::{format_share, print_kv, print_section},
    monte_carlo::{MonteCarloConfig, MonteCarloPlayer},
    ports::{Player, Rules},
    search::SearchPlayer,
    tictactoe::TicTacToe,
    types::PlayerId,
};

/// Which strategy sits in a seat.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerSpec {
    Random,
    MinMax,
    AlphaBeta,
    /// Trained Monte Carlo agent loaded from a file
    MonteCarlo(PathBuf),
}

/// Parse `random`, `minmax`, `alphabeta` or `montecarlo:<path>`.
pub fn parse_player_spec(value: &str) -> std::result::Result<PlayerSpec, String> {
    let trimmed = value.trim();
    if let Some(path) = trimmed.strip_prefix("montecarlo:") {
        if path.is_empty() {
            return Err("montecarlo player needs a path, e.g. montecarlo:agent.msgpack".into());
        }
        return Ok(PlayerSpec::MonteCarlo(PathBuf::from(path)));
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "random" => Ok(PlayerSpec::Random),
        "minmax" | "minimax" => Ok(PlayerSpec::MinMax),
        "alphabeta" | "alpha-beta" => Ok(PlayerSpec::AlphaBeta),
        other => Err(format!(
            "unknown player '{other}' (expected random, minmax, alphabeta or montecarlo:<path>)"
        )),
    }
}

#[derive(Parser, Debug)]
#[command(about = "Play games between two players and report results")]
pub struct EvaluateArgs {
    /// Player in the first seat (moves first)
    #[arg(value_parser = parse_player_spec)]
    pub first: PlayerSpec,

    /// Player in the second seat
    #[arg(value_parser = parse_player_spec)]
    pub second: PlayerSpec,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Search depth for minmax and alphabeta players
    #[arg(long, default_value_t = 4)]
    pub depth: u32,

    /// Let search players use symmetry-reduced moves
    #[arg(long, default_value_t = false)]
    pub symmetries: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Board side length
    #[arg(long, default_value_t = 3)]
    pub size: usize,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Results of a batch of games, indexed by seat.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStats {
    pub games: usize,
    pub wins: [usize; 2],
    pub draws: usize,
}

impl MatchStats {
    pub fn losses(&self, seat: PlayerId) -> usize {
        self.wins[seat.opponent().index()]
    }
}

/// Play `games` games between `players[0]` (first seat) and `players[1]`.
pub fn play_games<G: Rules>(
    game: &G,
    players: &mut [Box<dyn Player<G>>; 2],
    games: usize,
) -> Result<MatchStats> {
    let mut stats = MatchStats {
        games,
        ..MatchStats::default()
    };

    for _ in 0..games {
        let mut state = game.initial_state();
        while !game.is_terminal(&state) {
            let mover = game.current_player(&state);
            let player = &mut players[mover.index()];
            let action = player.make_move(&state)?;
            if !game.apply_move(&mut state, &action, mover) {
                bail!("{} proposed illegal move {action:?}", player.name());
            }
        }
        match game.winner(&state) {
            Some(winner) => stats.wins[winner.index()] += 1,
            None => stats.draws += 1,
        }
    }
    Ok(stats)
}

fn build_player(
    spec: &PlayerSpec,
    game: TicTacToe,
    seat: PlayerId,
    args: &EvaluateArgs,
) -> Result<Box<dyn Player<TicTacToe>>> {
    let seed = args.seed.map(|s| s.wrapping_add(seat.index() as u64));
    let player: Box<dyn Player<TicTacToe>> = match spec {
        PlayerSpec::Random => Box::new(match seed {
            Some(seed) => RandomPlayer::with_seed(game, seed),
            None => RandomPlayer::new(game),
        }),
        PlayerSpec::MinMax => Box::new(SearchPlayer::minmax(
            game,
            seat,
            args.depth,
            args.symmetries,
        )),
        PlayerSpec::AlphaBeta => Box::new(SearchPlayer::alpha_beta(
            game,
            seat,
            args.depth,
            args.symmetries,
        )),
        PlayerSpec::MonteCarlo(path) => {
            let mut agent = MonteCarloPlayer::new(game, MonteCarloConfig::default());
            if let Some(seed) = seed {
                agent = agent.with_seed(seed);
            }
            agent
                .load(path)
                .with_context(|| format!("failed to load agent from {}", path.display()))?;
            Box::new(agent)
        }
    };
    Ok(player)
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    if args.games == 0 {
        return Err(anyhow!("--games must be at least 1"));
    }
    let game = TicTacToe::new(args.size)?;
    let mut players = [
        build_player(&args.first, game, PlayerId::FIRST, &args)?,
        build_player(&args.second, game, PlayerId::SECOND, &args)?,
    ];

    print_section("Evaluation");
    print_kv("Seat 0", players[0].name());
    print_kv("Seat 1", players[1].name());
    print_kv("Games", &args.games.to_string());

    let stats = play_games(&game, &mut players, args.games)?;

    print_section("Results");
    for seat in [PlayerId::FIRST, PlayerId::SECOND] {
        println!("Seat {seat} ({}):", players[seat.index()].name());
        print_kv("Wins", &format_share(stats.wins[seat.index()], stats.games));
        print_kv("Draws", &format_share(stats.draws, stats.games));
        print_kv("Losses", &format_share(stats.losses(seat), stats.games));
    }

    if let Some(path) = &args.export {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &stats)?;
        println!("\nResults exported to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_player_spec() {
        assert_eq!(parse_player_spec("random"), Ok(PlayerSpec::Random));
        assert_eq!(parse_player_spec("AlphaBeta"), Ok(PlayerSpec::AlphaBeta));
        assert_eq!(
            parse_player_spec("montecarlo:agents/mc.msgpack"),
            Ok(PlayerSpec::MonteCarlo(PathBuf::from("agents/mc.msgpack")))
        );
        assert!(parse_player_spec("montecarlo:").is_err());
        assert!(parse_player_spec("oracle").is_err());
    }

    #[test]
    fn test_alphabeta_never_loses_to_random() {
        let game = TicTacToe::default();
        let mut players: [Box<dyn Player<TicTacToe>>; 2] = [
            Box::new(RandomPlayer::with_seed(game, 1)),
            Box::new(SearchPlayer::alpha_beta(game, PlayerId::SECOND, 9, true)),
        ];
        let stats = play_games(&game, &mut players, 20).unwrap();

        assert_eq!(stats.games, 20);
        assert_eq!(stats.wins[0], 0);
        assert_eq!(stats.wins[1] + stats.draws, 20);
    }

    #[test]
    fn test_search_players_draw_each_other() {
        let game = TicTacToe::default();
        let mut players: [Box<dyn Player<TicTacToe>>; 2] = [
            Box::new(SearchPlayer::minmax(game, PlayerId::FIRST, 9, true)),
            Box::new(SearchPlayer::alpha_beta(game, PlayerId::SECOND, 9, true)),
        ];
        let stats = play_games(&game, &mut players, 2).unwrap();
        assert_eq!(stats.draws, 2);
    }
}
