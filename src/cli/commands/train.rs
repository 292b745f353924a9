//! Train command - Monte Carlo self-play on the reference game

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::{format_number, format_share, print_kv, print_section},
    monte_carlo::{
        JsonlObserver, MonteCarloConfig, MonteCarloPlayer, ProgressObserver, REWARD_WINDOW,
        TrainingPipeline, TrainingResult,
    },
    tictactoe::TicTacToe,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    config: &'a MonteCarloConfig,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    board_size: usize,
    seed: Option<u64>,
    output: Option<String>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Monte Carlo agent by self-play", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// JSON file with a Monte Carlo configuration; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Discount rate
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Learning rate
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Floor of the exploration schedule
    #[arg(long)]
    pub min_exploration: Option<f64>,

    /// Exponential decay rate of the exploration schedule
    #[arg(long)]
    pub decay: Option<f64>,

    /// Repeated learner actions that end an episode as a draw
    #[arg(long)]
    pub max_repeated: Option<usize>,

    /// Hard cap on moves per episode
    #[arg(long)]
    pub max_moves: Option<usize>,

    /// Switch to minimax opponents partway through training
    #[arg(long, default_value_t = false)]
    pub adversarial: bool,

    /// Fraction of episodes after which the adversarial switch happens
    #[arg(long)]
    pub switch_ratio: Option<f64>,

    /// Search depth of the adversarial minimax opponents
    #[arg(long)]
    pub depth: Option<u32>,

    /// Let the adversarial opponents search symmetry-reduced moves
    #[arg(long, default_value_t = false)]
    pub symmetries: bool,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Board side length
    #[arg(long, default_value_t = 3)]
    pub size: usize,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional file for per-episode JSONL observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,
}

/// Resolve the training configuration: JSON file (or defaults) first, then
/// command-line overrides.
pub fn build_config(args: &TrainArgs) -> Result<MonteCarloConfig> {
    let mut config = match &args.config {
        Some(path) => MonteCarloConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => MonteCarloConfig::default(),
    };

    if let Some(episodes) = args.episodes {
        config.episodes = episodes;
    }
    if let Some(gamma) = args.gamma {
        config.discount = gamma;
    }
    if let Some(alpha) = args.alpha {
        config.learning_rate = alpha;
    }
    if let Some(rate) = args.min_exploration {
        config.min_exploration_rate = rate;
    }
    if let Some(decay) = args.decay {
        config.exploration_decay_rate = decay;
    }
    if let Some(count) = args.max_repeated {
        config.max_repeated_actions = count;
    }
    if args.max_moves.is_some() {
        config.max_episode_moves = args.max_moves;
    }

    if args.adversarial || config.adversarial.is_some() {
        let mut adversarial = config.adversarial.unwrap_or_default();
        if let Some(ratio) = args.switch_ratio {
            adversarial.switch_ratio = ratio;
        }
        if let Some(depth) = args.depth {
            adversarial.depth = depth;
        }
        if args.symmetries {
            adversarial.symmetries = true;
        }
        config.adversarial = Some(adversarial);
    }

    config.validate()?;
    Ok(config)
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = build_config(&args)?;
    let game = TicTacToe::new(args.size)?;

    print_section("Monte Carlo Training");
    print_kv("Board", &format!("{0}x{0}", args.size));
    print_kv("Episodes", &format_number(config.episodes));
    print_kv("Gamma", &config.discount.to_string());
    print_kv("Alpha", &config.learning_rate.to_string());
    print_kv(
        "Exploration",
        &format!(
            "exp(-{} * episode), floor {}",
            config.exploration_decay_rate, config.min_exploration_rate
        ),
    );
    if let Some(adversarial) = &config.adversarial {
        print_kv(
            "Adversarial",
            &format!(
                "minimax depth {} after {:.0}% (symmetries: {})",
                adversarial.depth,
                adversarial.switch_ratio * 100.0,
                adversarial.symmetries
            ),
        );
    }
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut agent = MonteCarloPlayer::new(game, config.clone());
    let mut pipeline = TrainingPipeline::new(game);
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
        pipeline = pipeline.with_seed(seed.wrapping_add(1));
    }
    if args.progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("failed to open observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = pipeline.run(&mut agent)?;

    print_section("Training Results");
    print_kv("Wins", &format_share(result.wins, result.episodes));
    print_kv("Draws", &format_share(result.draws, result.episodes));
    print_kv("Losses", &format_share(result.losses, result.episodes));
    print_kv("Explored states", &format_number(result.explored_states));
    print_kv(
        "Exploration rate",
        &format!("{:.4}", result.final_exploration_rate),
    );
    print_kv(
        &format!("Mean reward (last {REWARD_WINDOW})"),
        &format!("{:.3}", result.mean_reward_last_1000),
    );
    if let Some(episode) = result.adversarial_switch_episode {
        print_kv("Adversarial switch", &format!("episode {episode}"));
    } else if config.adversarial.is_some() {
        println!("  Note: switch ratio never lands on an episode index; no switch happened");
    }

    if let Some(path) = &args.output {
        agent
            .save(path)
            .with_context(|| format!("failed to save agent to {}", path.display()))?;
        println!("\nAgent saved to: {}", path.display());
    }

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            training: &result,
            config: &config,
            metadata: SummaryMetadata {
                board_size: args.size,
                seed: args.seed,
                output: args.output.as_ref().map(|p| p.display().to_string()),
            },
        };
        let file = std::fs::File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        println!("Summary written to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> TrainArgs {
        TrainArgs::parse_from(std::iter::once("train").chain(args.iter().copied()))
    }

    #[test]
    fn test_summary_path_normalization() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary")),
            PathBuf::from("out/summary.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/summary.JSON")),
            PathBuf::from("out/summary.JSON")
        );
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = build_config(&parse(&["--episodes", "10", "--gamma", "0.5"])).unwrap();
        assert_eq!(config.episodes, 10);
        assert_eq!(config.discount, 0.5);
        assert_eq!(config.learning_rate, 0.1);
        assert!(config.adversarial.is_none());
    }

    #[test]
    fn test_adversarial_flags() {
        let config = build_config(&parse(&[
            "--adversarial",
            "--switch-ratio",
            "0.5",
            "--depth",
            "3",
            "--symmetries",
        ]))
        .unwrap();
        let adversarial = config.adversarial.unwrap();
        assert_eq!(adversarial.switch_ratio, 0.5);
        assert_eq!(adversarial.depth, 3);
        assert!(adversarial.symmetries);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        assert!(build_config(&parse(&["--alpha", "0"])).is_err());
    }
}
