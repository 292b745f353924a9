//! Self-play training loop for the Monte Carlo agent

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use super::{agent::MonteCarloPlayer, config::AdversarialConfig, trajectory::Trajectory};
use crate::{
    Error, Result,
    baseline::RandomPlayer,
    ports::{Observer, Player, Symmetry},
    search::SearchPlayer,
    types::{Outcome, PlayerId, rewards},
};

/// Illegal opponent proposals tolerated in a row before training aborts.
const MAX_OPPONENT_ATTEMPTS: usize = 1_000;

/// Window used for the running mean reward.
pub const REWARD_WINDOW: usize = 1_000;

/// What happened in one training episode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Zero-based episode index
    pub episode: usize,
    /// Seat the learner occupied
    pub learner: PlayerId,
    pub outcome: Outcome,
    /// Terminal reward written into the trajectory
    pub reward: f64,
    /// Moves played by both seats
    pub moves: usize,
    /// Whether the episode ended on the repeated-action or move cap
    pub stalled: bool,
    /// Exploration rate after this episode's update
    pub exploration_rate: f64,
    /// Value-table size after this episode's update
    pub explored_states: usize,
    /// Mean reward over the last [`REWARD_WINDOW`] episodes
    pub mean_reward: f64,
}

/// Result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes played
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    /// Number of entries in the value table
    pub explored_states: usize,
    pub final_exploration_rate: f64,
    /// Mean reward over the last [`REWARD_WINDOW`] episodes
    pub mean_reward_last_1000: f64,
    /// Episode at which minimax opponents were installed, if they were
    pub adversarial_switch_episode: Option<usize>,
}

impl TrainingResult {
    /// Create a new training result; rates are derived from the counts.
    pub fn new(episodes: usize, wins: usize, draws: usize, losses: usize) -> Self {
        let rate = |count: usize| {
            if episodes > 0 {
                count as f64 / episodes as f64
            } else {
                0.0
            }
        };

        Self {
            episodes,
            wins,
            draws,
            losses,
            win_rate: rate(wins),
            draw_rate: rate(draws),
            loss_rate: rate(losses),
            explored_states: 0,
            final_exploration_rate: 1.0,
            mean_reward_last_1000: 0.0,
            adversarial_switch_episode: None,
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// `math.isclose`-style comparison with a relative tolerance of `1e-9`.
fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

/// Episode at which the adversarial switch fires, if any episode index
/// lands exactly on the configured ratio.
pub fn adversarial_switch_episode(adversarial: &AdversarialConfig, episodes: usize) -> Option<usize> {
    (0..episodes).find(|&episode| is_close(adversarial.switch_ratio, episode as f64 / episodes as f64))
}

/// Seat the learner occupies in `episode`: second on even episodes, first on
/// odd ones.
pub fn learner_seat(episode: usize) -> PlayerId {
    if episode % 2 == 0 {
        PlayerId::SECOND
    } else {
        PlayerId::FIRST
    }
}

/// Drives a [`MonteCarloPlayer`] through self-play episodes against a pair of
/// opponents, one per seat.
pub struct TrainingPipeline<G: Symmetry> {
    game: G,
    opponents: [Box<dyn Player<G>>; 2],
    /// Whether `opponents` are still the random players built by `new`
    default_opponents: bool,
    observers: Vec<Box<dyn Observer>>,
}

impl<G> TrainingPipeline<G>
where
    G: Symmetry + Clone + 'static,
{
    /// Pipeline with uniformly random opponents in both seats.
    pub fn new(game: G) -> Self {
        let opponents: [Box<dyn Player<G>>; 2] = [
            Box::new(RandomPlayer::new(game.clone())),
            Box::new(RandomPlayer::new(game.clone())),
        ];
        Self {
            game,
            opponents,
            default_opponents: true,
            observers: Vec::new(),
        }
    }

    /// Seed the default random opponents. Opponents installed with
    /// [`Self::with_opponents`] are left as they are.
    pub fn with_seed(mut self, seed: u64) -> Self {
        if !self.default_opponents {
            return self;
        }
        self.opponents = [
            Box::new(RandomPlayer::with_seed(self.game.clone(), seed)),
            Box::new(RandomPlayer::with_seed(self.game.clone(), seed.wrapping_add(1))),
        ];
        self
    }

    /// Replace the opponents; `first` plays seat 0 and `second` seat 1.
    pub fn with_opponents(mut self, first: Box<dyn Player<G>>, second: Box<dyn Player<G>>) -> Self {
        self.opponents = [first, second];
        self.default_opponents = false;
        self
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run `agent.config().episodes` training episodes.
    pub fn run(&mut self, agent: &mut MonteCarloPlayer<G>) -> Result<TrainingResult> {
        let config = agent.config().clone();
        config.validate()?;

        let switch_at = config
            .adversarial
            .as_ref()
            .and_then(|adversarial| adversarial_switch_episode(adversarial, config.episodes));

        info!(
            episodes = config.episodes,
            discount = config.discount,
            learning_rate = config.learning_rate,
            adversarial_switch = ?switch_at,
            "training started"
        );
        for observer in &mut self.observers {
            observer.on_training_start(config.episodes)?;
        }

        let (mut wins, mut draws, mut losses) = (0, 0, 0);
        for episode in 0..config.episodes {
            if let Some(adversarial) = &config.adversarial
                && switch_at == Some(episode)
            {
                self.install_minimax_opponents(adversarial);
                info!(episode, depth = adversarial.depth, "switched to minimax opponents");
            }

            let summary = self.play_episode(episode, agent)?;
            match summary.outcome {
                Outcome::Win => wins += 1,
                Outcome::Draw => draws += 1,
                Outcome::Loss => losses += 1,
            }
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let mut result = TrainingResult::new(config.episodes, wins, draws, losses);
        result.explored_states = agent.explored_states();
        result.final_exploration_rate = agent.exploration_rate();
        result.mean_reward_last_1000 = agent.mean_reward(REWARD_WINDOW).unwrap_or(0.0);
        result.adversarial_switch_episode = switch_at;

        info!(
            wins,
            draws,
            losses,
            explored_states = result.explored_states,
            mean_reward = result.mean_reward_last_1000,
            "training finished"
        );
        Ok(result)
    }

    fn install_minimax_opponents(&mut self, adversarial: &AdversarialConfig) {
        self.default_opponents = false;
        self.opponents = [
            Box::new(SearchPlayer::minmax(
                self.game.clone(),
                PlayerId::FIRST,
                adversarial.depth,
                adversarial.symmetries,
            )),
            Box::new(SearchPlayer::minmax(
                self.game.clone(),
                PlayerId::SECOND,
                adversarial.depth,
                adversarial.symmetries,
            )),
        ];
    }

    fn play_episode(
        &mut self,
        episode: usize,
        agent: &mut MonteCarloPlayer<G>,
    ) -> Result<EpisodeSummary> {
        let config = agent.config();
        let max_repeated = config.max_repeated_actions;
        let max_moves = config.max_episode_moves;

        let learner = learner_seat(episode);
        let mut state = self.game.initial_state();
        let mut trajectory = Trajectory::new();
        let mut last_action: Option<G::Action> = None;
        let mut repeated = 0;
        let mut moves = 0;

        while !self.game.is_terminal(&state) && repeated < max_repeated {
            if max_moves.is_some_and(|cap| moves >= cap) {
                break;
            }

            let mover = self.game.current_player(&state);
            if mover == learner {
                let transition = agent.step_training(&state, learner)?;
                if last_action.as_ref() == Some(&transition.action) {
                    repeated += 1;
                } else {
                    last_action = Some(transition.action.clone());
                    repeated = 0;
                }
                trajectory.push(transition.key, rewards::STEP);
                state = transition.state;
            } else {
                self.opponent_move(&mut state, mover)?;
            }
            moves += 1;
        }

        let stalled = !self.game.is_terminal(&state);
        let outcome = Outcome::for_player(self.game.winner(&state), learner);
        let reward = outcome.reward();
        agent.finish_episode(episode, trajectory, reward);

        Ok(EpisodeSummary {
            episode,
            learner,
            outcome,
            reward,
            moves,
            stalled,
            exploration_rate: agent.exploration_rate(),
            explored_states: agent.explored_states(),
            mean_reward: agent.mean_reward(REWARD_WINDOW).unwrap_or(reward),
        })
    }

    /// Ask the opponent in `seat` for moves until one is legal.
    fn opponent_move(&mut self, state: &mut G::State, seat: PlayerId) -> Result<()> {
        let opponent = &mut self.opponents[seat.index()];
        for attempt in 1..=MAX_OPPONENT_ATTEMPTS {
            let action = opponent.make_move(state)?;
            if self.game.apply_move(state, &action, seat) {
                return Ok(());
            }
            trace!(seat = %seat, attempt, action = ?action, "opponent move rejected");
        }
        Err(Error::OpponentRejected {
            name: opponent.name().to_string(),
            attempts: MAX_OPPONENT_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        monte_carlo::MonteCarloConfig,
        ports::{Rules, TransitionOf},
        tictactoe::{BoardState, TicTacToe},
        types::{Grid, Transition},
    };

    /// One always-legal move that never ends the game; the state counts plies.
    #[derive(Debug, Clone, Copy)]
    struct Treadmill;

    impl Rules for Treadmill {
        type State = usize;
        type Action = ();
        type Key = usize;

        fn initial_state(&self) -> usize {
            0
        }

        fn winner(&self, _state: &usize) -> Option<PlayerId> {
            None
        }

        fn board(&self, _state: &usize) -> Grid {
            Grid::new(1, vec![None]).unwrap()
        }

        fn current_player(&self, state: &usize) -> PlayerId {
            if state % 2 == 0 {
                PlayerId::FIRST
            } else {
                PlayerId::SECOND
            }
        }

        fn possible_transitions(&self, state: &usize, _player: PlayerId) -> Vec<TransitionOf<Self>> {
            vec![Transition::new((), state + 1, state + 1)]
        }

        fn canonical_transitions(&self, state: &usize, player: PlayerId) -> Vec<TransitionOf<Self>> {
            self.possible_transitions(state, player)
        }

        fn apply_move(&self, state: &mut usize, _action: &(), _player: PlayerId) -> bool {
            *state += 1;
            true
        }
    }

    impl Symmetry for Treadmill {
        fn transformed_states(&self, state: &usize) -> Vec<usize> {
            vec![*state]
        }

        fn hashable_key(&self, state: &usize, _player: PlayerId) -> usize {
            *state
        }
    }

    /// Always proposes the same cell, legal or not.
    struct Stubborn(usize);

    impl Player<TicTacToe> for Stubborn {
        fn make_move(&mut self, _state: &BoardState) -> Result<usize> {
            Ok(self.0)
        }

        fn name(&self) -> &str {
            "stubborn"
        }
    }

    fn agent(episodes: usize) -> MonteCarloPlayer<TicTacToe> {
        let config = MonteCarloConfig::default().with_episodes(episodes);
        MonteCarloPlayer::new(TicTacToe::default(), config).with_seed(17)
    }

    #[test]
    fn test_learner_alternates_seats() {
        assert_eq!(learner_seat(0), PlayerId::SECOND);
        assert_eq!(learner_seat(1), PlayerId::FIRST);
        assert_eq!(learner_seat(2), PlayerId::SECOND);
    }

    #[test]
    fn test_counts_add_up() {
        let mut agent = agent(200);
        let mut pipeline = TrainingPipeline::new(TicTacToe::default()).with_seed(1);
        let result = pipeline.run(&mut agent).unwrap();

        assert_eq!(result.episodes, 200);
        assert_eq!(result.wins + result.draws + result.losses, 200);
        assert!((result.win_rate + result.draw_rate + result.loss_rate - 1.0).abs() < 1e-9);
        assert_eq!(agent.rewards().len(), 200);
        assert_eq!(result.explored_states, agent.explored_states());
        assert!(result.explored_states > 0);
    }

    #[test]
    fn test_rejected_opponent_moves_are_retried() {
        let game = TicTacToe::default();
        let mut pipeline = TrainingPipeline::new(game).with_seed(3);
        let mut state = game.initial_state();
        assert!(game.apply_move(&mut state, &4, PlayerId::FIRST));

        pipeline.opponents[1] = Box::new(Stubborn(4));
        assert!(matches!(
            pipeline.opponent_move(&mut state, PlayerId::SECOND),
            Err(Error::OpponentRejected { attempts: MAX_OPPONENT_ATTEMPTS, .. })
        ));

        pipeline.opponents[1] = Box::new(RandomPlayer::with_seed(game, 9));
        pipeline.opponent_move(&mut state, PlayerId::SECOND).unwrap();
        assert_eq!(game.current_player(&state), PlayerId::FIRST);
    }

    #[test]
    fn test_seeding_keeps_custom_opponents() {
        let game = TicTacToe::default();
        let pipeline = TrainingPipeline::new(game)
            .with_opponents(Box::new(Stubborn(0)), Box::new(Stubborn(8)))
            .with_seed(7);
        assert_eq!(pipeline.opponents[0].name(), "stubborn");
        assert_eq!(pipeline.opponents[1].name(), "stubborn");

        let pipeline = TrainingPipeline::new(game).with_seed(7);
        assert_eq!(pipeline.opponents[0].name(), "random");
    }

    #[test]
    fn test_adversarial_switch_episode() {
        let adversarial = AdversarialConfig::default();
        assert_eq!(adversarial_switch_episode(&adversarial, 100), Some(90));
        assert_eq!(adversarial_switch_episode(&adversarial, 7), None);

        let at_start = AdversarialConfig {
            switch_ratio: 0.0,
            ..adversarial
        };
        assert_eq!(adversarial_switch_episode(&at_start, 10), Some(0));
    }

    #[test]
    fn test_move_cap_stalls_episode_as_draw() {
        let config = MonteCarloConfig::default()
            .with_episodes(4)
            .with_max_episode_moves(2);
        let mut agent = MonteCarloPlayer::new(TicTacToe::default(), config).with_seed(2);
        let mut pipeline = TrainingPipeline::new(TicTacToe::default()).with_seed(2);
        let result = pipeline.run(&mut agent).unwrap();

        assert_eq!(result.draws, 4);
        assert!(agent.rewards().iter().all(|&r| r == rewards::DRAW));
    }

    #[test]
    fn test_repeated_actions_stall_episode_as_draw() {
        let config = MonteCarloConfig::default()
            .with_episodes(2)
            .with_max_repeated_actions(3);
        let mut agent = MonteCarloPlayer::new(Treadmill, config).with_seed(5);
        let mut pipeline = TrainingPipeline::new(Treadmill).with_seed(5);

        // Learner in seat 1: opponent, learner, ... until the learner's fourth
        // identical move, i.e. the third repeat.
        let second_seat = pipeline.play_episode(0, &mut agent).unwrap();
        assert_eq!(second_seat.learner, PlayerId::SECOND);
        assert_eq!(second_seat.outcome, Outcome::Draw);
        assert_eq!(second_seat.reward, rewards::DRAW);
        assert!(second_seat.stalled);
        assert_eq!(second_seat.moves, 8);
        // One table entry per learner step: plies 2, 4, 6 and 8.
        assert_eq!(agent.explored_states(), 4);

        let first_seat = pipeline.play_episode(1, &mut agent).unwrap();
        assert_eq!(first_seat.learner, PlayerId::FIRST);
        assert_eq!(first_seat.outcome, Outcome::Draw);
        assert!(first_seat.stalled);
        assert_eq!(first_seat.moves, 7);
        assert_eq!(agent.explored_states(), 8);
        assert_eq!(agent.rewards(), &[rewards::DRAW, rewards::DRAW]);

        let mut agent = MonteCarloPlayer::new(Treadmill, agent.config().clone()).with_seed(6);
        let result = TrainingPipeline::new(Treadmill)
            .with_seed(6)
            .run(&mut agent)
            .unwrap();
        assert_eq!((result.wins, result.draws, result.losses), (0, 2, 0));
    }

    #[test]
    fn test_adversarial_training_runs_against_minimax() {
        let config = MonteCarloConfig::default()
            .with_episodes(20)
            .with_adversarial(AdversarialConfig {
                switch_ratio: 0.5,
                depth: 2,
                symmetries: true,
            });
        let mut agent = MonteCarloPlayer::new(TicTacToe::default(), config).with_seed(4);
        let mut pipeline = TrainingPipeline::new(TicTacToe::default()).with_seed(4);
        let result = pipeline.run(&mut agent).unwrap();

        assert_eq!(result.adversarial_switch_episode, Some(10));
        assert_eq!(pipeline.opponents[0].name(), "minmax");
        assert_eq!(pipeline.opponents[1].name(), "minmax");
    }
}
