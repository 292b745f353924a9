//! Training observers
//!
//! Observers allow composable data collection during training without coupling
//! the episode loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};

use super::training::EpisodeSummary;
use crate::{Result, ports::Observer, types::Outcome};

/// How often the progress bar message is refreshed.
const MESSAGE_INTERVAL: usize = 100;

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
    last_message: String,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
            last_message: String::new(),
        }
    }

    fn message(&self, summary: &EpisodeSummary) -> String {
        format!(
            "{} D:{} L:{} | reward {:.2} | states {} | eps {:.3}",
            self.wins,
            self.draws,
            self.losses,
            summary.mean_reward,
            summary.explored_states,
            summary.exploration_rate
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::Loss => self.losses += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            if summary.episode % MESSAGE_INTERVAL == 0 {
                self.last_message = self.message(summary);
                pb.set_message(self.last_message.clone());
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.last_message.clone());
        }
        Ok(())
    }
}

/// JSONL observer - writes one [`EpisodeSummary`] per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| crate::Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        serde_json::to_writer(&mut self.writer, summary)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerId;

    fn summary(episode: usize, outcome: Outcome) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            learner: PlayerId::SECOND,
            outcome,
            reward: outcome.reward(),
            moves: 5,
            stalled: false,
            exploration_rate: 1.0,
            explored_states: 12,
            mean_reward: outcome.reward(),
        }
    }

    #[test]
    fn test_progress_observer_tallies_outcomes() {
        let mut observer = ProgressObserver::new();
        observer.on_episode_end(&summary(0, Outcome::Win)).unwrap();
        observer.on_episode_end(&summary(1, Outcome::Loss)).unwrap();
        observer.on_episode_end(&summary(2, Outcome::Loss)).unwrap();
        assert_eq!((observer.wins, observer.draws, observer.losses), (1, 0, 2));
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_episode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.jsonl");

        let mut observer = JsonlObserver::new(&path).unwrap();
        observer.on_training_start(2).unwrap();
        observer.on_episode_end(&summary(0, Outcome::Draw)).unwrap();
        observer.on_episode_end(&summary(1, Outcome::Win)).unwrap();
        observer.on_training_end().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let second: EpisodeSummary = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.episode, 1);
        assert_eq!(second.outcome, Outcome::Win);
    }
}
