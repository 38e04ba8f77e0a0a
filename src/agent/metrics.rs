//! Episode outcomes and the average-reward learning curve.

use std::fmt;

use super::config::EpisodePhase;

/// Counters accumulated over the agent's lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    pub episodes_completed: u32,
    pub wins: u32,
    pub losses: u32,
    /// Reward collected so far in the running episode.
    pub episode_reward: f64,
    /// Cumulative rewards of the finished evaluation episodes in the open block.
    pub block_rewards: Vec<f64>,
    /// Mean evaluation reward of every closed block, oldest first.
    pub average_rewards: Vec<f64>,
}

impl EpisodeStats {
    /// Adds `reward` to the running episode total.
    pub fn record_reward(&mut self, reward: f64) {
        self.episode_reward += reward;
    }

    /// Closes the running episode.
    ///
    /// Evaluation rewards are collected per block; when `closes_block` is set
    /// the block mean is appended to the curve and returned.
    pub fn finish_episode(
        &mut self,
        won: bool,
        phase: EpisodePhase,
        closes_block: bool,
    ) -> Option<f64> {
        self.episodes_completed += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }

        if phase == EpisodePhase::Evaluation {
            self.block_rewards.push(self.episode_reward);
        }
        self.episode_reward = 0.0;

        if !closes_block || self.block_rewards.is_empty() {
            return None;
        }
        let mean = self.block_rewards.iter().sum::<f64>() / self.block_rewards.len() as f64;
        self.block_rewards.clear();
        self.average_rewards.push(mean);
        Some(mean)
    }

    /// The learning curve as a printable table.
    pub fn reward_table(&self, block_size: u32) -> RewardTable<'_> {
        RewardTable::new(&self.average_rewards, block_size)
    }
}

/// Fixed-width table of games played vs. average cumulative reward.
#[derive(Debug, Clone, Copy)]
pub struct RewardTable<'a> {
    averages: &'a [f64],
    block_size: u32,
}

impl<'a> RewardTable<'a> {
    /// Row `i` is labelled with `i * block_size` games played.
    pub fn new(averages: &'a [f64], block_size: u32) -> Self {
        Self {
            averages,
            block_size,
        }
    }
}

const HEADER: &str = "Games Played      Average Cumulative Reward";
const RULE: &str = "-------------     -------------------------";
const GAMES_COLUMN: usize = 18;

impl fmt::Display for RewardTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", HEADER)?;
        writeln!(f, "{}", RULE)?;
        for (i, avg) in self.averages.iter().enumerate() {
            let games = (i as u64 * self.block_size as u64).to_string();
            writeln!(f, "{:<width$}{:.2}", games, avg, width = GAMES_COLUMN)?;
        }
        writeln!(f)
    }
}
