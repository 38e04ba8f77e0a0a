//! Turn loop connecting an [`RLAgent`] to an [`Environment`].

use std::fmt;

use log::debug;

use crate::agent::{RLAgent, RewardTable, RunStatus};
use crate::environment::Environment;

/// Plays one full episode and returns what the agent wants next.
///
/// # Lifecycle
///
/// 1. `reset` the environment and hand the turn-0 observation to
///    [`RLAgent::initial_step`].
/// 2. Step the environment with the agent's commands, feeding each new
///    observation to [`RLAgent::middle_step`].
/// 3. When the environment reports `done`, call [`RLAgent::terminal_step`].
pub fn run_episode<E: Environment + ?Sized>(agent: &mut RLAgent, env: &mut E) -> RunStatus {
    let obs = env.reset();
    let mut commands = agent.initial_step(&obs);

    loop {
        let outcome = env.step(&commands);
        if outcome.done {
            debug!("Episode ended on turn {}", outcome.observation.turn);
            return agent.terminal_step(&outcome.observation);
        }
        commands = agent.middle_step(&outcome.observation);
    }
}

/// Plays episodes until the agent's configured episode count is reached.
pub fn run<E: Environment + ?Sized>(agent: &mut RLAgent, env: &mut E) -> RunSummary {
    while !agent.is_finished() {
        if run_episode(agent, env) == RunStatus::Finished {
            break;
        }
    }

    let stats = agent.stats();
    RunSummary {
        episodes: stats.episodes_completed,
        wins: stats.wins,
        losses: stats.losses,
        average_rewards: stats.average_rewards.clone(),
        block_size: agent.config().block_size,
    }
}

/// Outcome of a complete run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub episodes: u32,
    pub wins: u32,
    pub losses: u32,
    /// Mean evaluation reward per block, oldest first.
    pub average_rewards: Vec<f64>,
    pub block_size: u32,
}

impl RunSummary {
    /// Fraction of episodes won, `0.0` if none were played.
    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.wins as f64 / self.episodes as f64
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = RewardTable::new(&self.average_rewards, self.block_size);
        write!(f, "{}", table)?;
        writeln!(
            f,
            "Games won: {} of {} ({:.1}%)",
            self.wins,
            self.episodes,
            self.win_rate() * 100.0
        )
    }
}
