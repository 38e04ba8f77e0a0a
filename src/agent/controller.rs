//! Episode controller: event detection, decisions, learning and bookkeeping.
//!
//! The environment calls [`RLAgent::initial_step`] on the first tick of an
//! episode, [`RLAgent::middle_step`] on every following tick and
//! [`RLAgent::terminal_step`] once the episode is over.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::{AgentConfig, EpisodePhase};
use super::features::FeatureExtractor;
use super::learner::TdLearner;
use super::metrics::EpisodeStats;
use super::persistence::{load_weights, save_weights};
use super::policy::{EpsilonGreedyPolicy, TargetPolicy};
use super::q_function::WeightVector;
use super::reward::RewardComputer;
use super::state::AgentState;
use crate::environment::{Command, Commands, TickEvents, TickObservation};
use crate::error::{PersistenceError, Result};
use crate::types::{Side, UnitId, UnitView};

/// Which controlled units need a new order this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickDecision {
    /// First tick, a death, or damage to our side: re-plan every unit.
    AllUnits,
    /// Nothing global happened; only units whose order finished or failed.
    IdleUnits(Vec<UnitId>),
}

/// Whether the run should keep going after an episode ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Continue,
    /// The configured number of episodes has been played.
    Finished,
}

/// Online linear-Q agent commanding one side of a skirmish.
pub struct RLAgent {
    config: AgentConfig,
    state: AgentState,
    rng: StdRng,
    learner: TdLearner,
    policy: Box<dyn TargetPolicy>,
    stats: EpisodeStats,
    /// Zero-based index of the running (or next) episode.
    episode: u32,
    phase: EpisodePhase,
}

impl RLAgent {
    /// Creates an agent, loading weights when `config.resume` is set.
    ///
    /// A missing weight file falls back to random weights in [-1, 1); a
    /// corrupt one is an error.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let loaded = if config.resume {
            let loaded = load_weights(&config.weights_path)?;
            if loaded.is_none() {
                warn!(
                    "No saved weights at {}, starting from random weights",
                    config.weights_path.display()
                );
            }
            loaded
        } else {
            None
        };
        let weights = match loaded {
            Some(weights) => {
                info!("Loaded weights {} from {}", weights, config.weights_path.display());
                weights
            }
            None => WeightVector::random(&mut rng),
        };

        Ok(Self::assemble(config, weights, rng))
    }

    /// Creates an agent starting from `weights`, ignoring `config.resume`.
    pub fn with_weights(config: AgentConfig, weights: WeightVector) -> Result<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, weights, rng))
    }

    fn assemble(config: AgentConfig, weights: WeightVector, rng: StdRng) -> Self {
        let learner = TdLearner::new(config.learning_rate, config.gamma);
        let phase = config.phase_for(0);
        Self {
            config,
            state: AgentState::new(weights),
            rng,
            learner,
            policy: Box::new(EpsilonGreedyPolicy::new()),
            stats: EpisodeStats::default(),
            episode: 0,
            phase,
        }
    }

    /// Replaces the target-selection policy.
    pub fn with_policy(mut self, policy: Box<dyn TargetPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configuration the agent was built with.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Returns the tracked unit and learning state.
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Returns the current weight vector.
    pub fn weights(&self) -> &WeightVector {
        &self.state.weights
    }

    /// Returns the statistics accumulated so far.
    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Returns the phase of the running (or next) episode.
    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    /// Number of episodes finished so far.
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// True once the configured number of episodes has been played.
    pub fn is_finished(&self) -> bool {
        self.episode >= self.config.num_episodes
    }

    /// Starts an episode: builds rosters and issues the first orders.
    pub fn initial_step(&mut self, obs: &TickObservation) -> Commands {
        self.phase = self.config.phase_for(self.episode);

        let (controlled, opposing): (Vec<UnitView>, Vec<UnitView>) = obs
            .units
            .iter()
            .filter(|u| self.is_tracked_type(u))
            .cloned()
            .partition(|u| u.side == Side::Controlled);

        info!(
            "Episode {} ({:?}): {} controlled vs {} opposing",
            self.episode,
            self.phase,
            controlled.len(),
            opposing.len()
        );
        self.state.begin_episode(controlled, opposing, &mut self.rng);

        self.middle_step(obs)
    }

    /// Handles one tick: re-plans the units that need it.
    ///
    /// Units without a new order keep executing their previous one.
    pub fn middle_step(&mut self, obs: &TickObservation) -> Commands {
        let decision = self.observe(obs);
        self.dispatch(decision, obs.prior_tick())
    }

    /// Closes the episode: records the outcome and persists the weights.
    pub fn terminal_step(&mut self, obs: &TickObservation) -> RunStatus {
        self.observe(obs);

        let won = !self.state.roster.is_empty(Side::Controlled);
        let episode_reward = self.stats.episode_reward;
        let closes_block = self.config.closes_block(self.episode);
        let block_mean = self.stats.finish_episode(won, self.phase, closes_block);

        info!(
            "Episode {} ({:?}) {}: cumulative reward {:.2}",
            self.episode,
            self.phase,
            if won { "won" } else { "lost" },
            episode_reward
        );
        if let Some(mean) = block_mean {
            info!(
                "Block ending at episode {}: average evaluation reward {:.2}",
                self.episode, mean
            );
        }

        self.episode += 1;
        if let Err(e) = self.persist() {
            warn!("Failed to save weights: {}", e);
        }

        if self.is_finished() {
            info!(
                "Finished {} episodes: {} won, {} lost",
                self.stats.episodes_completed, self.stats.wins, self.stats.losses
            );
            RunStatus::Finished
        } else {
            RunStatus::Continue
        }
    }

    /// Writes the current weights to the configured weight file.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        save_weights(&self.config.weights_path, &self.state.weights)
    }

    fn is_tracked_type(&self, unit: &UnitView) -> bool {
        if unit.type_name.eq_ignore_ascii_case(&self.config.unit_type) {
            true
        } else {
            warn!("Ignoring unit {} of unknown type {}", unit.id, unit.type_name);
            false
        }
    }

    /// Syncs tracked state with the observation and decides who re-plans.
    fn observe(&mut self, obs: &TickObservation) -> TickDecision {
        let live: Vec<UnitView> = obs
            .units
            .iter()
            .filter(|u| self.state.roster.contains(u.side, u.id))
            .cloned()
            .collect();
        self.state.refresh(&live);

        let Some(prior) = obs.prior_tick() else {
            return TickDecision::AllUnits;
        };

        for death in &prior.deaths {
            if self.state.remove_unit(death.side, death.unit) {
                debug!("Unit {} ({}) died", death.unit, death.side);
            }
        }

        if !prior.deaths.is_empty() || prior.side_was_damaged(Side::Controlled) {
            return TickDecision::AllUnits;
        }

        let controlled = self.state.roster.controlled();
        let freed = prior.freed_units();
        TickDecision::IdleUnits(
            controlled
                .iter()
                .copied()
                .filter(|id| freed.contains(id))
                .collect(),
        )
    }

    /// Selects targets for the chosen units, then learns from each decision.
    fn dispatch(&mut self, decision: TickDecision, prior: Option<&TickEvents>) -> Commands {
        let units = match decision {
            TickDecision::AllUnits => self.state.roster.controlled().to_vec(),
            TickDecision::IdleUnits(units) => units,
        };
        let mut commands = Commands::new();
        if units.is_empty() || self.state.roster.is_empty(Side::Opposing) {
            return commands;
        }

        let training = self.phase == EpisodePhase::Training;
        let epsilon = if training { self.config.epsilon } else { 0.0 };

        // Every target is chosen against the same weights.
        let mut orders = Vec::with_capacity(units.len());
        for unit in units {
            let target = self.policy.select_target(
                &self.state,
                unit,
                self.state.roster.opposing(),
                epsilon,
                &mut self.rng,
            );
            orders.push((unit, target));
        }

        for (unit, target) in orders {
            let reward = RewardComputer::compute(unit, prior);
            self.stats.record_reward(reward);

            let features = FeatureExtractor::extract(&self.state, unit, target);
            let fresh_q = self.state.weights.q_value(&features);
            let stale_q = self
                .state
                .stale_q
                .insert(unit, fresh_q)
                .unwrap_or_else(|| panic!("controlled unit {} has no pending Q-value", unit));

            if training {
                let delta =
                    self.learner
                        .update(&mut self.state.weights, stale_q, fresh_q, reward, &features);
                debug!(
                    "Unit {} -> {}: reward {:.1}, Q {:.3} -> {:.3}, TD error {:.3}",
                    unit, target, reward, stale_q, fresh_q, delta
                );
            } else {
                debug!(
                    "Unit {} -> {}: reward {:.1}, Q {:.3}",
                    unit, target, reward, fresh_q
                );
            }

            commands.insert(unit, Command::Attack { target });
        }

        commands
    }
}
