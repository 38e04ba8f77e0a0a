//! Configuration for the learning agent.

use std::path::PathBuf;

use crate::error::{AgentError, Result};

/// Whether an episode learns or only measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Exploration enabled, weights updated.
    Training,
    /// Greedy policy, weights frozen; rewards feed the block average.
    Evaluation,
}

/// Configuration for the agent.
///
/// Controls the TD hyper-parameters, the training/evaluation block
/// schedule, the run length and where learned weights are persisted.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AgentConfig {
    // --- TD learning ---
    /// Discount factor γ.
    pub gamma: f64,
    /// Step size α.
    pub learning_rate: f64,
    /// Exploration rate ε (training episodes only).
    pub epsilon: f64,

    // --- Episode schedule ---
    /// Total number of episodes before the run finalizes.
    pub num_episodes: u32,
    /// Episodes per training/evaluation block.
    pub block_size: u32,
    /// Leading episodes of each block that are training episodes.
    pub training_episodes_per_block: u32,

    // --- Persistence ---
    /// Weight file, overwritten at every episode boundary.
    pub weights_path: PathBuf,
    /// Load weights from `weights_path` at startup instead of random init.
    pub resume: bool,

    // --- Environment mapping ---
    /// Unit template the agent tracks (case-insensitive).
    pub unit_type: String,

    /// Seed of the shared random stream.
    pub seed: u64,
}

impl AgentConfig {
    /// Phase of the episode with zero-based index `episode`.
    pub fn phase_for(&self, episode: u32) -> EpisodePhase {
        if episode % self.block_size < self.training_episodes_per_block {
            EpisodePhase::Training
        } else {
            EpisodePhase::Evaluation
        }
    }

    /// True if `episode` is the final evaluation episode of its block.
    pub fn closes_block(&self, episode: u32) -> bool {
        self.training_episodes_per_block < self.block_size
            && episode % self.block_size == self.block_size - 1
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(AgentError::InvalidConfig(format!(
                "epsilon must be in [0, 1], got {}",
                self.epsilon
            )));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(AgentError::InvalidConfig(format!(
                "gamma must be in [0, 1], got {}",
                self.gamma
            )));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(AgentError::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.block_size == 0 {
            return Err(AgentError::InvalidConfig("block size must be non-zero".into()));
        }
        if self.training_episodes_per_block > self.block_size {
            return Err(AgentError::InvalidConfig(format!(
                "{} training episodes do not fit in a block of {}",
                self.training_episodes_per_block, self.block_size
            )));
        }
        if self.num_episodes == 0 {
            return Err(AgentError::InvalidConfig(
                "number of episodes must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            learning_rate: 0.0001,
            epsilon: 0.02,
            num_episodes: 10,
            block_size: 10,
            training_episodes_per_block: 3,
            weights_path: PathBuf::from("agent_weights/weights.txt"),
            resume: false,
            unit_type: "footman".into(),
            seed: 12345,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = AgentConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.gamma, 0.9);
        assert_eq!(cfg.epsilon, 0.02);
    }

    #[test]
    fn block_schedule() {
        let cfg = AgentConfig::default();
        let phases: Vec<_> = (0..10).map(|e| cfg.phase_for(e)).collect();
        assert_eq!(
            phases.iter().filter(|p| **p == EpisodePhase::Training).count(),
            3
        );
        assert_eq!(cfg.phase_for(0), EpisodePhase::Training);
        assert_eq!(cfg.phase_for(2), EpisodePhase::Training);
        assert_eq!(cfg.phase_for(3), EpisodePhase::Evaluation);
        assert_eq!(cfg.phase_for(9), EpisodePhase::Evaluation);
        assert_eq!(cfg.phase_for(10), EpisodePhase::Training);
        assert!(cfg.closes_block(9));
        assert!(cfg.closes_block(19));
        assert!(!cfg.closes_block(10));
    }

    #[test]
    fn all_training_blocks_never_close() {
        let cfg = AgentConfig {
            block_size: 4,
            training_episodes_per_block: 4,
            ..AgentConfig::default()
        };
        assert!((0..8).all(|e| cfg.phase_for(e) == EpisodePhase::Training));
        assert!(!cfg.closes_block(3));
    }

    #[test]
    fn rejects_bad_values() {
        let bad = [
            AgentConfig {
                epsilon: 1.5,
                ..AgentConfig::default()
            },
            AgentConfig {
                gamma: -0.1,
                ..AgentConfig::default()
            },
            AgentConfig {
                learning_rate: 0.0,
                ..AgentConfig::default()
            },
            AgentConfig {
                block_size: 0,
                ..AgentConfig::default()
            },
            AgentConfig {
                training_episodes_per_block: 11,
                ..AgentConfig::default()
            },
            AgentConfig {
                num_episodes: 0,
                ..AgentConfig::default()
            },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(AgentError::InvalidConfig(_))));
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_partial_json() {
        let cfg: AgentConfig =
            serde_json::from_str(r#"{ "epsilon": 0.1, "num_episodes": 50 }"#).unwrap();
        assert_eq!(cfg.epsilon, 0.1);
        assert_eq!(cfg.num_episodes, 50);
        assert_eq!(cfg.block_size, 10);
    }
}
