//! The learning agent.
//!
//! A linear Q-function over hand-built (attacker, defender) features,
//! trained online with semi-gradient TD(0) and acted on epsilon-greedily.
//! [`RLAgent`] ties the pieces together and is what an environment drives.

pub mod config;
pub mod controller;
pub mod features;
pub mod learner;
pub mod metrics;
pub mod persistence;
pub mod policy;
pub mod q_function;
pub mod reward;
pub mod state;

pub use config::{AgentConfig, EpisodePhase};
pub use controller::{RLAgent, RunStatus, TickDecision};
pub use features::{FeatureExtractor, FeatureVector, NUM_FEATURES};
pub use learner::TdLearner;
pub use metrics::{EpisodeStats, RewardTable};
pub use persistence::{load_weights, save_weights};
pub use policy::{EpsilonGreedyPolicy, RandomTargetPolicy, TargetPolicy};
pub use q_function::{q_value, WeightVector};
pub use reward::RewardComputer;
pub use state::{AgentState, Roster};
