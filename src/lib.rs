//! skirmish_td - online linear-Q agent for turn-based unit combat
//!
//! An agent that commands a squad of melee units, choosing which enemy each
//! unit attacks. It learns a linear action-value function online with
//! semi-gradient TD(0) and explores epsilon-greedily, alternating training
//! and evaluation episodes and persisting its weights between runs.

pub mod agent;
pub mod arena;
pub mod driver;
pub mod environment;
pub mod error;
pub mod types;

pub use agent::{AgentConfig, RLAgent, RunStatus};
pub use environment::{Command, Commands, Environment, TickObservation};
pub use error::{AgentError, PersistenceError};
pub use types::{Position, Side, UnitId};
