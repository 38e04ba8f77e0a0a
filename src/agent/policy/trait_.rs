//! Policy trait for choosing attack targets.

use rand::RngCore;

use crate::agent::state::AgentState;
use crate::types::UnitId;

/// A policy that picks which enemy a controlled unit should attack.
pub trait TargetPolicy {
    /// Selects one of `candidates` for `attacker` to attack.
    ///
    /// # Arguments
    ///
    /// * `state` - Tracked unit state and current weights (read-only)
    /// * `attacker` - The controlled unit receiving the order
    /// * `candidates` - Live enemy units, in roster order; must be non-empty
    /// * `epsilon` - Exploration rate; `0.0` disables exploration
    /// * `rng` - The agent's shared random stream
    fn select_target(
        &self,
        state: &AgentState,
        attacker: UnitId,
        candidates: &[UnitId],
        epsilon: f64,
        rng: &mut dyn RngCore,
    ) -> UnitId;

    /// Returns a human-readable name for this policy.
    fn name(&self) -> &str;
}
