//! Feature encoding of (attacker, defender) pairs.

use super::state::AgentState;
use crate::types::UnitId;

/// Length of every feature vector.
pub const NUM_FEATURES: usize = 6;

/// Denominator used for the health ratio when the attacker has no health left.
pub const ZERO_HEALTH_DIVISOR: f64 = 0.5;

/// Encoded state-action pair.
pub type FeatureVector = [f64; NUM_FEATURES];

/// Builds feature vectors from the agent's tracked unit state.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Encodes "`attacker` attacks `defender`" in the current state.
    ///
    /// | Index | Feature |
    /// |---|---|
    /// | 0 | bias, `1.0` |
    /// | 1 | attacker health |
    /// | 2 | defender health |
    /// | 3 | defender health / attacker health, truncated (`/ 0.5` if the attacker is at 0) |
    /// | 4 | `0.5` if the two are adjacent, else `0.0` |
    /// | 5 | opposing units adjacent to the attacker |
    ///
    /// # Panics
    ///
    /// If either unit is not tracked in `state`.
    pub fn extract(state: &AgentState, attacker: UnitId, defender: UnitId) -> FeatureVector {
        let att = state.snapshot(attacker);
        let def = state.snapshot(defender);

        let att_health = att.health as f64;
        let def_health = def.health as f64;

        // Integer division; only the fallback is fractional.
        let ratio = if att.health != 0 {
            (def.health / att.health) as f64
        } else {
            def_health / ZERO_HEALTH_DIVISOR
        };

        let adjacent = if att.position.is_adjacent(&def.position) {
            0.5
        } else {
            0.0
        };

        let surrounding = state
            .roster
            .opposing()
            .iter()
            .filter(|enemy| state.snapshot(**enemy).position.is_adjacent(&att.position))
            .count();

        [
            1.0,
            att_health,
            def_health,
            ratio,
            adjacent,
            surrounding as f64,
        ]
    }
}
