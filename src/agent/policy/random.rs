//! Random policy for baselines.

use rand::{Rng, RngCore};

use super::trait_::TargetPolicy;
use crate::agent::state::AgentState;
use crate::types::UnitId;

/// Uniformly random target selection, ignoring weights and epsilon.
///
/// Consumes one index draw per call. Used as a lower-bound baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTargetPolicy;

impl TargetPolicy for RandomTargetPolicy {
    fn select_target(
        &self,
        _state: &AgentState,
        attacker: UnitId,
        candidates: &[UnitId],
        _epsilon: f64,
        rng: &mut dyn RngCore,
    ) -> UnitId {
        assert!(
            !candidates.is_empty(),
            "no candidate targets for unit {}",
            attacker
        );
        candidates[rng.gen_range(0..candidates.len())]
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::q_function::WeightVector;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_policy_picks_candidates() {
        let state = AgentState::new(WeightVector::zeros());
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let t = RandomTargetPolicy.select_target(&state, 1, &[4, 5], 0.0, &mut rng);
            assert!(t == 4 || t == 5);
        }
    }
}
