//! Epsilon-greedy selection over the linear Q-function.

use rand::{Rng, RngCore};

use super::trait_::TargetPolicy;
use crate::agent::features::FeatureExtractor;
use crate::agent::state::AgentState;
use crate::types::UnitId;

/// Candidate with the highest Q-value under the current weights.
///
/// Ties go to the candidate listed first.
///
/// # Panics
///
/// If `candidates` is empty.
pub fn greedy_target(state: &AgentState, attacker: UnitId, candidates: &[UnitId]) -> UnitId {
    assert!(
        !candidates.is_empty(),
        "no candidate targets for unit {}",
        attacker
    );

    let mut best = candidates[0];
    let mut best_q = f64::NEG_INFINITY;
    for &candidate in candidates {
        let features = FeatureExtractor::extract(state, attacker, candidate);
        let q = state.weights.q_value(&features);
        if q > best_q {
            best_q = q;
            best = candidate;
        }
    }
    best
}

/// Greedy with probability `1 - ε`, uniformly random otherwise.
///
/// Draw order on the shared stream: one `f64` in [0, 1); if it is
/// `>= 1 - ε`, one more draw picks the random candidate index.
#[derive(Debug, Clone, Copy, Default)]
pub struct EpsilonGreedyPolicy;

impl EpsilonGreedyPolicy {
    /// Creates a new epsilon-greedy policy.
    pub fn new() -> Self {
        Self
    }
}

impl TargetPolicy for EpsilonGreedyPolicy {
    fn select_target(
        &self,
        state: &AgentState,
        attacker: UnitId,
        candidates: &[UnitId],
        epsilon: f64,
        rng: &mut dyn RngCore,
    ) -> UnitId {
        assert!(
            !candidates.is_empty(),
            "no candidate targets for unit {}",
            attacker
        );

        let draw: f64 = rng.gen();
        if draw >= 1.0 - epsilon {
            candidates[rng.gen_range(0..candidates.len())]
        } else {
            greedy_target(state, attacker, candidates)
        }
    }

    fn name(&self) -> &str {
        "epsilon_greedy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::q_function::WeightVector;
    use crate::types::{Position, Side, UnitView};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn view(id: UnitId, side: Side, health: u32, x: i32, y: i32) -> UnitView {
        UnitView {
            id,
            side,
            health,
            position: Position::new(x, y),
            type_name: "Footman".into(),
        }
    }

    /// One attacker, three enemies with health 30, 10, 20.
    fn make_state(weights: WeightVector) -> AgentState {
        let mut state = AgentState::new(weights);
        state.begin_episode(
            vec![view(1, Side::Controlled, 10, 0, 0)],
            vec![
                view(10, Side::Opposing, 30, 5, 5),
                view(11, Side::Opposing, 10, 6, 5),
                view(12, Side::Opposing, 20, 7, 5),
            ],
            &mut StdRng::seed_from_u64(0),
        );
        state
    }

    #[test]
    fn greedy_prefers_weakest_enemy_with_negative_health_weight() {
        let state = make_state(WeightVector::new([0.0, 0.0, -1.0, 0.0, 0.0, 0.0]));
        assert_eq!(greedy_target(&state, 1, &[10, 11, 12]), 11);
    }

    #[test]
    fn greedy_ties_go_to_first_candidate() {
        let state = make_state(WeightVector::zeros());
        assert_eq!(greedy_target(&state, 1, &[12, 10, 11]), 12);
    }

    #[test]
    fn zero_epsilon_is_deterministic() {
        let state = make_state(WeightVector::new([0.1, 0.2, 0.5, -0.3, 1.0, 0.0]));
        let policy = EpsilonGreedyPolicy::new();
        let mut rng = StdRng::seed_from_u64(99);
        let first = policy.select_target(&state, 1, &[10, 11, 12], 0.0, &mut rng);
        assert_eq!(first, 10);
        for _ in 0..200 {
            assert_eq!(
                policy.select_target(&state, 1, &[10, 11, 12], 0.0, &mut rng),
                first
            );
        }
    }

    #[test]
    fn full_epsilon_is_uniform() {
        let state = make_state(WeightVector::new([0.0, 0.0, 1.0, 0.0, 0.0, 0.0]));
        let policy = EpsilonGreedyPolicy::new();
        let mut rng = StdRng::seed_from_u64(12345);
        let candidates = [10, 11, 12];
        let mut counts = [0usize; 3];
        let n = 30_000;
        for _ in 0..n {
            let t = policy.select_target(&state, 1, &candidates, 1.0, &mut rng);
            let idx = candidates.iter().position(|c| *c == t).unwrap();
            counts[idx] += 1;
        }
        let expected = n as f64 / 3.0;
        for c in counts {
            assert!(
                (c as f64 - expected).abs() < expected * 0.05,
                "counts {:?} not uniform",
                counts
            );
        }
    }

    #[test]
    fn same_seed_same_choices() {
        let state = make_state(WeightVector::new([0.0, 0.0, 1.0, 0.0, 0.0, 0.0]));
        let policy = EpsilonGreedyPolicy::new();
        let mut a = StdRng::seed_from_u64(5);
        let mut b = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            assert_eq!(
                policy.select_target(&state, 1, &[10, 11, 12], 0.3, &mut a),
                policy.select_target(&state, 1, &[10, 11, 12], 0.3, &mut b)
            );
        }
    }

    #[test]
    fn draw_order_matches_reference_stream() {
        let state = make_state(WeightVector::new([0.0, 0.0, 1.0, 0.0, 0.0, 0.0]));
        let policy = EpsilonGreedyPolicy::new();
        let candidates = [10, 11, 12];

        for epsilon in [0.0, 1.0, 0.3] {
            let mut rng = StdRng::seed_from_u64(77);
            let mut reference = StdRng::seed_from_u64(77);
            for _ in 0..50 {
                let chosen = policy.select_target(&state, 1, &candidates, epsilon, &mut rng);

                let draw: f64 = reference.gen();
                let expected = if draw >= 1.0 - epsilon {
                    candidates[reference.gen_range(0..candidates.len())]
                } else {
                    greedy_target(&state, 1, &candidates)
                };
                assert_eq!(chosen, expected, "epsilon {}", epsilon);
            }
            assert_eq!(rng.gen::<u64>(), reference.gen::<u64>(), "epsilon {}", epsilon);
        }
    }

    #[test]
    fn greedy_branch_takes_one_draw() {
        let state = make_state(WeightVector::zeros());
        let mut rng = StdRng::seed_from_u64(3);
        let mut reference = StdRng::seed_from_u64(3);
        EpsilonGreedyPolicy::new().select_target(&state, 1, &[10, 11, 12], 0.0, &mut rng);
        let _: f64 = reference.gen();
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn exploring_branch_takes_two_draws() {
        let state = make_state(WeightVector::zeros());
        let mut rng = StdRng::seed_from_u64(3);
        let mut reference = StdRng::seed_from_u64(3);
        let chosen =
            EpsilonGreedyPolicy::new().select_target(&state, 1, &[10, 11, 12], 1.0, &mut rng);
        let _: f64 = reference.gen();
        let idx = reference.gen_range(0..3usize);
        assert_eq!(chosen, [10, 11, 12][idx]);
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    #[should_panic(expected = "no candidate targets")]
    fn empty_candidates_panics() {
        let state = make_state(WeightVector::zeros());
        let mut rng = StdRng::seed_from_u64(0);
        EpsilonGreedyPolicy::new().select_target(&state, 1, &[], 0.0, &mut rng);
    }
}
