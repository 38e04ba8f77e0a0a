//! Per-decision reward derived from the previous tick's combat log.

use crate::environment::TickEvents;
use crate::types::{Side, UnitId};

/// Constant per-tick cost, charged even when nothing happened.
pub const STEP_COST: f64 = -1.0;

/// Reward for each unit death: lost for own units, gained for enemies.
pub const DEATH_REWARD: f64 = 100.0;

/// Computes rewards for controlled units.
pub struct RewardComputer;

impl RewardComputer {
    /// Reward attributed to `unit`'s last decision.
    ///
    /// `prior` holds the events of the previous tick, or `None` on the first
    /// tick of an episode, where only the step cost applies.
    ///
    /// # Components
    ///
    /// 1. **Step cost**: `-1`.
    /// 2. **Damage**: `-amount` for each hit taken by a controlled unit,
    ///    `+amount` for each hit taken by an opposing unit.
    /// 3. **Deaths**: `-100` per controlled death, `+100` per opposing death.
    ///
    /// The events are side-wide, so every controlled unit deciding on the
    /// same tick receives the same reward.
    pub fn compute(_unit: UnitId, prior: Option<&TickEvents>) -> f64 {
        let mut reward = STEP_COST;

        let Some(events) = prior else {
            return reward;
        };

        for damage in &events.damage {
            match damage.defender_side {
                Side::Controlled => reward -= damage.amount as f64,
                Side::Opposing => reward += damage.amount as f64,
            }
        }

        for death in &events.deaths {
            match death.side {
                Side::Controlled => reward -= DEATH_REWARD,
                Side::Opposing => reward += DEATH_REWARD,
            }
        }

        reward
    }
}
