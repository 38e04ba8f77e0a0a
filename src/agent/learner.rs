//! Semi-gradient TD(0) update of the linear Q-function.

use super::features::FeatureVector;
use super::q_function::WeightVector;

/// TD(0) learner with fixed step size and discount.
#[derive(Debug, Clone, Copy)]
pub struct TdLearner {
    pub learning_rate: f64,
    pub gamma: f64,
}

impl TdLearner {
    /// Creates a learner with step size `learning_rate` and discount `gamma`.
    pub fn new(learning_rate: f64, gamma: f64) -> Self {
        Self {
            learning_rate,
            gamma,
        }
    }

    /// TD error `r + γ Q_fresh - Q_stale`.
    pub fn td_error(&self, stale_q: f64, fresh_q: f64, reward: f64) -> f64 {
        reward + self.gamma * fresh_q - stale_q
    }

    /// Applies `w_i += α · δ · f_i` in place and returns the TD error δ.
    ///
    /// # Arguments
    ///
    /// * `stale_q` - Q-value of the decision the reward is attributed to
    /// * `fresh_q` - Q-value of the newly chosen action, under the weights
    ///   as they are before this update
    /// * `reward` - Reward observed since the stale decision
    /// * `features` - Feature vector of the newly chosen action
    pub fn update(
        &self,
        weights: &mut WeightVector,
        stale_q: f64,
        fresh_q: f64,
        reward: f64,
        features: &FeatureVector,
    ) -> f64 {
        let delta = self.td_error(stale_q, fresh_q, reward);
        for (w, f) in weights.as_mut_slice().iter_mut().zip(features) {
            *w += self.learning_rate * delta * f;
        }
        delta
    }
}
