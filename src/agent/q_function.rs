//! Linear action-value approximation.

use std::fmt;

use rand::Rng;

use super::features::{FeatureVector, NUM_FEATURES};

/// Dot product of a weight slice and a feature slice of equal length.
pub fn q_value(weights: &[f64], features: &[f64]) -> f64 {
    debug_assert_eq!(weights.len(), features.len());
    weights.iter().zip(features).map(|(w, f)| w * f).sum()
}

/// Learned weights of the linear Q-function, one per feature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightVector(pub [f64; NUM_FEATURES]);

impl WeightVector {
    /// Creates a weight vector from explicit values.
    pub fn new(weights: [f64; NUM_FEATURES]) -> Self {
        Self(weights)
    }

    /// Creates an all-zero weight vector.
    pub fn zeros() -> Self {
        Self([0.0; NUM_FEATURES])
    }

    /// Draws every weight uniformly from [-1, 1).
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut w = [0.0; NUM_FEATURES];
        for v in w.iter_mut() {
            *v = rng.gen::<f64>() * 2.0 - 1.0;
        }
        Self(w)
    }

    /// Q(s, a) for the state-action pair encoded by `features`.
    pub fn q_value(&self, features: &FeatureVector) -> f64 {
        q_value(&self.0, features)
    }

    /// Returns the weights as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Returns the weights as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.0
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, w) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}", w)?;
        }
        write!(f, "]")
    }
}
