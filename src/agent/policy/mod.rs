//! Target-selection policies.

pub mod epsilon_greedy;
pub mod random;
pub mod trait_;

pub use epsilon_greedy::{greedy_target, EpsilonGreedyPolicy};
pub use random::RandomTargetPolicy;
pub use trait_::TargetPolicy;
