//! Mutable learning state of the agent.
//!
//! Single-writer ownership per field:
//!
//! | Field | Written by |
//! |---|---|
//! | `snapshots`, `roster`, `stale_q` | episode controller |
//! | `weights` | TD learner (through the controller) |
//!
//! Every other component reads through shared references. The random stream
//! is owned by the controller and lent to whoever draws from it.

use std::collections::HashMap;

use rand::Rng;

use super::q_function::WeightVector;
use crate::types::{Side, UnitId, UnitSnapshot, UnitView};

/// Live unit ids of both sides, in the order they were first observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    controlled: Vec<UnitId>,
    opposing: Vec<UnitId>,
}

impl Roster {
    /// Creates a roster from the initial members of each side.
    pub fn new(controlled: Vec<UnitId>, opposing: Vec<UnitId>) -> Self {
        Self {
            controlled,
            opposing,
        }
    }

    /// Returns the live members of `side`.
    pub fn members(&self, side: Side) -> &[UnitId] {
        match side {
            Side::Controlled => &self.controlled,
            Side::Opposing => &self.opposing,
        }
    }

    /// Returns the live controlled units.
    pub fn controlled(&self) -> &[UnitId] {
        &self.controlled
    }

    /// Returns the live opposing units.
    pub fn opposing(&self) -> &[UnitId] {
        &self.opposing
    }

    /// True if `id` is a live member of `side`.
    pub fn contains(&self, side: Side, id: UnitId) -> bool {
        self.members(side).contains(&id)
    }

    /// True if `side` has no live members.
    pub fn is_empty(&self, side: Side) -> bool {
        self.members(side).is_empty()
    }

    /// Removes `id` from `side`. Returns `false` (and does nothing) if absent.
    pub fn remove(&mut self, side: Side, id: UnitId) -> bool {
        let members = match side {
            Side::Controlled => &mut self.controlled,
            Side::Opposing => &mut self.opposing,
        };
        match members.iter().position(|m| *m == id) {
            Some(idx) => {
                members.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes every member of both sides.
    pub fn clear(&mut self) {
        self.controlled.clear();
        self.opposing.clear();
    }
}

/// All state the agent carries between ticks.
#[derive(Debug, Clone)]
pub struct AgentState {
    /// Last observed health/position of every tracked unit.
    pub snapshots: HashMap<UnitId, UnitSnapshot>,
    pub roster: Roster,
    /// Q-value of each controlled unit's in-flight decision.
    pub stale_q: HashMap<UnitId, f64>,
    /// Shared across units and episodes.
    pub weights: WeightVector,
}

impl AgentState {
    /// Creates an empty state around `weights`.
    pub fn new(weights: WeightVector) -> Self {
        Self {
            snapshots: HashMap::new(),
            roster: Roster::default(),
            stale_q: HashMap::new(),
            weights,
        }
    }

    /// Snapshot of a tracked unit.
    ///
    /// # Panics
    ///
    /// If `id` is not tracked: a dead or unknown unit reaching feature or
    /// reward code means the roster and snapshots fell out of sync.
    pub fn snapshot(&self, id: UnitId) -> &UnitSnapshot {
        self.snapshots
            .get(&id)
            .unwrap_or_else(|| panic!("unit {} is not tracked (dead or unknown)", id))
    }

    /// Starts tracking an episode's units.
    ///
    /// Each controlled unit gets an initial stale Q-value drawn uniformly
    /// from [0, 1), in roster order.
    pub fn begin_episode<R: Rng + ?Sized>(
        &mut self,
        controlled: Vec<UnitView>,
        opposing: Vec<UnitView>,
        rng: &mut R,
    ) {
        self.snapshots.clear();
        self.stale_q.clear();
        self.roster.clear();

        for unit in controlled.iter().chain(opposing.iter()) {
            self.snapshots.insert(unit.id, unit.snapshot());
        }
        for unit in &controlled {
            let initial: f64 = rng.gen();
            self.stale_q.insert(unit.id, initial);
        }
        self.roster = Roster::new(
            controlled.iter().map(|u| u.id).collect(),
            opposing.iter().map(|u| u.id).collect(),
        );
    }

    /// Overwrites snapshots of the given live units.
    pub fn refresh(&mut self, units: &[UnitView]) {
        for unit in units {
            self.snapshots.insert(unit.id, unit.snapshot());
        }
    }

    /// Forgets a dead unit. Unknown ids are ignored.
    pub fn remove_unit(&mut self, side: Side, id: UnitId) -> bool {
        let removed = self.roster.remove(side, id);
        if removed {
            self.snapshots.remove(&id);
            self.stale_q.remove(&id);
        }
        removed
    }
}
