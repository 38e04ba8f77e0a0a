//! Interface between the agent and the simulation it controls.
//!
//! The simulation engine is an external collaborator: it resolves combat,
//! paths units and executes commands. Each tick it hands the agent a
//! [`TickObservation`] and receives a set of [`Command`]s back.

use std::collections::BTreeMap;

use crate::types::{Side, UnitId, UnitView};

/// Damage dealt by one unit to another during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEvent {
    pub defender_side: Side,
    pub defender: UnitId,
    pub attacker_side: Side,
    pub attacker: UnitId,
    pub amount: u32,
}

/// A unit that died during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathEvent {
    pub side: Side,
    pub unit: UnitId,
}

/// Status of the last command issued to a controlled unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionFeedback {
    Completed,
    Failed,
    InProgress,
}

impl ActionFeedback {
    /// True if the unit is free to receive a new order.
    pub fn frees_unit(&self) -> bool {
        matches!(self, ActionFeedback::Completed | ActionFeedback::Failed)
    }
}

/// Everything recorded about one resolved tick.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickEvents {
    pub damage: Vec<DamageEvent>,
    pub deaths: Vec<DeathEvent>,
    /// Feedback for controlled units that had a command in flight.
    pub feedback: BTreeMap<UnitId, ActionFeedback>,
}

impl TickEvents {
    /// True if any unit of `side` took damage.
    pub fn side_was_damaged(&self, side: Side) -> bool {
        self.damage.iter().any(|d| d.defender_side == side)
    }

    /// Controlled units whose last command completed or failed.
    pub fn freed_units(&self) -> Vec<UnitId> {
        self.feedback
            .iter()
            .filter(|(_, fb)| fb.frees_unit())
            .map(|(id, _)| *id)
            .collect()
    }
}

/// What the agent sees at the start of a tick.
///
/// `events` describe the *previous* tick (`turn - 1`); on turn 0 they are
/// empty and [`TickObservation::prior_tick`] returns `None`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickObservation {
    pub turn: u32,
    /// All live units, both sides.
    pub units: Vec<UnitView>,
    pub events: TickEvents,
}

impl TickObservation {
    /// Events of the previous tick, or `None` on the first tick of an episode.
    pub fn prior_tick(&self) -> Option<&TickEvents> {
        if self.turn == 0 {
            None
        } else {
            Some(&self.events)
        }
    }
}

/// An order for a controlled unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Command {
    /// Move toward and attack the target until it dies.
    Attack { target: UnitId },
}

impl Command {
    /// Returns the unit this command is aimed at.
    pub fn target(&self) -> UnitId {
        match self {
            Command::Attack { target } => *target,
        }
    }
}

/// Commands issued in one tick, keyed by the controlled unit receiving them.
pub type Commands = BTreeMap<UnitId, Command>;

/// Result of advancing the environment by one tick.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: TickObservation,
    /// True once one side has no units left (or the engine gives up).
    pub done: bool,
}

/// A turn-based combat simulation the agent can be plugged into.
///
/// # Lifecycle
///
/// 1. [`Environment::reset`] places units and returns the turn-0 observation.
/// 2. [`Environment::step`] applies commands and resolves one tick.
/// 3. Repeat until [`StepOutcome::done`].
pub trait Environment {
    /// Starts a new episode.
    fn reset(&mut self) -> TickObservation;

    /// Applies `commands` and resolves one tick.
    fn step(&mut self, commands: &Commands) -> StepOutcome;
}
