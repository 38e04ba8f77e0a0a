//! Core types shared by the agent and its environment.
//!
//! Defines unit identifiers, sides, grid positions and the per-unit
//! snapshots the agent tracks between ticks.

use std::fmt;

/// Identifier of a unit, unique within an environment for the unit's lifetime.
pub type UnitId = u32;

/// Which side of the fight a unit belongs to, from the agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// Units commanded by the agent.
    Controlled,
    /// Units the agent fights against.
    Opposing,
}

impl Side {
    /// Returns the other side.
    pub fn opponent(&self) -> Self {
        match self {
            Side::Controlled => Side::Opposing,
            Side::Opposing => Side::Controlled,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Controlled => write!(f, "controlled"),
            Side::Opposing => write!(f, "opposing"),
        }
    }
}

/// A cell on the integer simulation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance (king moves) to another cell.
    pub fn chebyshev_distance(&self, other: &Position) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// True if `other` is one of the eight neighbouring cells or the same cell.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.chebyshev_distance(other) <= 1
    }

    /// Returns the neighbouring cell one king-move closer to `target`.
    ///
    /// Returns `self` unchanged if already on `target`.
    pub fn step_toward(&self, target: &Position) -> Position {
        Position {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Health and location of a live unit, as last observed by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSnapshot {
    pub health: u32,
    pub position: Position,
}

impl UnitSnapshot {
    /// Creates a new snapshot.
    pub fn new(health: u32, position: Position) -> Self {
        Self { health, position }
    }
}

/// A live unit as reported by the environment on a given tick.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitView {
    pub id: UnitId,
    pub side: Side,
    pub health: u32,
    pub position: Position,
    /// Template name of the unit, e.g. `"Footman"`.
    pub type_name: String,
}

impl UnitView {
    /// Returns the health and position of this unit.
    pub fn snapshot(&self) -> UnitSnapshot {
        UnitSnapshot::new(self.health, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_includes_diagonals() {
        let p = Position::new(3, 3);
        for dx in -1..=1 {
            for dy in -1..=1 {
                assert!(p.is_adjacent(&Position::new(3 + dx, 3 + dy)));
            }
        }
        assert!(!p.is_adjacent(&Position::new(5, 3)));
        assert!(!p.is_adjacent(&Position::new(4, 1)));
    }

    #[test]
    fn adjacency_is_symmetric() {
        let cells = [
            Position::new(0, 0),
            Position::new(1, 1),
            Position::new(-1, 0),
            Position::new(2, 1),
            Position::new(7, -3),
        ];
        for a in &cells {
            for b in &cells {
                assert_eq!(a.is_adjacent(b), b.is_adjacent(a));
            }
        }
    }

    #[test]
    fn adjacency_is_reflexive() {
        let p = Position::new(-4, 9);
        assert!(p.is_adjacent(&p));
    }

    #[test]
    fn step_toward_moves_diagonally() {
        let p = Position::new(0, 0);
        assert_eq!(p.step_toward(&Position::new(5, -2)), Position::new(1, -1));
        assert_eq!(p.step_toward(&Position::new(0, 4)), Position::new(0, 1));
        assert_eq!(p.step_toward(&p), p);
    }

    #[test]
    fn opponent_swaps_sides() {
        assert_eq!(Side::Controlled.opponent(), Side::Opposing);
        assert_eq!(Side::Opposing.opponent(), Side::Controlled);
    }
}
