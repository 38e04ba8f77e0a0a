//! A small deterministic skirmish simulation.
//!
//! Two lines of identical melee units face each other on a grid. Units with
//! an attack order step one cell (king move) toward their target per tick
//! and strike it once adjacent. The opposing side always attacks the nearest
//! controlled unit. This is a reference environment for exercising the agent,
//! not a faithful combat model.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::environment::{
    ActionFeedback, Command, Commands, DamageEvent, DeathEvent, Environment, StepOutcome,
    TickEvents, TickObservation,
};
use crate::types::{Position, Side, UnitId, UnitView};

/// Name reported for every arena unit.
pub const UNIT_TYPE: &str = "Footman";

/// Configuration of the reference arena.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    pub width: i32,
    pub height: i32,
    pub controlled_units: u32,
    pub opposing_units: u32,
    /// Starting health of every unit.
    pub health: u32,
    /// Damage per hit is drawn uniformly from `min_damage..=max_damage`.
    pub min_damage: u32,
    pub max_damage: u32,
    /// Episodes are cut off after this many ticks.
    pub max_turns: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 8,
            controlled_units: 5,
            opposing_units: 5,
            health: 30,
            min_damage: 3,
            max_damage: 7,
            max_turns: 400,
        }
    }
}

#[derive(Debug, Clone)]
struct ArenaUnit {
    side: Side,
    health: u32,
    position: Position,
}

/// The reference environment.
#[derive(Debug)]
pub struct Arena {
    pub config: ArenaConfig,
    units: BTreeMap<UnitId, ArenaUnit>,
    /// Current attack target of each unit that has one.
    orders: BTreeMap<UnitId, UnitId>,
    turn: u32,
    rng: StdRng,
    /// Seed of the next episode; bumped on every reset.
    seed: u64,
}

impl Arena {
    /// Creates an arena whose first episode uses `seed`.
    pub fn new(config: ArenaConfig, seed: u64) -> Self {
        Self {
            config,
            units: BTreeMap::new(),
            orders: BTreeMap::new(),
            turn: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Returns the number of ticks resolved in the running episode.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Number of live units on `side`.
    pub fn alive(&self, side: Side) -> usize {
        self.units.values().filter(|u| u.side == side).count()
    }

    fn is_done(&self) -> bool {
        self.alive(Side::Controlled) == 0
            || self.alive(Side::Opposing) == 0
            || self.turn >= self.config.max_turns
    }

    fn views(&self) -> Vec<UnitView> {
        self.units
            .iter()
            .map(|(id, u)| UnitView {
                id: *id,
                side: u.side,
                health: u.health,
                position: u.position,
                type_name: UNIT_TYPE.to_string(),
            })
            .collect()
    }

    /// Spreads `count` units evenly down column `x`.
    fn place_line(&mut self, side: Side, count: u32, x: i32, next_id: &mut UnitId) {
        let gap = (self.config.height / (count as i32 + 1)).max(1);
        for i in 0..count {
            let y = ((i as i32 + 1) * gap).min(self.config.height - 1);
            self.units.insert(
                *next_id,
                ArenaUnit {
                    side,
                    health: self.config.health,
                    position: Position::new(x, y),
                },
            );
            *next_id += 1;
        }
    }

    fn nearest_enemy(&self, id: UnitId) -> Option<UnitId> {
        let me = &self.units[&id];
        self.units
            .iter()
            .filter(|(_, u)| u.side == me.side.opponent())
            .min_by_key(|(other, u)| (me.position.chebyshev_distance(&u.position), **other))
            .map(|(other, _)| *other)
    }

    fn occupied(&self, cell: Position) -> bool {
        self.units.values().any(|u| u.position == cell)
    }

    fn in_bounds(&self, cell: Position) -> bool {
        (0..self.config.width).contains(&cell.x) && (0..self.config.height).contains(&cell.y)
    }
}

impl Environment for Arena {
    fn reset(&mut self) -> TickObservation {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.seed = self.seed.wrapping_add(1);
        self.turn = 0;
        self.units.clear();
        self.orders.clear();

        let mut next_id = 0;
        let right = self.config.width - 1;
        self.place_line(Side::Controlled, self.config.controlled_units, 0, &mut next_id);
        self.place_line(Side::Opposing, self.config.opposing_units, right, &mut next_id);

        TickObservation {
            turn: 0,
            units: self.views(),
            events: TickEvents::default(),
        }
    }

    fn step(&mut self, commands: &Commands) -> StepOutcome {
        let mut events = TickEvents::default();

        for (unit, command) in commands {
            let Command::Attack { target } = *command;
            let valid = self.units.get(unit).map(|u| u.side) == Some(Side::Controlled)
                && self.units.get(&target).map(|u| u.side) == Some(Side::Opposing);
            if valid {
                self.orders.insert(*unit, target);
            } else if self.units.contains_key(unit) {
                self.orders.remove(unit);
                events.feedback.insert(*unit, ActionFeedback::Failed);
            }
        }

        let opposing: Vec<UnitId> = self
            .units
            .iter()
            .filter(|(_, u)| u.side == Side::Opposing)
            .map(|(id, _)| *id)
            .collect();
        for id in opposing {
            let has_target = self
                .orders
                .get(&id)
                .is_some_and(|t| self.units.contains_key(t));
            if !has_target {
                if let Some(target) = self.nearest_enemy(id) {
                    self.orders.insert(id, target);
                }
            }
        }

        let acting: Vec<UnitId> = self.units.keys().copied().collect();
        for id in acting {
            let Some(&target) = self.orders.get(&id) else {
                continue;
            };
            // Killed earlier this tick.
            let Some(attacker) = self.units.get(&id).cloned() else {
                continue;
            };
            let Some(defender) = self.units.get(&target).cloned() else {
                continue;
            };

            if attacker.position.is_adjacent(&defender.position) {
                let amount = self
                    .rng
                    .gen_range(self.config.min_damage..=self.config.max_damage)
                    .min(defender.health);
                events.damage.push(DamageEvent {
                    defender_side: defender.side,
                    defender: target,
                    attacker_side: attacker.side,
                    attacker: id,
                    amount,
                });
                let health = defender.health - amount;
                if health == 0 {
                    self.units.remove(&target);
                    events.deaths.push(DeathEvent {
                        side: defender.side,
                        unit: target,
                    });
                } else if let Some(unit) = self.units.get_mut(&target) {
                    unit.health = health;
                }
            } else {
                let next = attacker.position.step_toward(&defender.position);
                if self.in_bounds(next) && !self.occupied(next) {
                    if let Some(unit) = self.units.get_mut(&id) {
                        unit.position = next;
                    }
                }
            }
        }

        // Orders whose target died are complete.
        let dead: Vec<UnitId> = events.deaths.iter().map(|d| d.unit).collect();
        let mut completed = Vec::new();
        self.orders.retain(|unit, target| {
            if dead.contains(target) {
                completed.push(*unit);
                false
            } else {
                true
            }
        });
        self.orders.retain(|unit, _| self.units.contains_key(unit));

        for (id, unit) in &self.units {
            if unit.side != Side::Controlled || events.feedback.contains_key(id) {
                continue;
            }
            if completed.contains(id) {
                events.feedback.insert(*id, ActionFeedback::Completed);
            } else if self.orders.contains_key(id) {
                events.feedback.insert(*id, ActionFeedback::InProgress);
            }
        }

        self.turn += 1;
        StepOutcome {
            done: self.is_done(),
            observation: TickObservation {
                turn: self.turn,
                units: self.views(),
                events,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ArenaConfig {
        ArenaConfig {
            width: 4,
            height: 3,
            controlled_units: 1,
            opposing_units: 1,
            health: 10,
            min_damage: 5,
            max_damage: 5,
            max_turns: 50,
        }
    }

    #[test]
    fn reset_places_both_lines() {
        let mut arena = Arena::new(ArenaConfig::default(), 1);
        let obs = arena.reset();
        assert_eq!(obs.turn, 0);
        assert_eq!(arena.alive(Side::Controlled), 5);
        assert_eq!(arena.alive(Side::Opposing), 5);
        assert!(obs
            .units
            .iter()
            .filter(|u| u.side == Side::Controlled)
            .all(|u| u.position.x == 0));
        assert!(obs.prior_tick().is_none());
    }

    #[test]
    fn duel_runs_to_completion() {
        let mut arena = Arena::new(small(), 3);
        let obs = arena.reset();
        let me = obs.units.iter().find(|u| u.side == Side::Controlled).unwrap().id;
        let enemy = obs.units.iter().find(|u| u.side == Side::Opposing).unwrap().id;

        let mut commands = Commands::new();
        commands.insert(me, Command::Attack { target: enemy });
        let mut outcome = arena.step(&commands);
        assert_eq!(outcome.observation.turn, 1);
        assert_eq!(
            outcome.observation.events.feedback.get(&me),
            Some(&ActionFeedback::InProgress)
        );

        let mut saw_damage = false;
        while !outcome.done {
            outcome = arena.step(&Commands::new());
            saw_damage |= !outcome.observation.events.damage.is_empty();
        }
        assert!(saw_damage);
        let deaths = &outcome.observation.events.deaths;
        assert_eq!(deaths.len(), 1);
        assert!(arena.alive(Side::Controlled) == 0 || arena.alive(Side::Opposing) == 0);
    }

    #[test]
    fn attacking_unknown_unit_fails() {
        let mut arena = Arena::new(small(), 3);
        let obs = arena.reset();
        let me = obs.units.iter().find(|u| u.side == Side::Controlled).unwrap().id;
        let mut commands = Commands::new();
        commands.insert(me, Command::Attack { target: 999 });
        let outcome = arena.step(&commands);
        assert_eq!(
            outcome.observation.events.feedback.get(&me),
            Some(&ActionFeedback::Failed)
        );
    }

    #[test]
    fn same_seed_same_episode() {
        let play = || {
            let mut arena = Arena::new(small(), 9);
            arena.reset();
            let mut log = Vec::new();
            loop {
                let outcome = arena.step(&Commands::new());
                log.push(outcome.observation.clone());
                if outcome.done {
                    break;
                }
            }
            log
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn episode_seed_wraps_at_max() {
        let finish = |arena: &mut Arena| {
            let mut log = Vec::new();
            loop {
                let outcome = arena.step(&Commands::new());
                log.push(outcome.observation.clone());
                if outcome.done {
                    break;
                }
            }
            log
        };

        let mut wrapped = Arena::new(small(), u64::MAX);
        wrapped.reset();
        wrapped.reset();
        let mut fresh = Arena::new(small(), 0);
        fresh.reset();
        assert_eq!(finish(&mut wrapped), finish(&mut fresh));
    }
}
