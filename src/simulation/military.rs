use std::collections::HashMap;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::resources::ResourceLedger;
use crate::simulation::rng::SimRng;

pub const DAILY_BATTLE_CAP: u32 = 3;
/// Floor for both sides' power values; division by zero is impossible.
const MIN_POWER: f64 = 0.1;
const MAX_LOSS_FRACTION: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DivisionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivisionKind {
    Infantry,
    Motorized,
}

#[derive(Debug, Clone)]
pub struct Division {
    pub id: DivisionId,
    pub name: String,
    pub commander: String,
    pub kind: DivisionKind,
    pub soldiers: u32,
    pub experience: f64,
    pub morale: f64,
    pub equipment: f64,
    pub is_engaged: bool,
}

impl Division {
    /// Defensive strength. Never returns less than the power floor, so an
    /// empty division still yields a finite loss ratio.
    pub fn defense_power(&self, in_structure: bool) -> f64 {
        if self.soldiers == 0 {
            return MIN_POWER;
        }
        let mut power = self.soldiers as f64 * 0.4
            + self.experience * 0.3
            + self.morale * 0.2
            + self.equipment * 0.1;
        if in_structure {
            power *= 1.5;
        }
        power.max(MIN_POWER)
    }

    /// Offensive strength under current supply, shown by the driver.
    pub fn attack_power(&self, ledger: &ResourceLedger) -> f64 {
        if self.soldiers == 0 {
            return 0.0;
        }
        let mut power = self.soldiers as f64 * 0.4
            + self.experience * 0.3
            + self.morale * 0.2
            + self.equipment * 0.1;
        if self.kind == DivisionKind::Motorized {
            power *= 1.3;
        }
        power *= self.supply_penalty(ledger);
        power.max(0.0)
    }

    /// Shortage multiplier: ammunition below ten rounds a soldier costs
    /// 30%, dry fuel tanks halve a motorized division on top of that.
    fn supply_penalty(&self, ledger: &ResourceLedger) -> f64 {
        let mut penalty = 1.0;
        if ledger.ammunition < self.soldiers as f64 * 10.0 {
            penalty *= 0.7;
        }
        if self.kind == DivisionKind::Motorized && ledger.fuel < self.soldiers as f64 * 5.0 {
            penalty *= 0.5;
        }
        penalty
    }

    pub fn take_casualties(&mut self, casualties: u32) {
        self.soldiers = self.soldiers.saturating_sub(casualties);
        self.morale = (self.morale - casualties as f64 * 0.1).max(0.0);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Victory,
    Defeat,
}

#[derive(Debug, Clone)]
pub struct BattleReport {
    pub division: String,
    pub result: BattleResult,
    pub message: String,
    pub defender_casualties: u32,
    pub attacker_casualties: u32,
}

#[derive(Debug, Clone)]
pub enum BattleOutcome {
    NoBattle { reason: String },
    Fought(BattleReport),
}

/// Resource: the garrison and the abstract besieging force.
#[derive(Resource, Debug, Clone, Default)]
pub struct MilitaryCommand {
    divisions: Vec<Division>,
    by_name: HashMap<String, DivisionId>,
    pub enemy_force: u32,
    pub battles_today: u32,
    pub patrols_today: u32,
}

impl MilitaryCommand {
    pub fn add(
        &mut self,
        name: &str,
        commander: &str,
        kind: DivisionKind,
        soldiers: u32,
        experience: f64,
        morale: f64,
        equipment: f64,
    ) -> DivisionId {
        let id = DivisionId(self.divisions.len() as u32);
        self.divisions.push(Division {
            id,
            name: name.to_string(),
            commander: commander.to_string(),
            kind,
            soldiers,
            experience,
            morale,
            equipment,
            is_engaged: false,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, id: DivisionId) -> Option<&Division> {
        self.divisions.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: DivisionId) -> Option<&mut Division> {
        self.divisions.get_mut(id.0 as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<DivisionId> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Division> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Division> {
        self.divisions.iter()
    }

    pub fn total_soldiers(&self) -> u32 {
        self.divisions.iter().map(|d| d.soldiers).sum()
    }

    pub fn motorized_count(&self) -> u32 {
        self.divisions
            .iter()
            .filter(|d| d.kind == DivisionKind::Motorized)
            .count() as u32
    }

    /// One enemy assault against a randomly chosen fresh division.
    ///
    /// Fails closed: past the daily cap, or with no division that is both
    /// unengaged and manned, nothing is mutated and no randomness is
    /// consumed. Supply penalties scale the defense power used in the
    /// loss ratios; the unpenalized value decides the reported outcome.
    pub fn resolve_battle(
        &mut self,
        ledger: &ResourceLedger,
        in_structure: bool,
        rng: &mut SimRng,
    ) -> BattleOutcome {
        if self.battles_today >= DAILY_BATTLE_CAP {
            return BattleOutcome::NoBattle {
                reason: "Превышен лимит боев за день".to_string(),
            };
        }

        let eligible: Vec<usize> = self
            .divisions
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_engaged && d.soldiers > 0)
            .map(|(index, _)| index)
            .collect();
        if eligible.is_empty() {
            return BattleOutcome::NoBattle {
                reason: "Нет доступных дивизий".to_string(),
            };
        }

        let index = eligible[rng.pick_index(eligible.len())];
        self.divisions[index].is_engaged = true;

        let defense_power = self.divisions[index].defense_power(in_structure);
        let effective_defense =
            (defense_power * self.divisions[index].supply_penalty(ledger)).max(MIN_POWER);
        let attack_power = (self.enemy_force as f64 * 0.1 * rng.uniform(0.8, 1.2)).max(MIN_POWER);

        let attacker_loss = (effective_defense / attack_power * 0.3 * rng.uniform(0.8, 1.2))
            .clamp(0.0, MAX_LOSS_FRACTION);
        let defender_loss = (attack_power / effective_defense * 0.2 * rng.uniform(0.8, 1.2))
            .clamp(0.0, MAX_LOSS_FRACTION);

        let defender_casualties =
            (self.divisions[index].soldiers as f64 * defender_loss) as u32;
        self.divisions[index].take_casualties(defender_casualties);

        let attacker_casualties = (self.enemy_force as f64 * attacker_loss) as u32;
        self.enemy_force = self.enemy_force.saturating_sub(attacker_casualties);

        self.battles_today += 1;

        let name = self.divisions[index].name.clone();
        let (result, message) = if defense_power > attack_power {
            (
                BattleResult::Victory,
                format!("{} отбила атаку! Потери: {} солдат", name, defender_casualties),
            )
        } else {
            (
                BattleResult::Defeat,
                format!(
                    "{} потерпела поражение. Потери: {} солдат",
                    name, defender_casualties
                ),
            )
        };

        BattleOutcome::Fought(BattleReport {
            division: name,
            result,
            message,
            defender_casualties,
            attacker_casualties,
        })
    }

    /// Picks a random manned division and shifts its headcount, flooring
    /// at zero. Used by event effects.
    pub fn apply_soldier_delta(&mut self, delta: i32, rng: &mut SimRng) -> Option<String> {
        let manned: Vec<usize> = self
            .divisions
            .iter()
            .enumerate()
            .filter(|(_, d)| d.soldiers > 0)
            .map(|(index, _)| index)
            .collect();
        if manned.is_empty() {
            return None;
        }
        let index = manned[rng.pick_index(manned.len())];
        let division = &mut self.divisions[index];
        division.soldiers = division.soldiers.saturating_add_signed(delta);
        Some(division.name.clone())
    }

    pub fn reset_daily_engagement(&mut self) {
        for division in &mut self.divisions {
            division.is_engaged = false;
        }
        self.battles_today = 0;
    }
}
