use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::advisors::CategoryEfficiency;

/// Effective levels of the structures feeding each stock for one day.
/// Destroyed buildings have already been zeroed out by the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductionLevels {
    pub food_factory: u32,
    pub bakery: u32,
    pub underground_factory: u32,
    pub power_plant: u32,
    pub boiler_house: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyProduction {
    pub food: f64,
    pub ammunition: f64,
    pub fuel: f64,
    pub electricity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyConsumption {
    pub food: f64,
    pub ammunition: f64,
    pub fuel: f64,
    pub electricity: f64,
}

/// Resource: the settlement's stockpiles.
///
/// Stocks saturate at zero; shortages are expressed through the battle
/// penalties and event triggers that read them, never through negative
/// balances.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub food: f64,
    pub ammunition: f64,
    pub fuel: f64,
    pub electricity: f64,
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self {
            food: 5000.0,
            ammunition: 10000.0,
            fuel: 2000.0,
            electricity: 100.0,
        }
    }
}

impl ResourceLedger {
    /// Daily output given effective building levels and the advisor
    /// efficiency multipliers. Pure; applied later via `apply_update`.
    pub fn daily_production(
        levels: &ProductionLevels,
        efficiency: &CategoryEfficiency,
    ) -> DailyProduction {
        DailyProduction {
            food: (levels.food_factory as f64 * 300.0 + levels.bakery as f64 * 150.0)
                * efficiency.agriculture,
            ammunition: levels.underground_factory as f64 * 400.0 * efficiency.industry,
            fuel: (levels.boiler_house as f64 * 100.0 + levels.power_plant as f64 * 50.0)
                * efficiency.resources,
            electricity: levels.power_plant as f64 * 200.0,
        }
    }

    pub fn daily_consumption(
        population: u32,
        soldiers: u32,
        battles_today: u32,
        patrols_today: u32,
        motorized_divisions: u32,
    ) -> DailyConsumption {
        DailyConsumption {
            food: population as f64 * 0.03 + soldiers as f64 * 0.1,
            ammunition: battles_today as f64 * 200.0 + patrols_today as f64 * 50.0,
            fuel: motorized_divisions as f64 * 50.0,
            electricity: population as f64 * 0.005,
        }
    }

    pub fn apply_update(&mut self, production: &DailyProduction, consumption: &DailyConsumption) {
        self.food = (self.food + production.food - consumption.food).max(0.0);
        self.ammunition =
            (self.ammunition + production.ammunition - consumption.ammunition).max(0.0);
        self.fuel = (self.fuel + production.fuel - consumption.fuel).max(0.0);
        // Electricity is instantaneous grid capacity, not a stockpile.
        self.electricity = (production.electricity - consumption.electricity).max(0.0);
    }
}
