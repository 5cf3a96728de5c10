use std::collections::HashMap;
use std::fmt;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::resources::ProductionLevels;
use crate::simulation::rng::SimRng;

pub const MAX_BUILDING_LEVEL: u32 = 3;
const DESTRUCTION_THRESHOLD: f64 = 0.3;
const REPAIR_EFFICIENCY_FLOOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingCategory {
    Government,
    FoodProduction,
    MilitaryProduction,
    Power,
    Fuel,
    Health,
    Safety,
    Morale,
    Military,
}

impl BuildingCategory {
    pub fn is_productive(self) -> bool {
        matches!(
            self,
            BuildingCategory::FoodProduction
                | BuildingCategory::MilitaryProduction
                | BuildingCategory::Power
                | BuildingCategory::Fuel
        )
    }
}

/// Which production formula term a structure feeds. Assigned at roster
/// construction; most buildings feed none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionRole {
    FoodFactory,
    Bakery,
    UndergroundFactory,
    PowerPlant,
    BoilerHouse,
}

#[derive(Debug, Clone)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    pub category: BuildingCategory,
    pub production_role: Option<ProductionRole>,
    pub level: u32,
    pub efficiency: f64,
    pub destroyed: bool,
}

impl Building {
    fn upgrade(&mut self) -> Result<(), BuildingActionError> {
        if self.destroyed {
            return Err(BuildingActionError::Destroyed);
        }
        if self.level >= MAX_BUILDING_LEVEL {
            return Err(BuildingActionError::MaxLevel);
        }
        self.level += 1;
        self.efficiency *= 1.2;
        Ok(())
    }

    fn repair(&mut self) -> Result<(), BuildingActionError> {
        if !self.destroyed {
            return Err(BuildingActionError::NotDestroyed);
        }
        self.destroyed = false;
        self.efficiency = self.efficiency.max(REPAIR_EFFICIENCY_FLOOR);
        Ok(())
    }

    fn apply_damage(&mut self, chance: f64, rng: &mut SimRng) -> bool {
        if !rng.chance(chance) {
            return false;
        }
        self.efficiency *= 0.8;
        if self.efficiency < DESTRUCTION_THRESHOLD {
            self.destroyed = true;
        }
        true
    }

    /// Level that counts toward production; destroyed structures are dark.
    fn effective_level(&self) -> u32 {
        if self.destroyed {
            0
        } else {
            self.level
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildingActionError {
    Unknown(String),
    MaxLevel,
    Destroyed,
    NotDestroyed,
}

impl fmt::Display for BuildingActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildingActionError::Unknown(name) => write!(f, "no building named {}", name),
            BuildingActionError::MaxLevel => write!(f, "building is already at maximum level"),
            BuildingActionError::Destroyed => write!(f, "building is destroyed"),
            BuildingActionError::NotDestroyed => write!(f, "building is not destroyed"),
        }
    }
}

impl std::error::Error for BuildingActionError {}

/// Resource: every structure in the settlement, keyed by id with a
/// name index for the event/driver surface.
#[derive(Resource, Debug, Clone, Default)]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
    by_name: HashMap<String, BuildingId>,
}

impl BuildingRegistry {
    pub fn add(
        &mut self,
        name: &str,
        category: BuildingCategory,
        production_role: Option<ProductionRole>,
        level: u32,
    ) -> BuildingId {
        let id = BuildingId(self.buildings.len() as u32);
        self.buildings.push(Building {
            id,
            name: name.to_string(),
            category,
            production_role,
            level,
            efficiency: 1.0,
            destroyed: false,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.get_mut(id.0 as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<BuildingId> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Building> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    pub fn production_buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter().filter(|b| b.category.is_productive())
    }

    pub fn upgrade(&mut self, name: &str) -> Result<(), BuildingActionError> {
        self.with_building(name, Building::upgrade)
    }

    pub fn repair(&mut self, name: &str) -> Result<(), BuildingActionError> {
        self.with_building(name, Building::repair)
    }

    /// Rolls once against `chance`; on a hit the building loses a fifth of
    /// its efficiency and collapses below the destruction threshold.
    pub fn apply_damage(
        &mut self,
        name: &str,
        chance: f64,
        rng: &mut SimRng,
    ) -> Result<bool, BuildingActionError> {
        let id = self
            .id_of(name)
            .ok_or_else(|| BuildingActionError::Unknown(name.to_string()))?;
        match self.get_mut(id) {
            Some(building) => Ok(building.apply_damage(chance, rng)),
            None => Err(BuildingActionError::Unknown(name.to_string())),
        }
    }

    /// Effective production levels for the day, destroyed structures
    /// contributing nothing.
    pub fn production_levels(&self) -> ProductionLevels {
        let mut levels = ProductionLevels::default();
        for building in &self.buildings {
            let level = building.effective_level();
            match building.production_role {
                Some(ProductionRole::FoodFactory) => levels.food_factory += level,
                Some(ProductionRole::Bakery) => levels.bakery += level,
                Some(ProductionRole::UndergroundFactory) => levels.underground_factory += level,
                Some(ProductionRole::PowerPlant) => levels.power_plant += level,
                Some(ProductionRole::BoilerHouse) => levels.boiler_house += level,
                None => {}
            }
        }
        levels
    }

    fn with_building(
        &mut self,
        name: &str,
        op: impl FnOnce(&mut Building) -> Result<(), BuildingActionError>,
    ) -> Result<(), BuildingActionError> {
        let id = self
            .id_of(name)
            .ok_or_else(|| BuildingActionError::Unknown(name.to_string()))?;
        match self.get_mut(id) {
            Some(building) => op(building),
            None => Err(BuildingActionError::Unknown(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> BuildingRegistry {
        let mut registry = BuildingRegistry::default();
        registry.add(
            "Завод продуктов",
            BuildingCategory::FoodProduction,
            Some(ProductionRole::FoodFactory),
            1,
        );
        registry.add(
            "Пекарня",
            BuildingCategory::FoodProduction,
            Some(ProductionRole::Bakery),
            2,
        );
        registry.add("Рейхстаг", BuildingCategory::Government, None, 2);
        registry
    }

    #[test]
    fn upgrade_raises_level_and_efficiency() {
        let mut registry = registry();
        registry.upgrade("Завод продуктов").unwrap();
        let building = registry.get_by_name("Завод продуктов").unwrap();
        assert_eq!(building.level, 2);
        assert!((building.efficiency - 1.2).abs() < 1e-9);
    }

    #[test]
    fn upgrade_at_max_level_rejects_without_mutation() {
        let mut registry = registry();
        registry.upgrade("Завод продуктов").unwrap();
        registry.upgrade("Завод продуктов").unwrap();
        let before = registry.get_by_name("Завод продуктов").unwrap().clone();
        assert_eq!(
            registry.upgrade("Завод продуктов"),
            Err(BuildingActionError::MaxLevel)
        );
        let after = registry.get_by_name("Завод продуктов").unwrap();
        assert_eq!(after.level, before.level);
        assert_eq!(after.efficiency, before.efficiency);
    }

    #[test]
    fn destroyed_building_cannot_upgrade() {
        let mut registry = registry();
        let id = registry.id_of("Пекарня").unwrap();
        registry.get_mut(id).unwrap().destroyed = true;
        assert_eq!(
            registry.upgrade("Пекарня"),
            Err(BuildingActionError::Destroyed)
        );
    }

    #[test]
    fn repair_restores_only_destroyed_buildings() {
        let mut registry = registry();
        assert_eq!(
            registry.repair("Пекарня"),
            Err(BuildingActionError::NotDestroyed)
        );

        let id = registry.id_of("Пекарня").unwrap();
        {
            let building = registry.get_mut(id).unwrap();
            building.destroyed = true;
            building.efficiency = 0.2;
        }
        registry.repair("Пекарня").unwrap();
        let building = registry.get(id).unwrap();
        assert!(!building.destroyed);
        assert_eq!(building.efficiency, 0.5);
    }

    #[test]
    fn damage_erodes_and_eventually_destroys() {
        let mut registry = registry();
        let mut rng = SimRng::from_seed(1);
        let mut hits = 0;
        while !registry.get_by_name("Завод продуктов").unwrap().destroyed {
            if registry.apply_damage("Завод продуктов", 1.0, &mut rng).unwrap() {
                hits += 1;
            }
            assert!(hits < 32, "destruction threshold never reached");
        }
        let building = registry.get_by_name("Завод продуктов").unwrap();
        assert!(building.efficiency < 0.3);
    }

    #[test]
    fn damage_with_zero_chance_never_lands() {
        let mut registry = registry();
        let mut rng = SimRng::from_seed(1);
        for _ in 0..16 {
            assert!(!registry.apply_damage("Пекарня", 0.0, &mut rng).unwrap());
        }
        assert_eq!(registry.get_by_name("Пекарня").unwrap().efficiency, 1.0);
    }

    #[test]
    fn unknown_building_is_rejected() {
        let mut registry = registry();
        assert!(matches!(
            registry.upgrade("Ратуша"),
            Err(BuildingActionError::Unknown(_))
        ));
    }

    #[test]
    fn destroyed_buildings_produce_nothing() {
        let mut registry = registry();
        let id = registry.id_of("Завод продуктов").unwrap();
        registry.get_mut(id).unwrap().destroyed = true;
        let levels = registry.production_levels();
        assert_eq!(levels.food_factory, 0);
        assert_eq!(levels.bakery, 2);
    }

    #[test]
    fn production_filter_excludes_government() {
        let registry = registry();
        let productive: Vec<_> = registry
            .production_buildings()
            .map(|b| b.name.as_str())
            .collect();
        assert!(!productive.contains(&"Рейхстаг"));
        assert_eq!(productive.len(), 2);
    }
}
