use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::advisors::{AdvisorCorps, AdvisorFaction};
use crate::simulation::buildings::{BuildingCategory, BuildingRegistry};
use crate::simulation::campaign::{CampaignState, Outcome};
use crate::simulation::military::{DivisionKind, MilitaryCommand};
use crate::simulation::resources::ResourceLedger;

/// Save document capturing the campaign, the ledger and the three
/// rosters. Sections are mandatory: a document missing one fails to
/// deserialize and nothing is installed. Fields inside an entity are
/// optional: absent fields leave the live value untouched, and entries
/// naming an unknown entity are skipped, never created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveState {
    #[serde(default = "default_save_version")]
    pub version: u32,
    #[serde(default)]
    pub created_at: u64,
    #[serde(default)]
    pub seed: u64,
    pub campaign: SavedCampaign,
    pub resources: SavedResources,
    pub buildings: HashMap<String, SavedBuilding>,
    pub advisors: HashMap<String, SavedAdvisor>,
    pub military: SavedMilitary,
}

fn default_save_version() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedCampaign {
    pub day: Option<u32>,
    pub population: Option<u32>,
    pub morale: Option<f64>,
    pub health: Option<f64>,
    #[serde(default)]
    pub humanism: Option<f64>,
    #[serde(default)]
    pub cruelty: Option<f64>,
    #[serde(default)]
    pub pragmatism: Option<f64>,
    #[serde(default)]
    pub ideology: Option<f64>,
    #[serde(default)]
    pub prestige: Option<f64>,
    #[serde(default)]
    pub elite_morale: Option<f64>,
    #[serde(default)]
    pub executed_advisors: Option<u32>,
    #[serde(default)]
    pub suppressed_rebellions: Option<u32>,
    #[serde(default)]
    pub civilians_saved: Option<u32>,
    #[serde(default)]
    pub peace_negotiations: Option<u32>,
    #[serde(default)]
    pub fired_events: Option<HashSet<String>>,
    #[serde(default)]
    pub daily_news: Option<Vec<String>>,
    pub game_over: Option<bool>,
    #[serde(default)]
    pub outcome: Option<Outcome>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedResources {
    pub food: Option<f64>,
    pub ammunition: Option<f64>,
    pub fuel: Option<f64>,
    pub electricity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedBuilding {
    pub category: Option<BuildingCategory>,
    pub level: Option<u32>,
    pub efficiency: Option<f64>,
    pub destroyed: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedAdvisor {
    pub position: Option<String>,
    pub skills: Option<HashMap<String, i32>>,
    pub loyalty: Option<i32>,
    pub faction: Option<AdvisorFaction>,
    pub is_traitor: Option<bool>,
    pub is_conspirator: Option<bool>,
    pub conspiracy_level: Option<i32>,
    #[serde(default)]
    pub is_arrested: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedDivision {
    pub commander: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<DivisionKind>,
    pub soldiers: Option<u32>,
    pub experience: Option<f64>,
    pub morale: Option<f64>,
    pub equipment: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedMilitary {
    pub divisions: HashMap<String, SavedDivision>,
    pub enemy_force: Option<u32>,
    pub battles_today: Option<u32>,
    pub patrols_today: Option<u32>,
}

/// Extract a serializable snapshot of the world.
pub fn extract_state_from_world(world: &World, seed: u64) -> SaveState {
    let campaign = world.resource::<CampaignState>();
    let ledger = world.resource::<ResourceLedger>();
    let buildings = world.resource::<BuildingRegistry>();
    let corps = world.resource::<AdvisorCorps>();
    let military = world.resource::<MilitaryCommand>();

    SaveState {
        version: default_save_version(),
        created_at: unix_now(),
        seed,
        campaign: SavedCampaign {
            day: Some(campaign.day),
            population: Some(campaign.population),
            morale: Some(campaign.morale),
            health: Some(campaign.health),
            humanism: Some(campaign.humanism),
            cruelty: Some(campaign.cruelty),
            pragmatism: Some(campaign.pragmatism),
            ideology: Some(campaign.ideology),
            prestige: Some(campaign.prestige),
            elite_morale: Some(campaign.elite_morale),
            executed_advisors: Some(campaign.executed_advisors),
            suppressed_rebellions: Some(campaign.suppressed_rebellions),
            civilians_saved: Some(campaign.civilians_saved),
            peace_negotiations: Some(campaign.peace_negotiations),
            fired_events: Some(campaign.fired_events.clone()),
            daily_news: Some(campaign.daily_news.clone()),
            game_over: Some(campaign.game_over),
            outcome: campaign.outcome,
        },
        resources: SavedResources {
            food: Some(ledger.food),
            ammunition: Some(ledger.ammunition),
            fuel: Some(ledger.fuel),
            electricity: Some(ledger.electricity),
        },
        buildings: buildings
            .iter()
            .map(|b| {
                (
                    b.name.clone(),
                    SavedBuilding {
                        category: Some(b.category),
                        level: Some(b.level),
                        efficiency: Some(b.efficiency),
                        destroyed: Some(b.destroyed),
                    },
                )
            })
            .collect(),
        advisors: corps
            .iter()
            .map(|a| {
                (
                    a.name.clone(),
                    SavedAdvisor {
                        position: Some(a.position.clone()),
                        skills: Some(a.skills.clone()),
                        loyalty: Some(a.loyalty),
                        faction: Some(a.faction),
                        is_traitor: Some(a.is_traitor),
                        is_conspirator: Some(a.is_conspirator),
                        conspiracy_level: Some(a.conspiracy_level),
                        is_arrested: Some(a.is_arrested),
                    },
                )
            })
            .collect(),
        military: SavedMilitary {
            divisions: military
                .iter()
                .map(|d| {
                    (
                        d.name.clone(),
                        SavedDivision {
                            commander: Some(d.commander.clone()),
                            kind: Some(d.kind),
                            soldiers: Some(d.soldiers),
                            experience: Some(d.experience),
                            morale: Some(d.morale),
                            equipment: Some(d.equipment),
                        },
                    )
                })
                .collect(),
            enemy_force: Some(military.enemy_force),
            battles_today: Some(military.battles_today),
            patrols_today: Some(military.patrols_today),
        },
    }
}

/// Apply a saved snapshot back into the world. Only fields present in
/// the document are written; unknown entity names are logged and
/// skipped.
pub fn apply_state_to_world(state: SaveState, world: &mut World) {
    {
        let mut campaign = world.resource_mut::<CampaignState>();
        let saved = state.campaign;
        apply(&mut campaign.day, saved.day);
        apply(&mut campaign.population, saved.population);
        apply(&mut campaign.morale, saved.morale);
        apply(&mut campaign.health, saved.health);
        apply(&mut campaign.humanism, saved.humanism);
        apply(&mut campaign.cruelty, saved.cruelty);
        apply(&mut campaign.pragmatism, saved.pragmatism);
        apply(&mut campaign.ideology, saved.ideology);
        apply(&mut campaign.prestige, saved.prestige);
        apply(&mut campaign.elite_morale, saved.elite_morale);
        apply(&mut campaign.executed_advisors, saved.executed_advisors);
        apply(&mut campaign.suppressed_rebellions, saved.suppressed_rebellions);
        apply(&mut campaign.civilians_saved, saved.civilians_saved);
        apply(&mut campaign.peace_negotiations, saved.peace_negotiations);
        apply(&mut campaign.fired_events, saved.fired_events);
        apply(&mut campaign.daily_news, saved.daily_news);
        apply(&mut campaign.game_over, saved.game_over);
        campaign.outcome = saved.outcome;
    }

    {
        let mut ledger = world.resource_mut::<ResourceLedger>();
        apply(&mut ledger.food, state.resources.food);
        apply(&mut ledger.ammunition, state.resources.ammunition);
        apply(&mut ledger.fuel, state.resources.fuel);
        apply(&mut ledger.electricity, state.resources.electricity);
    }

    {
        let mut registry = world.resource_mut::<BuildingRegistry>();
        for (name, saved) in state.buildings {
            let Some(id) = registry.id_of(&name) else {
                log::warn!("save references unknown building {}", name);
                continue;
            };
            if let Some(building) = registry.get_mut(id) {
                apply(&mut building.category, saved.category);
                apply(&mut building.level, saved.level);
                apply(&mut building.efficiency, saved.efficiency);
                apply(&mut building.destroyed, saved.destroyed);
            }
        }
    }

    {
        let mut corps = world.resource_mut::<AdvisorCorps>();
        for (name, saved) in state.advisors {
            let Some(id) = corps.id_of(&name) else {
                log::warn!("save references unknown advisor {}", name);
                continue;
            };
            if let Some(advisor) = corps.get_mut(id) {
                apply(&mut advisor.position, saved.position);
                apply(&mut advisor.skills, saved.skills);
                apply(&mut advisor.faction, saved.faction);
                apply(&mut advisor.is_traitor, saved.is_traitor);
                apply(&mut advisor.is_conspirator, saved.is_conspirator);
                apply(&mut advisor.is_arrested, saved.is_arrested);
                if let Some(loyalty) = saved.loyalty {
                    advisor.loyalty = loyalty.clamp(0, 100);
                }
                if let Some(level) = saved.conspiracy_level {
                    advisor.conspiracy_level = level.clamp(0, 100);
                }
            }
        }
    }

    {
        let mut command = world.resource_mut::<MilitaryCommand>();
        for (name, saved) in state.military.divisions {
            let Some(id) = command.id_of(&name) else {
                log::warn!("save references unknown division {}", name);
                continue;
            };
            if let Some(division) = command.get_mut(id) {
                apply(&mut division.commander, saved.commander);
                apply(&mut division.kind, saved.kind);
                apply(&mut division.soldiers, saved.soldiers);
                apply(&mut division.experience, saved.experience);
                apply(&mut division.morale, saved.morale);
                apply(&mut division.equipment, saved.equipment);
            }
        }
        apply(&mut command.enemy_force, state.military.enemy_force);
        apply(&mut command.battles_today, state.military.battles_today);
        apply(&mut command.patrols_today, state.military.patrols_today);
    }
}

fn apply<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Serialize a save state into JSON for persistence.
pub fn save_state_to_json(state: &SaveState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

/// Deserialize JSON back into a save state.
pub fn load_state_from_json(data: &str) -> serde_json::Result<SaveState> {
    serde_json::from_str(data)
}

/// Write a save state to a file path.
pub fn save_state_to_path<P: AsRef<Path>>(state: &SaveState, path: P) -> std::io::Result<()> {
    let json = save_state_to_json(state)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

/// Read a save state from a file path.
pub fn load_state_from_path<P: AsRef<Path>>(path: P) -> std::io::Result<SaveState> {
    let data = fs::read_to_string(&path)?;
    load_state_from_json(&data).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::world::Game;
    use crate::simulation::rng::SimRng;

    fn scrambled_game(seed: u64) -> Game {
        let mut game = Game::new(seed);
        for _ in 0..6 {
            game.advance_day();
        }
        game
    }

    #[test]
    fn save_then_load_reproduces_every_scalar() {
        let game = scrambled_game(99);
        let state = game.save_state();
        let json = save_state_to_json(&state).unwrap();

        let mut fresh = Game::new(1);
        fresh.load_state(load_state_from_json(&json).unwrap());

        assert_eq!(fresh.campaign().day, game.campaign().day);
        assert_eq!(fresh.campaign().morale, game.campaign().morale);
        assert_eq!(fresh.campaign().fired_events, game.campaign().fired_events);
        assert_eq!(fresh.resources().food, game.resources().food);
        assert_eq!(fresh.resources().ammunition, game.resources().ammunition);
        assert_eq!(fresh.resources().fuel, game.resources().fuel);
        assert_eq!(fresh.resources().electricity, game.resources().electricity);

        for advisor in game.advisors().iter() {
            let loaded = fresh.advisors().get_by_name(&advisor.name).unwrap();
            assert_eq!(loaded.loyalty, advisor.loyalty);
            assert_eq!(loaded.conspiracy_level, advisor.conspiracy_level);
            assert_eq!(loaded.is_conspirator, advisor.is_conspirator);
        }
        for division in game.military().iter() {
            let loaded = fresh.military().get_by_name(&division.name).unwrap();
            assert_eq!(loaded.soldiers, division.soldiers);
            assert_eq!(loaded.morale, division.morale);
        }
        for building in game.buildings().iter() {
            let loaded = fresh.buildings().get_by_name(&building.name).unwrap();
            assert_eq!(loaded.level, building.level);
            assert_eq!(loaded.efficiency, building.efficiency);
            assert_eq!(loaded.destroyed, building.destroyed);
        }
        assert_eq!(fresh.military().enemy_force, game.military().enemy_force);
    }

    #[test]
    fn unknown_entities_are_skipped_not_created() {
        let game = scrambled_game(3);
        let mut state = game.save_state();
        state
            .advisors
            .insert("Неизвестный".to_string(), SavedAdvisor::default());
        state
            .military
            .divisions
            .insert("9-я призрачная".to_string(), SavedDivision::default());
        state
            .buildings
            .insert("Фантом".to_string(), SavedBuilding::default());

        let mut fresh = Game::new(1);
        fresh.load_state(state);
        assert_eq!(fresh.advisors().iter().count(), 15);
        assert_eq!(fresh.military().iter().count(), 8);
        assert_eq!(fresh.buildings().iter().count(), 12);
        assert!(fresh.advisors().get_by_name("Неизвестный").is_none());
    }

    #[test]
    fn missing_section_fails_the_whole_load() {
        let game = scrambled_game(5);
        let json = save_state_to_json(&game.save_state()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("military");
        let crippled = serde_json::to_string(&value).unwrap();

        assert!(load_state_from_json(&crippled).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let game = scrambled_game(8);
        let json = save_state_to_json(&game.save_state()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["campaign"]["weather"] = serde_json::json!("снег");
        value["resources"]["gold"] = serde_json::json!(1_000);
        let extended = serde_json::to_string(&value).unwrap();

        let state = load_state_from_json(&extended).unwrap();
        let mut fresh = Game::new(1);
        fresh.load_state(state);
        assert_eq!(fresh.campaign().day, game.campaign().day);
    }

    #[test]
    fn absent_fields_leave_live_values_untouched() {
        let mut game = Game::new(2);
        {
            // A partial advisor record: only loyalty is present.
            let mut state = game.save_state();
            let entry = state.advisors.get_mut("Стас Ватутин").unwrap();
            *entry = SavedAdvisor {
                loyalty: Some(150),
                ..SavedAdvisor::default()
            };
            game.load_state(state);
        }
        let advisor = game.advisors().get_by_name("Стас Ватутин").unwrap();
        // Out-of-range loyalty is clamped on the way in.
        assert_eq!(advisor.loyalty, 100);
        assert_eq!(advisor.position, "Бизнесмен");
        assert_eq!(advisor.faction, AdvisorFaction::Reformists);
    }

    #[test]
    fn save_files_round_trip_on_disk() {
        let dir = std::env::temp_dir().join(format!(
            "last-bastion-test-{}",
            SimRng::from_seed(unix_now()).next()
        ));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("save.json");

        let game = scrambled_game(21);
        game.save_to_path(&path).unwrap();

        let mut fresh = Game::new(1);
        fresh.load_from_path(&path).unwrap();
        assert_eq!(fresh.campaign().day, game.campaign().day);
        assert_eq!(fresh.resources().food, game.resources().food);

        fs::remove_dir_all(&dir).ok();
    }
}
