use std::path::Path;

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;

use crate::core::ecs::{create_schedule, create_world};
use crate::core::serialization::{
    apply_state_to_world, extract_state_from_world, load_state_from_path, save_state_to_path,
    SaveState,
};
use crate::simulation::advisors::AdvisorCorps;
use crate::simulation::buildings::{BuildingActionError, BuildingRegistry};
use crate::simulation::campaign::{CampaignState, Outcome};
use crate::simulation::events::{
    apply_event_choice, ChoiceError, EventCatalog, PendingEvent,
};
use crate::simulation::military::{BattleReport, MilitaryCommand};
use crate::simulation::resources::ResourceLedger;
use crate::simulation::rng::SimRng;
use crate::systems::DayLedger;

/// A fired event as shown to the player.
#[derive(Debug, Clone)]
pub struct EventCard {
    pub name: String,
    pub description: String,
    pub choices: Vec<String>,
}

/// Everything one day advance produced, for the display layer.
#[derive(Debug, Clone)]
pub struct DayReport {
    pub day: u32,
    pub news: Vec<String>,
    pub battles: Vec<BattleReport>,
    pub event: Option<EventCard>,
    pub game_over: bool,
    pub outcome: Option<Outcome>,
}

/// Wrapper around the ECS world and the daily schedule; the only surface
/// the display layer talks to.
pub struct Game {
    world: World,
    schedule: Schedule,
    seed: u64,
}

impl Game {
    /// Create a new campaign from the fixed rosters, seeded.
    pub fn new(seed: u64) -> Self {
        Self {
            world: create_world(seed),
            schedule: create_schedule(),
            seed,
        }
    }

    /// Run the full daily pipeline and report what happened. Once the
    /// campaign is decided this is a no-op returning a bare report.
    pub fn advance_day(&mut self) -> DayReport {
        if self.world.resource::<CampaignState>().game_over {
            return self.report(true);
        }
        self.schedule.run(&mut self.world);
        self.report(false)
    }

    fn report(&self, bare: bool) -> DayReport {
        let campaign = self.world.resource::<CampaignState>();
        let day_ledger = self.world.resource::<DayLedger>();
        let catalog = self.world.resource::<EventCatalog>();

        let event = if bare {
            None
        } else {
            day_ledger.fired_event.as_deref().and_then(|name| {
                catalog.get(name).map(|def| EventCard {
                    name: def.name.clone(),
                    description: def.description.clone(),
                    choices: def.choices.iter().map(|c| c.text.clone()).collect(),
                })
            })
        };

        DayReport {
            day: campaign.day,
            news: if bare { Vec::new() } else { day_ledger.news.clone() },
            battles: if bare { Vec::new() } else { day_ledger.battle_reports.clone() },
            event,
            game_over: campaign.game_over,
            outcome: campaign.outcome,
        }
    }

    /// Apply one choice of the event currently awaiting a decision.
    pub fn apply_event_choice(
        &mut self,
        event_name: &str,
        choice_index: usize,
    ) -> Result<String, ChoiceError> {
        let pending = self.world.resource::<PendingEvent>();
        if pending.0.as_deref() != Some(event_name) {
            return Err(ChoiceError::NoPendingEvent);
        }
        let event = match self.world.resource::<EventCatalog>().get(event_name) {
            Some(def) => def.clone(),
            None => return Err(ChoiceError::NoPendingEvent),
        };

        let mut state: SystemState<(
            ResMut<CampaignState>,
            ResMut<ResourceLedger>,
            ResMut<AdvisorCorps>,
            ResMut<MilitaryCommand>,
            ResMut<SimRng>,
        )> = SystemState::new(&mut self.world);
        let (mut campaign, mut ledger, mut corps, mut military, mut rng) =
            state.get_mut(&mut self.world);

        let message = apply_event_choice(
            &event,
            choice_index,
            &mut campaign,
            &mut ledger,
            &mut corps,
            &mut military,
            &mut rng,
        )?;

        self.world.resource_mut::<PendingEvent>().0 = None;
        log::info!("event {} resolved: {}", event_name, message);
        Ok(message)
    }

    /// The event awaiting a decision, if any.
    pub fn pending_event(&self) -> Option<EventCard> {
        let name = self.world.resource::<PendingEvent>().0.clone()?;
        let catalog = self.world.resource::<EventCatalog>();
        catalog.get(&name).map(|def| EventCard {
            name: def.name.clone(),
            description: def.description.clone(),
            choices: def.choices.iter().map(|c| c.text.clone()).collect(),
        })
    }

    pub fn upgrade_building(&mut self, name: &str) -> Result<(), BuildingActionError> {
        self.world.resource_mut::<BuildingRegistry>().upgrade(name)
    }

    pub fn repair_building(&mut self, name: &str) -> Result<(), BuildingActionError> {
        self.world.resource_mut::<BuildingRegistry>().repair(name)
    }

    pub fn campaign(&self) -> &CampaignState {
        self.world.resource()
    }

    pub fn resources(&self) -> &ResourceLedger {
        self.world.resource()
    }

    pub fn buildings(&self) -> &BuildingRegistry {
        self.world.resource()
    }

    pub fn advisors(&self) -> &AdvisorCorps {
        self.world.resource()
    }

    pub fn military(&self) -> &MilitaryCommand {
        self.world.resource()
    }

    /// Extract a serializable save document from the current world.
    pub fn save_state(&self) -> SaveState {
        extract_state_from_world(&self.world, self.seed)
    }

    /// Apply a saved document back into the live world.
    pub fn load_state(&mut self, state: SaveState) {
        self.seed = state.seed;
        apply_state_to_world(state, &mut self.world);
    }

    /// Save state directly to a file path.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        save_state_to_path(&self.save_state(), path)
    }

    /// Load state directly from a file path.
    pub fn load_from_path<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        let state = load_state_from_path(path)?;
        self.load_state(state);
        Ok(())
    }
}
