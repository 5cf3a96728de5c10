use bevy_ecs::prelude::*;
use bevy_ecs::schedule::SystemSet;

use crate::data::events::standard_event_catalog;
use crate::data::roster::{starting_advisors, starting_buildings, starting_military};
use crate::simulation::campaign::CampaignState;
use crate::simulation::events::PendingEvent;
use crate::simulation::resources::ResourceLedger;
use crate::simulation::rng::SimRng;
use crate::systems::battle::battle_system;
use crate::systems::begin_day_system;
use crate::systems::conspiracy::conspiracy_system;
use crate::systems::economy::economy_system;
use crate::systems::events::event_system;
use crate::systems::morale::morale_system;
use crate::systems::upkeep::{advance_day_system, engagement_reset_system};
use crate::systems::DayLedger;

/// Canonical stage ordering for one simulated day. The sets are chained,
/// so the ordering is total: production before battles, battles before
/// events, engagement reset after events.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum DaySet {
    Intake,
    Economy,
    Battles,
    Intrigue,
    Events,
    Morale,
    Cleanup,
}

/// Build the ECS world with the fixed campaign rosters.
pub fn create_world(seed: u64) -> World {
    let mut world = World::new();
    world.insert_resource(SimRng::from_seed(seed));
    world.insert_resource(CampaignState::default());
    world.insert_resource(ResourceLedger::default());
    world.insert_resource(starting_buildings());
    world.insert_resource(starting_advisors());
    world.insert_resource(starting_military());
    world.insert_resource(standard_event_catalog());
    world.insert_resource(PendingEvent::default());
    world.insert_resource(DayLedger::default());
    world
}

/// Build the daily schedule in the canonical order.
pub fn create_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.configure_sets(
        (
            DaySet::Intake,
            DaySet::Economy,
            DaySet::Battles,
            DaySet::Intrigue,
            DaySet::Events,
            DaySet::Morale,
            DaySet::Cleanup,
        )
            .chain(),
    );

    schedule.add_systems((
        begin_day_system.in_set(DaySet::Intake),
        economy_system.in_set(DaySet::Economy),
        battle_system.in_set(DaySet::Battles),
        conspiracy_system.in_set(DaySet::Intrigue),
        event_system.in_set(DaySet::Events),
        morale_system.in_set(DaySet::Morale),
        (engagement_reset_system, advance_day_system)
            .chain()
            .in_set(DaySet::Cleanup),
    ));

    schedule
}
