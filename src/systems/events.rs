use bevy_ecs::prelude::*;

use crate::simulation::advisors::AdvisorCorps;
use crate::simulation::campaign::CampaignState;
use crate::simulation::events::{select_daily_event, EventCatalog, PendingEvent};
use crate::simulation::resources::ResourceLedger;
use crate::simulation::rng::SimRng;
use crate::systems::DayLedger;

/// System: surfaces at most one fresh narrative event per day, evaluated
/// against the state the earlier stages just produced.
pub fn event_system(
    catalog: Res<EventCatalog>,
    mut campaign: ResMut<CampaignState>,
    ledger: Res<ResourceLedger>,
    mut corps: ResMut<AdvisorCorps>,
    mut pending: ResMut<PendingEvent>,
    mut day: ResMut<DayLedger>,
    mut rng: ResMut<SimRng>,
) {
    if let Some(event) = select_daily_event(&catalog, &mut campaign, &ledger, &mut corps, &mut rng)
    {
        log::info!("event fired: {}", event.name);
        pending.0 = Some(event.name.clone());
        day.fired_event = Some(event.name.clone());
    }
}
