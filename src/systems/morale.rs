use bevy_ecs::prelude::*;

use crate::simulation::advisors::AdvisorCorps;
use crate::simulation::campaign::CampaignState;
use crate::systems::DayLedger;

/// System: end-of-day morale drift from food, fighting and propaganda.
/// The propaganda multiplier is recomputed here, never cached.
pub fn morale_system(
    mut campaign: ResMut<CampaignState>,
    corps: Res<AdvisorCorps>,
    day: Res<DayLedger>,
) {
    let propaganda = corps.efficiency_by_category().propaganda;
    campaign.update_morale(day.food_produced, day.battles_fought, propaganda);
}
