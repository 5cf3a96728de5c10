use bevy_ecs::prelude::*;

use crate::simulation::campaign::CampaignState;
use crate::simulation::military::MilitaryCommand;
use crate::systems::DayLedger;

/// System: unlocks the divisions for tomorrow. Runs after events so a
/// choice cannot exploit a division that fought today.
pub fn engagement_reset_system(mut military: ResMut<MilitaryCommand>) {
    military.reset_daily_engagement();
}

/// System: archives the day's news for the report, then rolls the
/// calendar and evaluates the endings.
pub fn advance_day_system(mut campaign: ResMut<CampaignState>, mut day: ResMut<DayLedger>) {
    day.news = campaign.daily_news.clone();
    campaign.advance_day();
    if campaign.game_over {
        log::info!("campaign over on day {}: {:?}", campaign.day, campaign.outcome);
    }
}
