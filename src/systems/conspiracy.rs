use bevy_ecs::prelude::*;

use crate::simulation::advisors::AdvisorCorps;
use crate::simulation::campaign::CampaignState;
use crate::simulation::rng::SimRng;

/// System: the daily intrigue pass over the non-ruling factions.
pub fn conspiracy_system(
    mut corps: ResMut<AdvisorCorps>,
    mut campaign: ResMut<CampaignState>,
    mut rng: ResMut<SimRng>,
) {
    run_daily_intrigue(&mut corps, &mut campaign, &mut rng);
}

pub fn run_daily_intrigue(
    corps: &mut AdvisorCorps,
    campaign: &mut CampaignState,
    rng: &mut SimRng,
) {
    for entry in corps.run_daily_conspiracies(rng) {
        log::info!("intrigue: {}", entry);
        campaign.add_news(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::roster::starting_advisors;

    #[test]
    fn meetings_surface_in_the_news() {
        let mut corps = starting_advisors();
        for name in ["Арсений Ватутин", "Александр Петров", "Максим Старый"] {
            let id = corps.id_of(name).unwrap();
            corps.get_mut(id).unwrap().loyalty = 20;
        }
        let mut campaign = CampaignState::default();
        let mut rng = SimRng::from_seed(6);
        for _ in 0..16 {
            run_daily_intrigue(&mut corps, &mut campaign, &mut rng);
        }
        assert!(campaign
            .daily_news
            .iter()
            .any(|entry| entry.contains("встретился")));
    }
}
