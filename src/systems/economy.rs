use bevy_ecs::prelude::*;

use crate::simulation::advisors::AdvisorCorps;
use crate::simulation::buildings::BuildingRegistry;
use crate::simulation::campaign::CampaignState;
use crate::simulation::military::MilitaryCommand;
use crate::simulation::resources::ResourceLedger;
use crate::systems::DayLedger;

/// System: advisor efficiency feeds production, production and upkeep hit
/// the stockpiles.
pub fn economy_system(
    mut ledger: ResMut<ResourceLedger>,
    buildings: Res<BuildingRegistry>,
    corps: Res<AdvisorCorps>,
    military: Res<MilitaryCommand>,
    campaign: Res<CampaignState>,
    mut day: ResMut<DayLedger>,
) {
    run_daily_economy(&mut ledger, &buildings, &corps, &military, &campaign, &mut day);
}

pub fn run_daily_economy(
    ledger: &mut ResourceLedger,
    buildings: &BuildingRegistry,
    corps: &AdvisorCorps,
    military: &MilitaryCommand,
    campaign: &CampaignState,
    day: &mut DayLedger,
) {
    let efficiency = corps.efficiency_by_category();
    let levels = buildings.production_levels();
    let production = ResourceLedger::daily_production(&levels, &efficiency);
    let consumption = ResourceLedger::daily_consumption(
        campaign.population,
        military.total_soldiers(),
        military.battles_today,
        military.patrols_today,
        military.motorized_count(),
    );
    ledger.apply_update(&production, &consumption);
    day.food_produced = production.food;

    log::debug!(
        "day {}: produced {:.0} food / {:.0} ammunition / {:.0} fuel",
        campaign.day,
        production.food,
        production.ammunition,
        production.fuel
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::roster::{starting_advisors, starting_buildings, starting_military};

    #[test]
    fn consumption_sees_zero_battles_at_the_start_of_the_day() {
        let mut ledger = ResourceLedger::default();
        let buildings = starting_buildings();
        let corps = starting_advisors();
        let military = starting_military();
        let campaign = CampaignState::default();
        let mut day = DayLedger::default();

        run_daily_economy(&mut ledger, &buildings, &corps, &military, &campaign, &mut day);

        // Ammunition: +400 * industry efficiency, -100 for the two
        // patrols, and nothing for battles (none have been fought yet).
        let industry = corps.efficiency_by_category().industry;
        let expected = 10_000.0 + 400.0 * industry - 100.0;
        assert!((ledger.ammunition - expected).abs() < 1e-6);
        assert!(day.food_produced > 0.0);
    }

    #[test]
    fn destroyed_farms_starve_the_day() {
        let mut ledger = ResourceLedger::default();
        let mut buildings = starting_buildings();
        for name in ["Завод продуктов", "Пекарня"] {
            let id = buildings.id_of(name).unwrap();
            buildings.get_mut(id).unwrap().destroyed = true;
        }
        let corps = starting_advisors();
        let military = starting_military();
        let campaign = CampaignState::default();
        let mut day = DayLedger::default();

        run_daily_economy(&mut ledger, &buildings, &corps, &military, &campaign, &mut day);
        assert_eq!(day.food_produced, 0.0);
        assert!(ledger.food < 5_000.0);
    }
}
