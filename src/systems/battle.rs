use bevy_ecs::prelude::*;

use crate::simulation::campaign::CampaignState;
use crate::simulation::military::{BattleOutcome, MilitaryCommand};
use crate::simulation::resources::ResourceLedger;
use crate::simulation::rng::SimRng;
use crate::systems::DayLedger;

/// Up to three assault slots a day, each materializing at 60%.
const DAILY_BATTLE_ROLLS: u32 = 3;
const BATTLE_CHANCE: f64 = 0.6;

/// System: the besiegers probe the defenses.
pub fn battle_system(
    mut military: ResMut<MilitaryCommand>,
    ledger: Res<ResourceLedger>,
    mut campaign: ResMut<CampaignState>,
    mut day: ResMut<DayLedger>,
    mut rng: ResMut<SimRng>,
) {
    run_daily_battles(&mut military, &ledger, &mut campaign, &mut day, &mut rng);
}

pub fn run_daily_battles(
    military: &mut MilitaryCommand,
    ledger: &ResourceLedger,
    campaign: &mut CampaignState,
    day: &mut DayLedger,
    rng: &mut SimRng,
) {
    for _ in 0..DAILY_BATTLE_ROLLS {
        if !rng.chance(BATTLE_CHANCE) {
            continue;
        }
        match military.resolve_battle(ledger, true, rng) {
            BattleOutcome::Fought(report) => {
                log::info!("battle at {}: {}", report.division, report.message);
                campaign.add_news(format!("БОЙ: {}", report.message));
                day.battles_fought += 1;
                day.battle_reports.push(report);
            }
            BattleOutcome::NoBattle { .. } => {}
        }
    }
}
