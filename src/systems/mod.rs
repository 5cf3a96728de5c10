pub mod battle;
pub mod conspiracy;
pub mod economy;
pub mod events;
pub mod morale;
pub mod upkeep;

use bevy_ecs::prelude::*;

use crate::simulation::military::BattleReport;

/// Resource: scratch record of everything one pipeline run produced.
/// The day-advance step clears the campaign's own news log, so the
/// driver-facing report is assembled from here instead.
#[derive(Resource, Debug, Default, Clone)]
pub struct DayLedger {
    pub food_produced: f64,
    pub battles_fought: u32,
    pub battle_reports: Vec<BattleReport>,
    pub fired_event: Option<String>,
    pub news: Vec<String>,
}

impl DayLedger {
    pub fn clear(&mut self) {
        self.food_produced = 0.0;
        self.battles_fought = 0;
        self.battle_reports.clear();
        self.fired_event = None;
        self.news.clear();
    }
}

/// System: resets the day's scratch record before anything else runs.
pub fn begin_day_system(mut day: ResMut<DayLedger>) {
    day.clear();
}
