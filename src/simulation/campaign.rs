use std::collections::HashSet;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

pub const MAX_NEWS_ENTRIES: usize = 50;
const SURVIVAL_DAY: u32 = 45;
const UPRISING_MORALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryKind {
    DefenseMiracle,
    IronFist,
    BitterMercy,
    PragmaticPeace,
    IdeologicalTriumph,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefeatReason {
    Uprising,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Victory(VictoryKind),
    Defeat(DefeatReason),
}

/// Narrative axes accumulated through event choices; read only by the
/// victory evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterAxis {
    Humanism,
    Cruelty,
    Pragmatism,
    Ideology,
    Prestige,
    EliteMorale,
}

/// Resource: the campaign clock, the settlement's vitals and the ending
/// bookkeeping.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct CampaignState {
    pub day: u32,
    pub population: u32,
    pub morale: f64,
    pub health: f64,

    pub humanism: f64,
    pub cruelty: f64,
    pub pragmatism: f64,
    pub ideology: f64,
    pub prestige: f64,
    pub elite_morale: f64,

    pub executed_advisors: u32,
    pub suppressed_rebellions: u32,
    pub civilians_saved: u32,
    pub peace_negotiations: u32,

    pub fired_events: HashSet<String>,
    pub daily_news: Vec<String>,

    pub game_over: bool,
    pub outcome: Option<Outcome>,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self {
            day: 1,
            population: 25_000,
            morale: 50.0,
            health: 70.0,
            humanism: 0.0,
            cruelty: 0.0,
            pragmatism: 0.0,
            ideology: 0.0,
            prestige: 50.0,
            elite_morale: 50.0,
            executed_advisors: 0,
            suppressed_rebellions: 0,
            civilians_saved: 0,
            peace_negotiations: 0,
            fired_events: HashSet::new(),
            daily_news: Vec::new(),
            game_over: false,
            outcome: None,
        }
    }
}

impl CampaignState {
    /// Appends a day-news entry, dropping the oldest past the cap.
    pub fn add_news(&mut self, entry: impl Into<String>) {
        if self.daily_news.len() >= MAX_NEWS_ENTRIES {
            self.daily_news.remove(0);
        }
        self.daily_news.push(entry.into());
    }

    pub fn has_fired(&self, event_name: &str) -> bool {
        self.fired_events.contains(event_name)
    }

    pub fn mark_fired(&mut self, event_name: &str) {
        self.fired_events.insert(event_name.to_string());
    }

    pub fn adjust_morale(&mut self, change: f64) {
        self.morale = (self.morale + change).clamp(0.0, 100.0);
    }

    pub fn adjust_health(&mut self, change: f64) {
        self.health = (self.health + change).clamp(0.0, 100.0);
    }

    pub fn adjust_axis(&mut self, axis: CharacterAxis, change: f64) {
        let value = match axis {
            CharacterAxis::Humanism => &mut self.humanism,
            CharacterAxis::Cruelty => &mut self.cruelty,
            CharacterAxis::Pragmatism => &mut self.pragmatism,
            CharacterAxis::Ideology => &mut self.ideology,
            CharacterAxis::Prestige => &mut self.prestige,
            CharacterAxis::EliteMorale => &mut self.elite_morale,
        };
        *value += change;
    }

    /// End-of-pipeline morale drift: fed people rally, fighting wears,
    /// propaganda props the rest up.
    pub fn update_morale(
        &mut self,
        food_produced: f64,
        battles_fought: u32,
        propaganda_efficiency: f64,
    ) {
        let food_per_person = if self.population > 0 {
            food_produced / self.population as f64
        } else {
            0.0
        };
        let change =
            food_per_person * 2.0 - battles_fought as f64 * 0.3 + propaganda_efficiency * 0.5;
        self.adjust_morale(change);
    }

    /// Rolls the calendar forward and evaluates the endings. Does nothing
    /// once the campaign is decided; the outcome tag never changes
    /// afterwards.
    pub fn advance_day(&mut self) {
        if self.game_over {
            return;
        }
        self.day += 1;
        self.daily_news.clear();
        self.evaluate_outcome();
    }

    fn evaluate_outcome(&mut self) {
        if self.game_over {
            return;
        }
        if let Some(kind) = self.victory() {
            self.game_over = true;
            self.outcome = Some(Outcome::Victory(kind));
            return;
        }
        if self.morale < UPRISING_MORALE {
            self.game_over = true;
            self.outcome = Some(Outcome::Defeat(DefeatReason::Uprising));
        }
    }

    /// Victory predicates in fixed priority order; the first that holds
    /// wins.
    fn victory(&self) -> Option<VictoryKind> {
        if self.day >= SURVIVAL_DAY && self.population >= 12_500 {
            return Some(VictoryKind::DefenseMiracle);
        }
        if self.cruelty > 80.0 && self.executed_advisors >= 5 && self.suppressed_rebellions >= 3 {
            return Some(VictoryKind::IronFist);
        }
        if self.humanism > 70.0 && self.civilians_saved >= 1_000 && self.morale < 20.0 {
            return Some(VictoryKind::BitterMercy);
        }
        if self.pragmatism > 60.0 && self.peace_negotiations >= 2 && self.population >= 20_000 {
            return Some(VictoryKind::PragmaticPeace);
        }
        if self.ideology > 75.0 && self.cruelty < 30.0 && self.morale > 80.0 {
            return Some(VictoryKind::IdeologicalTriumph);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_clears_news_and_increments_day() {
        let mut campaign = CampaignState::default();
        campaign.add_news("Тихий день");
        campaign.advance_day();
        assert_eq!(campaign.day, 2);
        assert!(campaign.daily_news.is_empty());
        assert!(!campaign.game_over);
    }

    #[test]
    fn news_log_is_bounded() {
        let mut campaign = CampaignState::default();
        for index in 0..(MAX_NEWS_ENTRIES + 10) {
            campaign.add_news(format!("запись {}", index));
        }
        assert_eq!(campaign.daily_news.len(), MAX_NEWS_ENTRIES);
        assert_eq!(campaign.daily_news[0], "запись 10");
    }

    #[test]
    fn survival_victory_fires_when_day_reaches_45() {
        let mut campaign = CampaignState {
            day: 44,
            population: 12_500,
            ..CampaignState::default()
        };
        campaign.advance_day();
        assert!(campaign.game_over);
        assert_eq!(
            campaign.outcome,
            Some(Outcome::Victory(VictoryKind::DefenseMiracle))
        );
    }

    #[test]
    fn survival_victory_needs_the_population_floor() {
        let mut campaign = CampaignState {
            day: 44,
            population: 12_499,
            ..CampaignState::default()
        };
        campaign.advance_day();
        assert!(!campaign.game_over);
    }

    #[test]
    fn low_morale_triggers_uprising() {
        let mut campaign = CampaignState {
            morale: 9.0,
            ..CampaignState::default()
        };
        campaign.advance_day();
        assert!(campaign.game_over);
        assert_eq!(
            campaign.outcome,
            Some(Outcome::Defeat(DefeatReason::Uprising))
        );
    }

    #[test]
    fn victory_outranks_defeat_in_the_same_evaluation() {
        let mut campaign = CampaignState {
            day: 44,
            population: 12_500,
            morale: 5.0,
            ..CampaignState::default()
        };
        campaign.advance_day();
        assert_eq!(
            campaign.outcome,
            Some(Outcome::Victory(VictoryKind::DefenseMiracle))
        );
    }

    #[test]
    fn outcome_is_immutable_after_game_over() {
        let mut campaign = CampaignState {
            morale: 0.0,
            ..CampaignState::default()
        };
        campaign.advance_day();
        assert!(campaign.game_over);

        campaign.morale = 100.0;
        campaign.day = 44;
        campaign.advance_day();
        assert_eq!(campaign.day, 44);
        assert_eq!(
            campaign.outcome,
            Some(Outcome::Defeat(DefeatReason::Uprising))
        );
    }

    #[test]
    fn iron_fist_requires_all_three_counters() {
        let mut campaign = CampaignState {
            cruelty: 90.0,
            executed_advisors: 5,
            suppressed_rebellions: 2,
            ..CampaignState::default()
        };
        campaign.advance_day();
        assert!(!campaign.game_over);

        campaign.suppressed_rebellions = 3;
        campaign.advance_day();
        assert_eq!(campaign.outcome, Some(Outcome::Victory(VictoryKind::IronFist)));
    }

    #[test]
    fn ideological_triumph_excludes_the_cruel() {
        let mut campaign = CampaignState {
            ideology: 80.0,
            cruelty: 35.0,
            morale: 90.0,
            ..CampaignState::default()
        };
        campaign.advance_day();
        assert!(!campaign.game_over);

        campaign.cruelty = 10.0;
        campaign.advance_day();
        assert_eq!(
            campaign.outcome,
            Some(Outcome::Victory(VictoryKind::IdeologicalTriumph))
        );
    }

    #[test]
    fn morale_update_combines_food_battles_and_propaganda() {
        let mut campaign = CampaignState {
            population: 1_000,
            morale: 50.0,
            ..CampaignState::default()
        };
        campaign.update_morale(500.0, 2, 6.0);
        // 500/1000*2 - 2*0.3 + 6*0.5 = 1.0 - 0.6 + 3.0
        assert!((campaign.morale - 53.4).abs() < 1e-9);

        campaign.morale = 99.9;
        campaign.update_morale(500.0, 0, 6.0);
        assert_eq!(campaign.morale, 100.0);
    }
}
