use std::collections::HashSet;
use std::fmt;

use bevy_ecs::prelude::*;

use crate::simulation::advisors::AdvisorCorps;
use crate::simulation::campaign::{CampaignState, CharacterAxis};
use crate::simulation::military::MilitaryCommand;
use crate::simulation::resources::ResourceLedger;
use crate::simulation::rng::SimRng;

/// Pure trigger predicate, evaluated against a read-only view of the
/// campaign. Anything random or side-effecting lives in the arm step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    FoodBelow(f64),
    AnyLoyaltyBelow(i32),
    ConspiracyRipe,
    FoodAndHealthBelow { food: f64, health: f64 },
    AfterDay(u32),
    FoodAndMoraleBelow { food: f64, morale: f64 },
}

impl Trigger {
    pub fn eval(
        &self,
        campaign: &CampaignState,
        ledger: &ResourceLedger,
        corps: &AdvisorCorps,
    ) -> bool {
        match *self {
            Trigger::FoodBelow(threshold) => ledger.food < threshold,
            Trigger::AnyLoyaltyBelow(threshold) => {
                corps.iter_active().any(|a| a.loyalty < threshold)
            }
            Trigger::ConspiracyRipe => corps.has_discovery_candidate(),
            Trigger::FoodAndHealthBelow { food, health } => {
                ledger.food < food && campaign.health < health
            }
            Trigger::AfterDay(day) => campaign.day > day,
            Trigger::FoodAndMoraleBelow { food, morale } => {
                ledger.food < food && campaign.morale < morale
            }
        }
    }
}

/// Run once the trigger holds and the event has not fired yet. A failed
/// arm leaves the event unfired, free to try again another day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArmStep {
    None,
    /// One probability roll.
    Chance(f64),
    /// The 20% counter-intelligence roll; on success the exposed
    /// conspirator is pinned on the corps for the resolution choices.
    DiscoverConspirator,
}

/// Everything a choice may do to the campaign. Closed set: an effect that
/// is not listed here cannot be authored at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    Morale(f64),
    Food(f64),
    Health(f64),
    /// Applied to one uniformly chosen manned division, floored at zero.
    Soldiers(i32),
    Axis(CharacterAxis, f64),
    CiviliansSaved(u32),
    SuppressRebellion,
    PeaceNegotiation,
    /// Takes the given fraction of food, ammunition and fuel stocks.
    ResourceTithe(f64),
    LoyaltyAll(i32),
    /// Lifts the least loyal advisor up to the given floor.
    RaiseLowestLoyaltyTo(i32),
    ArrestLeastLoyal,
    ArrestConspirators,
    RecruitConspirator { chance: f64 },
    IgnoreConspiracy,
    FoodGamble { chance: f64, amount: f64 },
    DefectorGamble { chance: f64, soldiers: i32 },
    EnemyRout { chance: f64, losses: u32 },
}

#[derive(Debug, Clone)]
pub struct EventChoice {
    pub text: String,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone)]
pub struct EventDef {
    pub name: String,
    pub description: String,
    pub trigger: Trigger,
    pub arm: ArmStep,
    pub choices: Vec<EventChoice>,
}

#[derive(Debug)]
pub enum CatalogError {
    Validation(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Validation(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Resource: the fixed, ordered catalog of one-shot narrative events.
#[derive(Resource, Debug, Clone, Default)]
pub struct EventCatalog {
    pub events: Vec<EventDef>,
}

impl EventCatalog {
    pub fn get(&self, name: &str) -> Option<&EventDef> {
        self.events.iter().find(|e| e.name == name)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut names = HashSet::new();
        for event in &self.events {
            if event.name.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "event name cannot be empty".to_string(),
                ));
            }
            if !names.insert(event.name.clone()) {
                return Err(CatalogError::Validation(format!(
                    "duplicate event name {}",
                    event.name
                )));
            }
            if event.description.trim().is_empty() {
                return Err(CatalogError::Validation(format!(
                    "event {} missing description",
                    event.name
                )));
            }
            if !(2..=4).contains(&event.choices.len()) {
                return Err(CatalogError::Validation(format!(
                    "event {} must offer 2 to 4 choices",
                    event.name
                )));
            }
        }
        Ok(())
    }
}

/// Resource: the event surfaced to the player and awaiting a decision.
#[derive(Resource, Debug, Default, Clone)]
pub struct PendingEvent(pub Option<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    InvalidChoice,
    NoPendingEvent,
}

impl fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceError::InvalidChoice => write!(f, "choice index is out of range"),
            ChoiceError::NoPendingEvent => write!(f, "no such event is awaiting a decision"),
        }
    }
}

impl std::error::Error for ChoiceError {}

/// Walks the catalog in declared order and fires the first event that has
/// never fired, whose predicate holds, and whose arm step succeeds.
/// Firing is recorded immediately, so the event can never retrigger.
pub fn select_daily_event<'a>(
    catalog: &'a EventCatalog,
    campaign: &mut CampaignState,
    ledger: &ResourceLedger,
    corps: &mut AdvisorCorps,
    rng: &mut SimRng,
) -> Option<&'a EventDef> {
    for event in &catalog.events {
        if campaign.has_fired(&event.name) {
            continue;
        }
        if !event.trigger.eval(campaign, ledger, corps) {
            continue;
        }
        let armed = match event.arm {
            ArmStep::None => true,
            ArmStep::Chance(probability) => rng.chance(probability),
            ArmStep::DiscoverConspirator => match corps.discover_conspiracy(rng) {
                Some(id) => {
                    corps.pending_discovery = Some(id);
                    true
                }
                None => false,
            },
        };
        if !armed {
            continue;
        }
        campaign.mark_fired(&event.name);
        return Some(event);
    }
    None
}

/// Applies one choice of a fired event. Bounds-checked: an out-of-range
/// index reports `InvalidChoice` and applies nothing.
pub fn apply_event_choice(
    event: &EventDef,
    choice_index: usize,
    campaign: &mut CampaignState,
    ledger: &mut ResourceLedger,
    corps: &mut AdvisorCorps,
    military: &mut MilitaryCommand,
    rng: &mut SimRng,
) -> Result<String, ChoiceError> {
    let choice = event
        .choices
        .get(choice_index)
        .ok_or(ChoiceError::InvalidChoice)?;

    for effect in &choice.effects {
        apply_effect(*effect, campaign, ledger, corps, military, rng);
    }
    corps.pending_discovery = None;

    Ok(format!("Принято решение: {}", choice.text))
}

fn apply_effect(
    effect: Effect,
    campaign: &mut CampaignState,
    ledger: &mut ResourceLedger,
    corps: &mut AdvisorCorps,
    military: &mut MilitaryCommand,
    rng: &mut SimRng,
) {
    match effect {
        Effect::Morale(change) => campaign.adjust_morale(change),
        Effect::Food(change) => ledger.food = (ledger.food + change).max(0.0),
        Effect::Health(change) => campaign.adjust_health(change),
        Effect::Soldiers(delta) => {
            if let Some(name) = military.apply_soldier_delta(delta, rng) {
                if delta < 0 {
                    campaign.add_news(format!("{} теряет {} солдат", name, -delta));
                } else {
                    campaign.add_news(format!("{} получает {} солдат", name, delta));
                }
            }
        }
        Effect::Axis(axis, change) => campaign.adjust_axis(axis, change),
        Effect::CiviliansSaved(count) => campaign.civilians_saved += count,
        Effect::SuppressRebellion => campaign.suppressed_rebellions += 1,
        Effect::PeaceNegotiation => campaign.peace_negotiations += 1,
        Effect::ResourceTithe(fraction) => {
            let keep = (1.0 - fraction).clamp(0.0, 1.0);
            ledger.food *= keep;
            ledger.ammunition *= keep;
            ledger.fuel *= keep;
        }
        Effect::LoyaltyAll(change) => {
            let ids: Vec<_> = corps.iter_active().map(|a| a.id).collect();
            for id in ids {
                if let Some(advisor) = corps.get_mut(id) {
                    advisor.adjust_loyalty(change);
                }
            }
        }
        Effect::RaiseLowestLoyaltyTo(floor) => {
            if let Some(id) = corps.least_loyal_active() {
                if let Some(advisor) = corps.get_mut(id) {
                    advisor.loyalty = advisor.loyalty.max(floor).clamp(0, 100);
                }
            }
        }
        Effect::ArrestLeastLoyal => {
            if let Some(id) = corps.least_loyal_active() {
                if let Some(name) = corps.arrest(id) {
                    campaign.executed_advisors += 1;
                    campaign.add_news(format!("Министр {} арестован!", name));
                }
            }
        }
        Effect::ArrestConspirators => {
            if let Some(id) = corps.pending_discovery {
                if let Some(name) = corps.arrest(id) {
                    campaign.executed_advisors += 1;
                    campaign.add_news(format!("Министр {} арестован за заговор!", name));
                }
            }
        }
        Effect::RecruitConspirator { chance } => {
            if let Some(id) = corps.pending_discovery {
                if rng.chance(chance) {
                    if let Some(name) = corps.re_recruit(id) {
                        campaign.add_news(format!("Министр {} перевербован!", name));
                    }
                }
            }
        }
        Effect::IgnoreConspiracy => {
            if let Some(id) = corps.pending_discovery {
                corps.mark_ignored(id);
            }
        }
        Effect::FoodGamble { chance, amount } => {
            if rng.chance(chance) {
                ledger.food += amount;
                campaign.add_news(format!("Экспедиция вернулась с {} ед. еды", amount as i64));
            } else {
                campaign.add_news("Экспедиция вернулась ни с чем".to_string());
            }
        }
        Effect::DefectorGamble { chance, soldiers } => {
            if rng.chance(chance) {
                if let Some(name) = military.apply_soldier_delta(soldiers, rng) {
                    campaign.add_news(format!("{} пополнена перебежчиками", name));
                }
            }
        }
        Effect::EnemyRout { chance, losses } => {
            if rng.chance(chance) {
                military.enemy_force = military.enemy_force.saturating_sub(losses);
                campaign.add_news(format!("Противник потерял {} солдат", losses));
            }
        }
    }
}
