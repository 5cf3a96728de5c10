use std::collections::HashMap;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::rng::SimRng;

const LOW_LOYALTY_THRESHOLD: i32 = 50;
const CONSPIRACY_PROMOTION_LEVEL: i32 = 70;
const DISCOVERY_LEVEL: i32 = 80;
const DISCOVERY_CHANCE: f64 = 0.2;
const MEETING_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvisorId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisorFaction {
    Fanatics,
    Pragmatists,
    Apolitical,
    Reformists,
}

impl AdvisorFaction {
    /// The ruling faction never conspires against itself.
    pub fn is_ruling(self) -> bool {
        matches!(self, AdvisorFaction::Fanatics)
    }

    pub fn non_ruling() -> [AdvisorFaction; 3] {
        [
            AdvisorFaction::Pragmatists,
            AdvisorFaction::Apolitical,
            AdvisorFaction::Reformists,
        ]
    }
}

/// Which economic category an advisor's office feeds, fixed at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ministry {
    Agriculture,
    Industry,
    Resources,
    Propaganda,
    General,
}

/// Per-category efficiency multipliers. Buckets start at 1.0 and each
/// matching advisor's efficiency is multiplied in, so an unstaffed
/// category is merely neutral while a staffed one compounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryEfficiency {
    pub agriculture: f64,
    pub industry: f64,
    pub resources: f64,
    pub propaganda: f64,
}

impl Default for CategoryEfficiency {
    fn default() -> Self {
        Self {
            agriculture: 1.0,
            industry: 1.0,
            resources: 1.0,
            propaganda: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Advisor {
    pub id: AdvisorId,
    pub name: String,
    pub position: String,
    pub ministry: Ministry,
    pub skills: HashMap<String, i32>,
    pub loyalty: i32,
    pub faction: AdvisorFaction,
    pub conspiracy_level: i32,
    pub is_conspirator: bool,
    pub is_traitor: bool,
    pub is_arrested: bool,
}

impl Advisor {
    /// Mean skill scaled by loyalty. Recomputed on every use.
    pub fn efficiency(&self) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        let mean =
            self.skills.values().map(|v| *v as f64).sum::<f64>() / self.skills.len() as f64;
        mean * (self.loyalty as f64 / 100.0)
    }

    pub fn adjust_loyalty(&mut self, change: i32) {
        self.loyalty = (self.loyalty + change).clamp(0, 100);
    }

    pub fn raise_conspiracy(&mut self, amount: i32) {
        self.conspiracy_level = (self.conspiracy_level + amount).clamp(0, 100);
    }

    /// Arrested advisors are out of play: no efficiency, no intrigue.
    pub fn is_active(&self) -> bool {
        !self.is_arrested
    }
}

/// Resource: the settlement's council of advisors.
#[derive(Resource, Debug, Clone, Default)]
pub struct AdvisorCorps {
    advisors: Vec<Advisor>,
    by_name: HashMap<String, AdvisorId>,
    /// Conspirator pinned by the most recent discovery, consumed by the
    /// event system's resolution choices.
    pub pending_discovery: Option<AdvisorId>,
}

impl AdvisorCorps {
    pub fn add(
        &mut self,
        name: &str,
        position: &str,
        ministry: Ministry,
        skills: &[(&str, i32)],
        loyalty: i32,
        faction: AdvisorFaction,
    ) -> AdvisorId {
        let id = AdvisorId(self.advisors.len() as u32);
        self.advisors.push(Advisor {
            id,
            name: name.to_string(),
            position: position.to_string(),
            ministry,
            skills: skills
                .iter()
                .map(|(skill, level)| (skill.to_string(), *level))
                .collect(),
            loyalty,
            faction,
            conspiracy_level: 0,
            is_conspirator: false,
            is_traitor: false,
            is_arrested: false,
        });
        self.by_name.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, id: AdvisorId) -> Option<&Advisor> {
        self.advisors.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: AdvisorId) -> Option<&mut Advisor> {
        self.advisors.get_mut(id.0 as usize)
    }

    pub fn id_of(&self, name: &str) -> Option<AdvisorId> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Advisor> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Advisor> {
        self.advisors.iter()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Advisor> {
        self.advisors.iter().filter(|a| a.is_active())
    }

    pub fn efficiency_by_category(&self) -> CategoryEfficiency {
        let mut efficiency = CategoryEfficiency::default();
        for advisor in self.iter_active() {
            let value = advisor.efficiency();
            match advisor.ministry {
                Ministry::Agriculture => efficiency.agriculture *= value,
                Ministry::Industry => efficiency.industry *= value,
                Ministry::Resources => efficiency.resources *= value,
                Ministry::Propaganda => efficiency.propaganda *= value,
                Ministry::General => {}
            }
        }
        efficiency
    }

    /// Daily conspiracy pass. A non-ruling faction with at least two
    /// disloyal members radicalizes: every disloyal member gains 5..=15
    /// conspiracy, conspirators occasionally meet (news only), and
    /// crossing 70 turns a member into an active conspirator.
    /// Returns the day's news entries.
    pub fn run_daily_conspiracies(&mut self, rng: &mut SimRng) -> Vec<String> {
        let mut news = Vec::new();

        for faction in AdvisorFaction::non_ruling() {
            let members: Vec<usize> = self
                .advisors
                .iter()
                .enumerate()
                .filter(|(_, a)| a.faction == faction && a.is_active())
                .map(|(index, _)| index)
                .collect();

            let disloyal = members
                .iter()
                .filter(|&&index| self.advisors[index].loyalty < LOW_LOYALTY_THRESHOLD)
                .count();
            if disloyal < 2 {
                continue;
            }

            for &index in &members {
                if self.advisors[index].loyalty >= LOW_LOYALTY_THRESHOLD {
                    continue;
                }

                let gain = rng.roll_range(5, 15);
                self.advisors[index].raise_conspiracy(gain);

                if rng.chance(MEETING_CHANCE) && self.advisors[index].conspiracy_level > 20 {
                    let partners: Vec<usize> = members
                        .iter()
                        .copied()
                        .filter(|&other| {
                            other != index && self.advisors[other].conspiracy_level > 10
                        })
                        .collect();
                    if !partners.is_empty() {
                        let partner = partners[rng.pick_index(partners.len())];
                        news.push(format!(
                            "Министр {} встретился с министром {}",
                            self.advisors[index].name, self.advisors[partner].name
                        ));
                    }
                }

                if self.advisors[index].conspiracy_level > CONSPIRACY_PROMOTION_LEVEL
                    && !self.advisors[index].is_conspirator
                {
                    self.advisors[index].is_conspirator = true;
                    log::info!(
                        "advisor {} has become a conspirator",
                        self.advisors[index].name
                    );
                }
            }
        }

        news
    }

    /// True when the intelligence event could plausibly fire: some active
    /// conspirator is deep enough to be caught. Pure; the roll itself
    /// happens in `discover_conspiracy`.
    pub fn has_discovery_candidate(&self) -> bool {
        self.iter_active()
            .any(|a| a.is_conspirator && a.conspiracy_level > DISCOVERY_LEVEL)
    }

    /// One 20% discovery roll over the exposed conspirators. Consumes no
    /// randomness when there is no candidate.
    pub fn discover_conspiracy(&mut self, rng: &mut SimRng) -> Option<AdvisorId> {
        let candidates: Vec<AdvisorId> = self
            .iter_active()
            .filter(|a| a.is_conspirator && a.conspiracy_level > DISCOVERY_LEVEL)
            .map(|a| a.id)
            .collect();
        if candidates.is_empty() || !rng.chance(DISCOVERY_CHANCE) {
            return None;
        }
        Some(candidates[rng.pick_index(candidates.len())])
    }

    /// Removes the advisor from play permanently.
    pub fn arrest(&mut self, id: AdvisorId) -> Option<String> {
        let advisor = self.get_mut(id)?;
        advisor.loyalty = 0;
        advisor.conspiracy_level = 0;
        advisor.is_conspirator = false;
        advisor.is_arrested = true;
        Some(advisor.name.clone())
    }

    /// Turns a discovered conspirator back into a loyal advisor.
    pub fn re_recruit(&mut self, id: AdvisorId) -> Option<String> {
        let advisor = self.get_mut(id)?;
        advisor.loyalty = 80;
        advisor.conspiracy_level = 0;
        advisor.is_conspirator = false;
        Some(advisor.name.clone())
    }

    /// The player looked away: the conspirator is committed for good.
    pub fn mark_ignored(&mut self, id: AdvisorId) {
        if let Some(advisor) = self.get_mut(id) {
            advisor.conspiracy_level = 100;
        }
    }

    pub fn least_loyal_active(&self) -> Option<AdvisorId> {
        self.iter_active().min_by_key(|a| a.loyalty).map(|a| a.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corps() -> AdvisorCorps {
        let mut corps = AdvisorCorps::default();
        corps.add(
            "Макар Лысенко",
            "Рейхсфюрер",
            Ministry::General,
            &[("Администрация", 8), ("Пропаганда", 9), ("Боевая_подготовка", 7)],
            100,
            AdvisorFaction::Fanatics,
        );
        corps.add(
            "Александр Петров",
            "С/х, строительство",
            Ministry::Agriculture,
            &[("Экономика", 7), ("Администрация", 6), ("Логистика", 5)],
            88,
            AdvisorFaction::Pragmatists,
        );
        corps.add(
            "Арсений Ватутин",
            "Логистика, транспорт",
            Ministry::General,
            &[("Логистика", 8), ("Администрация", 6), ("Экономика", 5)],
            75,
            AdvisorFaction::Pragmatists,
        );
        corps.add(
            "Стас Ватутин",
            "Бизнесмен",
            Ministry::General,
            &[("Экономика", 9), ("Логистика", 8), ("Дипломатия", 7)],
            60,
            AdvisorFaction::Reformists,
        );
        corps
    }

    #[test]
    fn efficiency_is_mean_skill_scaled_by_loyalty() {
        let corps = corps();
        let advisor = corps.get_by_name("Александр Петров").unwrap();
        assert!((advisor.efficiency() - 6.0 * 0.88).abs() < 1e-9);
    }

    #[test]
    fn loyalty_and_conspiracy_stay_clamped() {
        let mut corps = corps();
        let id = corps.id_of("Стас Ватутин").unwrap();
        let advisor = corps.get_mut(id).unwrap();
        advisor.adjust_loyalty(-1000);
        assert_eq!(advisor.loyalty, 0);
        advisor.adjust_loyalty(250);
        assert_eq!(advisor.loyalty, 100);
        advisor.raise_conspiracy(500);
        assert_eq!(advisor.conspiracy_level, 100);
        advisor.raise_conspiracy(-500);
        assert_eq!(advisor.conspiracy_level, 0);
    }

    #[test]
    fn unstaffed_category_keeps_neutral_multiplier() {
        let corps = corps();
        let efficiency = corps.efficiency_by_category();
        assert_eq!(efficiency.resources, 1.0);
        assert_eq!(efficiency.propaganda, 1.0);
        assert!((efficiency.agriculture - 6.0 * 0.88).abs() < 1e-9);
    }

    #[test]
    fn staffing_the_resources_ministry_moves_its_bucket() {
        let mut corps = corps();
        corps.add(
            "Геолог",
            "Природные ресурсы",
            Ministry::Resources,
            &[("Экономика", 8)],
            50,
            AdvisorFaction::Apolitical,
        );
        let efficiency = corps.efficiency_by_category();
        assert!((efficiency.resources - 4.0).abs() < 1e-9);
    }

    #[test]
    fn category_multipliers_compound() {
        let mut corps = corps();
        corps.add(
            "Второй агроном",
            "Агроном",
            Ministry::Agriculture,
            &[("Экономика", 10)],
            100,
            AdvisorFaction::Fanatics,
        );
        let efficiency = corps.efficiency_by_category();
        assert!((efficiency.agriculture - 6.0 * 0.88 * 10.0).abs() < 1e-9);
    }

    #[test]
    fn arrested_advisor_stops_contributing() {
        let mut corps = corps();
        let id = corps.id_of("Александр Петров").unwrap();
        corps.arrest(id);
        let efficiency = corps.efficiency_by_category();
        assert_eq!(efficiency.agriculture, 1.0);
    }

    fn make_disloyal(corps: &mut AdvisorCorps, name: &str) {
        let id = corps.id_of(name).unwrap();
        corps.get_mut(id).unwrap().loyalty = 30;
    }

    #[test]
    fn lone_disloyal_member_does_not_conspire() {
        let mut corps = corps();
        make_disloyal(&mut corps, "Стас Ватутин");
        let mut rng = SimRng::from_seed(5);
        corps.run_daily_conspiracies(&mut rng);
        assert_eq!(
            corps.get_by_name("Стас Ватутин").unwrap().conspiracy_level,
            0
        );
    }

    #[test]
    fn disloyal_faction_pair_radicalizes_daily() {
        let mut corps = corps();
        make_disloyal(&mut corps, "Александр Петров");
        make_disloyal(&mut corps, "Арсений Ватутин");
        let mut rng = SimRng::from_seed(5);
        corps.run_daily_conspiracies(&mut rng);
        let first = corps.get_by_name("Александр Петров").unwrap();
        let second = corps.get_by_name("Арсений Ватутин").unwrap();
        assert!((5..=15).contains(&first.conspiracy_level));
        assert!((5..=15).contains(&second.conspiracy_level));
        // The loyal member of the same faction is untouched, as is the
        // lone reformist.
        assert_eq!(corps.get_by_name("Стас Ватутин").unwrap().conspiracy_level, 0);
    }

    #[test]
    fn ruling_faction_never_conspires() {
        let mut corps = corps();
        let id = corps.id_of("Макар Лысенко").unwrap();
        corps.get_mut(id).unwrap().loyalty = 10;
        corps.add(
            "Второй фанатик",
            "Церемониймейстер",
            Ministry::General,
            &[("Пропаганда", 5)],
            10,
            AdvisorFaction::Fanatics,
        );
        let mut rng = SimRng::from_seed(5);
        corps.run_daily_conspiracies(&mut rng);
        assert_eq!(corps.get_by_name("Макар Лысенко").unwrap().conspiracy_level, 0);
    }

    #[test]
    fn crossing_seventy_promotes_to_conspirator() {
        let mut corps = corps();
        make_disloyal(&mut corps, "Александр Петров");
        make_disloyal(&mut corps, "Арсений Ватутин");
        let mut rng = SimRng::from_seed(5);
        for _ in 0..32 {
            corps.run_daily_conspiracies(&mut rng);
        }
        let advisor = corps.get_by_name("Александр Петров").unwrap();
        assert_eq!(advisor.conspiracy_level, 100);
        assert!(advisor.is_conspirator);
    }

    fn plant_conspirator(corps: &mut AdvisorCorps, name: &str, level: i32) {
        let id = corps.id_of(name).unwrap();
        let advisor = corps.get_mut(id).unwrap();
        advisor.conspiracy_level = level;
        advisor.is_conspirator = true;
    }

    #[test]
    fn discovery_requires_deep_conspirators() {
        let mut corps = corps();
        plant_conspirator(&mut corps, "Арсений Ватутин", 75);
        assert!(!corps.has_discovery_candidate());
        let mut rng = SimRng::from_seed(5);
        for _ in 0..64 {
            assert!(corps.discover_conspiracy(&mut rng).is_none());
        }
    }

    #[test]
    fn discovery_eventually_exposes_a_candidate() {
        let mut corps = corps();
        plant_conspirator(&mut corps, "Арсений Ватутин", 90);
        assert!(corps.has_discovery_candidate());
        let mut rng = SimRng::from_seed(5);
        let expected = corps.id_of("Арсений Ватутин").unwrap();
        let mut discovered = None;
        for _ in 0..64 {
            if let Some(id) = corps.discover_conspiracy(&mut rng) {
                discovered = Some(id);
                break;
            }
        }
        assert_eq!(discovered, Some(expected));
    }

    #[test]
    fn arrest_and_re_recruit_transitions() {
        let mut corps = corps();
        plant_conspirator(&mut corps, "Арсений Ватутин", 90);
        let id = corps.id_of("Арсений Ватутин").unwrap();

        corps.re_recruit(id);
        {
            let advisor = corps.get(id).unwrap();
            assert_eq!(advisor.loyalty, 80);
            assert_eq!(advisor.conspiracy_level, 0);
            assert!(!advisor.is_conspirator);
            assert!(advisor.is_active());
        }

        plant_conspirator(&mut corps, "Арсений Ватутин", 90);
        corps.arrest(id);
        let advisor = corps.get(id).unwrap();
        assert_eq!(advisor.loyalty, 0);
        assert!(advisor.is_arrested);
        assert!(!advisor.is_conspirator);
    }

    #[test]
    fn arrested_advisor_gains_no_conspiracy() {
        let mut corps = corps();
        make_disloyal(&mut corps, "Александр Петров");
        make_disloyal(&mut corps, "Арсений Ватутин");
        let arrested = corps.id_of("Александр Петров").unwrap();
        corps.arrest(arrested);
        let mut rng = SimRng::from_seed(5);
        for _ in 0..8 {
            corps.run_daily_conspiracies(&mut rng);
        }
        assert_eq!(corps.get(arrested).unwrap().conspiracy_level, 0);
    }
}
