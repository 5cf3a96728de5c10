use crate::simulation::advisors::{AdvisorCorps, AdvisorFaction, Ministry};
use crate::simulation::buildings::{BuildingCategory, BuildingRegistry, ProductionRole};
use crate::simulation::military::{DivisionKind, MilitaryCommand};

/// The settlement's structures at campaign start.
pub fn starting_buildings() -> BuildingRegistry {
    let mut registry = BuildingRegistry::default();

    registry.add("Рейхстаг", BuildingCategory::Government, None, 2);
    registry.add(
        "Завод продуктов",
        BuildingCategory::FoodProduction,
        Some(ProductionRole::FoodFactory),
        1,
    );
    registry.add(
        "Пекарня",
        BuildingCategory::FoodProduction,
        Some(ProductionRole::Bakery),
        2,
    );
    registry.add(
        "Подземная фабрика",
        BuildingCategory::MilitaryProduction,
        Some(ProductionRole::UndergroundFactory),
        1,
    );
    registry.add(
        "Электростанция",
        BuildingCategory::Power,
        Some(ProductionRole::PowerPlant),
        1,
    );
    registry.add(
        "Котельная",
        BuildingCategory::Fuel,
        Some(ProductionRole::BoilerHouse),
        1,
    );
    registry.add("Больница", BuildingCategory::Health, None, 1);
    registry.add("Пожарная часть", BuildingCategory::Safety, None, 1);
    registry.add("Церковь Св. Николая", BuildingCategory::Morale, None, 1);
    registry.add("АЗС", BuildingCategory::Fuel, None, 1);
    registry.add("Церковь Покрова", BuildingCategory::Morale, None, 1);
    registry.add("Отделение СС", BuildingCategory::Military, None, 1);

    registry
}

/// The council at campaign start. Ministries are fixed here rather than
/// derived from the position text.
pub fn starting_advisors() -> AdvisorCorps {
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
        "Сергей Демиденко",
        "Культура, спорт",
        Ministry::General,
        &[("Пропаганда", 7), ("Администрация", 6), ("Боевая_подготовка", 5)],
        85,
        AdvisorFaction::Fanatics,
    );
    corps.add(
        "Титаев Всеволод",
        "Оборона, экономика",
        Ministry::General,
        &[("Экономика", 8), ("Боевая_подготовка", 9), ("Администрация", 7)],
        90,
        AdvisorFaction::Pragmatists,
    );
    corps.add(
        "Платон Литвинчук",
        "Пропаганда, юстиция",
        Ministry::Propaganda,
        &[("Пропаганда", 10), ("Администрация", 6), ("Дипломатия", 4)],
        95,
        AdvisorFaction::Fanatics,
    );
    corps.add(
        "Александр Новченко",
        "МИД, церковь",
        Ministry::General,
        &[("Дипломатия", 7), ("Пропаганда", 6), ("Администрация", 5)],
        80,
        AdvisorFaction::Fanatics,
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
        "Александр Петров",
        "С/х, строительство",
        Ministry::Agriculture,
        &[("Экономика", 7), ("Администрация", 6), ("Логистика", 5)],
        88,
        AdvisorFaction::Pragmatists,
    );
    corps.add(
        "Алексей Портнов",
        "Здравоохранение",
        Ministry::General,
        &[("Медицина", 8), ("Администрация", 6), ("Логистика", 4)],
        82,
        AdvisorFaction::Fanatics,
    );
    corps.add(
        "Стас Ярушин",
        "МВД",
        Ministry::General,
        &[("Боевая_подготовка", 7), ("Администрация", 6), ("Пропаганда", 5)],
        70,
        AdvisorFaction::Apolitical,
    );
    corps.add(
        "Максим Старый",
        "Промышленность",
        Ministry::Industry,
        &[("Экономика", 6), ("Логистика", 5), ("Администрация", 4)],
        65,
        AdvisorFaction::Pragmatists,
    );
    corps.add(
        "Альберт Каспрак",
        "СС",
        Ministry::General,
        &[("Боевая_подготовка", 10), ("Администрация", 7), ("Пропаганда", 6)],
        100,
        AdvisorFaction::Fanatics,
    );
    corps.add(
        "Ислам Зам",
        "Моторизованная СС",
        Ministry::General,
        &[("Боевая_подготовка", 8), ("Логистика", 7), ("Администрация", 5)],
        78,
        AdvisorFaction::Pragmatists,
    );
    corps.add(
        "Николас Кейдж",
        "Пехота СС",
        Ministry::General,
        &[("Боевая_подготовка", 7), ("Пропаганда", 5), ("Администрация", 4)],
        72,
        AdvisorFaction::Apolitical,
    );
    corps.add(
        "Марк Волков",
        "Губернатор",
        Ministry::General,
        &[("Администрация", 7), ("Экономика", 6), ("Пропаганда", 5)],
        85,
        AdvisorFaction::Fanatics,
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

/// The garrison and the besieging force at campaign start.
pub fn starting_military() -> MilitaryCommand {
    let mut command = MilitaryCommand::default();
    command.enemy_force = 5_000;
    command.patrols_today = 2;

    command.add("1-я пехотная СС", "Альберт Каспрак", DivisionKind::Infantry, 150, 80.0, 90.0, 85.0);
    command.add("2-я пехотная СС", "Николас Кейдж", DivisionKind::Infantry, 150, 70.0, 75.0, 80.0);
    command.add("3-я моторизованная СС", "Ислам Зам", DivisionKind::Motorized, 140, 75.0, 80.0, 75.0);
    command.add("1-я пехотная Вермахт", "Сергей Демиденко", DivisionKind::Infantry, 150, 60.0, 70.0, 70.0);
    command.add("2-я пехотная Вермахт", "Титаев Всеволод", DivisionKind::Infantry, 150, 65.0, 75.0, 72.0);
    command.add("3-я пехотная Вермахт", "Александр Новченко", DivisionKind::Infantry, 150, 55.0, 65.0, 68.0);
    command.add("4-я пехотная Вермахт", "Стас Ярушин", DivisionKind::Infantry, 150, 58.0, 68.0, 65.0);
    command.add("5-я пехотная Вермахт", "Максим Старый", DivisionKind::Infantry, 150, 50.0, 60.0, 60.0);

    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rosters_are_fully_indexed() {
        let buildings = starting_buildings();
        assert_eq!(buildings.iter().count(), 12);
        assert!(buildings.get_by_name("Пекарня").is_some());

        let corps = starting_advisors();
        assert_eq!(corps.iter().count(), 15);
        assert!(corps.get_by_name("Макар Лысенко").is_some());

        let command = starting_military();
        assert_eq!(command.iter().count(), 8);
        assert_eq!(command.total_soldiers(), 1_190);
        assert_eq!(command.motorized_count(), 1);
    }

    #[test]
    fn day_one_production_levels_match_the_founding_economy() {
        let buildings = starting_buildings();
        let levels = buildings.production_levels();
        assert_eq!(levels.food_factory, 1);
        assert_eq!(levels.bakery, 2);
        assert_eq!(levels.underground_factory, 1);
        assert_eq!(levels.power_plant, 1);
        assert_eq!(levels.boiler_house, 1);
    }

    #[test]
    fn only_the_three_staffed_ministries_shift_efficiency() {
        let corps = starting_advisors();
        let efficiency = corps.efficiency_by_category();
        assert!(efficiency.agriculture != 1.0);
        assert!(efficiency.industry != 1.0);
        assert!(efficiency.propaganda != 1.0);
        assert_eq!(efficiency.resources, 1.0);
    }
}
