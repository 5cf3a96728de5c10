use crate::simulation::campaign::CharacterAxis;
use crate::simulation::events::{ArmStep, Effect, EventCatalog, EventChoice, EventDef, Trigger};

fn choice(text: &str, effects: Vec<Effect>) -> EventChoice {
    EventChoice {
        text: text.to_string(),
        effects,
    }
}

/// The campaign's narrative deck, in evaluation order. Each entry fires
/// at most once per campaign.
pub fn standard_event_catalog() -> EventCatalog {
    let events = vec![
        EventDef {
            name: "Голод".to_string(),
            description: "Запасы продовольствия критически низки. Народ начинает голодать."
                .to_string(),
            trigger: Trigger::FoodBelow(100.0),
            arm: ArmStep::None,
            choices: vec![
                choice(
                    "Ввести карточную систему",
                    vec![Effect::Morale(-20.0), Effect::Axis(CharacterAxis::Pragmatism, 10.0)],
                ),
                choice(
                    "Отправить экспедицию за едой",
                    vec![
                        Effect::Soldiers(-100),
                        Effect::FoodGamble { chance: 0.6, amount: 500.0 },
                    ],
                ),
                choice(
                    "Конфисковать еду у богатых",
                    vec![
                        Effect::Morale(-30.0),
                        Effect::Food(300.0),
                        Effect::Axis(CharacterAxis::EliteMorale, -20.0),
                    ],
                ),
            ],
        },
        EventDef {
            name: "Измена".to_string(),
            description: "Один из министров проявляет признаки нелояльности.".to_string(),
            trigger: Trigger::AnyLoyaltyBelow(30),
            arm: ArmStep::None,
            choices: vec![
                choice(
                    "Арестовать министра",
                    vec![Effect::Morale(-20.0), Effect::ArrestLeastLoyal],
                ),
                choice("Простить и дать шанс", vec![Effect::LoyaltyAll(10)]),
                choice(
                    "Предложить сделку",
                    vec![Effect::ResourceTithe(0.2), Effect::RaiseLowestLoyaltyTo(50)],
                ),
            ],
        },
        EventDef {
            name: "Обнаружение заговора".to_string(),
            description: "Разведка докладывает о возможном заговоре среди министров.".to_string(),
            trigger: Trigger::ConspiracyRipe,
            arm: ArmStep::DiscoverConspirator,
            choices: vec![
                choice(
                    "Арестовать заговорщиков",
                    vec![
                        Effect::Morale(-15.0),
                        Effect::Axis(CharacterAxis::Prestige, 10.0),
                        Effect::ArrestConspirators,
                    ],
                ),
                choice(
                    "Перевербовать заговорщиков",
                    vec![
                        Effect::ResourceTithe(0.3),
                        Effect::RecruitConspirator { chance: 0.7 },
                    ],
                ),
                choice(
                    "Инсценировать ловушку для врага",
                    vec![Effect::EnemyRout { chance: 0.5, losses: 500 }],
                ),
                choice("Проигнорировать", vec![Effect::IgnoreConspiracy]),
            ],
        },
        EventDef {
            name: "Голодные дети в больнице".to_string(),
            description: "Дети в больнице умирают от голода. Врачи просят дополнительные пайки \
                          для спасения жизней."
                .to_string(),
            trigger: Trigger::FoodAndHealthBelow { food: 300.0, health: 60.0 },
            arm: ArmStep::None,
            choices: vec![
                choice(
                    "Отдать детские пайки",
                    vec![
                        Effect::Food(-50.0),
                        Effect::Morale(10.0),
                        Effect::Health(-15.0),
                        Effect::Axis(CharacterAxis::Humanism, 20.0),
                        Effect::CiviliansSaved(400),
                    ],
                ),
                choice(
                    "Оставить как есть",
                    vec![Effect::Morale(-20.0), Effect::Axis(CharacterAxis::Cruelty, 15.0)],
                ),
                choice(
                    "Конфисковать еду у богатых",
                    vec![
                        Effect::Morale(-30.0),
                        Effect::Food(100.0),
                        Effect::Axis(CharacterAxis::EliteMorale, -40.0),
                        Effect::Axis(CharacterAxis::Pragmatism, 10.0),
                    ],
                ),
            ],
        },
        EventDef {
            name: "Пленный командир врага".to_string(),
            description: "Взят в плен бывший друг детства правителя. Он предлагает \
                          сотрудничество."
                .to_string(),
            trigger: Trigger::AfterDay(10),
            arm: ArmStep::Chance(0.3),
            choices: vec![
                choice(
                    "Казнить как предателя",
                    vec![
                        Effect::Axis(CharacterAxis::EliteMorale, -15.0),
                        Effect::Axis(CharacterAxis::Cruelty, 25.0),
                        Effect::Axis(CharacterAxis::Ideology, 15.0),
                    ],
                ),
                choice(
                    "Предложить перейти на свою сторону",
                    vec![
                        Effect::Axis(CharacterAxis::Pragmatism, 20.0),
                        Effect::DefectorGamble { chance: 0.4, soldiers: 100 },
                    ],
                ),
                choice(
                    "Обменять на своих солдат",
                    vec![
                        Effect::Soldiers(50),
                        Effect::Axis(CharacterAxis::Prestige, -20.0),
                        Effect::Axis(CharacterAxis::Humanism, 25.0),
                        Effect::PeaceNegotiation,
                    ],
                ),
            ],
        },
        EventDef {
            name: "Саботаж на фабрике".to_string(),
            description: "Рабочие саботируют производство из-за голодных условий труда."
                .to_string(),
            trigger: Trigger::FoodAndMoraleBelow { food: 200.0, morale: 40.0 },
            arm: ArmStep::None,
            choices: vec![
                choice(
                    "Жестоко наказать зачинщиков",
                    vec![
                        Effect::Morale(-20.0),
                        Effect::Axis(CharacterAxis::Cruelty, 30.0),
                        Effect::SuppressRebellion,
                    ],
                ),
                choice(
                    "Улучшить пайки рабочим",
                    vec![
                        Effect::Food(-100.0),
                        Effect::Morale(15.0),
                        Effect::Axis(CharacterAxis::Humanism, 20.0),
                    ],
                ),
                choice(
                    "Найти компромисс",
                    vec![
                        Effect::Food(-10.0),
                        Effect::Morale(5.0),
                        Effect::Axis(CharacterAxis::Pragmatism, 15.0),
                        Effect::PeaceNegotiation,
                    ],
                ),
            ],
        },
    ];

    EventCatalog { events }
}
