use std::env;
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use last_bastion::core::world::{DayReport, Game};
use last_bastion::simulation::campaign::{DefeatReason, Outcome, VictoryKind};

fn main() {
    env_logger::init();

    let seed = parse_seed(env::args().collect());
    let mut game = Game::new(seed);

    println!("=== ПОСЛЕДНИЙ РУБЕЖ ===");
    println!("Осада началась. Сид кампании: {}", seed);
    println!("Commands: next | status | resources | buildings | advisors | divisions | news | choose <n> | upgrade <name> | repair <name> | save <path> | load <path> | quit");

    loop {
        print!("> ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            break;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (cmd, rest) = match trimmed.split_once(' ') {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (trimmed.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" => break,
            "next" | "n" => {
                if game.pending_event().is_some() {
                    println!("Сначала примите решение по текущему событию (choose <n>).");
                    continue;
                }
                let report = game.advance_day();
                print_report(&report);
                if report.game_over {
                    print_ending(&report);
                    break;
                }
            }
            "status" => print_status(&game),
            "resources" => print_resources(&game),
            "buildings" => print_buildings(&game),
            "advisors" => print_advisors(&game),
            "divisions" => print_divisions(&game),
            "news" => {
                for entry in &game.campaign().daily_news {
                    println!("  {}", entry);
                }
            }
            "choose" => {
                let Some(event) = game.pending_event() else {
                    println!("Нет события, ожидающего решения.");
                    continue;
                };
                match rest.parse::<usize>() {
                    Ok(number) if number >= 1 => {
                        match game.apply_event_choice(&event.name, number - 1) {
                            Ok(message) => println!("{}", message),
                            Err(err) => println!("Ошибка: {}", err),
                        }
                    }
                    _ => println!("Usage: choose <номер варианта, начиная с 1>"),
                }
            }
            "upgrade" => match game.upgrade_building(rest) {
                Ok(()) => println!("Здание улучшено!"),
                Err(err) => println!("Невозможно улучшить здание: {}", err),
            },
            "repair" => match game.repair_building(rest) {
                Ok(()) => println!("Здание восстановлено!"),
                Err(err) => println!("Невозможно восстановить здание: {}", err),
            },
            "save" => match game.save_to_path(rest) {
                Ok(()) => println!("Игра сохранена: {}", rest),
                Err(err) => println!("Ошибка сохранения: {}", err),
            },
            "load" => match game.load_from_path(rest) {
                Ok(()) => println!("Игра загружена! День {}", game.campaign().day),
                Err(err) => println!("Ошибка загрузки: {}", err),
            },
            _ => println!("Неизвестная команда: {}", cmd),
        }
    }
}

fn parse_seed(args: Vec<String>) -> u64 {
    args.get(1)
        .and_then(|raw| raw.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(1)
        })
}

fn print_report(report: &DayReport) {
    println!("=== ДЕНЬ {} ===", report.day);
    for battle in &report.battles {
        println!("БОЙ: {}", battle.message);
    }
    for entry in &report.news {
        println!("  {}", entry);
    }
    if let Some(event) = &report.event {
        println!("СОБЫТИЕ: {}", event.name);
        println!("{}", event.description);
        for (index, choice) in event.choices.iter().enumerate() {
            println!("  {}. {}", index + 1, choice);
        }
    }
}

fn print_ending(report: &DayReport) {
    match report.outcome {
        Some(Outcome::Victory(kind)) => {
            println!("ПОБЕДА!");
            if kind == VictoryKind::DefenseMiracle {
                println!("Чудо обороны! Город выстоял 45 дней!");
            } else {
                println!("Исход: {:?}", kind);
            }
        }
        Some(Outcome::Defeat(DefeatReason::Uprising)) => {
            println!("ПОРАЖЕНИЕ");
            println!("Народ восстал! Мораль упала до критического уровня.");
        }
        None => {}
    }
    println!("Вы продержались {} дней.", report.day);
}

fn print_status(game: &Game) {
    let campaign = game.campaign();
    println!(
        "День {} | Население: {} | Мораль: {:.0}% | Здоровье: {:.0}%",
        campaign.day, campaign.population, campaign.morale, campaign.health
    );
    println!(
        "Противник: {} солдат | Гарнизон: {} солдат",
        game.military().enemy_force,
        game.military().total_soldiers()
    );
}

fn print_resources(game: &Game) {
    let ledger = game.resources();
    println!(
        "Еда: {:.0} | Боеприпасы: {:.0} | Топливо: {:.0} | Электричество: {:.0}",
        ledger.food, ledger.ammunition, ledger.fuel, ledger.electricity
    );
}

fn print_buildings(game: &Game) {
    for building in game.buildings().iter() {
        let status = if building.destroyed { "разрушено" } else { "работает" };
        println!(
            "{} — ур. {}, эфф. {:.2}, {}",
            building.name, building.level, building.efficiency, status
        );
    }
}

fn print_advisors(game: &Game) {
    for advisor in game.advisors().iter() {
        let mark = if advisor.is_arrested { " [арестован]" } else { "" };
        println!(
            "{} ({}) — лояльность {}, эффективность {:.2}{}",
            advisor.name,
            advisor.position,
            advisor.loyalty,
            advisor.efficiency(),
            mark
        );
    }
}

fn print_divisions(game: &Game) {
    let ledger = game.resources();
    for division in game.military().iter() {
        println!(
            "{} ({}) — {} солдат, мораль {:.0}, атака {:.0}, оборона {:.0}",
            division.name,
            division.commander,
            division.soldiers,
            division.morale,
            division.attack_power(ledger),
            division.defense_power(false)
        );
    }
}
