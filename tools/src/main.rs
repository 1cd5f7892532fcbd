//! game-runner: headless scripted playthrough of the Bretton Woods game.
//!
//! Usage:
//!   game-runner --seed 12345
//!   game-runner --seed 12345 --db run.db --data game-data.json

use anyhow::Result;
use bretton_core::{
    broadcast::LogBroadcaster,
    command::{Caller, GameCommand},
    config::GameData,
    country::Country,
    engine::GameEngine,
    policy::PolicyDraft,
    session::{GamePhase, PHASE2_FINAL_YEAR, PHASE2_START_YEAR},
    store::SessionStore,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_path = args
        .windows(2)
        .find(|w| w[0] == "--data")
        .map(|w| w[1].as_str());

    println!("Bretton Woods 1946 — game-runner");
    println!("  seed: {seed}");
    println!("  db:   {db}");
    println!();

    let store = if db == ":memory:" {
        SessionStore::in_memory()?
    } else {
        SessionStore::open(db)?
    };
    store.migrate()?;

    let data = match data_path {
        Some(path) => GameData::load(Path::new(path))?,
        None => GameData::builtin()?,
    };

    let engine = GameEngine::new(store, data, seed)
        .with_broadcaster(Box::new(LogBroadcaster));

    let session = engine.create_session("Conference of 1946", None)?;
    let session_id = session.id.clone();
    let admin = Caller::Admin;

    // Seat a full table: one scripted delegate per country.
    let delegates: Vec<(Caller, Country)> = Country::ALL
        .iter()
        .enumerate()
        .map(|(i, &country)| {
            (
                Caller::Player {
                    player_id: format!("delegate-{}", i + 1),
                },
                country,
            )
        })
        .collect();

    for (caller, country) in &delegates {
        engine.apply(
            &session_id,
            caller,
            GameCommand::JoinGame { country: *country },
        )?;
    }

    engine.apply(&session_id, &admin, GameCommand::StartGame)?;

    // Phase 1: ten rounds of scripted votes. The rotation produces a mix
    // of unanimous and split rounds.
    for round in 1..=10u32 {
        for (i, (caller, _)) in delegates.iter().enumerate() {
            let choice = ["a", "b", "c"][(i + round as usize) % 3];
            engine.apply(
                &session_id,
                caller,
                GameCommand::CastVote {
                    choice: choice.to_string(),
                },
            )?;
        }
        engine.apply(&session_id, &admin, GameCommand::AdvanceRound)?;
    }

    // Phase 2: submit policies and advance year by year until the books
    // close. USSR runs a command economy throughout; China switches to one
    // on its own in 1949, so its delegate submits command drafts from then.
    loop {
        let state = engine.session(&session_id)?;
        if state.phase == GamePhase::Complete {
            break;
        }
        let year = state.phase2.current_year;

        if year < PHASE2_FINAL_YEAR {
            for (caller, country) in &delegates {
                let draft = scripted_draft(*country, year);
                engine.apply(
                    &session_id,
                    caller,
                    GameCommand::SubmitPolicy { policy: draft },
                )?;
            }
        }

        if year == 1948 {
            // Two deployments into the same conflict zone.
            for (caller, country) in &delegates {
                if matches!(*country, Country::Usa | Country::Ussr) {
                    engine.apply(
                        &session_id,
                        caller,
                        GameCommand::DeployTroops {
                            country: *country,
                            region: "Eastern Europe".to_string(),
                            troops: 150_000,
                        },
                    )?;
                }
            }
        }

        engine.apply(&session_id, &admin, GameCommand::AdvanceYear)?;
    }

    print_summary(&engine, &session_id)?;
    Ok(())
}

fn scripted_draft(country: Country, year: i32) -> PolicyDraft {
    let command_economy =
        country == Country::Ussr || (country == Country::China && year >= 1949);
    if command_economy {
        PolicyDraft::Command {
            five_year_plan_target: Some(12.0),
            heavy_industry_allocation: Some(65.0),
            foreign_trade_orientation: Some(25.0),
            plan_fulfillment_priority: Some(85.0),
            military_spending: Some(14.0),
            military_size: Some(4_000_000),
        }
    } else {
        // Mild variation so the cross-country stages have something to do.
        let spread = (year - PHASE2_START_YEAR) as f64;
        PolicyDraft::Market {
            central_bank_rate: Some(2.5 + 0.25 * spread),
            exchange_rate: Some(1.0),
            tariff_rate: Some(12.0),
            military_spending: Some(if country == Country::Usa { 9.0 } else { 5.0 }),
            military_size: Some(if country == Country::Usa {
                1_500_000
            } else {
                400_000
            }),
        }
    }
}

fn print_summary(engine: &GameEngine, session_id: &str) -> Result<()> {
    let session = engine.session(session_id)?;

    println!();
    println!("=== FINAL SCORES ===");
    let mut scores: Vec<_> = session.scores.iter().collect();
    scores.sort_by(|a, b| b.1.cmp(a.1));
    for (country, score) in scores {
        println!("  {country:<9} {score:>5}");
    }

    println!();
    println!("=== PHASE 2 BREAKDOWNS ===");
    for (country, b) in &session.phase2.score_breakdowns {
        println!(
            "  {country:<9} gdp {:>4} | infl {:>3} | unemp {:>3} | trade {:>3} | stab {:>3} | bretton {:>3} | total {:>4}",
            b.gdp, b.inflation, b.unemployment, b.trade, b.stability, b.bretton_woods,
            b.total()
        );
    }

    println!();
    println!("=== USA TRAJECTORY ===");
    for (year, snapshots) in &session.phase2.yearly_data {
        if let Some(s) = snapshots.get(&Country::Usa) {
            println!(
                "  {year} | gdp {:>5.1}% | infl {:>4.1}% | unemp {:>4.1}% | trade {:>7.0} | gold {:>7.0}",
                s.gdp_growth, s.inflation, s.unemployment, s.trade_balance, s.gold_reserves
            );
        }
    }

    if !session.phase2.conflicts.is_empty() {
        println!();
        println!("=== CONFLICTS ===");
        for c in &session.phase2.conflicts {
            let names: Vec<String> = c.countries.iter().map(|c| c.to_string()).collect();
            println!("  {} ({}): {}", c.region, c.year, names.join(", "));
        }
    }

    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
