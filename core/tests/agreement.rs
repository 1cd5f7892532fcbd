//! Agreement Bonus Calculator: cooperation accrual, keyword categories,
//! and idempotence over the round history.

use bretton_core::{
    agreement::{self, AgreementBonus},
    config::GameData,
    country::Country,
    round::{RoundRecord, VoteChoice, VoteTally},
    session::Player,
};
use chrono::Utc;
use std::collections::BTreeMap;

fn player(id: &str, country: Country) -> (String, Player) {
    (
        id.to_string(),
        Player {
            id: id.to_string(),
            country,
            connected: true,
            joined_at: Utc::now(),
        },
    )
}

fn record(round: u32, title: &str, votes: &[(&str, VoteChoice)], winner: VoteChoice) -> RoundRecord {
    let votes: BTreeMap<String, VoteChoice> =
        votes.iter().map(|(id, v)| (id.to_string(), *v)).collect();
    RoundRecord {
        round,
        issue_id: format!("issue-{round}"),
        issue_title: title.to_string(),
        votes: votes.clone(),
        tally: VoteTally::count(votes.values().copied()),
        winning_option: winner,
        round_scores: BTreeMap::new(),
    }
}

#[test]
fn cooperative_voter_accrues_keyword_bonuses() {
    let data = GameData::builtin().unwrap();
    let players: BTreeMap<_, _> = [player("p1", Country::Uk)].into_iter().collect();

    // Two winning votes: a tariff issue (0.4 gdp, 300 trade) and an IMF
    // issue (0 gdp, 200 trade). Cooperation adds 0.3 per winning vote.
    let history = vec![
        record(
            1,
            "Postwar tariff reduction schedule",
            &[("p1", VoteChoice::A)],
            VoteChoice::A,
        ),
        record(
            2,
            "IMF quota formula and voting power",
            &[("p1", VoteChoice::B)],
            VoteChoice::B,
        ),
    ];

    let bonuses = agreement::calculate(&history, &players, &data.agreement_keywords);
    let bonus = &bonuses[&Country::Uk];

    assert!((bonus.gdp_bonus - 1.0).abs() < 1e-9); // 0.4 + 0.3 + 0.3
    assert!((bonus.trade_bonus - 500.0).abs() < 1e-9);
    assert_eq!(bonus.description, "Bretton Woods alignment: cooperative");
}

#[test]
fn dissenting_voter_accrues_isolation_penalty() {
    let data = GameData::builtin().unwrap();
    let players: BTreeMap<_, _> = [player("p1", Country::Argentina)].into_iter().collect();

    let history = vec![
        record(
            1,
            "Postwar tariff reduction schedule",
            &[("p1", VoteChoice::C)],
            VoteChoice::A,
        ),
        record(
            2,
            "IMF quota formula and voting power",
            &[("p1", VoteChoice::C)],
            VoteChoice::A,
        ),
    ];

    let bonuses = agreement::calculate(&history, &players, &data.agreement_keywords);
    let bonus = &bonuses[&Country::Argentina];

    assert!((bonus.gdp_bonus - (-0.2)).abs() < 1e-9);
    assert_eq!(bonus.trade_bonus, 0.0);
    assert_eq!(bonus.description, "Bretton Woods alignment: isolated");
}

#[test]
fn losing_votes_earn_no_keyword_bonus() {
    let data = GameData::builtin().unwrap();
    let players: BTreeMap<_, _> = [player("p1", Country::France)].into_iter().collect();

    // The title matches a category but the player lost the vote.
    let history = vec![record(
        1,
        "World Bank reconstruction lending priorities",
        &[("p1", VoteChoice::B)],
        VoteChoice::A,
    )];

    let bonuses = agreement::calculate(&history, &players, &data.agreement_keywords);
    assert!((bonuses[&Country::France].gdp_bonus - (-0.1)).abs() < 1e-9);
    assert_eq!(bonuses[&Country::France].trade_bonus, 0.0);
}

#[test]
fn rounds_a_player_missed_are_skipped() {
    let data = GameData::builtin().unwrap();
    let players: BTreeMap<_, _> = [player("late", Country::India)].into_iter().collect();

    // The player was absent for round 1; only round 2 counts.
    let history = vec![
        record(1, "Postwar tariff reduction schedule", &[], VoteChoice::A),
        record(
            2,
            "Capital controls on speculative flows",
            &[("late", VoteChoice::A)],
            VoteChoice::A,
        ),
    ];

    let bonuses = agreement::calculate(&history, &players, &data.agreement_keywords);
    assert!((bonuses[&Country::India].gdp_bonus - 0.3).abs() < 1e-9);
}

#[test]
fn recomputation_from_the_same_history_is_identical() {
    let data = GameData::builtin().unwrap();
    let players: BTreeMap<_, _> = [
        player("p1", Country::Usa),
        player("p2", Country::Ussr),
    ]
    .into_iter()
    .collect();

    let history = vec![
        record(
            1,
            "Fixed exchange rates anchored to gold",
            &[("p1", VoteChoice::A), ("p2", VoteChoice::C)],
            VoteChoice::A,
        ),
        record(
            2,
            "Emergency stabilization loans for deficit nations",
            &[("p1", VoteChoice::B), ("p2", VoteChoice::B)],
            VoteChoice::B,
        ),
    ];

    let first: BTreeMap<Country, AgreementBonus> =
        agreement::calculate(&history, &players, &data.agreement_keywords);
    let second = agreement::calculate(&history, &players, &data.agreement_keywords);
    assert_eq!(first, second);
}
