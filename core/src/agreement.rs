//! Agreement Bonus Calculator.
//!
//! A pure function of the Phase 1 round history: countries that voted with
//! the room accumulate cooperation and issue-specific bonuses that feed the
//! economic engine and the final score. Recomputing from the same history
//! always yields the same result — nothing here is cached or stateful.

use crate::{
    config::KeywordCategory,
    country::Country,
    round::RoundRecord,
    session::Player,
    types::PlayerId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const COOPERATION_BONUS: f64 = 0.3;
pub const ISOLATION_PENALTY: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementBonus {
    /// Percentage points added to GDP growth each simulated year.
    pub gdp_bonus: f64,
    /// Millions USD added to the trade balance each simulated year.
    pub trade_bonus: f64,
    pub description: String,
}

/// Derive each country's agreement bonus from the full round history.
pub fn calculate(
    history: &[RoundRecord],
    players: &BTreeMap<PlayerId, Player>,
    categories: &[KeywordCategory],
) -> BTreeMap<Country, AgreementBonus> {
    let mut bonuses = BTreeMap::new();

    for (player_id, player) in players {
        let mut gdp_bonus = 0.0;
        let mut trade_bonus = 0.0;
        let mut cooperation = 0.0;

        for record in history {
            let Some(&vote) = record.votes.get(player_id) else {
                continue;
            };

            if vote == record.winning_option {
                cooperation += COOPERATION_BONUS;
                for category in categories {
                    if category.matches(&record.issue_title) {
                        gdp_bonus += category.gdp_bonus;
                        trade_bonus += category.trade_bonus;
                    }
                }
            } else {
                cooperation -= ISOLATION_PENALTY;
            }
        }

        let stance = if cooperation > 0.0 { "cooperative" } else { "isolated" };
        bonuses.insert(
            player.country,
            AgreementBonus {
                gdp_bonus: gdp_bonus + cooperation,
                trade_bonus,
                description: format!("Bretton Woods alignment: {stance}"),
            },
        );
    }

    bonuses
}
