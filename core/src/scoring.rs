//! Phase 2 Scoring Engine.
//!
//! At Phase 2 completion each country's six managed years (1947–1952) are
//! aggregated into a component breakdown. The tier tables are intentionally
//! coarse — players compare breakdowns, not decimals.

use crate::{
    agreement::AgreementBonus,
    country::Country,
    economy::YearlySnapshot,
    types::Year,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCORED_YEARS: std::ops::RangeInclusive<Year> = 1947..=1952;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub gdp: i64,
    pub inflation: i64,
    pub unemployment: i64,
    pub trade: i64,
    pub stability: i64,
    pub bretton_woods: i64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> i64 {
        self.gdp + self.inflation + self.unemployment + self.trade + self.stability
            + self.bretton_woods
    }
}

/// Score one country over the full yearly ledger.
/// A country with no scored years gets an all-zero breakdown.
pub fn score_country(
    yearly_data: &BTreeMap<Year, BTreeMap<Country, YearlySnapshot>>,
    country: Country,
    bonus: Option<&AgreementBonus>,
) -> ScoreBreakdown {
    let snapshots: Vec<&YearlySnapshot> = SCORED_YEARS
        .filter_map(|year| yearly_data.get(&year).and_then(|y| y.get(&country)))
        .collect();

    if snapshots.is_empty() {
        return ScoreBreakdown::default();
    }
    let years = snapshots.len() as f64;

    let avg_gdp = snapshots.iter().map(|s| s.gdp_growth).sum::<f64>() / years;
    let avg_inflation = snapshots.iter().map(|s| s.inflation).sum::<f64>() / years;
    let avg_unemployment = snapshots.iter().map(|s| s.unemployment).sum::<f64>() / years;
    let positive_trade_years =
        snapshots.iter().filter(|s| s.trade_balance > 0.0).count() as i64;

    let mut breakdown = ScoreBreakdown {
        gdp: (avg_gdp * 10.0).round() as i64,
        ..ScoreBreakdown::default()
    };

    breakdown.inflation = if avg_inflation < 3.0 {
        50 // price stability
    } else if avg_inflation < 5.0 {
        40
    } else if avg_inflation < 10.0 {
        25
    } else if avg_inflation < 20.0 {
        10
    } else {
        -10 // hyperinflation penalty
    };

    breakdown.unemployment = if avg_unemployment < 2.0 {
        40 // full employment
    } else if avg_unemployment < 4.0 {
        30
    } else if avg_unemployment < 6.0 {
        15
    } else if avg_unemployment < 10.0 {
        5
    } else {
        -5
    };

    breakdown.trade = positive_trade_years * 8;

    // Stability: mean absolute deviation of growth around its average.
    let mad = snapshots
        .iter()
        .map(|s| (s.gdp_growth - avg_gdp).abs())
        .sum::<f64>()
        / years;
    breakdown.stability = if mad < 1.5 {
        30
    } else if mad < 3.0 {
        15
    } else if mad < 5.0 {
        5
    } else {
        0
    };

    if let Some(bonus) = bonus {
        breakdown.bretton_woods =
            ((bonus.gdp_bonus + bonus.trade_bonus / 100.0) * 5.0).round() as i64;
    }

    breakdown
}
