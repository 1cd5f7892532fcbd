//! Economic Simulation Engine — the Phase 2 per-year step.
//!
//! One call to `advance_year` turns year Y's snapshots plus year Y's
//! policies into year Y+1's snapshots. The computation is an ordered
//! pipeline of named stages, each adjusting a small working state:
//!
//!   military → monetary → trade → geopolitical → global sync →
//!   trade bloc → capital flows → agreement → historical → stochastic
//!
//! STAGE ORDER IS FIXED. Every stage is additive on the working state, so
//! each effect can be asserted in isolation, but the stochastic draws make
//! the order of RNG consumption part of the replay format: countries are
//! visited in `Country` enum order and penalty countries draw nothing.
//!
//! Arithmetic never errors. Derived indicators are clamped into their
//! valid ranges (unemployment [0, 15]; inflation and gold reserves ≥ 0)
//! and rounded (rates to one decimal, monetary figures to integers)
//! before storage. The new year is returned as a complete batch — callers
//! insert it atomically, so no partial-country year is ever visible.

use crate::{
    agreement::AgreementBonus,
    config::InitialConditions,
    country::Country,
    policy::{EffectiveRates, Policy},
    rng::GameRng,
    types::Year,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Post-war boom baseline, percent GDP growth.
pub const BASE_GROWTH: f64 = 4.0;

/// The central-bank rate the model treats as neutral.
pub const OPTIMAL_CENTRAL_BANK_RATE: f64 = 3.0;

/// One country's economic indicators for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySnapshot {
    /// Percent, one decimal.
    pub gdp_growth: f64,
    /// Millions USD.
    pub gold_reserves: f64,
    /// Percent, clamped to [0, 15].
    pub unemployment: f64,
    /// Millions USD; negative is a deficit.
    pub trade_balance: f64,
    /// Percent, never negative.
    pub inflation: f64,
    /// Index, 1946 base.
    pub industrial_output: f64,
    /// Percent of notional GDP, as submitted.
    pub military_spending: f64,
    pub military_size: u32,
}

impl YearlySnapshot {
    /// The 1946 seed snapshot: static reference data plus the country's
    /// fixed historical unemployment/inflation constants. Military fields
    /// start at zero; the first submitted policies populate them.
    pub fn seed(country: Country, init: &InitialConditions) -> Self {
        Self {
            gdp_growth: 0.0,
            gold_reserves: init.gold_reserves,
            unemployment: country.initial_unemployment(),
            trade_balance: init.trade_balance,
            inflation: country.initial_inflation(),
            industrial_output: init.industrial_output,
            military_spending: 0.0,
            military_size: 0,
        }
    }
}

/// Global averages over the effective rates of every country that
/// submitted a policy this year. Zero across the board if nobody did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobalConditions {
    pub avg_tariff: f64,
    pub avg_exchange_rate: f64,
    pub avg_interest_rate: f64,
}

impl GlobalConditions {
    pub fn from_policies(policies: &BTreeMap<Country, Policy>) -> Self {
        if policies.is_empty() {
            return Self::default();
        }
        let n = policies.len() as f64;
        let mut g = Self::default();
        for policy in policies.values() {
            let rates = policy.effective_rates();
            g.avg_tariff += rates.tariff_rate;
            g.avg_exchange_rate += rates.exchange_rate;
            g.avg_interest_rate += rates.central_bank_rate;
        }
        g.avg_tariff /= n;
        g.avg_exchange_rate /= n;
        g.avg_interest_rate /= n;
        g
    }
}

/// The working state threaded through the pipeline for one country-year.
/// Inflation/unemployment contributions and industrial multipliers are
/// accumulated here and applied by `derive_indicators`.
#[derive(Debug, Clone, PartialEq)]
pub struct StageState {
    pub country: Country,
    pub year: Year,
    pub gdp_growth: f64,
    pub trade_balance: f64,
    pub inflation_delta: f64,
    pub unemployment_delta: f64,
    pub industrial_multiplier: f64,
}

impl StageState {
    pub fn new(country: Country, year: Year, prior_trade_balance: f64) -> Self {
        Self {
            country,
            year,
            gdp_growth: BASE_GROWTH,
            trade_balance: prior_trade_balance,
            inflation_delta: 0.0,
            unemployment_delta: 0.0,
            industrial_multiplier: 1.0,
        }
    }
}

/// Military economics: spending above 10% of GDP drains the civilian
/// economy, a 5–8% band is a Keynesian stimulus, and a large standing
/// army withdraws labor from the workforce.
pub fn military_stage(s: &mut StageState, policy: &Policy) {
    let spending = policy.military_spending();
    let size = policy.military_size();

    if spending > 10.0 {
        s.gdp_growth -= (spending - 10.0) * 0.15;
    }
    if (5.0..=8.0).contains(&spending) {
        s.gdp_growth += 0.3;
    }
    s.gdp_growth -= (f64::from(size) / 1_000_000.0) * 0.2;
}

/// Monetary policy: deviation from the neutral central-bank rate costs
/// growth in either direction.
pub fn monetary_stage(s: &mut StageState, rates: &EffectiveRates) {
    let deviation = (rates.central_bank_rate - OPTIMAL_CENTRAL_BANK_RATE).abs();
    s.gdp_growth -= deviation * 0.5;
}

/// Pairwise trade effects against every other country that submitted a
/// policy: exchange-rate competitiveness, tariff barriers on both sides,
/// the mutual-low-tariff trade bonus, and the currency-war backlash.
pub fn trade_stage(
    s: &mut StageState,
    rates: &EffectiveRates,
    policies: &BTreeMap<Country, Policy>,
) {
    for (&other, other_policy) in policies {
        if other == s.country {
            continue;
        }
        let theirs = other_policy.effective_rates();

        // A weaker currency than theirs means you out-export them.
        s.gdp_growth += (theirs.exchange_rate - rates.exchange_rate) * 0.3;

        // Their tariffs block your exports; yours block your own imports.
        s.trade_balance += (theirs.tariff_rate - 15.0) * -20.0;
        s.trade_balance += (rates.tariff_rate - 15.0) * -30.0;

        if rates.tariff_rate < 20.0 && theirs.tariff_rate < 20.0 {
            s.trade_balance += 100.0;
            s.gdp_growth += 0.2;
        }

        // Aggressive devaluation against a strong-currency rival invites
        // retaliation.
        if rates.exchange_rate < 0.8 && theirs.exchange_rate > 1.1 {
            s.gdp_growth -= 0.5;
        }
    }
}

/// Pairwise military tension: arms-race pressure against fixed rivals and
/// the peaceful-cooperation trade bonus between similar low spenders.
pub fn geopolitical_stage(
    s: &mut StageState,
    policy: &Policy,
    policies: &BTreeMap<Country, Policy>,
) {
    let spending = policy.military_spending();
    let size = f64::from(policy.military_size());

    for (&other, other_policy) in policies {
        if other == s.country {
            continue;
        }
        let other_spending = other_policy.military_spending();
        let other_size = f64::from(other_policy.military_size());

        if s.country.is_rival_of(other) {
            // A rival with a much larger military costs you influence.
            if other_size > size * 1.5 {
                s.gdp_growth -= 0.3;
                s.trade_balance -= 200.0;
            }
            // A heavily militarizing rival you fail to match leaves you
            // strategically weak.
            if other_spending > 12.0 && spending < other_spending - 3.0 {
                s.gdp_growth -= 0.4;
            }
        }

        if (spending - other_spending).abs() < 3.0 && spending < 10.0 {
            s.trade_balance += 50.0;
        }
    }
}

/// Global synchronization: coordinated tight money is a world recession,
/// coordinated loose money a world boom.
pub fn global_sync_stage(s: &mut StageState, globals: &GlobalConditions) {
    if globals.avg_interest_rate > 6.0 {
        s.gdp_growth -= 1.5;
    }
    if globals.avg_interest_rate < 2.0 {
        s.gdp_growth += 1.0;
    }
}

/// Tariff policy close to the world average earns a coordination bonus.
pub fn trade_bloc_stage(s: &mut StageState, rates: &EffectiveRates, globals: &GlobalConditions) {
    if (rates.tariff_rate - globals.avg_tariff).abs() < 10.0 {
        s.gdp_growth += 0.3;
    }
}

/// Rate differentials move capital: well above the world average attracts
/// inflows, well below bleeds outflows.
pub fn capital_flow_stage(s: &mut StageState, rates: &EffectiveRates, globals: &GlobalConditions) {
    if rates.central_bank_rate > globals.avg_interest_rate + 2.0 {
        s.trade_balance += 500.0;
    } else if rates.central_bank_rate < globals.avg_interest_rate - 2.0 {
        s.trade_balance -= 300.0;
    }
}

/// The Phase 1 agreement bonus carried into every simulated year.
pub fn agreement_stage(s: &mut StageState, bonus: Option<&AgreementBonus>) {
    if let Some(bonus) = bonus {
        s.gdp_growth += bonus.gdp_bonus;
        s.trade_balance += bonus.trade_bonus;
    }
}

/// Country-specific historical modifiers.
pub fn historical_stage(s: &mut StageState, policy: &Policy) {
    match s.country {
        Country::Ussr => {
            if let Some(cmd) = policy.as_command() {
                // Ambitious five-year-plan targets industrialize fast and
                // create shortages.
                if cmd.five_year_plan_target > 10.0 {
                    s.gdp_growth += (cmd.five_year_plan_target - 10.0) * 0.3;
                    s.inflation_delta += (cmd.five_year_plan_target - 10.0) * 0.5;
                }
                if cmd.heavy_industry_allocation > 60.0 {
                    s.industrial_multiplier *=
                        1.01 + (cmd.heavy_industry_allocation - 60.0) / 100.0;
                }
                // Foreign-trade orientation: COMECON barter vs. hard
                // currency from the West.
                if cmd.foreign_trade_orientation < 30.0 {
                    s.trade_balance -= 400.0;
                    s.gdp_growth += 0.3;
                } else if cmd.foreign_trade_orientation > 70.0 {
                    s.trade_balance += 600.0;
                    s.gdp_growth += 0.5;
                } else {
                    s.trade_balance += 100.0;
                }
                // Gosbank credit rigor: strict allocation fulfills the plan
                // but bottlenecks supply.
                if cmd.plan_fulfillment_priority > 80.0 {
                    s.gdp_growth += 0.4;
                    s.inflation_delta += 1.0;
                } else if cmd.plan_fulfillment_priority < 60.0 {
                    s.gdp_growth -= 0.3;
                    s.inflation_delta -= 0.5;
                }
            }
            // Marshall Plan isolation.
            if s.year >= 1948 {
                s.gdp_growth -= 1.0;
                s.trade_balance -= 400.0;
            }
        }
        Country::China => {
            // Civil war 1946–1949, intensifying toward the decisive
            // campaigns.
            if s.year <= 1949 {
                let intensity = match s.year {
                    1946 => -1.0,
                    1947 => -1.5,
                    1948 => -2.5,
                    1949 => -4.0,
                    _ => -1.0,
                };
                s.gdp_growth += intensity;
                s.trade_balance -= f64::from(s.year - 1945) * 200.0;
                s.unemployment_delta += f64::from(s.year - 1945) * 0.5;
                if s.year >= 1948 {
                    // Agricultural collapse.
                    s.inflation_delta += 3.0;
                }
            }
            if s.year >= 1949 {
                if let Some(cmd) = policy.as_command() {
                    if cmd.five_year_plan_target > 12.0 {
                        s.gdp_growth += (cmd.five_year_plan_target - 12.0) * 0.2;
                        s.inflation_delta += (cmd.five_year_plan_target - 12.0) * 0.8;
                    }
                    if cmd.foreign_trade_orientation < 30.0 {
                        s.trade_balance -= 200.0;
                        s.gdp_growth += 0.2;
                    } else if cmd.foreign_trade_orientation > 70.0 {
                        s.trade_balance += 200.0;
                    }
                    if cmd.plan_fulfillment_priority > 80.0 {
                        s.gdp_growth += 0.3;
                        s.inflation_delta += 1.2;
                    }
                    // Post-civil-war recovery penalty.
                    s.gdp_growth -= 1.5;
                    s.trade_balance -= 200.0;
                }
            }
        }
        Country::India => {
            if s.year >= 1947 {
                // Independence boost.
                s.gdp_growth += 1.0;
            }
        }
        Country::Usa => {
            // Reserve-currency demand for dollars.
            s.trade_balance += 400.0;
        }
        _ => {}
    }
}

/// The bounded random growth shock, in [-1, 1).
pub fn stochastic_stage(s: &mut StageState, rng: &mut GameRng) {
    s.gdp_growth += rng.shock();
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Derive inflation, unemployment, industrial output, and gold reserves
/// from the pipeline output and the prior year, then clamp and round.
pub fn derive_indicators(
    s: &StageState,
    prev: &YearlySnapshot,
    rates: &EffectiveRates,
    globals: &GlobalConditions,
    policy: &Policy,
    rng: &mut GameRng,
) -> YearlySnapshot {
    let mut inflation = prev.inflation + s.inflation_delta;
    if rates.central_bank_rate < 2.0 {
        inflation += (2.0 - rates.central_bank_rate) * 2.0;
    } else if rates.central_bank_rate > 5.0 {
        inflation -= (rates.central_bank_rate - 5.0) * 1.5;
    }
    if globals.avg_interest_rate < 2.5 {
        // Global loose money.
        inflation += 1.5;
    }
    if rates.exchange_rate < 0.9 {
        // Weak currency makes imports expensive.
        inflation += (0.9 - rates.exchange_rate) * 5.0;
    }
    inflation = (inflation + rng.centered(3.0)).max(0.0);

    let mut unemployment = prev.unemployment + s.unemployment_delta;
    let mut gdp_growth = s.gdp_growth;
    if gdp_growth > 3.0 {
        unemployment -= (gdp_growth - 3.0) * 0.3;
    } else if gdp_growth < 2.0 {
        unemployment += (2.0 - gdp_growth) * 0.4;
    }
    // High tariffs protect jobs at an efficiency cost to growth.
    if rates.tariff_rate > 30.0 {
        unemployment -= 0.5;
        gdp_growth -= 0.3;
    }
    unemployment = (unemployment + rng.centered(1.0)).clamp(0.0, 15.0);

    let industrial_output =
        prev.industrial_output * s.industrial_multiplier * (1.0 + gdp_growth / 100.0);

    // Deficits bleed gold twice as fast as surpluses accumulate it.
    let gold_delta = if s.trade_balance > 0.0 {
        s.trade_balance * 0.01
    } else {
        s.trade_balance * 0.02
    };
    let gold_reserves = (prev.gold_reserves + gold_delta).max(0.0);

    YearlySnapshot {
        gdp_growth: round1(gdp_growth),
        gold_reserves: gold_reserves.round(),
        unemployment: round1(unemployment),
        trade_balance: s.trade_balance.round(),
        inflation: round1(inflation),
        industrial_output: industrial_output.round(),
        military_spending: policy.military_spending(),
        military_size: policy.military_size(),
    }
}

/// The snapshot for a country that submitted no policy this year:
/// contraction, exactly a 2% industrial decline, everything else carried
/// over. Unlike the derived-indicator path, nothing here is rounded.
pub fn penalty_snapshot(prev: &YearlySnapshot) -> YearlySnapshot {
    YearlySnapshot {
        gdp_growth: -2.0,
        industrial_output: prev.industrial_output * 0.98,
        ..prev.clone()
    }
}

/// Advance every participating country from year Y to year Y+1.
///
/// `prev` holds year Y's snapshots, `policies` that year's submissions.
/// The result covers exactly the countries present in `prev` and is
/// written by the caller as one batch.
pub fn advance_year(
    year: Year,
    policies: &BTreeMap<Country, Policy>,
    prev: &BTreeMap<Country, YearlySnapshot>,
    bonuses: &BTreeMap<Country, AgreementBonus>,
    rng: &mut GameRng,
) -> BTreeMap<Country, YearlySnapshot> {
    let globals = GlobalConditions::from_policies(policies);
    let mut next = BTreeMap::new();

    for (&country, prev_snap) in prev {
        let Some(policy) = policies.get(&country) else {
            next.insert(country, penalty_snapshot(prev_snap));
            continue;
        };
        let rates = policy.effective_rates();

        let mut s = StageState::new(country, year, prev_snap.trade_balance);
        military_stage(&mut s, policy);
        monetary_stage(&mut s, &rates);
        trade_stage(&mut s, &rates, policies);
        geopolitical_stage(&mut s, policy, policies);
        global_sync_stage(&mut s, &globals);
        trade_bloc_stage(&mut s, &rates, &globals);
        capital_flow_stage(&mut s, &rates, &globals);
        agreement_stage(&mut s, bonuses.get(&country));
        historical_stage(&mut s, policy);
        stochastic_stage(&mut s, rng);

        next.insert(
            country,
            derive_indicators(&s, prev_snap, &rates, &globals, policy, rng),
        );
    }

    next
}
