//! Economic policy submissions.
//!
//! A policy is one of two variants: market economies steer rates and
//! tariffs; command economies steer plan targets and allocation. Fields a
//! player leaves blank take the fixed historical defaults at submission
//! time, so the simulation only ever sees fully populated policies.

use serde::{Deserialize, Serialize};

pub const MARKET_DEFAULT_CENTRAL_BANK_RATE: f64 = 3.0;
pub const MARKET_DEFAULT_EXCHANGE_RATE: f64 = 1.0;
pub const MARKET_DEFAULT_TARIFF_RATE: f64 = 10.0;
pub const MARKET_DEFAULT_MILITARY_SPENDING: f64 = 5.0;
pub const MARKET_DEFAULT_MILITARY_SIZE: u32 = 500_000;

pub const COMMAND_DEFAULT_PLAN_TARGET: f64 = 8.0;
pub const COMMAND_DEFAULT_HEAVY_INDUSTRY: f64 = 60.0;
pub const COMMAND_DEFAULT_TRADE_ORIENTATION: f64 = 50.0;
pub const COMMAND_DEFAULT_PLAN_PRIORITY: f64 = 70.0;
pub const COMMAND_DEFAULT_MILITARY_SPENDING: f64 = 15.0;
pub const COMMAND_DEFAULT_MILITARY_SIZE: u32 = 3_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "economy", rename_all = "snake_case")]
pub enum Policy {
    Market(MarketPolicy),
    Command(CommandPolicy),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketPolicy {
    pub central_bank_rate: f64,
    pub exchange_rate: f64,
    /// Percent; 10 is the free-trade baseline, 50 is near-autarky.
    pub tariff_rate: f64,
    /// Percent of notional GDP.
    pub military_spending: f64,
    pub military_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommandPolicy {
    /// Annual growth target of the five-year plan, percent.
    pub five_year_plan_target: f64,
    /// Share of investment directed to heavy industry, percent.
    pub heavy_industry_allocation: f64,
    /// 0 = fully COMECON-oriented barter, 100 = fully Western trade.
    pub foreign_trade_orientation: f64,
    /// Credit-allocation rigor toward plan targets, percent.
    pub plan_fulfillment_priority: f64,
    pub military_spending: f64,
    pub military_size: u32,
}

/// The market mechanisms a country presents to the rest of the world.
/// Command economies expose fixed values regardless of their plan inputs:
/// no independent central bank, a state-fixed exchange rate, and high
/// barriers via the foreign-trade monopoly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveRates {
    pub central_bank_rate: f64,
    pub exchange_rate: f64,
    pub tariff_rate: f64,
}

impl Policy {
    pub fn is_command(&self) -> bool {
        matches!(self, Policy::Command(_))
    }

    pub fn as_command(&self) -> Option<&CommandPolicy> {
        match self {
            Policy::Command(c) => Some(c),
            Policy::Market(_) => None,
        }
    }

    pub fn effective_rates(&self) -> EffectiveRates {
        match self {
            Policy::Market(m) => EffectiveRates {
                central_bank_rate: m.central_bank_rate,
                exchange_rate: m.exchange_rate,
                tariff_rate: m.tariff_rate,
            },
            Policy::Command(_) => EffectiveRates {
                central_bank_rate: 0.0,
                exchange_rate: 1.0,
                tariff_rate: 50.0,
            },
        }
    }

    pub fn military_spending(&self) -> f64 {
        match self {
            Policy::Market(m) => m.military_spending,
            Policy::Command(c) => c.military_spending,
        }
    }

    pub fn military_size(&self) -> u32 {
        match self {
            Policy::Market(m) => m.military_size,
            Policy::Command(c) => c.military_size,
        }
    }
}

/// A submission as it arrives from the transport layer: any field may be
/// missing. `normalize()` fills the defaults and is the only path from a
/// draft to a `Policy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "economy", rename_all = "snake_case")]
pub enum PolicyDraft {
    Market {
        central_bank_rate: Option<f64>,
        exchange_rate: Option<f64>,
        tariff_rate: Option<f64>,
        military_spending: Option<f64>,
        military_size: Option<u32>,
    },
    Command {
        five_year_plan_target: Option<f64>,
        heavy_industry_allocation: Option<f64>,
        foreign_trade_orientation: Option<f64>,
        plan_fulfillment_priority: Option<f64>,
        military_spending: Option<f64>,
        military_size: Option<u32>,
    },
}

impl PolicyDraft {
    pub fn normalize(self) -> Policy {
        match self {
            PolicyDraft::Market {
                central_bank_rate,
                exchange_rate,
                tariff_rate,
                military_spending,
                military_size,
            } => Policy::Market(MarketPolicy {
                central_bank_rate: central_bank_rate
                    .unwrap_or(MARKET_DEFAULT_CENTRAL_BANK_RATE),
                exchange_rate: exchange_rate.unwrap_or(MARKET_DEFAULT_EXCHANGE_RATE),
                tariff_rate: tariff_rate.unwrap_or(MARKET_DEFAULT_TARIFF_RATE),
                military_spending: military_spending
                    .unwrap_or(MARKET_DEFAULT_MILITARY_SPENDING),
                military_size: military_size.unwrap_or(MARKET_DEFAULT_MILITARY_SIZE),
            }),
            PolicyDraft::Command {
                five_year_plan_target,
                heavy_industry_allocation,
                foreign_trade_orientation,
                plan_fulfillment_priority,
                military_spending,
                military_size,
            } => Policy::Command(CommandPolicy {
                five_year_plan_target: five_year_plan_target
                    .unwrap_or(COMMAND_DEFAULT_PLAN_TARGET),
                heavy_industry_allocation: heavy_industry_allocation
                    .unwrap_or(COMMAND_DEFAULT_HEAVY_INDUSTRY),
                foreign_trade_orientation: foreign_trade_orientation
                    .unwrap_or(COMMAND_DEFAULT_TRADE_ORIENTATION),
                plan_fulfillment_priority: plan_fulfillment_priority
                    .unwrap_or(COMMAND_DEFAULT_PLAN_PRIORITY),
                military_spending: military_spending
                    .unwrap_or(COMMAND_DEFAULT_MILITARY_SPENDING),
                military_size: military_size.unwrap_or(COMMAND_DEFAULT_MILITARY_SIZE),
            }),
        }
    }
}
