//! Deployment / Conflict Detector.
//!
//! Deployments are an append-only log tagged with the current Phase 2
//! year. When a deployment lands in a conflict-prone region where another
//! country already has troops that year, a `ConflictEvent` is recorded
//! listing every participant. Repeated co-occurrences each produce their
//! own event — the log records escalation, it does not deduplicate.

use crate::{country::Country, session::Phase2Ledger, types::Year};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub country: Country,
    pub region: String,
    pub troops: u32,
    pub year: Year,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictEvent {
    pub region: String,
    /// The deploying country first, then every prior same-year deployer.
    /// May contain duplicates when a country deployed repeatedly.
    pub countries: Vec<Country>,
    pub year: Year,
    pub detected_at: DateTime<Utc>,
}

/// Append a deployment and detect any resulting conflict.
/// Returns the conflict event if one was raised.
pub fn record(
    ledger: &mut Phase2Ledger,
    country: Country,
    region: String,
    troops: u32,
    conflict_zones: &[String],
) -> Option<ConflictEvent> {
    let year = ledger.current_year;
    let now = Utc::now();

    ledger.deployments.push(Deployment {
        country,
        region: region.clone(),
        troops,
        year,
        submitted_at: now,
    });

    if !conflict_zones.iter().any(|z| *z == region) {
        return None;
    }

    let others: Vec<Country> = ledger
        .deployments
        .iter()
        .filter(|d| d.region == region && d.country != country && d.year == year)
        .map(|d| d.country)
        .collect();

    if others.is_empty() {
        return None;
    }

    let mut countries = Vec::with_capacity(others.len() + 1);
    countries.push(country);
    countries.extend(others);

    let conflict = ConflictEvent {
        region,
        countries,
        year,
        detected_at: now,
    };
    ledger.conflicts.push(conflict.clone());
    Some(conflict)
}
