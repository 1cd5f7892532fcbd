//! Static reference dataset.
//!
//! Everything the simulation treats as historical fact but not as code:
//! the ordered Phase 1 issue list with per-option favors/opposes sets, the
//! per-country 1946 starting conditions, the agreement keyword table, and
//! the conflict-prone regions. Shipped as `data/game-data.json` and embedded
//! in the binary; a deployment can also load an edited copy from disk.
//!
//! The keyword table is data on purpose: which issue titles count as
//! "trade-related" must be editable without touching simulation logic.

use crate::{country::Country, error::GameResult, round::VoteChoice, types::Round};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameData {
    pub issues: Vec<Issue>,
    pub initial_conditions: BTreeMap<Country, InitialConditions>,
    pub agreement_keywords: Vec<KeywordCategory>,
    pub conflict_zones: Vec<String>,
}

/// One Phase 1 policy issue with its three options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub options: Vec<IssueOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueOption {
    pub label: String,
    #[serde(default)]
    pub favors: Vec<Country>,
    #[serde(default)]
    pub opposes: Vec<Country>,
}

/// Starting economic conditions for one country, entering 1946.
/// Monetary figures are in millions of 1946 USD; output is an index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InitialConditions {
    pub gold_reserves: f64,
    pub trade_balance: f64,
    pub industrial_output: f64,
}

/// One agreement-bonus category: an issue title matching any of the
/// keywords (substring, case-sensitive as authored) earns the bonuses when
/// a country voted with that round's winner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    pub keywords: Vec<String>,
    pub gdp_bonus: f64,
    pub trade_bonus: f64,
}

impl KeywordCategory {
    pub fn matches(&self, title: &str) -> bool {
        self.keywords.iter().any(|k| title.contains(k.as_str()))
    }
}

impl Issue {
    pub fn option(&self, choice: VoteChoice) -> Option<&IssueOption> {
        self.options.get(choice.index())
    }
}

impl GameData {
    /// The dataset compiled into the binary.
    pub fn builtin() -> GameResult<Self> {
        let data: GameData = serde_json::from_str(include_str!("../data/game-data.json"))?;
        Ok(data)
    }

    /// Load an external dataset, for deployments that edit the issue list.
    pub fn load(path: &Path) -> GameResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        let data: GameData = serde_json::from_str(&raw)?;
        Ok(data)
    }

    /// The issue voted on in `round` (1-based).
    pub fn issue_for_round(&self, round: Round) -> Option<&Issue> {
        self.issues.get(round.checked_sub(1)? as usize)
    }

    pub fn is_conflict_zone(&self, region: &str) -> bool {
        self.conflict_zones.iter().any(|z| z == region)
    }
}
