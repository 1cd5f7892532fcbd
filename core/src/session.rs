//! Session model — the full in-memory state of one game room.
//!
//! A `Session` is a plain serde value: the store persists it as a JSON blob
//! after every mutating command, and the broadcaster fans it out to clients.
//! All maps are ordered so serialization and iteration are deterministic.

use crate::{
    country::Country,
    deployment::{ConflictEvent, Deployment},
    economy::YearlySnapshot,
    policy::Policy,
    round::{RoundRecord, VoteChoice},
    scoring::ScoreBreakdown,
    types::{PlayerId, Round, SessionId, Year},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const MAX_PLAYERS: usize = 7;
pub const FINAL_ROUND: Round = 10;
pub const PHASE2_START_YEAR: Year = 1946;
pub const PHASE2_FINAL_YEAR: Year = 1952;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Lobby,
    Voting,
    Results,
    Phase2,
    Complete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Immutable once assigned; unique within the session.
    pub country: Country,
    /// Liveness only. A disconnected player stays in the game.
    pub connected: bool,
    pub joined_at: DateTime<Utc>,
}

/// The Phase 2 ledger: policies, yearly snapshots, deployments, conflicts,
/// and the final score breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase2Ledger {
    pub active: bool,
    pub current_year: Year,
    pub policies: BTreeMap<Year, BTreeMap<Country, Policy>>,
    pub yearly_data: BTreeMap<Year, BTreeMap<Country, YearlySnapshot>>,
    pub deployments: Vec<Deployment>,
    pub conflicts: Vec<ConflictEvent>,
    pub score_breakdowns: BTreeMap<Country, ScoreBreakdown>,
}

impl Default for Phase2Ledger {
    fn default() -> Self {
        Self {
            active: false,
            current_year: PHASE2_START_YEAR,
            policies: BTreeMap::new(),
            yearly_data: BTreeMap::new(),
            deployments: Vec::new(),
            conflicts: Vec::new(),
            score_breakdowns: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub host_id: Option<PlayerId>,
    pub started: bool,
    /// 1-based; 0 until the game starts.
    pub current_round: Round,
    pub phase: GamePhase,
    pub players: BTreeMap<PlayerId, Player>,
    /// Only ever contains entries for players currently in the session.
    pub votes: BTreeMap<PlayerId, VoteChoice>,
    pub ready: BTreeSet<PlayerId>,
    pub scores: BTreeMap<Country, i64>,
    pub round_history: Vec<RoundRecord>,
    pub phase2: Phase2Ledger,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, name: String, host_id: Option<PlayerId>) -> Self {
        Self {
            id,
            name,
            host_id,
            started: false,
            current_round: 0,
            phase: GamePhase::Lobby,
            players: BTreeMap::new(),
            votes: BTreeMap::new(),
            ready: BTreeSet::new(),
            scores: Country::ALL.iter().map(|&c| (c, 0)).collect(),
            round_history: Vec::new(),
            phase2: Phase2Ledger::default(),
            created_at: Utc::now(),
        }
    }

    /// Back to lobby defaults. Players keep their seats and countries.
    pub fn reset(&mut self) {
        self.started = false;
        self.current_round = 0;
        self.phase = GamePhase::Lobby;
        self.votes.clear();
        self.ready.clear();
        self.scores = Country::ALL.iter().map(|&c| (c, 0)).collect();
        self.round_history.clear();
        self.phase2 = Phase2Ledger::default();
    }

    pub fn country_taken(&self, country: Country) -> bool {
        self.players.values().any(|p| p.country == country)
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }

    /// Countries of the players currently seated, in enum order.
    pub fn countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> =
            self.players.values().map(|p| p.country).collect();
        countries.sort();
        countries
    }

    /// True once every current player has a recorded vote.
    pub fn all_voted(&self) -> bool {
        !self.players.is_empty()
            && self.players.keys().all(|id| self.votes.contains_key(id))
    }

    pub fn add_score(&mut self, country: Country, points: i64) {
        *self.scores.entry(country).or_insert(0) += points;
    }
}
