//! Events emitted by the engine after each mutating command.
//!
//! The transport layer fans these out to clients along with the updated
//! session. Variants are added over time — never removed or reordered.

use crate::{
    country::Country,
    round::{VoteChoice, VoteTally},
    scoring::ScoreBreakdown,
    types::{PlayerId, Round, Year},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Seat management ────────────────────────────
    PlayerJoined {
        player_id: PlayerId,
        country: Country,
    },
    PlayerRejoined {
        player_id: PlayerId,
        country: Country,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    PlayerDisconnected {
        player_id: PlayerId,
    },
    ReadyChanged {
        player_id: PlayerId,
        ready: bool,
    },

    // ── Phase 1 ────────────────────────────────────
    GameStarted {
        round: Round,
    },
    VoteRecorded {
        player_id: PlayerId,
    },
    RoundResolved {
        round: Round,
        winning_option: VoteChoice,
        tally: VoteTally,
        round_scores: BTreeMap<Country, i64>,
    },
    RoundAdvanced {
        round: Round,
    },

    // ── Phase 2 ────────────────────────────────────
    PhaseTwoInitialized {
        year: Year,
    },
    PolicySubmitted {
        country: Country,
        year: Year,
    },
    TroopsDeployed {
        country: Country,
        region: String,
        troops: u32,
        year: Year,
    },
    ConflictDetected {
        region: String,
        countries: Vec<Country>,
        year: Year,
    },
    YearAdvanced {
        year: Year,
    },
    PhaseTwoCompleted {
        breakdowns: BTreeMap<Country, ScoreBreakdown>,
    },

    // ── Administration ─────────────────────────────
    RoomReset,
}
