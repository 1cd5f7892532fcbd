//! Commands and the caller capability token.
//!
//! The transport layer resolves identity to a capability ONCE per command
//! and passes it in — the core never scans a user table to decide who is
//! an administrator. Variants are added over time, never removed or
//! reordered.

use crate::{
    country::Country,
    error::{GameError, GameResult},
    policy::PolicyDraft,
    types::PlayerId,
};
use serde::{Deserialize, Serialize};

/// Who is issuing a command. Resolved at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Caller {
    /// The room administrator. Observes; never holds a country seat.
    Admin,
    Player { player_id: PlayerId },
}

impl Caller {
    pub fn require_admin(&self) -> GameResult<()> {
        match self {
            Caller::Admin => Ok(()),
            Caller::Player { .. } => Err(GameError::Forbidden(
                "administrator capability required".into(),
            )),
        }
    }

    pub fn player_id(&self) -> GameResult<&PlayerId> {
        match self {
            Caller::Player { player_id } => Ok(player_id),
            Caller::Admin => Err(GameError::Forbidden(
                "command requires a player, not the administrator".into(),
            )),
        }
    }
}

/// Every command the core accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum GameCommand {
    // ── Seat management ────────────────────────────
    JoinGame { country: Country },
    RejoinGame { country: Country },
    LeaveGame,
    SetReady { ready: bool },
    /// Issued by the transport when a connection drops. The player keeps
    /// their seat; only liveness changes.
    MarkDisconnected { player_id: PlayerId },

    // ── Phase 1 ────────────────────────────────────
    StartGame,
    CastVote { choice: String },
    AdvanceRound,

    // ── Phase 2 ────────────────────────────────────
    SubmitPolicy { policy: PolicyDraft },
    DeployTroops {
        country: Country,
        region: String,
        troops: u32,
    },
    AdvanceYear,

    // ── Administration ─────────────────────────────
    ResetRoom,
}
