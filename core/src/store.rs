//! SQLite persistence — the session store collaborator.
//!
//! RULE: Only store.rs talks to the database. The engine calls store
//! methods; nothing else executes SQL. Sessions persist as JSON blobs so
//! the on-disk shape evolves with the serde types.
//!
//! This is the single boundary through which sessions are created, loaded,
//! and deleted — there is no global room table anywhere in the core.

use crate::{
    error::GameResult,
    session::{GamePhase, Session},
    types::SessionId,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

pub struct SessionStore {
    conn: Connection,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: SessionId,
    pub name: String,
    pub phase: GamePhase,
    pub player_count: usize,
}

impl SessionStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &str) -> GameResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (used in tests and headless runs).
    pub fn in_memory() -> GameResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> GameResult<()> {
        self.conn
            .execute_batch(include_str!("../migrations/001_foundation.sql"))?;
        Ok(())
    }

    /// Create and persist a fresh session in the lobby state.
    pub fn create(&self, name: &str, host_id: Option<&str>) -> GameResult<Session> {
        let id = format!("room-{}", Uuid::new_v4());
        let session = Session::new(id, name.to_string(), host_id.map(str::to_string));
        let json = serde_json::to_string(&session)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO session (session_id, name, phase, state_json, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![session.id, session.name, phase_tag(session.phase), json, now],
        )?;
        log::info!("session created: {} ({})", session.name, session.id);
        Ok(session)
    }

    pub fn load(&self, session_id: &str) -> GameResult<Option<Session>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT state_json FROM session WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Snapshot the full session. Called after every mutating command.
    pub fn save(&self, session: &Session) -> GameResult<()> {
        let json = serde_json::to_string(session)?;
        self.conn.execute(
            "UPDATE session
             SET name = ?2, phase = ?3, state_json = ?4, updated_at = ?5
             WHERE session_id = ?1",
            params![
                session.id,
                session.name,
                phase_tag(session.phase),
                json,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Delete a session. Returns false if it did not exist.
    pub fn delete(&self, session_id: &str) -> GameResult<bool> {
        let rows = self.conn.execute(
            "DELETE FROM session WHERE session_id = ?1",
            params![session_id],
        )?;
        Ok(rows > 0)
    }

    pub fn list(&self) -> GameResult<Vec<SessionSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, state_json FROM session ORDER BY created_at ASC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut summaries = Vec::with_capacity(rows.len());
        for (id, json) in rows {
            let session: Session = serde_json::from_str(&json)?;
            summaries.push(SessionSummary {
                id,
                name: session.name.clone(),
                phase: session.phase,
                player_count: session.players.len(),
            });
        }
        Ok(summaries)
    }
}

fn phase_tag(phase: GamePhase) -> &'static str {
    match phase {
        GamePhase::Lobby => "lobby",
        GamePhase::Voting => "voting",
        GamePhase::Results => "results",
        GamePhase::Phase2 => "phase2",
        GamePhase::Complete => "complete",
    }
}
