//! The broadcast collaborator boundary.
//!
//! After every mutating command the engine hands the updated session and
//! the emitted events to a `Broadcaster`. Fan-out to individual
//! connections is entirely the transport layer's problem.

use crate::{event::GameEvent, session::Session};

pub trait Broadcaster: Send {
    fn session_updated(&self, session: &Session, events: &[GameEvent]);
}

/// Discards everything. Used in tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn session_updated(&self, _session: &Session, _events: &[GameEvent]) {}
}

/// Logs each event at info level. Used by the headless runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogBroadcaster;

impl Broadcaster for LogBroadcaster {
    fn session_updated(&self, session: &Session, events: &[GameEvent]) {
        for event in events {
            match serde_json::to_string(event) {
                Ok(json) => log::info!("session {}: {json}", session.id),
                Err(e) => log::warn!("session {}: unserializable event: {e}", session.id),
            }
        }
    }
}
