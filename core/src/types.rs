//! Shared primitive types used across the entire game core.

/// A stable, unique identifier for a player. Issued by the transport layer.
pub type PlayerId = String;

/// The canonical session (game room) identifier.
pub type SessionId = String;

/// A simulated calendar year. Phase 2 runs 1946..=1952.
pub type Year = i32;

/// A Phase 1 voting round, 1-based. Terminal at round 10.
pub type Round = u32;
