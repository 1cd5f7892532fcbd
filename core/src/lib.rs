//! bretton-core — the simulation core of the Bretton Woods game.
//!
//! Players represent nations. Phase 1 is a sequence of ten policy votes
//! resolved by plurality; Phase 2 is a year-by-year economic simulation
//! (1946–1952) with cross-country dynamics, scored at the end.
//!
//! RULES:
//!   - One session, one writer. A command applies to completion (including
//!     round resolution or a year advance) before the next one runs.
//!   - A command either fully applies or is rejected before any mutation.
//!     Rejections are typed `GameError` values, never panics.
//!   - All randomness flows through `GameRng`, seeded per session and year.
//!   - Only `store.rs` talks to the database.
//!   - The engine hands the updated session to the `Broadcaster` after every
//!     mutating command; it knows nothing about individual connections.

pub mod agreement;
pub mod broadcast;
pub mod command;
pub mod config;
pub mod country;
pub mod deployment;
pub mod economy;
pub mod engine;
pub mod error;
pub mod event;
pub mod policy;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod session;
pub mod store;
pub mod types;
