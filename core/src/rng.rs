//! Deterministic random number generation.
//!
//! RULE: Nothing in the simulation may call any platform RNG.
//! All randomness flows through `GameRng` streams derived from a single
//! master seed, so a replay with the same seed and the same commands
//! reproduces every economic shock exactly.
//!
//! Each (session, year) pair gets its own stream. Advancing year 1947 in one
//! room never perturbs the draws of another room, no matter how commands for
//! the two rooms interleave.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct GameRng {
    inner: Pcg64Mcg,
}

impl GameRng {
    /// Create a stream directly from a seed. Used by tests and fixtures.
    pub fn seed_from(seed: u64) -> Self {
        Self {
            inner: Pcg64Mcg::seed_from_u64(seed),
        }
    }

    /// Derive the stream for one session-year. The derivation must never
    /// change once shipped — it is part of the replay format.
    pub fn for_year(master_seed: u64, session_id: &str, year: i32) -> Self {
        let mut h = master_seed;
        for b in session_id.bytes() {
            h = (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3);
        }
        let derived = h ^ (year as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// A zero-centered draw in [-scale/2, scale/2).
    pub fn centered(&mut self, scale: f64) -> f64 {
        (self.next_f64() - 0.5) * scale
    }

    /// The growth shock term, bounded in [-1.0, 1.0).
    pub fn shock(&mut self) -> f64 {
        self.centered(2.0)
    }
}
