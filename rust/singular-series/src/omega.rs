//! Local root counts of Q(n) = n^47 - (n-1)^47 modulo a prime.
//!
//! Substituting m = n / (n-1) turns Q(n) ≡ 0 (mod p) into m^47 ≡ 1 with
//! m ≠ 1, so the number of roots is the number of non-trivial 47th roots of
//! unity in (Z/pZ)*:
//! - 46 when 47 | (p-1), i.e. p splits completely in Q(ζ_47),
//! - 0 otherwise.
//!
//! p = 47 is ramified and is forced to 0.

use serde::{Deserialize, Serialize};

/// Degree of Q's defining power.
pub const EXPONENT: u64 = 47;

/// Root count at a splitting prime: EXPONENT - 1.
pub const SPLIT_ROOTS: u32 = 46;

/// Whether a prime boosts (shielding) or penalises (splitting) the density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimeClass {
    /// omega = 0: local factor p/(p-1) > 1.
    Shielding,
    /// omega = 46: local factor below 1 once p > 46.
    Splitting,
}

impl PrimeClass {
    pub fn omega(self) -> u32 {
        match self {
            PrimeClass::Shielding => 0,
            PrimeClass::Splitting => SPLIT_ROOTS,
        }
    }
}

/// Classify p by the congruence p ≡ 1 (mod 47), with the ramified prime 47 excluded.
///
/// Requires p >= 2.
pub fn classify(p: u64) -> PrimeClass {
    debug_assert!(p >= 2, "classify called with p = {p}");
    if p != EXPONENT && p % EXPONENT == 1 {
        PrimeClass::Splitting
    } else {
        PrimeClass::Shielding
    }
}

/// omega_Q(p): number of roots of Q mod p. Always 0 or 46.
pub fn omega_q(p: u64) -> u32 {
    classify(p).omega()
}

/// Euler factor (1 - omega/p) / (1 - 1/p).
///
/// Requires p >= 2 and omega < p.
pub fn local_factor(p: u64, omega: u32) -> f64 {
    debug_assert!(p >= 2 && u64::from(omega) < p, "local_factor({p}, {omega})");
    let p = p as f64;
    (1.0 - omega as f64 / p) / (1.0 - 1.0 / p)
}
