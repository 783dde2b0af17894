//! Deterministic PRNG for particle spawning.
//!
//! Xorshift64: fast, seedable, identical sequences across platforms. The
//! animation is fully reproducible — same seed, same data, same frames.

use serde::{Deserialize, Serialize};

/// Xorshift64 deterministic PRNG with shift parameters (13, 7, 17).
///
/// A seed of 0 is replaced with a non-zero fallback because all-zeros is a
/// fixed point of the xorshift recurrence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a new PRNG with the given seed (0 is remapped).
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1), using the upper 53 bits for full mantissa
    /// precision.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}
