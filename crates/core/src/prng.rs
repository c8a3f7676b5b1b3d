//! Injectable random sources.
//!
//! Every random draw in the system (pixel selection, initial scatter, density,
//! per-tick noise) goes through [`RandomSource`], so tests can substitute a
//! scripted source and the default [`Xorshift64`] makes whole sessions
//! reproducible from a single seed.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed values.
///
/// Only [`next_f64`](RandomSource::next_f64) is required; the range helpers
/// derive from it. Implementations with a cheaper integer path may override
/// [`next_usize`](RandomSource::next_usize).
pub trait RandomSource {
    /// Returns a uniformly distributed f64 in [0, 1).
    fn next_f64(&mut self) -> f64;

    /// Returns a uniformly distributed f64 in [min, max).
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed usize in [0, max).
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0.
    fn next_usize(&mut self, max: usize) -> usize {
        assert!(max > 0, "next_usize called with max = 0");
        ((self.next_f64() * max as f64) as usize).min(max - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }

    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        (**self).next_range(min, max)
    }

    fn next_usize(&mut self, max: usize) -> usize {
        (**self).next_usize(max)
    }
}

/// Xorshift64 deterministic PRNG. Same seed always produces the same sequence.
///
/// Shift parameters (13, 7, 17). A seed of 0 is replaced with a non-zero
/// fallback to avoid the all-zeros fixed point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Creates a new PRNG with the given seed.
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

    /// Derives an independent generator for a sub-stream (e.g. sampling vs.
    /// physics) without consuming values from `self`.
    pub fn fork(&self, salt: u64) -> Self {
        Self::new(self.state ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

impl RandomSource for Xorshift64 {
    /// Upper 53 bits of `next_u64()` divided by 2^53.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Modulo reduction; bias is negligible at 64-bit state width.
    fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }
}
