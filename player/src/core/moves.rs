//! Move selection.
//!
//! The [`MoveSource`] trait decouples the dispatcher from where move values
//! come from. Production plays [`UniformMoves`]; tests can seed it or swap in
//! a scripted source.

use std::num::NonZeroU64;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies one move per `yourmove`.
pub trait MoveSource {
    /// Pick a move in `[1, options]`.
    fn choose(&mut self, options: NonZeroU64) -> u64;
}

/// Uniform random choice over the legal range, with no memory between rounds.
#[derive(Debug, Clone)]
pub struct UniformMoves<R> {
    rng: R,
}

impl<R: Rng> UniformMoves<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl UniformMoves<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> MoveSource for UniformMoves<R> {
    fn choose(&mut self, options: NonZeroU64) -> u64 {
        self.rng.gen_range(1..=options.get())
    }
}
